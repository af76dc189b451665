//! `lsblk` output parsing (Linux family).

use super::DeviceRecord;

/// Parse `lsblk -nd -o NAME,SIZE,TYPE` output.
///
/// Only rows tagged `disk` become candidates; partitions and virtual
/// devices never appear in the result.
pub fn parse(output: &str) -> Vec<DeviceRecord> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let size = fields.next()?;
            let kind = fields.next()?;
            (kind == "disk").then(|| DeviceRecord {
                identifier: name.to_string(),
                size: size.to_string(),
                description: String::new(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSBLK_OUTPUT: &str = "\
sda    465.8G disk
sda1     512M part
sda2   465.3G part
sdb     14.9G disk
sr0     1024M rom
";

    #[test]
    fn test_parse_keeps_disks_only() {
        let records = parse(LSBLK_OUTPUT);
        let names: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(names, ["sda", "sdb"]);
    }

    #[test]
    fn test_parse_maps_columns() {
        let records = parse(LSBLK_OUTPUT);
        assert_eq!(records[1].identifier, "sdb");
        assert_eq!(records[1].size, "14.9G");
        assert_eq!(records[1].description, "");
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let records = parse("sda\n\nsdb 14.9G disk\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "sdb");
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse("").is_empty());
    }
}
