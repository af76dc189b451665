//! `diskutil list` parsing (macOS family).

use super::{DeviceRecord, FALLBACK_LABEL};

/// Parse `diskutil list` output.
///
/// A line is a candidate only if it starts with the `/dev/disk` path prefix.
/// The identifier is the first token with `/dev/` stripped so the record
/// invariant (prefix + identifier = device path) holds like the other
/// families; the description is the remainder of the line.
pub fn parse(output: &str) -> Vec<DeviceRecord> {
    output
        .lines()
        .filter(|line| line.starts_with("/dev/disk"))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let node = tokens.next()?;
            let identifier = node.strip_prefix("/dev/").unwrap_or(node).to_string();
            let description = tokens.collect::<Vec<_>>().join(" ");
            Some(DeviceRecord {
                identifier,
                size: FALLBACK_LABEL.to_string(),
                description,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISKUTIL_OUTPUT: &str = "\
/dev/disk0 (internal, physical):
   #:                       TYPE NAME                    SIZE       IDENTIFIER
   0:      GUID_partition_scheme                        *500.3 GB   disk0
   1:                        EFI EFI                     314.6 MB    disk0s1

/dev/disk2 (external, physical):
   #:                       TYPE NAME                    SIZE       IDENTIFIER
   0:     FDisk_partition_scheme                        *15.5 GB    disk2
";

    #[test]
    fn test_parse_keeps_device_lines_only() {
        let records = parse(DISKUTIL_OUTPUT);
        let names: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(names, ["disk0", "disk2"]);
    }

    #[test]
    fn test_parse_strips_dev_prefix_from_identifier() {
        let records = parse(DISKUTIL_OUTPUT);
        assert_eq!(records[1].identifier, "disk2");
        assert_eq!(records[1].path().to_string_lossy(), "/dev/disk2");
    }

    #[test]
    fn test_parse_joins_description_tokens() {
        let records = parse(DISKUTIL_OUTPUT);
        assert_eq!(records[0].description, "(internal, physical):");
        assert_eq!(records[0].size, "Unknown");
    }

    #[test]
    fn test_parse_ignores_partition_rows() {
        let records = parse(DISKUTIL_OUTPUT);
        assert!(!records.iter().any(|r| r.identifier.contains("s1")));
    }
}
