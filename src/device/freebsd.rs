//! `geom disk list` stanza parsing (FreeBSD/GhostBSD family, the primary
//! target).

use super::{DeviceRecord, FALLBACK_LABEL};

/// Parse `geom disk list` output.
///
/// Output is a sequence of stanzas, each introduced by a `Geom name:` line.
/// Within a stanza we scan forward until a blank line or the next stanza,
/// picking up the `Mediasize:` human-readable portion (the parenthesized
/// part) and the `descr:` field. A stanza missing either field yields the
/// literal "Unknown" rather than failing.
pub fn parse(output: &str) -> Vec<DeviceRecord> {
    let lines: Vec<&str> = output.lines().collect();
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(name) = lines[i].trim().strip_prefix("Geom name:") else {
            i += 1;
            continue;
        };

        let mut size = None;
        let mut descr = None;
        let mut j = i + 1;
        while j < lines.len() {
            let inner = lines[j].trim();
            if inner.is_empty() || inner.starts_with("Geom name:") {
                break;
            }
            if let Some(rest) = inner.strip_prefix("Mediasize:") {
                size = parenthesized(rest);
            } else if let Some(rest) = inner.strip_prefix("descr:") {
                let text = rest.trim();
                if !text.is_empty() {
                    descr = Some(text.to_string());
                }
            }
            j += 1;
        }

        records.push(DeviceRecord {
            identifier: name.trim().to_string(),
            size: size.unwrap_or_else(|| FALLBACK_LABEL.to_string()),
            description: descr.unwrap_or_else(|| FALLBACK_LABEL.to_string()),
        });
        i = j;
    }

    records
}

/// Extract the human-readable portion from a field like
/// `1000204886016 (932G)`.
fn parenthesized(field: &str) -> Option<String> {
    let open = field.find('(')?;
    let close = field[open..].find(')')? + open;
    let inner = field[open + 1..close].trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOM_OUTPUT: &str = "\
Geom name: ada0
Providers:
1. Name: ada0
   Mediasize: 250059350016 (233G)
   Sectorsize: 512
   Mode: r2w2e4
   descr: Samsung SSD 870 EVO
   ident: S5Y1NG0N123456
   rotationrate: 0
   fwsectors: 63
   fwheads: 16

Geom name: da0
Providers:
1. Name: da0
   Mediasize: 15518924800 (14G)
   Sectorsize: 512
   Mode: r0w0e0
   descr: SanDisk Ultra
   ident: 4C530001230607113012

";

    #[test]
    fn test_parse_stanzas() {
        let records = parse(GEOM_OUTPUT);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].identifier, "ada0");
        assert_eq!(records[0].size, "233G");
        assert_eq!(records[0].description, "Samsung SSD 870 EVO");

        assert_eq!(records[1].identifier, "da0");
        assert_eq!(records[1].size, "14G");
        assert_eq!(records[1].description, "SanDisk Ultra");
    }

    #[test]
    fn test_parse_stanza_missing_fields_yields_unknown() {
        let output = "\
Geom name: cd0
Providers:
1. Name: cd0
   Sectorsize: 2048
";
        let records = parse(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "cd0");
        assert_eq!(records[0].size, "Unknown");
        assert_eq!(records[0].description, "Unknown");
    }

    #[test]
    fn test_parse_mediasize_without_parens_yields_unknown() {
        let output = "Geom name: md0\n   Mediasize: 1048576\n";
        let records = parse(output);
        assert_eq!(records[0].size, "Unknown");
    }

    #[test]
    fn test_parse_adjacent_stanzas_without_blank_line() {
        let output = "\
Geom name: ada0
   Mediasize: 1000 (1K)
Geom name: da0
   descr: Stick
";
        let records = parse(output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].size, "1K");
        assert_eq!(records[0].description, "Unknown");
        assert_eq!(records[1].size, "Unknown");
        assert_eq!(records[1].description, "Stick");
    }

    #[test]
    fn test_parenthesized() {
        assert_eq!(parenthesized(" 1000204886016 (932G)"), Some("932G".to_string()));
        assert_eq!(parenthesized(" 1000204886016"), None);
        assert_eq!(parenthesized(" 0 ()"), None);
    }
}
