//! Parser for Linux `/proc/<pid>/maps`
//!
//! ```text
//! 7f3c2a000000-7f3c2a022000 r--p 00000000 08:01 1311     /usr/lib/libc.so.6
//! ```

use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub start: u64,
    pub end: u64,
    pub perms: String,
    pub offset: u64,
    pub pathname: String,
}

impl MapEntry {
    pub fn is_readable(&self) -> bool {
        self.perms.starts_with('r')
    }

    /// Final path component, e.g. `libc.so.6`
    pub fn file_name(&self) -> Option<&str> {
        if self.pathname.is_empty() || self.pathname.starts_with('[') {
            return None;
        }
        Path::new(&self.pathname)
            .file_name()
            .and_then(|name| name.to_str())
    }
}

/// Parse a whole maps file, skipping lines that don't parse.
pub fn parse_maps(content: &str) -> Vec<MapEntry> {
    content.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<MapEntry> {
    let mut fields = line.split_whitespace();
    let range = fields.next()?;
    let perms = fields.next()?;
    let offset = fields.next()?;
    let _dev = fields.next()?;
    let _inode = fields.next()?;
    // Paths may contain spaces
    let pathname = fields.collect::<Vec<_>>().join(" ");

    let (start, end) = range.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    if end < start {
        return None;
    }

    Some(MapEntry {
        start,
        end,
        perms: perms.to_string(),
        offset: u64::from_str_radix(offset, 16).ok()?,
        pathname,
    })
}

/// Lowest start and highest end of every mapping backed by a file named
/// `name` (case-insensitive).
pub fn module_span(entries: &[MapEntry], name: &str) -> Option<(u64, u64)> {
    entries
        .iter()
        .filter(|entry| {
            entry
                .file_name()
                .is_some_and(|file| file.eq_ignore_ascii_case(name))
        })
        .fold(None, |span, entry| match span {
            None => Some((entry.start, entry.end)),
            Some((start, end)) => Some((start.min(entry.start), end.max(entry.end))),
        })
}

/// Whether `[start, end)` is covered by contiguous readable mappings.
///
/// `entries` must be in ascending order, as the kernel writes them.
pub fn covers_readable(entries: &[MapEntry], start: u64, end: u64) -> bool {
    let mut cursor = start;
    for entry in entries {
        if cursor >= end {
            break;
        }
        if entry.end <= cursor {
            continue;
        }
        if entry.start > cursor || !entry.is_readable() {
            return false;
        }
        cursor = entry.end;
    }
    cursor >= end
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPS: &str = "\
55d0c8a00000-55d0c8a02000 r--p 00000000 08:01 100 /usr/bin/host app
55d0c8a02000-55d0c8a06000 r-xp 00002000 08:01 100 /usr/bin/host app
7f3c2a000000-7f3c2a022000 r--p 00000000 08:01 1311 /usr/lib/libengine.so
7f3c2a022000-7f3c2a100000 r-xp 00022000 08:01 1311 /usr/lib/libengine.so
7f3c2a100000-7f3c2a120000 ---p 00100000 08:01 1311 /usr/lib/libengine.so
7f3c2a120000-7f3c2a124000 rw-p 00120000 08:01 1311 /usr/lib/libengine.so
7ffd1b000000-7ffd1b021000 rw-p 00000000 00:00 0 [stack]
7ffd1b100000-7ffd1b102000 rw-p 00000000 00:00 0
garbage line
";

    #[test]
    fn test_parse_maps_entries() {
        let entries = parse_maps(MAPS);
        assert_eq!(entries.len(), 8);

        let first = &entries[0];
        assert_eq!(first.start, 0x55d0c8a00000);
        assert_eq!(first.end, 0x55d0c8a02000);
        assert_eq!(first.perms, "r--p");
        assert_eq!(first.pathname, "/usr/bin/host app");
        assert!(first.is_readable());
        assert!(!entries[4].is_readable());
    }

    #[test]
    fn test_file_name() {
        let entries = parse_maps(MAPS);
        assert_eq!(entries[2].file_name(), Some("libengine.so"));
        assert_eq!(entries[6].file_name(), None);
        assert_eq!(entries[7].file_name(), None);
    }

    #[test]
    fn test_module_span_covers_all_segments() {
        let entries = parse_maps(MAPS);
        assert_eq!(
            module_span(&entries, "libengine.so"),
            Some((0x7f3c2a000000, 0x7f3c2a124000))
        );
        assert_eq!(
            module_span(&entries, "LIBENGINE.SO"),
            Some((0x7f3c2a000000, 0x7f3c2a124000))
        );
        assert_eq!(
            module_span(&entries, "host app"),
            Some((0x55d0c8a00000, 0x55d0c8a06000))
        );
    }

    #[test]
    fn test_module_span_missing() {
        let entries = parse_maps(MAPS);
        assert_eq!(module_span(&entries, "libmissing.so"), None);
        assert_eq!(module_span(&entries, "[stack]"), None);
    }

    #[test]
    fn test_covers_readable_across_segments() {
        let entries = parse_maps(MAPS);
        // r--p followed directly by r-xp
        assert!(covers_readable(&entries, 0x55d0c8a01000, 0x55d0c8a05000));
        assert!(covers_readable(&entries, 0x7f3c2a000000, 0x7f3c2a100000));
        assert!(covers_readable(&entries, 0x7ffd1b000000, 0x7ffd1b000001));
    }

    #[test]
    fn test_covers_readable_rejects_gaps_and_guards() {
        let entries = parse_maps(MAPS);
        // Runs into the ---p segment
        assert!(!covers_readable(&entries, 0x7f3c2a0ff000, 0x7f3c2a101000));
        // Hole between the executable and the library
        assert!(!covers_readable(&entries, 0x55d0c8a05000, 0x55d0c8a07000));
        // Nothing mapped at all
        assert!(!covers_readable(&entries, 0x10000, 0x11000));
        // Past the last mapping
        assert!(!covers_readable(&entries, 0x7ffd1b101000, 0x7ffd1b103000));
    }
}
