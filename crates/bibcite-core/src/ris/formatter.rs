//! RIS formatter implementation

use super::entry::RisEntry;

/// Format one entry, from `TY` to `ER`
pub fn format_entry(entry: &RisEntry) -> String {
    let mut lines = Vec::with_capacity(entry.tags.len() + 2);
    lines.push(format!("TY  - {}", entry.entry_type.code()));

    for tag in &entry.tags {
        // RIS values are single-line
        let value = tag.value.split_whitespace().collect::<Vec<_>>().join(" ");
        lines.push(format!("{}  - {}", tag.tag, value));
    }

    lines.push("ER  - ".to_string());
    lines.join("\n")
}

/// Format entries separated by blank lines
pub fn format_entries(entries: &[RisEntry]) -> String {
    let mut out = entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ris::{parse, RisType};

    #[test]
    fn test_format_simple_entry() {
        let mut entry = RisEntry::new(RisType::Jour);
        entry.add_tag("TI", "Test Title");
        entry.add_tag("AU", "Smith, John");
        entry.add_tag("PY", "2024");

        let formatted = format_entry(&entry);
        assert_eq!(
            formatted,
            "TY  - JOUR\nTI  - Test Title\nAU  - Smith, John\nPY  - 2024\nER  - "
        );
    }

    #[test]
    fn test_multiline_values_are_flattened() {
        let mut entry = RisEntry::new(RisType::Gen);
        entry.add_tag("AB", "line one\nline two");
        assert!(format_entry(&entry).contains("AB  - line one line two\n"));
    }

    #[test]
    fn test_formatted_entries_parse_back() {
        let mut first = RisEntry::new(RisType::Book);
        first.add_tag("TI", "One");
        let mut second = RisEntry::new(RisType::Other("PAT".into()));
        second.add_tag("TI", "Two");

        let text = format_entries(&[first, second]);
        let parsed = parse(&text);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[1].entry_type.code(), "PAT");
        assert_eq!(parsed.entries[1].get_tag("TI"), Some("Two"));
    }
}
