// src/parse/text.rs

use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)\s*(st|nd|rd|th)?$").expect("ordinal regex should parse"));

/// Trim, turn non-breaking and other unicode spaces into plain spaces,
/// collapse runs of whitespace and strip outer quotes if present.
/// Letters are left alone, so accented names survive verbatim.
pub fn clean_text(raw: &str) -> String {
    let collapsed = raw
        .split(|c: char| c.is_whitespace() || c == '\u{a0}' || c == '\u{feff}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.len() >= 2 && collapsed.starts_with('"') && collapsed.ends_with('"') {
        collapsed[1..collapsed.len() - 1].trim().to_string()
    } else {
        collapsed
    }
}

/// Placeholder cells ESPN uses for an unfilled depth slot.
pub fn is_empty_slot(text: &str) -> bool {
    matches!(text, "" | "-" | "–" | "—" | "N/A")
}

/// "Starter" → 1, "2nd" → 2, "3" → 3.
pub fn parse_depth_label(label: &str) -> Option<u32> {
    let label = clean_text(label);
    if label.eq_ignore_ascii_case("starter") || label.eq_ignore_ascii_case("first") {
        return Some(1);
    }
    let caps = ORDINAL.captures(&label)?;
    caps[1].parse().ok().filter(|d| *d > 0)
}

/// Depth for each of `n` slots: the header labels when every one of them
/// reads as a depth, otherwise 1..=n.
pub fn depth_slots(headers: &[String], n: usize) -> Vec<u32> {
    let parsed: Option<Vec<u32>> = headers.iter().take(n).map(|h| parse_depth_label(h)).collect();
    match parsed {
        Some(depths) if depths.len() == n => depths,
        _ => (1..=n as u32).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_normalizes_spacing() {
        assert_eq!(clean_text("  Kyler\u{a0}\u{a0}Murray \n"), "Kyler Murray");
        assert_eq!(clean_text("\"quoted\""), "quoted");
        assert_eq!(clean_text("Mecole Hardman Jr."), "Mecole Hardman Jr.");
    }

    #[test]
    fn clean_text_keeps_accents() {
        assert_eq!(clean_text("Jaelan\u{a0}Phillips-Núñez"), "Jaelan Phillips-Núñez");
        assert_eq!(clean_text("Zaire Franklin Sr. "), "Zaire Franklin Sr.");
    }

    #[test]
    fn depth_labels() {
        assert_eq!(parse_depth_label("Starter"), Some(1));
        assert_eq!(parse_depth_label("2nd"), Some(2));
        assert_eq!(parse_depth_label(" 3RD "), Some(3));
        assert_eq!(parse_depth_label("4"), Some(4));
        assert_eq!(parse_depth_label("Backup"), None);
        assert_eq!(parse_depth_label("0"), None);
    }

    #[test]
    fn depth_slots_fall_back_to_sequence() {
        let headers: Vec<String> = ["Starter", "2nd", "3rd"].iter().map(|s| s.to_string()).collect();
        assert_eq!(depth_slots(&headers, 3), vec![1, 2, 3]);
        // fewer headers than cells
        assert_eq!(depth_slots(&headers[..1], 3), vec![1, 2, 3]);
        // unreadable header
        let odd = vec!["Starter".to_string(), "Backup".to_string()];
        assert_eq!(depth_slots(&odd, 2), vec![1, 2]);
        assert!(depth_slots(&[], 0).is_empty());
    }
}
