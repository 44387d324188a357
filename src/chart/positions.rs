// src/chart/positions.rs
//
// Canonical position taxonomy. Labels are uppercased, stripped of trailing
// slot digits ("WR1" -> "WR") and mapped through a small alias table.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

use super::Unit;

static OFFENSE: &[&str] = &[
    "QB", "RB", "FB", "WR", "TE", "LT", "LG", "C", "RG", "RT", "T", "G", "OL",
];

static DEFENSE: &[&str] = &[
    "DE", "LDE", "RDE", "DT", "LDT", "RDT", "NT", "LB", "WLB", "MLB", "SLB", "LILB", "RILB",
    "LOLB", "ROLB", "OLB", "ILB", "EDGE", "CB", "LCB", "RCB", "NB", "S", "SS", "FS",
];

static SPECIAL: &[&str] = &["PK", "P", "H", "LS", "PR", "KR"];

static ALIASES: &[(&str, &str)] = &[
    ("HB", "RB"),
    ("K", "PK"),
    ("KO", "PK"),
    ("OT", "T"),
    ("OG", "G"),
    ("SAF", "S"),
    ("DB", "CB"),
];

static UNIT_BY_LABEL: Lazy<HashMap<&'static str, Unit>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (labels, unit) in [
        (OFFENSE, Unit::Offense),
        (DEFENSE, Unit::Defense),
        (SPECIAL, Unit::Special),
    ] {
        for &label in labels {
            map.insert(label, unit);
        }
    }
    map
});

/// A label reduced to its canonical form, with any slot number split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPosition {
    pub label: String,
    pub slot: Option<u32>,
}

impl CanonicalPosition {
    pub fn is_known(&self) -> bool {
        UNIT_BY_LABEL.contains_key(self.label.as_str())
    }

    pub fn unit(&self) -> Option<Unit> {
        UNIT_BY_LABEL.get(self.label.as_str()).copied()
    }
}

pub fn normalize_position(raw: &str) -> CanonicalPosition {
    let compact: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect();

    let split_at = compact
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(compact.len());

    // an all-digit label has nothing left to canonicalize
    if split_at == 0 {
        return CanonicalPosition {
            label: compact,
            slot: None,
        };
    }

    let (stem, digits) = compact.split_at(split_at);
    let slot = digits.parse().ok();
    let label = ALIASES
        .iter()
        .find(|(alias, _)| *alias == stem)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| stem.to_string());

    let canonical = CanonicalPosition { label, slot };
    if !canonical.is_known() {
        debug!(raw, label = %canonical.label, "position outside the canonical taxonomy");
    }
    canonical
}

/// Rank of a special-teams label when choosing a player's primary role:
/// PK, P, H, LS, PR, KR, then anything else.
pub fn special_teams_rank(label: &str) -> usize {
    SPECIAL
        .iter()
        .position(|&p| p == label)
        .unwrap_or(SPECIAL.len())
}
