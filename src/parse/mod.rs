// src/parse/mod.rs

pub mod espn;
pub mod generic;
pub mod text;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::{debug, instrument, warn};

use crate::chart::{normalize_position, DepthEntry, PlayerDetails, PlayerRecord, Unit};
use crate::error::{DepthChartError, Result};
use crate::teams::Team;

/// One formation (offense, defense or special teams) as found on the page.
#[derive(Debug, Clone)]
pub struct FormationTable {
    /// e.g. "3WR 1TE", "Base 4-3 D", "Special Teams"
    pub title: Option<String>,
    /// Outer HTML of the table container, kept for snapshots.
    pub html: String,
    pub rows: Vec<PositionRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRow {
    pub position: String,
    /// (depth_slot, player); `None` marks an empty slot.
    pub slots: Vec<(u32, Option<PlayerCell>)>,
}

/// One filled depth cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCell {
    pub name: String,
    pub details: PlayerDetails,
}

impl PlayerCell {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: PlayerDetails::default(),
        }
    }
}

static OFFENSE_TOKENS: &[&str] = &[
    "QB", "RB", "WR", "TE", "FB", "OL", "LT", "LG", "RG", "RT", "OFFENSE",
];
static DEFENSE_TOKENS: &[&str] = &["D", "DEF", "DEFENSE", "NICKEL", "DIME", "BASE"];
static FRONT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d-\d\b").expect("front regex should parse"));

impl FormationTable {
    /// Decide the unit: the title first, then the majority of position
    /// labels, then the table's position on the page.
    pub fn unit(&self, index: usize) -> Option<Unit> {
        self.title
            .as_deref()
            .and_then(unit_from_title)
            .or_else(|| self.unit_from_positions())
            .or_else(|| Unit::from_table_index(index))
    }

    fn unit_from_positions(&self) -> Option<Unit> {
        let mut counts = [0usize; 3];
        for row in &self.rows {
            if let Some(unit) = normalize_position(&row.position).unit() {
                counts[unit as usize] += 1;
            }
        }
        let (best, &count) = counts
            .iter()
            .enumerate()
            .max_by_key(|&(i, c)| (*c, std::cmp::Reverse(i)))?;
        if count == 0 {
            return None;
        }
        Unit::from_table_index(best)
    }
}

fn unit_from_title(title: &str) -> Option<Unit> {
    let upper = title.to_uppercase();
    if upper.contains("SPECIAL") {
        return Some(Unit::Special);
    }
    let tokens: Vec<&str> = upper
        .split(|c: char| !c.is_ascii_alphanumeric())
        .map(|t| t.trim_start_matches(|c: char| c.is_ascii_digit()))
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.iter().any(|t| OFFENSE_TOKENS.contains(t)) {
        return Some(Unit::Offense);
    }
    if FRONT.is_match(&upper) || tokens.iter().any(|t| DEFENSE_TOKENS.contains(t)) {
        return Some(Unit::Defense);
    }
    None
}

/// Every depth-chart table on the page. ESPN's split layout is tried
/// first; the single-table layout is the fallback.
pub fn extract_tables(html: &str) -> Vec<FormationTable> {
    let document = Html::parse_document(html);
    let espn = espn::extract(&document);
    if espn.iter().any(|t| !t.rows.is_empty()) {
        return espn;
    }
    let generic = generic::extract(&document);
    if generic.iter().any(|t| !t.rows.is_empty()) {
        return generic;
    }
    espn
}

/// Tables that carry rows, paired with their unit. Tables whose unit
/// cannot be decided are dropped with a warning.
pub fn classify_tables(tables: &[FormationTable]) -> Vec<(Unit, &FormationTable)> {
    tables
        .iter()
        .filter(|t| !t.rows.is_empty())
        .enumerate()
        .filter_map(|(i, table)| match table.unit(i) {
            Some(unit) => Some((unit, table)),
            None => {
                warn!(title = ?table.title, index = i, "cannot tell which unit a table belongs to; skipping it");
                None
            }
        })
        .collect()
}

/// Turn one team's page into depth-chart entries, in page order.
#[instrument(level = "debug", skip(team, html), fields(team = %team.abbrev, bytes = html.len()))]
pub fn parse_depth_entries(team: &Team, html: &str) -> Result<Vec<DepthEntry>> {
    let tables = extract_tables(html);
    if tables.is_empty() {
        return Err(DepthChartError::parse(&team.name, "no depth-chart table found"));
    }

    let classified = classify_tables(&tables);
    if classified.is_empty() {
        return Err(DepthChartError::parse(
            &team.name,
            format!("{} table(s) found but none carried positions", tables.len()),
        ));
    }

    let mut entries = Vec::new();
    for (unit, table) in classified {
        for row in &table.rows {
            for (depth, player) in &row.slots {
                if let Some(cell) = player {
                    entries.push(DepthEntry {
                        record: PlayerRecord::new(
                            team.name.as_str(),
                            unit,
                            row.position.as_str(),
                            *depth,
                            cell.name.as_str(),
                        ),
                        details: cell.details.clone(),
                    });
                }
            }
        }
    }

    if entries.is_empty() {
        warn!(team = %team.name, "depth chart parsed but every slot was empty");
    }
    debug!(records = entries.len(), "parsed depth chart");
    Ok(entries)
}

/// The depth-chart records alone.
pub fn parse_depth_chart(team: &Team, html: &str) -> Result<Vec<PlayerRecord>> {
    Ok(parse_depth_entries(team, html)?
        .into_iter()
        .map(|e| e.record)
        .collect())
}
