// src/process/master.rs

use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use super::csv_io::{read_all, write_records};
use crate::chart::PlayerRecord;
use crate::config::Config;
use crate::error::Result;

/// A player's identity in the master table: team, name and position,
/// compared case-insensitively on trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    team: String,
    player_name: String,
    position: String,
}

impl IdentityKey {
    pub fn of(record: &PlayerRecord) -> Self {
        let norm = |s: &str| s.trim().to_lowercase();
        Self {
            team: norm(&record.team),
            player_name: norm(&record.player_name),
            position: norm(&record.position),
        }
    }
}

/// One row per identity key. When a key repeats, the row read later wins.
/// Output is sorted by team, position group, depth, name, then position.
pub fn dedup_last_write_wins(records: impl IntoIterator<Item = PlayerRecord>) -> Vec<PlayerRecord> {
    let mut by_key: HashMap<IdentityKey, PlayerRecord> = HashMap::new();
    let mut replaced = 0usize;
    for record in records {
        if by_key.insert(IdentityKey::of(&record), record).is_some() {
            replaced += 1;
        }
    }
    debug!(unique = by_key.len(), replaced, "deduplicated master rows");

    let mut rows: Vec<PlayerRecord> = by_key.into_values().collect();
    rows.sort_by(|a, b| {
        (&a.team, a.position_group, a.depth_slot, &a.player_name, &a.position).cmp(&(
            &b.team,
            b.position_group,
            b.depth_slot,
            &b.player_name,
            &b.position,
        ))
    });
    rows
}

/// Build `master_nfl_depth_chart.csv` from `inputs`, or from the combined
/// table when no inputs are given.
#[instrument(level = "info", skip(config, inputs))]
pub fn master_combine(config: &Config, inputs: &[PathBuf]) -> Result<PathBuf> {
    let inputs = if inputs.is_empty() {
        vec![config.combined_path()]
    } else {
        inputs.to_vec()
    };
    let rows = dedup_last_write_wins(read_all(&inputs)?);
    let out = config.master_path();

    if config.dry_run {
        info!(path = %out.display(), rows = rows.len(), "dry run: would write master table");
    } else {
        write_records(&out, &rows)?;
        info!(path = %out.display(), rows = rows.len(), "wrote master table");
    }
    Ok(out)
}
