// src/process/combine.rs

use std::path::PathBuf;
use tracing::{info, instrument};

use super::csv_io::{read_all, write_records};
use super::unit::team_csv_files;
use crate::chart::{PlayerRecord, Unit};
use crate::config::Config;
use crate::error::Result;

/// Which files feed the combined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineSource {
    /// The three per-unit tables in `combined_dir`.
    Units,
    /// The per-team tables in `team_csv_dir`.
    Teams,
}

/// Concatenate and stable-sort by (team, position_group, depth_slot).
/// Rows that compare equal keep their input order; nothing is dropped.
pub fn combine_records(parts: impl IntoIterator<Item = Vec<PlayerRecord>>) -> Vec<PlayerRecord> {
    let mut all: Vec<PlayerRecord> = parts.into_iter().flatten().collect();
    all.sort_by(|a, b| {
        (&a.team, a.position_group, a.depth_slot).cmp(&(&b.team, b.position_group, b.depth_slot))
    });
    all
}

pub fn combine_inputs(config: &Config, source: CombineSource) -> Result<Vec<PathBuf>> {
    match source {
        CombineSource::Units => Ok(Unit::ALL.iter().map(|u| config.unit_path(*u)).collect()),
        CombineSource::Teams => team_csv_files(config),
    }
}

/// Write `<combined_dir>/combined_depth_chart.csv`. A missing or malformed
/// input aborts the stage with the file named in the error.
#[instrument(level = "info", skip(config))]
pub fn combine(config: &Config, source: CombineSource) -> Result<PathBuf> {
    let inputs = combine_inputs(config, source)?;
    let rows = combine_records(std::iter::once(read_all(&inputs)?));
    let out = config.combined_path();

    if config.dry_run {
        info!(path = %out.display(), rows = rows.len(), files = inputs.len(), "dry run: would write combined table");
    } else {
        write_records(&out, &rows)?;
        info!(path = %out.display(), rows = rows.len(), files = inputs.len(), "wrote combined table");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DepthChartError;
    use crate::process::csv_io::read_records;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn config_in(root: &std::path::Path) -> Config {
        Config {
            team_csv_dir: root.join("team_CSV"),
            combined_dir: root.join("combined_depth_charts"),
            ..Config::default()
        }
    }

    fn seed_units(config: &Config) -> Result<()> {
        write_records(
            &config.unit_path(Unit::Offense),
            &[
                PlayerRecord::new("TeamB", Unit::Offense, "QB", 1, "Jane Doe"),
                PlayerRecord::new("TeamA", Unit::Offense, "QB", 2, "Backup Bob"),
                PlayerRecord::new("TeamA", Unit::Offense, "QB", 1, "John Smith"),
            ],
        )?;
        write_records(
            &config.unit_path(Unit::Defense),
            &[PlayerRecord::new("TeamA", Unit::Defense, "CB", 1, "Lock Down")],
        )?;
        write_records(
            &config.unit_path(Unit::Special),
            &[PlayerRecord::new("TeamA", Unit::Offense, "QB", 1, "John Smith")],
        )?;
        Ok(())
    }

    #[test]
    fn concatenates_in_stable_order_keeping_duplicates() -> Result<()> {
        let tmp = tempdir()?;
        let config = config_in(tmp.path());
        seed_units(&config)?;

        let rows = read_records(&combine(&config, CombineSource::Units)?)?;
        let names: Vec<_> = rows.iter().map(|r| (r.team.as_str(), r.player_name.as_str())).collect();
        assert_eq!(
            names,
            vec![
                ("TeamA", "John Smith"),
                ("TeamA", "John Smith"),
                ("TeamA", "Backup Bob"),
                ("TeamA", "Lock Down"),
                ("TeamB", "Jane Doe"),
            ]
        );
        Ok(())
    }

    #[test]
    fn rerun_is_byte_identical() -> Result<()> {
        let tmp = tempdir()?;
        let config = config_in(tmp.path());
        seed_units(&config)?;

        let out = combine(&config, CombineSource::Units)?;
        let first = fs::read(&out)?;
        combine(&config, CombineSource::Units)?;
        assert_eq!(fs::read(&out)?, first);
        Ok(())
    }

    #[test]
    fn missing_unit_file_is_fatal_and_named() {
        let tmp = tempdir().unwrap();
        let config = config_in(tmp.path());
        write_records(&config.unit_path(Unit::Offense), &[]).unwrap();

        let err = combine(&config, CombineSource::Units).unwrap_err();
        match err {
            DepthChartError::Io { path, .. } => assert_eq!(path, config.unit_path(Unit::Defense)),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn combines_straight_from_team_files() -> Result<()> {
        let tmp = tempdir()?;
        let config = config_in(tmp.path());
        let team = crate::teams::Team::new("TeamA", "ta", "team-a");
        write_records(
            &config.team_csv_path(&team),
            &[
                PlayerRecord::new("TeamA", Unit::Special, "PK", 1, "Leg Day"),
                PlayerRecord::new("TeamA", Unit::Offense, "QB", 1, "John Smith"),
            ],
        )?;

        let rows = read_records(&combine(&config, CombineSource::Teams)?)?;
        assert_eq!(rows[0].position_group, Unit::Offense);
        assert_eq!(rows[1].position_group, Unit::Special);
        Ok(())
    }
}
