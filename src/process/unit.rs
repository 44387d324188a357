// src/process/unit.rs

use std::path::PathBuf;
use tracing::{info, instrument};

use super::csv_io::{list_files, read_all, write_records};
use crate::chart::{normalize_position, PlayerRecord, Unit};
use crate::config::{reserved_file_names, Config, TEAM_FILE_SUFFIX};
use crate::error::Result;

/// Rows belonging to `unit`, in input order, with positions mapped onto the
/// canonical taxonomy ("WR1" -> "WR").
pub fn select_unit(records: impl IntoIterator<Item = PlayerRecord>, unit: Unit) -> Vec<PlayerRecord> {
    records
        .into_iter()
        .filter(|r| r.position_group == unit)
        .map(|mut r| {
            r.position = normalize_position(&r.position).label;
            r
        })
        .collect()
}

/// Per-team CSVs in `team_csv_dir`, sorted by file name.
pub fn team_csv_files(config: &Config) -> Result<Vec<PathBuf>> {
    let reserved = reserved_file_names();
    let reserved: Vec<&str> = reserved.iter().map(String::as_str).collect();
    list_files(&config.team_csv_dir, TEAM_FILE_SUFFIX, &reserved)
}

/// Read every per-team CSV and write `<combined_dir>/<unit>_depth_chart.csv`.
#[instrument(level = "info", skip(config, unit), fields(unit = %unit))]
pub fn process_unit(config: &Config, unit: Unit) -> Result<PathBuf> {
    let inputs = team_csv_files(config)?;
    let rows = select_unit(read_all(&inputs)?, unit);
    let out = config.unit_path(unit);

    if config.dry_run {
        info!(path = %out.display(), rows = rows.len(), files = inputs.len(), "dry run: would write unit table");
    } else {
        write_records(&out, &rows)?;
        info!(path = %out.display(), rows = rows.len(), files = inputs.len(), "wrote unit table");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::csv_io::read_records;
    use crate::teams::Team;
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

    fn seed_two_teams(config: &Config) -> Result<()> {
        let a = Team::new("TeamA", "ta", "team-a");
        let b = Team::new("TeamB", "tb", "team-b");
        write_records(
            &config.team_csv_path(&a),
            &[
                PlayerRecord::new("TeamA", Unit::Offense, "QB", 1, "John Smith"),
                PlayerRecord::new("TeamA", Unit::Defense, "LDE", 1, "Big Al"),
            ],
        )?;
        write_records(
            &config.team_csv_path(&b),
            &[
                PlayerRecord::new("TeamB", Unit::Offense, "QB", 1, "Jane Doe"),
                PlayerRecord::new("TeamB", Unit::Special, "K", 1, "Leg Day"),
            ],
        )?;
        Ok(())
    }

    #[test]
    fn offense_rows_from_two_teams() -> Result<()> {
        let tmp = tempdir()?;
        let config = config_in(tmp.path());
        seed_two_teams(&config)?;

        let out = process_unit(&config, Unit::Offense)?;
        let rows = read_records(&out)?;
        assert_eq!(
            rows,
            vec![
                PlayerRecord::new("TeamA", Unit::Offense, "QB", 1, "John Smith"),
                PlayerRecord::new("TeamB", Unit::Offense, "QB", 1, "Jane Doe"),
            ]
        );
        Ok(())
    }

    #[test]
    fn special_positions_are_normalized() -> Result<()> {
        let tmp = tempdir()?;
        let config = config_in(tmp.path());
        seed_two_teams(&config)?;

        let rows = read_records(&process_unit(&config, Unit::Special)?)?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].position, "PK");
        Ok(())
    }

    #[test]
    fn rerun_is_byte_identical() -> Result<()> {
        let tmp = tempdir()?;
        let config = config_in(tmp.path());
        seed_two_teams(&config)?;

        let out = process_unit(&config, Unit::Defense)?;
        let first = fs::read(&out)?;
        process_unit(&config, Unit::Defense)?;
        assert_eq!(fs::read(&out)?, first);
        Ok(())
    }

    #[test]
    fn dry_run_writes_nothing() -> Result<()> {
        let tmp = tempdir()?;
        let mut config = config_in(tmp.path());
        seed_two_teams(&config)?;
        config.dry_run = true;

        let out = process_unit(&config, Unit::Offense)?;
        assert!(!out.exists());
        Ok(())
    }

    #[test]
    fn select_unit_maps_slot_labels() {
        let rows = select_unit(
            vec![
                PlayerRecord::new("T", Unit::Offense, "WR1", 1, "A"),
                PlayerRecord::new("T", Unit::Offense, "wr2", 1, "B"),
                PlayerRecord::new("T", Unit::Defense, "CB", 1, "C"),
            ],
            Unit::Offense,
        );
        let positions: Vec<_> = rows.iter().map(|r| r.position.as_str()).collect();
        assert_eq!(positions, vec!["WR", "WR"]);
    }
}
