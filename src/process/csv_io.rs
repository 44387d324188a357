// src/process/csv_io.rs
//
// Reading and writing the fixed five-column depth-chart CSV.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::chart::{DepthEntry, PlayerDetails, PlayerRecord, Unit};
use crate::error::{DepthChartError, Result};

/// Serialize `records` with the header row, even when there are no records.
pub fn write_records_to<W: Write>(out: W, records: &[PlayerRecord]) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(PlayerRecord::HEADER)?;
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Replace `path` with whatever `write` produces.
///
/// Output goes to a hidden temp file in the same directory and is renamed
/// over the target. The temp file is removed when either step fails.
pub fn replace_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(BufWriter<File>, &Path) -> Result<()>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| DepthChartError::io(dir, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| DepthChartError::Config(format!("not a file path: {}", path.display())))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let tmp = File::create(&tmp_path).map_err(|e| DepthChartError::io(&tmp_path, e))?;
    let written = write(BufWriter::new(tmp), &tmp_path).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| DepthChartError::io(path, e))
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

/// Write `records` to `path`, replacing any previous file.
pub fn write_records(path: &Path, records: &[PlayerRecord]) -> Result<()> {
    replace_file(path, |out, tmp_path| {
        write_records_to(out, records).map_err(|e| DepthChartError::csv(tmp_path, e))
    })?;
    debug!(path = %path.display(), rows = records.len(), "wrote CSV");
    Ok(())
}

/// Header of the per-team player-details file: the five depth-chart
/// columns plus what the page said about each player.
pub const DETAILS_HEADER: [&str; 8] = [
    "team",
    "position_group",
    "position",
    "depth_slot",
    "player_name",
    "injury_status",
    "player_url",
    "player_uid",
];

#[derive(Debug, Serialize, Deserialize)]
struct DetailsRow {
    team: String,
    position_group: Unit,
    position: String,
    depth_slot: u32,
    player_name: String,
    injury_status: Option<String>,
    player_url: Option<String>,
    player_uid: Option<String>,
}

impl From<&DepthEntry> for DetailsRow {
    fn from(e: &DepthEntry) -> Self {
        Self {
            team: e.record.team.clone(),
            position_group: e.record.position_group,
            position: e.record.position.clone(),
            depth_slot: e.record.depth_slot,
            player_name: e.record.player_name.clone(),
            injury_status: e.details.injury_status.clone(),
            player_url: e.details.player_url.clone(),
            player_uid: e.details.player_uid.clone(),
        }
    }
}

impl From<DetailsRow> for DepthEntry {
    fn from(r: DetailsRow) -> Self {
        let blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        DepthEntry {
            record: PlayerRecord::new(r.team, r.position_group, r.position, r.depth_slot, r.player_name),
            details: PlayerDetails {
                injury_status: blank(r.injury_status),
                player_url: blank(r.player_url),
                player_uid: blank(r.player_uid),
            },
        }
    }
}

pub fn write_details(path: &Path, entries: &[DepthEntry]) -> Result<()> {
    replace_file(path, |out, tmp_path| {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
        let csv_err = |e| DepthChartError::csv(tmp_path, e);
        wtr.write_record(DETAILS_HEADER).map_err(csv_err)?;
        for e in entries {
            wtr.serialize(DetailsRow::from(e)).map_err(csv_err)?;
        }
        wtr.flush().map_err(|e| DepthChartError::io(tmp_path, e))
    })?;
    debug!(path = %path.display(), rows = entries.len(), "wrote player details");
    Ok(())
}

pub fn read_details(path: &Path) -> Result<Vec<DepthEntry>> {
    let file = File::open(path).map_err(|e| DepthChartError::io(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(BufReader::new(file));
    rdr.deserialize::<DetailsRow>()
        .map(|row| row.map(DepthEntry::from).map_err(|e| DepthChartError::csv(path, e)))
        .collect()
}

/// Column positions of the five required fields in a header row.
struct ColumnIndex {
    team: usize,
    position_group: usize,
    position: usize,
    depth_slot: usize,
    player_name: usize,
}

impl ColumnIndex {
    fn from_headers(path: &Path, headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let missing: Vec<&str> = PlayerRecord::HEADER
            .iter()
            .copied()
            .filter(|h| find(h).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DepthChartError::schema(
                path,
                format!("missing column(s): {}", missing.join(", ")),
            ));
        }
        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            team: at("team"),
            position_group: at("position_group"),
            position: at("position"),
            depth_slot: at("depth_slot"),
            player_name: at("player_name"),
        })
    }

    fn record(&self, path: &Path, line: u64, row: &StringRecord) -> Result<PlayerRecord> {
        let field = |i: usize| row.get(i).unwrap_or("").to_string();
        let position_group: Unit = field(self.position_group)
            .parse()
            .map_err(|e: String| DepthChartError::schema(path, format!("line {}: {}", line, e)))?;
        let depth_raw = field(self.depth_slot);
        let depth_slot: u32 = depth_raw.parse().map_err(|_| {
            DepthChartError::schema(path, format!("line {}: bad depth_slot {:?}", line, depth_raw))
        })?;
        Ok(PlayerRecord {
            team: field(self.team),
            position_group,
            position: field(self.position),
            depth_slot,
            player_name: field(self.player_name),
        })
    }
}

/// Read a depth-chart CSV. Columns are matched by header name, so extra
/// columns and a different column order are tolerated.
pub fn read_records(path: &Path) -> Result<Vec<PlayerRecord>> {
    let file = File::open(path).map_err(|e| DepthChartError::io(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let headers = rdr
        .headers()
        .map_err(|e| DepthChartError::csv(path, e))?
        .clone();
    let index = ColumnIndex::from_headers(path, &headers)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| DepthChartError::csv(path, e))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        records.push(index.record(path, line, &row)?);
    }
    debug!(path = %path.display(), rows = records.len(), "read CSV");
    Ok(records)
}

/// Read several files and concatenate them in the order given.
pub fn read_all(paths: &[PathBuf]) -> Result<Vec<PlayerRecord>> {
    let mut all = Vec::new();
    for path in paths {
        all.extend(read_records(path)?);
    }
    Ok(all)
}

/// Files in `dir` whose name ends with `suffix`, sorted by name. Names in
/// `exclude` are skipped. A missing directory is an error.
pub fn list_files(dir: &Path, suffix: &str, exclude: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| DepthChartError::io(dir, e))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(suffix) && !n.starts_with('.') && !exclude.contains(&n))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn sample() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new("TeamA", Unit::Offense, "QB", 1, "John Smith"),
            PlayerRecord::new("TeamA", Unit::Special, "PK", 1, "Zoë O'Brien, Jr."),
        ]
    }

    #[test]
    fn writes_fixed_header() -> Result<()> {
        let mut buf = Vec::new();
        write_records_to(&mut buf, &sample())?;
        let text = String::from_utf8(buf)?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("team,position_group,position,depth_slot,player_name"));
        assert_eq!(lines.next(), Some("TeamA,offense,QB,1,John Smith"));
        assert_eq!(lines.next(), Some("TeamA,special,PK,1,\"Zoë O'Brien, Jr.\""));

        let mut empty = Vec::new();
        write_records_to(&mut empty, &[])?;
        assert_eq!(String::from_utf8(empty)?, "team,position_group,position,depth_slot,player_name\n");
        Ok(())
    }

    #[test]
    fn round_trip_preserves_fields() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("team_CSV").join("a_depth_chart.csv");
        write_records(&path, &sample())?;
        assert_eq!(read_records(&path)?, sample());
        // no temp file left behind
        assert_eq!(fs::read_dir(path.parent().unwrap())?.count(), 1);
        Ok(())
    }

    #[test]
    fn failed_replace_leaves_no_temp_file() -> Result<()> {
        let tmp = tempdir()?;
        // a directory where the file should go makes the rename fail
        let path = tmp.path().join("a_depth_chart.csv");
        fs::create_dir(&path)?;

        let err = write_records(&path, &sample()).unwrap_err();
        assert!(matches!(err, DepthChartError::Io { .. }));
        let names: Vec<_> = fs::read_dir(tmp.path())?
            .map(|e| e.map(|e| e.file_name().to_string_lossy().to_string()))
            .collect::<std::io::Result<_>>()?;
        assert_eq!(names, vec!["a_depth_chart.csv"]);
        Ok(())
    }

    #[test]
    fn details_keep_optional_columns() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("a_player_details.csv");
        let entries = vec![
            DepthEntry {
                record: PlayerRecord::new("TeamA", Unit::Offense, "QB", 2, "Jacoby Brissett"),
                details: PlayerDetails {
                    injury_status: Some("Q".into()),
                    player_url: Some("/nfl/player/_/id/2".into()),
                    player_uid: Some("s:20~l:28~a:2".into()),
                },
            },
            DepthEntry::from(PlayerRecord::new("TeamA", Unit::Special, "PK", 1, "Leg Day")),
        ];
        write_details(&path, &entries)?;

        let text = fs::read_to_string(&path)?;
        assert_eq!(
            text.lines().nth(2),
            Some("TeamA,special,PK,1,Leg Day,,,")
        );
        assert_eq!(read_details(&path)?, entries);
        Ok(())
    }

    #[test]
    fn rewrite_is_byte_identical() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("a_depth_chart.csv");
        write_records(&path, &sample())?;
        let first = fs::read(&path)?;
        write_records(&path, &sample())?;
        assert_eq!(fs::read(&path)?, first);
        Ok(())
    }

    #[test]
    fn reads_reordered_and_extra_columns() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("x.csv");
        fs::write(
            &path,
            "player_name,extra,Team,depth_slot,position,position_group\nJane Doe,?,TeamB, 2 ,QB,Offense\n",
        )?;
        let rows = read_records(&path)?;
        assert_eq!(rows, vec![PlayerRecord::new("TeamB", Unit::Offense, "QB", 2, "Jane Doe")]);
        Ok(())
    }

    #[test]
    fn missing_column_is_schema_error_naming_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("broken.csv");
        fs::write(&path, "team,position,player_name\nTeamA,QB,John Smith\n").unwrap();
        let err = read_records(&path).unwrap_err();
        match &err {
            DepthChartError::Schema { path: p, reason } => {
                assert_eq!(p, &path);
                assert!(reason.contains("position_group"));
                assert!(reason.contains("depth_slot"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
        assert!(err.to_string().contains("broken.csv"));
    }

    #[test]
    fn bad_depth_is_schema_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.csv");
        fs::write(&path, "team,position_group,position,depth_slot,player_name\nT,offense,QB,first,X\n").unwrap();
        assert!(matches!(read_records(&path), Err(DepthChartError::Schema { .. })));
    }

    #[test]
    fn list_files_sorts_and_filters() -> Result<()> {
        let tmp = tempdir()?;
        for name in ["b_depth_chart.csv", "a_depth_chart.csv", "notes.txt", "offense_depth_chart.csv"] {
            fs::write(tmp.path().join(name), "")?;
        }
        let found = list_files(tmp.path(), "_depth_chart.csv", &["offense_depth_chart.csv"])?;
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a_depth_chart.csv", "b_depth_chart.csv"]);

        assert!(list_files(&tmp.path().join("nope"), ".csv", &[]).is_err());
        Ok(())
    }
}
