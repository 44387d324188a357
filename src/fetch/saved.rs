// src/fetch/saved.rs
//
// Offline page source: reads team pages (or per-unit table snapshots)
// previously saved to a directory, and writes those snapshots.

use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use super::PageSource;
use crate::chart::Unit;
use crate::error::{DepthChartError, Result};
use crate::parse::FormationTable;
use crate::teams::Team;

pub struct SavedPageSource {
    dir: PathBuf,
}

impl SavedPageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn snapshot_paths(&self, team: &Team) -> Result<Vec<PathBuf>> {
        let pattern = format!("{}/{}_depth_chart_*.html", self.dir.display(), team.slug);
        let mut paths: Vec<PathBuf> = glob(&pattern)
            .map_err(|e| DepthChartError::Config(format!("bad snapshot pattern {}: {}", pattern, e)))?
            .filter_map(|entry| entry.ok())
            .collect();
        // offense, defense, special: the page order the parser expects
        paths.sort_by_key(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            let unit = Unit::ALL
                .iter()
                .position(|u| name.contains(&format!("_depth_chart_{}", snapshot_suffix(*u))));
            (unit.unwrap_or(Unit::ALL.len()), name)
        });
        Ok(paths)
    }
}

impl PageSource for SavedPageSource {
    async fn fetch(&self, team: &Team) -> Result<String> {
        let page = self.dir.join(format!("{}.html", team.slug));
        if page.is_file() {
            debug!(path = %page.display(), "reading saved page");
            return fs::read_to_string(&page).map_err(|e| DepthChartError::network(&team.name, e));
        }

        let snapshots = self.snapshot_paths(team)?;
        if snapshots.is_empty() {
            return Err(DepthChartError::network(
                &team.name,
                format!("no saved page for {} in {}", team.slug, self.dir.display()),
            ));
        }

        let mut html = String::from("<html><body>\n");
        for path in &snapshots {
            debug!(path = %path.display(), "reading table snapshot");
            let part = fs::read_to_string(path).map_err(|e| DepthChartError::network(&team.name, e))?;
            html.push_str(&part);
            html.push('\n');
        }
        html.push_str("</body></html>\n");
        Ok(html)
    }
}

pub fn snapshot_suffix(unit: Unit) -> &'static str {
    match unit {
        Unit::Offense => "offense",
        Unit::Defense => "defense",
        Unit::Special => "special_teams",
    }
}

pub fn snapshot_path(dir: &Path, team: &Team, unit: Unit) -> PathBuf {
    dir.join(format!("{}_depth_chart_{}.html", team.slug, snapshot_suffix(unit)))
}

/// Write each unit's table HTML to `<slug>_depth_chart_<unit>.html`.
/// Tables sharing a unit go to the same file.
pub fn save_snapshots(dir: &Path, team: &Team, tables: &[(Unit, &FormationTable)]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| DepthChartError::io(dir, e))?;

    let mut written = Vec::new();
    for unit in Unit::ALL {
        let parts: Vec<&str> = tables
            .iter()
            .filter(|(u, _)| *u == unit)
            .map(|(_, t)| t.html.as_str())
            .collect();
        if parts.is_empty() {
            continue;
        }
        let path = snapshot_path(dir, team, unit);
        fs::write(&path, parts.join("\n")).map_err(|e| DepthChartError::io(&path, e))?;
        info!(path = %path.display(), "saved table snapshot");
        written.push(path);
    }
    Ok(written)
}
