// src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

use crate::chart::Unit;
use crate::error::{DepthChartError, Result};
use crate::teams::{nfl_teams, select_teams, Team, DEFAULT_BASE_URL};

pub const MASTER_FILE: &str = "master_nfl_depth_chart.csv";
pub const COMBINED_FILE: &str = "combined_depth_chart.csv";
pub const REPORT_FILE: &str = "scrape_report.json";
pub const TEAM_FILE_SUFFIX: &str = "_depth_chart.csv";
pub const PROFILE_FILE_SUFFIX: &str = "_player_profiles.csv";
pub const DETAILS_FILE_SUFFIX: &str = "_player_details.csv";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Everything a stage needs to know about where to read and write.
/// Built from defaults, then an optional YAML file, then CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// One `<slug>_depth_chart.csv` per team.
    pub team_csv_dir: PathBuf,
    /// Unit, combined, profile and master tables plus the scrape report.
    pub combined_dir: PathBuf,
    /// Raw table snapshots, written when `save_html` is set.
    pub html_dir: PathBuf,
    pub save_html: bool,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Teams fetched at once; 1 runs strictly in sequence.
    pub concurrency: usize,
    /// Log what would be written without touching the filesystem.
    pub dry_run: bool,
    pub teams: Vec<Team>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            team_csv_dir: PathBuf::from("team_CSV"),
            combined_dir: PathBuf::from("combined_depth_charts"),
            html_dir: PathBuf::from("team_tables"),
            save_html: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            concurrency: 4,
            dry_run: false,
            teams: nfl_teams(),
        }
    }
}

impl Config {
    /// Load a YAML file; fields it leaves out keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DepthChartError::io(path, e))?;
        let config: Config = serde_yaml::from_str(&text)
            .map_err(|e| DepthChartError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), teams = config.teams.len(), "loaded config file");
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(DepthChartError::Config("concurrency must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(DepthChartError::Config("timeout_secs must be at least 1".into()));
        }
        if let Some(team) = self
            .teams
            .iter()
            .find(|t| t.slug.is_empty() || t.abbrev.is_empty() || t.name.is_empty())
        {
            return Err(DepthChartError::Config(format!("incomplete team entry {:?}", team)));
        }
        Ok(())
    }

    /// Narrow the team list to the given abbreviations.
    pub fn restrict_teams(&mut self, abbrevs: &[String]) -> Result<()> {
        if !abbrevs.is_empty() {
            self.teams = select_teams(&self.teams, abbrevs)?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn team_csv_path(&self, team: &Team) -> PathBuf {
        self.team_csv_dir.join(format!("{}{}", team.slug, TEAM_FILE_SUFFIX))
    }

    /// Per-team injury status, profile link and UID, next to the team file.
    pub fn details_path(&self, slug: &str) -> PathBuf {
        self.team_csv_dir.join(format!("{}{}", slug, DETAILS_FILE_SUFFIX))
    }

    pub fn unit_path(&self, unit: Unit) -> PathBuf {
        self.combined_dir.join(unit_file_name(unit))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.combined_dir.join(COMBINED_FILE)
    }

    pub fn master_path(&self) -> PathBuf {
        self.combined_dir.join(MASTER_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.combined_dir.join(REPORT_FILE)
    }

    pub fn profiles_path(&self, slug: &str) -> PathBuf {
        self.combined_dir.join(format!("{}{}", slug, PROFILE_FILE_SUFFIX))
    }
}

pub fn unit_file_name(unit: Unit) -> String {
    format!("{}{}", unit.as_str(), TEAM_FILE_SUFFIX)
}

/// Output names that share the per-team suffix and must never be read back
/// as team files.
pub fn reserved_file_names() -> Vec<String> {
    let mut names: Vec<String> = Unit::ALL.iter().map(|u| unit_file_name(*u)).collect();
    names.push(COMBINED_FILE.to_string());
    names.push(MASTER_FILE.to_string());
    names
}
