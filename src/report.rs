// src/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use crate::error::{DepthChartError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenTeam {
    pub team: String,
    pub path: String,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTeam {
    pub team: String,
    pub reason: String,
}

/// What one scrape run did for each team. Written next to the combined
/// tables as `scrape_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub written: Vec<WrittenTeam>,
    pub skipped: Vec<SkippedTeam>,
}

impl ScrapeReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            written: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_written(&mut self, team: &str, path: &Path, records: usize) {
        self.written.push(WrittenTeam {
            team: team.to_string(),
            path: path.display().to_string(),
            records,
        });
    }

    pub fn record_skipped(&mut self, team: &str, reason: impl ToString) {
        self.skipped.push(SkippedTeam {
            team: team.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Sort both lists by team and stamp the finish time.
    pub fn finish(&mut self) {
        self.written.sort_by(|a, b| a.team.cmp(&b.team));
        self.skipped.sort_by(|a, b| a.team.cmp(&b.team));
        self.finished_at = Some(Utc::now());
    }

    pub fn attempted(&self) -> usize {
        self.written.len() + self.skipped.len()
    }

    /// True when teams were attempted and none was written.
    pub fn is_total_failure(&self) -> bool {
        self.written.is_empty() && !self.skipped.is_empty()
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| DepthChartError::io(dir, e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DepthChartError::Config(format!("serializing scrape report: {}", e)))?;
        fs::write(path, json).map_err(|e| DepthChartError::io(path, e))?;
        info!(path = %path.display(), written = self.written.len(), skipped = self.skipped.len(), "wrote scrape report");
        Ok(())
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DepthChartError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| DepthChartError::schema(path, format!("bad scrape report: {}", e)))
    }
}
