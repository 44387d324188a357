//! Error types shared by every pipeline stage.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DepthChartError>;

#[derive(Error, Debug)]
pub enum DepthChartError {
    /// Fetching a team page failed (status, transport or timeout).
    #[error("network error for {team}: {message}")]
    Network { team: String, message: String },

    /// The page carried no recognizable depth-chart table.
    #[error("parse error for {team}: {reason}")]
    Parse { team: String, reason: String },

    /// A CSV file is missing expected columns or holds a bad value.
    #[error("schema error in {}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl DepthChartError {
    pub fn network(team: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            team: team.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(team: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            team: team.into(),
            reason: reason.into(),
        }
    }

    pub fn schema(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Per-team failures are skipped; everything else aborts the stage.
    pub fn is_team_scoped(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Parse { .. })
    }
}
