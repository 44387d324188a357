// src/process/clean.rs

use std::{fs, path::Path};
use tracing::{debug, info, instrument, warn};

use crate::error::{DepthChartError, Result};

const GENERATED_EXTENSIONS: &[&str] = &["html", "xml", "csv"];

fn is_generated(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| GENERATED_EXTENSIONS.iter().any(|g| e.eq_ignore_ascii_case(g)))
        .unwrap_or(false)
}

/// Delete generated `.html`, `.xml` and `.csv` files directly inside each
/// directory. Returns how many files were (or, on a dry run, would be)
/// removed.
#[instrument(level = "info", skip(dirs))]
pub fn clean<P: AsRef<Path>>(dirs: &[P], dry_run: bool) -> Result<usize> {
    let mut removed = 0;
    for dir in dirs {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(dir = %dir.display(), "directory does not exist; nothing to clean");
                continue;
            }
            Err(e) => return Err(DepthChartError::io(dir, e)),
        };

        for entry in entries {
            let path = entry.map_err(|e| DepthChartError::io(dir, e))?.path();
            if !path.is_file() || !is_generated(&path) {
                continue;
            }
            if dry_run {
                info!(path = %path.display(), "dry run: would delete");
            } else {
                fs::remove_file(&path).map_err(|e| DepthChartError::io(&path, e))?;
                debug!(path = %path.display(), "deleted");
            }
            removed += 1;
        }
    }
    info!(removed, "clean finished");
    Ok(removed)
}
