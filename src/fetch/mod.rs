// src/fetch/mod.rs

use std::future::Future;

use crate::error::Result;
use crate::teams::Team;

pub mod http;
pub mod saved;

pub use http::HttpSource;
pub use saved::{save_snapshots, SavedPageSource};

/// Where a team's depth-chart page comes from.
///
/// A failure here is scoped to the team: the scrape stage logs it, skips
/// the team and carries on with the rest of the league.
pub trait PageSource {
    fn fetch(&self, team: &Team) -> impl Future<Output = Result<String>>;
}
