pub mod positions;
pub mod types;

pub use positions::{normalize_position, special_teams_rank, CanonicalPosition};
pub use types::{DepthEntry, PlayerDetails, PlayerRecord, TeamDepthChart, Unit};
