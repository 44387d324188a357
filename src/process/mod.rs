// src/process/mod.rs
//
// Offline stages: everything after the per-team CSVs exist.

pub mod clean;
pub mod combine;
pub mod csv_io;
pub mod master;
pub mod profiles;
pub mod unit;

pub use clean::clean;
pub use combine::{combine, combine_records, CombineSource};
pub use csv_io::{read_details, read_records, write_details, write_records};
pub use master::{dedup_last_write_wins, master_combine, IdentityKey};
pub use profiles::{build_profiles, build_team_profiles, PlayerProfile};
pub use unit::{process_unit, select_unit};
