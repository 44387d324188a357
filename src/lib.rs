pub mod chart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod process;
pub mod report;
pub mod scrape;
pub mod teams;

pub use error::{DepthChartError, Result};
