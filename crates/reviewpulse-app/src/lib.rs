//! reviewpulse App
//!
//! Session orchestration and the command-line front end: loads the review
//! corpus and the sentiment classifier side by side, then classifies random
//! reviews on demand.

pub mod cli;
pub mod config;
pub mod render;
pub mod session;
pub mod setup;

pub use cli::Cli;
pub use config::{AppConfig, TelemetryConfig};
pub use session::{Analysis, AnalyzeOutcome, BlockReason, Session};
pub use setup::{assemble, Assembled};
