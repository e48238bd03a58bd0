pub mod cli;
pub mod client;
pub mod error;
pub mod executor;
pub mod models;
pub mod report;
pub mod telemetry;

pub use error::{ConfigError, RunError};
pub use executor::run_load_test;
pub use models::outcome::{RequestError, RequestOutcome};
pub use models::run_config::RunConfig;
pub use models::summary::{ResultCollection, RunSummary};
