use clap::Parser;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::models::run_config::{PartialRunConfig, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "loadforge-burst", version)]
#[command(about = "Fire a fixed number of GET requests at one URL through a bounded worker pool")]
pub struct Args {
    /// Target URL (plain http only)
    #[arg(long, env = "LOADFORGE_URL")]
    pub url: Option<String>,

    /// Total number of requests [default: 5000]
    #[arg(short = 'n', long, env = "LOADFORGE_COUNT")]
    pub count: Option<usize>,

    /// Maximum requests in flight [default: 20]
    #[arg(short, long, env = "LOADFORGE_WORKERS")]
    pub workers: Option<usize>,

    /// Per-request timeout in milliseconds [default: 3000]
    #[arg(long = "timeout", env = "LOADFORGE_TIMEOUT_MS", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// JSON file with `target`, `total_requests`, `concurrency`, `timeout_ms`
    #[arg(short, long, env = "LOADFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print a per-status breakdown after the summary
    #[arg(long)]
    pub breakdown: bool,
}

impl Args {
    /// Flags beat the config file, which beats the built-in defaults. The
    /// result is already validated.
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => PartialRunConfig::load(path)?,
            None => PartialRunConfig::default(),
        };

        let config = base.merge(self.overrides()).resolve()?;
        config.validate()?;
        Ok(config)
    }

    fn overrides(&self) -> PartialRunConfig {
        PartialRunConfig {
            target: self.url.clone(),
            total_requests: self.count,
            concurrency: self.workers,
            timeout_ms: self.timeout_ms,
        }
    }
}
