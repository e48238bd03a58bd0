pub mod outcome;
pub mod run_config;
pub mod summary;
