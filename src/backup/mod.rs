pub mod bisync;
pub mod commands;
pub mod config;
pub mod error;
pub mod mirror;
pub mod orchestrator;
pub mod run_log;
pub mod runner;

pub use config::{BackupConfig, ResolvedConfig};
pub use orchestrator::Orchestrator;
pub use run_log::RunLog;
pub use runner::ProcessRunner;
