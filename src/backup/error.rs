use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("External drive not mounted at {}", .0.display())]
    MountMissing(PathBuf),

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write run log {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exit code used when a tool cannot be started at all, matching the
/// shell's "command not found".
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Why a bisync invocation did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisyncFailure {
    /// The tool's prior-state listings are missing or unusable. Recoverable
    /// with a single `--resync` run.
    MissingListings { exit_code: i32 },
    /// Anything else. Reported, never retried.
    Other { exit_code: i32 },
}

impl BisyncFailure {
    pub fn exit_code(&self) -> i32 {
        match self {
            BisyncFailure::MissingListings { exit_code } | BisyncFailure::Other { exit_code } => {
                *exit_code
            }
        }
    }
}
