use crate::backup::config::SyncTargets;
use crate::backup::error::{BackupError, BisyncFailure};
use crate::backup::runner::{CommandRunner, ToolOutput};

/// What rclone prints when its prior-run listings are missing or corrupt,
/// e.g. after a crash or on the very first run.
const MISSING_LISTINGS_SIGNATURE: &str = "cannot find prior Path1 or Path2 listings";

/// The only place that knows rclone's error wording.
pub fn indicates_missing_listings(output: &str) -> bool {
    output.contains(MISSING_LISTINGS_SIGNATURE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisyncMode {
    /// Reconcile against the listings of the previous run
    Incremental,
    /// Discard prior listings and rebuild them from both sides
    Resync,
}

/// Two-way sync between the local mirror and the cloud remote
pub struct Bisync<'a> {
    command: &'a str,
    targets: &'a SyncTargets,
    dry_run: bool,
}

impl<'a> Bisync<'a> {
    pub fn new(command: &'a str, targets: &'a SyncTargets, dry_run: bool) -> Self {
        Self {
            command,
            targets,
            dry_run,
        }
    }

    pub fn args(&self, mode: BisyncMode) -> Vec<String> {
        let mut args = vec![
            "bisync".to_string(),
            self.targets.local.to_string_lossy().into_owned(),
            self.targets.remote.clone(),
            "--compare".to_string(),
            "size,modtime".to_string(),
            "--create-empty-src-dirs".to_string(),
            "--drive-skip-gdocs".to_string(),
            "--check-access".to_string(),
        ];
        if mode == BisyncMode::Resync {
            args.push("--resync".to_string());
        }
        if self.dry_run {
            args.push("--dry-run".to_string());
        }
        args
    }

    pub fn run(&self, runner: &dyn CommandRunner, mode: BisyncMode) -> Result<ToolOutput, BackupError> {
        runner.run(self.command, &self.args(mode))
    }
}

/// Turn a finished bisync into a structured result. Missing listings are
/// reported whatever the exit code.
pub fn classify(output: &ToolOutput) -> Result<(), BisyncFailure> {
    let exit_code = output.exit_code;
    if indicates_missing_listings(&output.output) {
        Err(BisyncFailure::MissingListings { exit_code })
    } else if output.success() {
        Ok(())
    } else {
        Err(BisyncFailure::Other { exit_code })
    }
}
