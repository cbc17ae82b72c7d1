use std::io::Write;
use std::path::Path;

use crate::backup::bisync::{self, Bisync, BisyncMode};
use crate::backup::config::ResolvedConfig;
use crate::backup::error::{BackupError, BisyncFailure, SPAWN_FAILURE_EXIT_CODE};
use crate::backup::mirror::Mirror;
use crate::backup::run_log::RunLog;
use crate::backup::runner::CommandRunner;

/// Exit status when the drive is not mounted
pub const MOUNT_MISSING_EXIT_CODE: i32 = 1;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Status handed back to the scheduler
    pub exit_code: i32,
    pub mirror_ok: bool,
    /// Whether the forced `--resync` retry was used
    pub resynced: bool,
}

impl RunOutcome {
    fn aborted() -> Self {
        Self {
            exit_code: MOUNT_MISSING_EXIT_CODE,
            mirror_ok: false,
            resynced: false,
        }
    }
}

/// Sequences the mirror and bisync steps of one backup run
pub struct Orchestrator<R: CommandRunner> {
    config: ResolvedConfig,
    runner: R,
    dry_run: bool,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(config: ResolvedConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the backup once. Only failures to write the run log come back as
    /// `Err`; every tool failure is recorded in the log and reflected in the
    /// outcome's exit code.
    pub fn run<W: Write>(&self, log: &mut RunLog<W>) -> Result<RunOutcome, BackupError> {
        if !self.config.mount_path.is_dir() {
            let err = BackupError::MountMissing(self.config.mount_path.clone());
            log.error("backup.mount.missing", &format!("ERROR: {err}. Aborting backup."))?;
            return Ok(RunOutcome::aborted());
        }

        log.info(
            "backup.start",
            &format!(
                "===== Backup started{} =====",
                if self.dry_run { " (dry run)" } else { "" }
            ),
        )?;

        let mirror_ok = self.mirror_home(log)?;

        let mut result = self.bisync(log, BisyncMode::Incremental)?;
        let mut resynced = false;
        // One retry only; the resync's own output is not re-examined.
        if let Err(BisyncFailure::MissingListings { exit_code }) = result {
            log.warn(
                "backup.bisync.listings_missing",
                &format!(
                    "WARNING: rclone bisync reported that prior listings are missing (exit code {exit_code})"
                ),
            )?;
            log.info(
                "backup.bisync.resync",
                "Prior listings missing, retrying with --resync",
            )?;
            result = self.bisync(log, BisyncMode::Resync)?;
            resynced = true;
        }

        let exit_code = match result {
            Ok(()) => {
                log.success("backup.bisync.done", "rclone bisync completed successfully")?;
                0
            }
            Err(failure) => {
                let code = failure.exit_code();
                log.warn(
                    "backup.bisync.failed",
                    &format!("WARNING: rclone bisync finished with errors (exit code {code})"),
                )?;
                code
            }
        };

        log.info("backup.finish", "===== Backup finished =====")?;

        Ok(RunOutcome {
            exit_code,
            mirror_ok,
            resynced,
        })
    }

    fn mirror_home<W: Write>(&self, log: &mut RunLog<W>) -> Result<bool, BackupError> {
        log.info(
            "backup.mirror.start",
            &format!(
                "Starting home folder sync from {} to {}",
                self.config.source_dir.display(),
                self.config.mirror_dest.display()
            ),
        )?;

        let mirror = Mirror::new(&self.config, self.dry_run);
        match mirror.run(&self.runner) {
            Ok(output) => {
                log.tool_output(tool_name(&self.config.mirror_command), &output.output)?;
                if output.success() {
                    log.success("backup.mirror.done", "Home folder sync completed successfully")?;
                    Ok(true)
                } else {
                    log.warn(
                        "backup.mirror.failed",
                        &format!(
                            "WARNING: Home folder sync finished with errors (exit code {})",
                            output.exit_code
                        ),
                    )?;
                    Ok(false)
                }
            }
            Err(err) => {
                log.error("backup.mirror.spawn_failed", &format!("ERROR: {err}"))?;
                Ok(false)
            }
        }
    }

    fn bisync<W: Write>(
        &self,
        log: &mut RunLog<W>,
        mode: BisyncMode,
    ) -> Result<Result<(), BisyncFailure>, BackupError> {
        let targets = &self.config.sync;
        log.info(
            "backup.bisync.start",
            &format!(
                "Starting rclone bisync{} between {} and {}",
                if mode == BisyncMode::Resync { " --resync" } else { "" },
                targets.local.display(),
                targets.remote
            ),
        )?;

        let sync = Bisync::new(&self.config.bisync_command, targets, self.dry_run);
        match sync.run(&self.runner, mode) {
            Ok(output) => {
                log.tool_output(tool_name(&self.config.bisync_command), &output.output)?;
                Ok(bisync::classify(&output))
            }
            Err(err) => {
                log.error("backup.bisync.spawn_failed", &format!("ERROR: {err}"))?;
                Ok(Err(BisyncFailure::Other {
                    exit_code: SPAWN_FAILURE_EXIT_CODE,
                }))
            }
        }
    }
}

/// Short name of a configured command for log prefixes
fn tool_name(command: &str) -> &str {
    Path::new(command)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(command)
}
