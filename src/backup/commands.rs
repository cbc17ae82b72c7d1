use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::backup::{BackupConfig, Orchestrator, ProcessRunner, RunLog};
use crate::common::paths;
use crate::ui::prelude::*;

/// Config file to use: the `--config` override or the default location
pub fn config_path(path_override: Option<&Path>) -> Result<PathBuf> {
    match path_override {
        Some(path) => Ok(paths::expand_tilde(path)),
        None => paths::default_config_path(),
    }
}

pub fn load_config(path_override: Option<&Path>) -> Result<BackupConfig> {
    let path = config_path(path_override)?;
    BackupConfig::load_from_path(&path)
        .with_context(|| format!("loading backup config from {}", path.display()))
}

/// Execute one backup run and return the exit status for the scheduler
pub fn run_backup(path_override: Option<&Path>, dry_run: bool) -> Result<i32> {
    let resolved = load_config(path_override)?.resolve();
    let mut log = RunLog::open(&resolved.log_path).context("opening run log")?;

    let outcome = Orchestrator::new(resolved, ProcessRunner)
        .with_dry_run(dry_run)
        .run(&mut log)
        .context("recording backup run")?;

    Ok(outcome.exit_code)
}

pub fn show_config(path_override: Option<&Path>) -> Result<()> {
    let path = config_path(path_override)?;
    let config = load_config(path_override)?;
    let resolved = config.resolve();

    match get_output_format() {
        OutputFormat::Json => {
            let data = serde_json::json!({
                "path": path,
                "exists": path.exists(),
                "config": config,
                "resolved": resolved,
            });
            emit(Level::Info, "config.show", "Backup configuration", Some(data));
        }
        OutputFormat::Text => {
            let source = if path.exists() {
                path.display().to_string()
            } else {
                format!("{} (not found, using defaults)", path.display())
            };
            emit(Level::Info, "config.show.path", &format!("# {source}"), None);
            emit(
                Level::Info,
                "config.show",
                config.to_toml_string()?.trim_end(),
                None,
            );
            emit(
                Level::Info,
                "config.show.resolved",
                &format!(
                    "# mirror: {} -> {}\n# bisync: {} <-> {}\n# log: {}",
                    resolved.source_dir.display(),
                    resolved.mirror_dest.display(),
                    resolved.sync.local.display(),
                    resolved.sync.remote,
                    resolved.log_path.display()
                ),
                None,
            );
        }
    }
    Ok(())
}

pub fn init_config(path_override: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path(path_override)?;
    if path.exists() && !force {
        emit(
            Level::Warn,
            "config.init.exists",
            &format!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            ),
            None,
        );
        return Ok(());
    }

    BackupConfig::default()
        .save_to_path(&path)
        .with_context(|| format!("writing default config to {}", path.display()))?;
    emit(
        Level::Success,
        "config.init.written",
        &format!("Wrote default config to {}", path.display()),
        Some(serde_json::json!({ "path": path })),
    );
    Ok(())
}
