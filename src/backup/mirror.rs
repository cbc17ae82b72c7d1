use crate::backup::config::ResolvedConfig;
use crate::backup::error::BackupError;
use crate::backup::runner::{CommandRunner, ToolOutput};

/// One-way, delete-reconciling copy of the home directory onto the drive
pub struct Mirror<'a> {
    config: &'a ResolvedConfig,
    dry_run: bool,
}

impl<'a> Mirror<'a> {
    pub fn new(config: &'a ResolvedConfig, dry_run: bool) -> Self {
        Self { config, dry_run }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["-a".to_string(), "--delete".to_string()];
        if self.dry_run {
            args.push("--dry-run".to_string());
        }
        for exclude in &self.config.excludes {
            args.push(format!("--exclude={exclude}"));
        }

        // Trailing slash: copy the contents of the source, not the directory itself
        let mut source = self.config.source_dir.to_string_lossy().into_owned();
        if !source.ends_with('/') {
            source.push('/');
        }
        args.push(source);
        args.push(self.config.mirror_dest.to_string_lossy().into_owned());
        args
    }

    pub fn run(&self, runner: &dyn CommandRunner) -> Result<ToolOutput, BackupError> {
        runner.run(&self.config.mirror_command, &self.args())
    }
}
