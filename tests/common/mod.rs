use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch home, drive and config for one test
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join("home"))?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    /// Directory standing in for the external drive. Not created until
    /// `mount_drive` is called.
    pub fn drive(&self) -> PathBuf {
        self.path().join("drive")
    }

    pub fn mount_drive(&self) -> Result<()> {
        fs::create_dir_all(self.drive())?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("backup.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        self.path().join("logs").join("backup.log")
    }

    /// Write a config that points every path into the scratch directory
    pub fn write_config(&self, mirror_command: &str, bisync_command: &str) -> Result<()> {
        let contents = format!(
            "mount_path = {:?}\nsource_dir = {:?}\nlog_path = {:?}\nremote = \"testremote\"\nremote_path = \"Backup\"\nmirror_command = {:?}\nbisync_command = {:?}\n",
            self.drive(),
            self.home(),
            self.log_path(),
            mirror_command,
            bisync_command,
        );
        fs::write(self.config_path(), contents)?;
        Ok(())
    }

    /// Run-log lines with the timestamp prefix removed
    pub fn log_messages(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(self.log_path())?;
        Ok(content.lines().map(|l| l[20..].to_string()).collect())
    }
}
