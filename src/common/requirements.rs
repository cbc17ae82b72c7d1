//! Requirement tests used by `homesync doctor`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Tests for determining whether something the backup needs is in place.
#[derive(Debug, Clone)]
pub enum InstallTest {
    /// Succeeds when `which <program>` resolves.
    WhichSucceeds(String),
    /// Succeeds when the given path is an existing directory.
    DirExists(PathBuf),
    /// Succeeds when the file can be opened for appending (creating it if needed).
    Appendable(PathBuf),
}

impl InstallTest {
    pub fn run(&self) -> bool {
        match self {
            InstallTest::WhichSucceeds(program) => which::which(program).is_ok(),
            InstallTest::DirExists(path) => path.is_dir(),
            InstallTest::Appendable(path) => appendable(path),
        }
    }
}

fn appendable(path: &Path) -> bool {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .is_ok()
}
