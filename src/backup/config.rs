use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::error::BackupError;
use crate::common::paths;

fn default_mount_path() -> PathBuf {
    PathBuf::from("/mnt/backup")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("~")
}

fn default_mirror_dir() -> PathBuf {
    PathBuf::from("home_backup")
}

fn default_excludes() -> Vec<String> {
    vec![
        ".cache".to_string(),
        "Downloads".to_string(),
        "snap".to_string(),
    ]
}

fn default_remote() -> String {
    "gdrive".to_string()
}

fn default_remote_path() -> String {
    "Backup".to_string()
}

fn default_mirror_command() -> String {
    "rsync".to_string()
}

fn default_bisync_command() -> String {
    "rclone".to_string()
}

/// On-disk backup configuration. Every field falls back to its default, so
/// an empty file is a valid config.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackupConfig {
    /// Where the external drive is expected to be mounted
    pub mount_path: PathBuf,
    /// Tree that gets mirrored onto the drive
    pub source_dir: PathBuf,
    /// Mirror destination; relative paths live under `mount_path`
    pub mirror_dir: PathBuf,
    /// Paths relative to `source_dir` left out of the mirror
    pub excludes: Vec<String>,
    /// rclone remote name, without the trailing colon
    pub remote: String,
    /// Folder on the remote kept in sync with the mirror
    pub remote_path: String,
    /// Local side of the bisync, defaults to the mirror destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_sync_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    pub mirror_command: String,
    pub bisync_command: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            mount_path: default_mount_path(),
            source_dir: default_source_dir(),
            mirror_dir: default_mirror_dir(),
            excludes: default_excludes(),
            remote: default_remote(),
            remote_path: default_remote_path(),
            local_sync_path: None,
            log_path: None,
            mirror_command: default_mirror_command(),
            bisync_command: default_bisync_command(),
        }
    }
}

impl BackupConfig {
    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, BackupError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents, path)
    }

    fn from_toml_str(contents: &str, path: &Path) -> Result<Self, BackupError> {
        toml::from_str(contents).map_err(|source| BackupError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml_string(&self) -> Result<String, BackupError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config to `path`, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<(), BackupError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Expand and join every path so nothing is left to interpret once the
    /// run starts.
    pub fn resolve(&self) -> ResolvedConfig {
        let mount_path = paths::expand_tilde(&self.mount_path);
        let mirror_dir = paths::expand_tilde(&self.mirror_dir);
        let mirror_dest = if mirror_dir.is_absolute() {
            mirror_dir
        } else {
            mount_path.join(mirror_dir)
        };
        let local = self
            .local_sync_path
            .as_deref()
            .map(paths::expand_tilde)
            .unwrap_or_else(|| mirror_dest.clone());

        ResolvedConfig {
            source_dir: paths::expand_tilde(&self.source_dir),
            mount_path,
            mirror_dest,
            excludes: self.excludes.clone(),
            sync: SyncTargets {
                local,
                remote: remote_spec(&self.remote, &self.remote_path),
            },
            log_path: self
                .log_path
                .as_deref()
                .map(paths::expand_tilde)
                .unwrap_or_else(paths::default_log_path),
            mirror_command: self.mirror_command.clone(),
            bisync_command: self.bisync_command.clone(),
        }
    }
}

fn remote_spec(remote: &str, remote_path: &str) -> String {
    let remote = remote.trim_end_matches(':');
    format!("{remote}:{}", remote_path.trim_start_matches('/'))
}

/// The two ends of the bidirectional sync. Fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncTargets {
    pub local: PathBuf,
    pub remote: String,
}

/// Fully resolved configuration handed to the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub mount_path: PathBuf,
    pub source_dir: PathBuf,
    pub mirror_dest: PathBuf,
    pub excludes: Vec<String>,
    pub sync: SyncTargets,
    pub log_path: PathBuf,
    pub mirror_command: String,
    pub bisync_command: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = BackupConfig::from_toml_str("", Path::new("backup.toml")).unwrap();
        assert_eq!(cfg, BackupConfig::default());
        assert_eq!(cfg.excludes, vec![".cache", "Downloads", "snap"]);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let cfg = BackupConfig::from_toml_str(
            "mount_path = \"/media/me/Drive\"\nremote = \"onedrive\"\n",
            Path::new("backup.toml"),
        )
        .unwrap();
        assert_eq!(cfg.mount_path, PathBuf::from("/media/me/Drive"));
        assert_eq!(cfg.remote, "onedrive");
        assert_eq!(cfg.remote_path, "Backup");
        assert_eq!(cfg.mirror_command, "rsync");
    }

    #[test]
    fn invalid_toml_reports_path() {
        let err = BackupConfig::from_toml_str("mount_path = [", Path::new("/tmp/bad.toml"))
            .unwrap_err();
        assert!(matches!(err, BackupError::ConfigParse { .. }));
        assert!(err.to_string().contains("/tmp/bad.toml"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = BackupConfig::load_from_path(&tmp.path().join("none.toml")).unwrap();
        assert_eq!(cfg, BackupConfig::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/backup.toml");
        let cfg = BackupConfig {
            local_sync_path: Some(PathBuf::from("/srv/sync")),
            ..BackupConfig::default()
        };
        cfg.save_to_path(&path).unwrap();
        assert_eq!(BackupConfig::load_from_path(&path).unwrap(), cfg);
    }

    #[test]
    fn resolve_joins_mirror_under_mount() {
        let cfg = BackupConfig {
            log_path: Some(PathBuf::from("/var/log/homesync.log")),
            ..BackupConfig::default()
        };
        let resolved = cfg.resolve();
        assert_eq!(resolved.mirror_dest, PathBuf::from("/mnt/backup/home_backup"));
        assert_eq!(resolved.sync.local, resolved.mirror_dest);
        assert_eq!(resolved.sync.remote, "gdrive:Backup");
        assert_eq!(resolved.log_path, PathBuf::from("/var/log/homesync.log"));
        assert!(!resolved.source_dir.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn resolve_keeps_absolute_mirror_and_explicit_sync_path() {
        let cfg = BackupConfig {
            mirror_dir: PathBuf::from("/data/mirror"),
            local_sync_path: Some(PathBuf::from("/data/cloud")),
            remote: "gdrive:".to_string(),
            remote_path: "/Archive".to_string(),
            ..BackupConfig::default()
        };
        let resolved = cfg.resolve();
        assert_eq!(resolved.mirror_dest, PathBuf::from("/data/mirror"));
        assert_eq!(resolved.sync.local, PathBuf::from("/data/cloud"));
        assert_eq!(resolved.sync.remote, "gdrive:Archive");
    }
}
