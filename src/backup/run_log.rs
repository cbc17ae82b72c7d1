use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::backup::error::BackupError;
use crate::ui::prelude::*;

/// Timestamp prefix of every run log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only record of one backup run.
///
/// Each event becomes a single `YYYY-MM-DD HH:MM:SS message` line, flushed
/// immediately so an interrupted run still leaves a readable log. Events are
/// echoed to the console through the ui layer unless echo is turned off.
pub struct RunLog<W: Write = File> {
    writer: W,
    path: PathBuf,
    echo: bool,
}

impl RunLog<File> {
    /// Open (or create) the log file in append mode
    pub fn open(path: &Path) -> Result<Self, BackupError> {
        let log_err = |source: std::io::Error| BackupError::Log {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(log_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(log_err)?;
        Ok(Self {
            writer: file,
            path: path.to_path_buf(),
            echo: true,
        })
    }
}

impl<W: Write> RunLog<W> {
    /// Wrap an arbitrary writer. Echo is off.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            path: PathBuf::from("<memory>"),
            echo: false,
        }
    }

    #[cfg(test)]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    fn write_line(&mut self, message: &str) -> Result<(), BackupError> {
        let line = format!("{} {}", Local::now().format(TIMESTAMP_FORMAT), message);
        writeln!(self.writer, "{line}")
            .and_then(|_| self.writer.flush())
            .map_err(|source| BackupError::Log {
                path: self.path.clone(),
                source,
            })
    }

    /// Record an event and echo it to the console
    pub fn event(&mut self, level: Level, code: &str, message: &str) -> Result<(), BackupError> {
        self.write_line(message)?;
        if self.echo {
            emit(level, code, message, None);
        }
        Ok(())
    }

    pub fn info(&mut self, code: &str, message: &str) -> Result<(), BackupError> {
        self.event(Level::Info, code, message)
    }

    pub fn success(&mut self, code: &str, message: &str) -> Result<(), BackupError> {
        self.event(Level::Success, code, message)
    }

    pub fn warn(&mut self, code: &str, message: &str) -> Result<(), BackupError> {
        self.event(Level::Warn, code, message)
    }

    pub fn error(&mut self, code: &str, message: &str) -> Result<(), BackupError> {
        self.event(Level::Error, code, message)
    }

    /// Append the captured output of an external tool, one line per log
    /// entry, prefixed with the tool name.
    pub fn tool_output(&mut self, tool: &str, output: &str) -> Result<(), BackupError> {
        for line in output.lines().filter(|l| !l.trim().is_empty()) {
            let message = format!("{tool}: {line}");
            self.write_line(&message)?;
            if self.echo {
                emit(Level::Debug, "backup.tool.output", &message, None);
            }
        }
        Ok(())
    }
}

impl<W: Write> Drop for RunLog<W> {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
