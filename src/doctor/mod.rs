use colored::*;
use std::fmt::Display;

use crate::backup::ResolvedConfig;
use crate::common::requirements::InstallTest;
use crate::ui::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass(String),
    Fail(String),
}

impl CheckStatus {
    pub fn message(&self) -> &str {
        match self {
            CheckStatus::Pass(msg) | CheckStatus::Fail(msg) => msg,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckStatus::Pass(_))
    }

    pub fn color_status(&self) -> impl Display {
        match self {
            CheckStatus::Pass(_) => "PASS".green(),
            CheckStatus::Fail(_) => "FAIL".red(),
        }
    }
}

/// A requirement of the backup run and how to verify it
pub struct Check {
    pub name: &'static str,
    pub test: InstallTest,
    pub pass: String,
    pub fail: String,
    pub fix_message: Option<String>,
}

impl Check {
    pub fn execute(&self) -> CheckResult {
        let status = if self.test.run() {
            CheckStatus::Pass(self.pass.clone())
        } else {
            CheckStatus::Fail(self.fail.clone())
        };
        CheckResult {
            name: self.name.to_string(),
            status,
            fix_message: self.fix_message.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub fix_message: Option<String>,
}

impl Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{: <24} [{}] {}",
            self.name,
            self.status.color_status(),
            self.status.message()
        )
    }
}

/// Everything a backup run relies on, for the given configuration
pub fn backup_checks(config: &ResolvedConfig) -> Vec<Check> {
    let tool = |name: &'static str, program: &str, what: &str| Check {
        name,
        test: InstallTest::WhichSucceeds(program.to_string()),
        pass: format!("{program} found on PATH"),
        fail: format!("{program} not found on PATH"),
        fix_message: Some(format!("Install {what} or set the command path in the config")),
    };

    vec![
        tool("mirror tool", &config.mirror_command, "rsync"),
        tool("bisync tool", &config.bisync_command, "rclone"),
        Check {
            name: "backup drive",
            test: InstallTest::DirExists(config.mount_path.clone()),
            pass: format!("mounted at {}", config.mount_path.display()),
            fail: format!("nothing mounted at {}", config.mount_path.display()),
            fix_message: Some("Attach the external drive or fix mount_path".to_string()),
        },
        Check {
            name: "run log",
            test: InstallTest::Appendable(config.log_path.clone()),
            pass: format!("{} is writable", config.log_path.display()),
            fail: format!("cannot append to {}", config.log_path.display()),
            fix_message: Some("Check permissions or set log_path in the config".to_string()),
        },
    ]
}

pub fn run_all_checks(checks: &[Check]) -> Vec<CheckResult> {
    checks.iter().map(Check::execute).collect()
}

pub fn print_results(results: &[CheckResult]) {
    for result in results {
        let level = if result.status.is_success() {
            Level::Success
        } else {
            Level::Error
        };
        let data = serde_json::json!({
            "name": result.name,
            "passed": result.status.is_success(),
            "message": result.status.message(),
            "fix": result.fix_message,
        });
        emit(level, "doctor.check", &result.to_string(), Some(data));
    }

    let failed: Vec<_> = results.iter().filter(|r| !r.status.is_success()).collect();
    if failed.is_empty() {
        return;
    }
    emit(Level::Warn, "doctor.fixes", &"Available fixes:".bold().to_string(), None);
    for result in failed {
        if let Some(ref msg) = result.fix_message {
            emit(
                Level::Warn,
                "doctor.fix",
                &format!("  - {}: {}", result.name, msg),
                None,
            );
        }
    }
}
