use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

pub fn run_homesync_command(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(env!("CARGO_BIN_EXE_homesync"))
        .arg("--config")
        .arg(env.config_path())
        .arg("--no-color")
        .args(args)
        .current_dir(env.path())
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Write an executable shell script that stands in for rsync or rclone.
/// Every invocation appends its arguments to `<name>.calls`.
#[cfg(unix)]
pub fn fake_tool(env: &TestEnvironment, name: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let script = env.path().join(name);
    let calls = calls_path(env, name);
    let contents = format!("#!/bin/sh\necho \"$*\" >> '{}'\n{body}\n", calls.display());
    fs::write(&script, contents)?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
    Ok(script)
}

pub fn calls_path(env: &TestEnvironment, name: &str) -> PathBuf {
    env.path().join(format!("{name}.calls"))
}

/// Argument lines recorded by a fake tool, empty if it never ran
pub fn recorded_calls(env: &TestEnvironment, name: &str) -> Result<Vec<String>> {
    let path = calls_path(env, name);
    if !Path::new(&path).exists() {
        return Ok(Vec::new());
    }
    Ok(fs::read_to_string(path)?.lines().map(str::to_string).collect())
}
