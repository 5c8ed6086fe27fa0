use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::error::{CrustError, Result};

/// Where the plan text for an analysis comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    /// Plan text saved to a file, `-` for stdin
    File(PathBuf),
    /// Shell command whose stdout is the plan
    Command(String),
}

impl PlanSource {
    pub async fn read(&self) -> Result<String> {
        match self {
            PlanSource::File(path) => read_plan_file(path).await,
            PlanSource::Command(command) => run_plan_command(command).await,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            PlanSource::File(path) if path.as_os_str() == "-" => "standard input".to_string(),
            PlanSource::File(path) => path.display().to_string(),
            PlanSource::Command(command) => command.clone(),
        }
    }
}

async fn read_plan_file(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut plan = String::new();
        tokio::io::stdin().read_to_string(&mut plan).await?;
        return Ok(plan);
    }
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Runs `command` through `sh -c` and returns its stdout.
pub async fn run_plan_command(command: &str) -> Result<String> {
    tracing::debug!(command, "running plan command");

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .await
        .map_err(|e| CrustError::PlanExecution {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let reason = match output.status.code() {
            Some(code) if stderr.is_empty() => format!("exited with status {}", code),
            Some(code) => format!("exited with status {}: {}", code, stderr),
            None => "terminated by signal".to_string(),
        };
        return Err(CrustError::PlanExecution {
            command: command.to_string(),
            reason,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
