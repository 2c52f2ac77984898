//! Best-effort publishing of the output directory to git.
//!
//! Publishing runs after every artifact is on disk. Its failure is logged
//! and never changes the outcome of the run.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, info};

pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to start git {step}: {source}")]
    Spawn {
        step: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {step} failed ({status}): {stderr}")]
    CommandFailed {
        step: String,
        status: String,
        stderr: String,
    },

    #[error("git {step} timed out after {seconds}s")]
    TimedOut { step: String, seconds: u64 },
}

pub fn commit_message(top_n: usize) -> String {
    format!("data: processed top {top_n}")
}

/// Runs `git add`, `git commit` and `git push` in a repository
pub struct GitPublisher {
    repo_root: PathBuf,
    timeout: Duration,
}

impl GitPublisher {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    /// Configure the per-command timeout (default: 60s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn publish(&self, data_dir: &Path, message: &str) -> Result<(), PublishError> {
        self.git("add", [OsStr::new("add"), data_dir.as_os_str()]).await?;
        self.git("commit", [OsStr::new("commit"), OsStr::new("-m"), OsStr::new(message)])
            .await?;
        self.git("push", [OsStr::new("push")]).await?;
        Ok(())
    }

    async fn git<'a>(&self, step: &str, args: impl IntoIterator<Item = &'a OsStr>) -> Result<(), PublishError> {
        let mut command = Command::new("git");
        command.args(args).current_dir(&self.repo_root).kill_on_drop(true);
        debug!("running git {} in {}", step, self.repo_root.display());

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| PublishError::TimedOut {
                step: step.to_string(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|source| PublishError::Spawn {
                step: step.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(PublishError::CommandFailed {
                step: step.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Publish and log the result. Returns whether publishing succeeded.
pub async fn publish_best_effort(publisher: &GitPublisher, data_dir: &Path, top_n: usize) -> bool {
    match publisher.publish(data_dir, &commit_message(top_n)).await {
        Ok(()) => {
            info!("pushed {} to the remote", data_dir.display());
            true
        }
        Err(e) => {
            error!("publish failed, local outputs are unaffected: {}", e);
            false
        }
    }
}
