//! [`Repository`] backed by the `git` executable.

use crate::{GitError, Repository};
use async_trait::async_trait;
use scriptsync_core::SyncConfig;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

const BEHIND_MARKER: &str = "Your branch is behind";

/// Runs git commands in a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    workdir: PathBuf,
    remote: Option<String>,
    branch: Option<String>,
}

impl GitCli {
    /// Uses `git` from `PATH` against `workdir` with tracking defaults.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: "git".to_string(),
            workdir: workdir.into(),
            remote: None,
            branch: None,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            ..Self::new(&config.repo_dir)
        }
    }

    /// Overrides the git executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn fetch_args(&self) -> Vec<&str> {
        let mut args = vec!["fetch"];
        if let Some(remote) = &self.remote {
            args.push(remote);
        }
        args
    }

    fn pull_args(&self) -> Vec<&str> {
        let mut args = vec!["pull"];
        if let Some(remote) = &self.remote {
            args.push(remote);
            if let Some(branch) = &self.branch {
                args.push(branch);
            }
        }
        args
    }

    /// Runs git with `args` and returns stdout on success.
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("Running `{}` in {}", command, self.workdir.display());

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            // Keep status messages in English so they can be matched.
            .env("LC_ALL", "C")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::Failed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Repository for GitCli {
    async fn fetch(&self) -> Result<(), GitError> {
        self.run(&self.fetch_args()).await.map(|_| ())
    }

    async fn is_behind(&self) -> Result<bool, GitError> {
        let status = self.run(&["status", "-uno"]).await?;
        Ok(reports_behind(&status))
    }

    async fn pull(&self) -> Result<String, GitError> {
        self.run(&self.pull_args()).await
    }
}

/// Whether `git status` output says the local branch is behind its upstream.
pub fn reports_behind(status: &str) -> bool {
    status.contains(BEHIND_MARKER)
}
