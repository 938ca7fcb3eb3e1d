//! The repository sync loop.

use crate::{GitError, Repository};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// What a single sync cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local branch was not behind; nothing was pulled.
    UpToDate,
    /// Local branch was behind and has been pulled.
    Pulled { output: String },
}

/// Periodically fetches and, when behind, pulls.
pub struct RepoSync<R> {
    repo: R,
    interval: Duration,
}

impl<R: Repository> RepoSync<R> {
    pub fn new(repo: R, interval: Duration) -> Self {
        Self { repo, interval }
    }

    /// Fetch, check divergence, pull if behind.
    ///
    /// A failed fetch ends the cycle; status is not checked against stale refs.
    pub async fn sync_once(&self) -> Result<SyncOutcome, GitError> {
        self.repo.fetch().await?;

        if !self.repo.is_behind().await? {
            return Ok(SyncOutcome::UpToDate);
        }

        info!("📥 Pulling changes from remote...");
        let output = self.repo.pull().await?;
        Ok(SyncOutcome::Pulled { output })
    }

    /// Syncs every interval until `shutdown` turns `true` or its sender is dropped.
    ///
    /// Errors are logged and the loop carries on; the next interval is the retry.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("🔄 Auto-pull watcher started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.sync_once().await {
                Ok(SyncOutcome::Pulled { output }) => {
                    let output = output.trim();
                    if !output.is_empty() {
                        info!("{}", output);
                    }
                    info!("✅ Updated from remote");
                }
                Ok(SyncOutcome::UpToDate) => {}
                Err(e) => warn!("Git error: {}", e),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Auto-pull watcher stopped");
    }
}
