//! Scriptsync Git - keeps a local checkout current with its remote
//!
//! The sync loop only touches the working copy on disk; the file watcher
//! notices the pulled scripts on its next scan. Git itself is behind the
//! [`Repository`] trait so the loop can run against a fake in tests.

mod error;
mod git;
mod sync;

pub use error::GitError;
pub use git::{reports_behind, GitCli};
pub use sync::{RepoSync, SyncOutcome};

use async_trait::async_trait;

/// The three git operations the sync loop relies on.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Updates remote-tracking refs.
    async fn fetch(&self) -> Result<(), GitError>;

    /// Whether the local branch is behind its upstream.
    async fn is_behind(&self) -> Result<bool, GitError>;

    /// Pulls and returns git's output.
    async fn pull(&self) -> Result<String, GitError>;
}
