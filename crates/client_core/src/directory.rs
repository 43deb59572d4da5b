use std::sync::Arc;

use shared::{error::FailureKind, protocol::Person};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::transport::DirectoryApi;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DirectoryState {
    #[default]
    Pending,
    Loaded(Vec<Person>),
    Failed(FailureKind),
}

impl DirectoryState {
    /// People in server order; empty unless the load succeeded.
    pub fn people(&self) -> &[Person] {
        match self {
            Self::Loaded(people) => people,
            Self::Pending | Self::Failed(_) => &[],
        }
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            Self::Failed(kind) => Some(*kind),
            Self::Pending | Self::Loaded(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Fetches the person directory once per loader and memoizes the outcome.
pub struct DirectoryLoader<A: ?Sized> {
    api: Arc<A>,
    state: OnceCell<DirectoryState>,
}

impl<A: DirectoryApi + ?Sized> DirectoryLoader<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: OnceCell::new(),
        }
    }

    /// Runs the directory request on first call. Concurrent and later calls
    /// wait for and return the same state without issuing another request.
    pub async fn load(&self) -> &DirectoryState {
        self.state.get_or_init(|| self.fetch()).await
    }

    pub fn state(&self) -> DirectoryState {
        self.state.get().cloned().unwrap_or_default()
    }

    async fn fetch(&self) -> DirectoryState {
        match self.api.list_people().await {
            Ok(people) => {
                info!(count = people.len(), "loaded person directory");
                DirectoryState::Loaded(people)
            }
            Err(err) => {
                warn!(error = %err, "failed to load person directory");
                DirectoryState::Failed(FailureKind::DirectoryLoad)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
