use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{
    domain::PersonId,
    error::FailureKind,
    protocol::{Comment, NewPost},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{error::ClientError, transport::PostsApi};

/// Form input for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub author_id: Option<PersonId>,
    pub title: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(
        author_id: Option<PersonId>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            author_id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Presence check only: whitespace counts as content.
    pub fn is_complete(&self) -> bool {
        self.author_id.is_some() && !self.title.is_empty() && !self.body.is_empty()
    }

    pub fn to_new_post(&self) -> Option<NewPost> {
        if !self.is_complete() {
            return None;
        }
        Some(NewPost {
            title: self.title.clone(),
            body: self.body.clone(),
            user_id: self.author_id?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChainState {
    #[default]
    Idle,
    InFlight,
    Succeeded(Vec<Comment>),
    Failed(FailureKind),
}

impl ChainState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Failed(kind) => Some(kind.to_string()),
            Self::Idle | Self::InFlight | Self::Succeeded(_) => None,
        }
    }
}

/// What happens to the last successful comment list when a new attempt
/// starts or fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResults {
    /// Keep showing the last successful comments after a failed attempt.
    #[default]
    Retain,
    /// Drop them as soon as a new attempt starts.
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSnapshot {
    pub state: ChainState,
    /// Comments of the most recent successful execution under
    /// [`StaleResults::Retain`]; always empty under [`StaleResults::Clear`].
    pub retained: Vec<Comment>,
}

impl ChainSnapshot {
    /// Comments the presentation layer may show. Nothing is shown while an
    /// attempt is in flight so old results never pass for new ones.
    pub fn visible_comments(&self) -> &[Comment] {
        match &self.state {
            ChainState::Succeeded(comments) => comments,
            ChainState::Failed(_) => &self.retained,
            ChainState::Idle | ChainState::InFlight => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A draft field was empty; nothing happened.
    Ignored,
    /// Another submission is still in flight; nothing happened.
    Busy,
    /// The chain ran and reached this terminal state.
    Finished(ChainState),
}

/// Creates a post, then loads the comments keyed by the returned post id.
pub struct PostChainer<A: ?Sized> {
    api: Arc<A>,
    stale_results: StaleResults,
    snapshot: watch::Sender<ChainSnapshot>,
}

impl<A: PostsApi + ?Sized> PostChainer<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (snapshot, _) = watch::channel(ChainSnapshot::default());
        Self {
            api,
            stale_results: StaleResults::default(),
            snapshot,
        }
    }

    pub fn with_stale_results(mut self, stale_results: StaleResults) -> Self {
        self.stale_results = stale_results;
        self
    }

    pub fn stale_results(&self) -> StaleResults {
        self.stale_results
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> ChainState {
        self.snapshot.borrow().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChainSnapshot> {
        self.snapshot.subscribe()
    }

    pub async fn submit(&self, draft: &PostDraft) -> SubmitOutcome {
        let Some(post) = draft.to_new_post() else {
            debug!("ignoring submit with incomplete draft");
            return SubmitOutcome::Ignored;
        };

        let Some(guard) = self.begin() else {
            warn!("rejecting submit while another post chain is in flight");
            return SubmitOutcome::Busy;
        };

        let result = self.run_chain(&post).await;
        let state = match result {
            Ok(comments) => {
                info!(count = comments.len(), "post chain succeeded");
                ChainState::Succeeded(comments)
            }
            Err(err) => {
                warn!(error = %err, "post chain failed");
                ChainState::Failed(FailureKind::Chain)
            }
        };
        guard.complete(state.clone());
        SubmitOutcome::Finished(state)
    }

    /// Atomically moves into `InFlight`, or returns `None` when already there.
    fn begin(&self) -> Option<InFlightGuard<'_>> {
        let stale_results = self.stale_results;
        let entered = self.snapshot.send_if_modified(|snapshot| {
            if snapshot.state.is_in_flight() {
                return false;
            }
            if stale_results == StaleResults::Clear {
                snapshot.retained.clear();
            }
            snapshot.state = ChainState::InFlight;
            true
        });

        entered.then(|| InFlightGuard {
            snapshot: &self.snapshot,
            stale_results,
            armed: true,
        })
    }

    async fn run_chain(&self, post: &NewPost) -> Result<Vec<Comment>, ClientError> {
        let created = self.api.create_post(post).await?;
        info!(post_id = %created.id, user_id = %post.user_id, "created post");
        self.api.comments_for_post(created.id).await
    }
}

/// Resets the chain to `Idle` if a submission is dropped before it finishes.
struct InFlightGuard<'a> {
    snapshot: &'a watch::Sender<ChainSnapshot>,
    stale_results: StaleResults,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn complete(mut self, state: ChainState) {
        self.armed = false;
        let stale_results = self.stale_results;
        self.snapshot.send_modify(|snapshot| {
            if let (ChainState::Succeeded(comments), StaleResults::Retain) =
                (&state, stale_results)
            {
                snapshot.retained.clone_from(comments);
            }
            snapshot.state = state;
        });
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("post chain dropped while in flight");
        self.snapshot.send_modify(|snapshot| {
            snapshot.state = ChainState::Idle;
        });
    }
}

#[cfg(test)]
#[path = "tests/chain_tests.rs"]
mod tests;
