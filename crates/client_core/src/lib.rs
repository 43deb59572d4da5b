use std::sync::Arc;

pub mod chain;
pub mod directory;
pub mod error;
pub mod transport;

pub use chain::{ChainSnapshot, ChainState, PostChainer, PostDraft, StaleResults, SubmitOutcome};
pub use directory::{DirectoryLoader, DirectoryState};
pub use error::ClientError;
pub use transport::{ApiConfig, DirectoryApi, HttpApi, PostsApi, DEFAULT_API_BASE_URL};

/// One form session: the person directory and the post chain over a shared
/// API handle. The two cells share no state.
pub struct FormSession<A: ?Sized> {
    directory: DirectoryLoader<A>,
    chain: PostChainer<A>,
}

impl<A: DirectoryApi + PostsApi + ?Sized> FormSession<A> {
    pub fn new(api: Arc<A>, stale_results: StaleResults) -> Self {
        Self {
            directory: DirectoryLoader::new(api.clone()),
            chain: PostChainer::new(api).with_stale_results(stale_results),
        }
    }

    pub fn directory(&self) -> &DirectoryLoader<A> {
        &self.directory
    }

    pub fn chain(&self) -> &PostChainer<A> {
        &self.chain
    }
}

impl FormSession<HttpApi> {
    pub fn from_config(
        config: &ApiConfig,
        stale_results: StaleResults,
    ) -> Result<Self, ClientError> {
        let api = HttpApi::new(config)?;
        Ok(Self::new(Arc::new(api), stale_results))
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
