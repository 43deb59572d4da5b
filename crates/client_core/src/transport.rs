use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::PostId,
    protocol::{
        Comment, CommentsQuery, CreatedPost, NewPost, Person, COMMENTS_PATH, POSTS_PATH,
        USERS_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read side of the person directory.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_people(&self) -> Result<Vec<Person>, ClientError>;
}

/// The two calls chained by a post submission.
#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn create_post(&self, post: &NewPost) -> Result<CreatedPost, ClientError>;
    async fn comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// JSON-over-HTTP client for the demo API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Builder)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn decode_json<T: DeserializeOwned>(
    path: &'static str,
    response: Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            path,
            status: status.as_u16(),
        });
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport { path, source })?;
    serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { path, source })
}

#[async_trait]
impl DirectoryApi for HttpApi {
    async fn list_people(&self) -> Result<Vec<Person>, ClientError> {
        debug!(path = USERS_PATH, "fetching person directory");
        let res = self
            .http
            .get(self.endpoint(USERS_PATH))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                path: USERS_PATH,
                source,
            })?;
        decode_json(USERS_PATH, res).await
    }
}

#[async_trait]
impl PostsApi for HttpApi {
    async fn create_post(&self, post: &NewPost) -> Result<CreatedPost, ClientError> {
        debug!(path = POSTS_PATH, user_id = %post.user_id, "creating post");
        let res = self
            .http
            .post(self.endpoint(POSTS_PATH))
            .json(post)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                path: POSTS_PATH,
                source,
            })?;
        decode_json(POSTS_PATH, res).await
    }

    async fn comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ClientError> {
        debug!(path = COMMENTS_PATH, %post_id, "fetching comments");
        let res = self
            .http
            .get(self.endpoint(COMMENTS_PATH))
            .query(&CommentsQuery { post_id })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                path: COMMENTS_PATH,
                source,
            })?;
        decode_json(COMMENTS_PATH, res).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
