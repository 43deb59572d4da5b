use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Builder(#[source] reqwest::Error),
    #[error("request to {path} failed: {source}")]
    Transport {
        path: &'static str,
        source: reqwest::Error,
    },
    #[error("{path} responded with status {status}")]
    Status { path: &'static str, status: u16 },
    #[error("failed to decode {path} response: {source}")]
    Decode {
        path: &'static str,
        source: serde_json::Error,
    },
}
