use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two failures a user can observe. Transport, status and decode causes
/// all collapse into one of these at the component boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    #[error("Error fetching users")]
    DirectoryLoad,
    #[error("Error creating post or fetching comments")]
    Chain,
}
