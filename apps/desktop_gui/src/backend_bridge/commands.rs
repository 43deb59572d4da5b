//! Backend commands queued from UI to backend worker.

use client_core::PostDraft;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadDirectory,
    SubmitPost { draft: PostDraft },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadDirectory => "load_directory",
            Self::SubmitPost { .. } => "submit_post",
        }
    }
}
