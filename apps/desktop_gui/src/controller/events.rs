//! Backend-to-UI events and error modeling for the form controller.

use client_core::{ChainSnapshot, DirectoryState};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    DirectoryUpdated(DirectoryState),
    ChainUpdated(ChainSnapshot),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Configuration,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid api base url")
            || message_lower.contains("relative url")
            || message_lower.contains("configuration")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("disconnected")
            || message_lower.contains("queue is full")
            || message_lower.contains("http client")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text for the inline warning banner.
    pub fn banner_text(&self) -> String {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, UiErrorCategory::Configuration) => {
                format!("Check the API base URL setting: {}", self.message)
            }
            (UiErrorContext::BackendStartup, _) => {
                format!("Backend worker failed to start: {}", self.message)
            }
            (UiErrorContext::CommandQueue, _) => self.message.clone(),
        }
    }
}
