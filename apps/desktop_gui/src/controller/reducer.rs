//! Form state and the transitions applied to it from backend events.

use client_core::{ChainSnapshot, DirectoryState, PostDraft};
use shared::{domain::PersonId, protocol::Comment};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiEvent},
};

pub const SUBMIT_LABEL: &str = "Create Post";
pub const SUBMIT_IN_FLIGHT_LABEL: &str = "Loading...";
pub const PERSON_PLACEHOLDER: &str = "Select a user...";

/// Everything the form renders. The directory and the chain are separate
/// cells; only this model puts them side by side.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    pub directory: DirectoryState,
    pub draft: PostDraft,
    pub chain: ChainSnapshot,
    pub status: String,
    pub backend_error: Option<UiError>,
}

impl FormModel {
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::DirectoryUpdated(state) => {
                self.status = match &state {
                    DirectoryState::Loaded(people) => format!("Loaded {} users", people.len()),
                    DirectoryState::Failed(kind) => kind.to_string(),
                    DirectoryState::Pending => self.status.clone(),
                };
                if let Some(author_id) = self.draft.author_id {
                    if !state.people().iter().any(|person| person.id == author_id) {
                        self.draft.author_id = None;
                    }
                }
                self.directory = state;
            }
            UiEvent::ChainUpdated(snapshot) => {
                self.chain = snapshot;
            }
            UiEvent::Error(err) => {
                tracing::warn!(
                    category = ?err.category(),
                    context = ?err.context(),
                    "backend error: {}",
                    err.message()
                );
                self.status = err.message().to_string();
                self.backend_error = Some(err);
            }
        }
    }

    pub fn submit_enabled(&self) -> bool {
        !self.chain.state.is_in_flight()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.chain.state.is_in_flight() {
            SUBMIT_IN_FLIGHT_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// The command for a click on the submit button. Draft completeness is
    /// left to the chainer, which ignores incomplete drafts.
    pub fn submit_command(&self) -> Option<BackendCommand> {
        self.submit_enabled().then(|| BackendCommand::SubmitPost {
            draft: self.draft.clone(),
        })
    }

    pub fn select_person(&mut self, person_id: Option<PersonId>) {
        self.draft.author_id = person_id;
    }

    pub fn selected_person_name(&self) -> Option<&str> {
        let author_id = self.draft.author_id?;
        self.directory
            .people()
            .iter()
            .find(|person| person.id == author_id)
            .map(|person| person.name.as_str())
    }

    pub fn person_picker_text(&self) -> &str {
        self.selected_person_name().unwrap_or(PERSON_PLACEHOLDER)
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(err) = &self.backend_error {
            warnings.push(err.banner_text());
        }
        if let Some(kind) = self.directory.failure() {
            warnings.push(kind.to_string());
        }
        if let Some(message) = self.chain.state.error_message() {
            warnings.push(message);
        }
        warnings
    }

    pub fn comments(&self) -> &[Comment] {
        self.chain.visible_comments()
    }
}
