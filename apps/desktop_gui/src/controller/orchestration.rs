//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext},
};

/// Queues `cmd`; on failure returns the error to surface in the form.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Option<UiError> {
    let cmd_name = cmd.name();

    let message = match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            return None;
        }
        Err(TrySendError::Full(_)) => "UI command queue is full; please retry",
        Err(TrySendError::Disconnected(_)) => {
            "Backend command processor disconnected (possible startup/runtime failure); \
             restart the app"
        }
    };

    Some(UiError::from_message(UiErrorContext::CommandQueue, message))
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::controller::{
        events::{UiErrorCategory, UiEvent},
        reducer::FormModel,
    };

    #[test]
    fn queues_command_when_there_is_room() {
        let (tx, rx) = bounded(1);
        assert_eq!(dispatch_backend_command(&tx, BackendCommand::LoadDirectory), None);
        assert_eq!(rx.try_recv().expect("queued"), BackendCommand::LoadDirectory);
    }

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded(1);
        dispatch_backend_command(&tx, BackendCommand::LoadDirectory);
        let full = dispatch_backend_command(&tx, BackendCommand::LoadDirectory).expect("full");
        assert_eq!(full.context(), UiErrorContext::CommandQueue);
        assert_eq!(full.category(), UiErrorCategory::Transport);
        assert!(full.message().contains("queue is full"));

        drop(rx);
        let gone = dispatch_backend_command(&tx, BackendCommand::LoadDirectory).expect("gone");
        assert_eq!(gone.context(), UiErrorContext::CommandQueue);
        assert!(gone.message().contains("disconnected"));
    }

    #[test]
    fn queue_failure_shows_as_form_warning() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut model = FormModel::default();

        let err = dispatch_backend_command(&tx, BackendCommand::LoadDirectory).expect("gone");
        model.apply(UiEvent::Error(err));

        let warnings = model.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Backend command processor disconnected"));
        assert!(model.status.contains("restart the app"));
    }
}
