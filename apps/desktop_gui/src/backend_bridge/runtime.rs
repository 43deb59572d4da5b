//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use client_core::{
    ApiConfig, ChainSnapshot, DirectoryApi, FormSession, PostDraft, PostsApi, StaleResults,
    SubmitOutcome,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

const UI_QUEUE_RETRY_DELAY: Duration = Duration::from_millis(20);

pub const BUSY_NOTICE: &str = "A post is already being submitted";

pub fn launch(
    api_config: ApiConfig,
    stale_results: StaleResults,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let session = match FormSession::from_config(&api_config, stale_results) {
                Ok(session) => Arc::new(session),
                Err(err) => {
                    error!(error = %err, "failed to create api session");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        err.to_string(),
                    )));
                    return;
                }
            };
            info!(base_url = %api_config.base_url, ?stale_results, "backend worker ready");

            tokio::spawn(forward_chain_updates(
                session.chain().subscribe(),
                ui_tx.clone(),
            ));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadDirectory => {
                        tokio::spawn(load_directory(session.clone(), ui_tx.clone()));
                    }
                    BackendCommand::SubmitPost { draft } => {
                        tokio::spawn(submit_post(session.clone(), draft, ui_tx.clone()));
                    }
                }
            }
            info!("ui command queue closed; backend worker stopping");
        });
    });
}

async fn load_directory<A>(session: Arc<FormSession<A>>, ui_tx: Sender<UiEvent>)
where
    A: DirectoryApi + PostsApi + ?Sized,
{
    let state = session.directory().load().await.clone();
    if ui_tx.try_send(UiEvent::DirectoryUpdated(state)).is_err() {
        warn!("dropped directory update: ui queue unavailable");
    }
}

async fn submit_post<A>(session: Arc<FormSession<A>>, draft: PostDraft, ui_tx: Sender<UiEvent>)
where
    A: DirectoryApi + PostsApi + ?Sized,
{
    match session.chain().submit(&draft).await {
        SubmitOutcome::Ignored => debug!("submit ignored: draft incomplete"),
        SubmitOutcome::Busy => {
            if let Err(err) = ui_tx.try_send(UiEvent::Info(BUSY_NOTICE.to_string())) {
                warn!(error = %err, "dropped busy notice: ui queue unavailable");
            }
        }
        SubmitOutcome::Finished(state) => debug!(?state, "submit finished"),
    }
}

/// Forwards chain snapshots to the UI. A full queue is retried with the
/// latest snapshot so the terminal state is never lost.
async fn forward_chain_updates(
    mut updates: watch::Receiver<ChainSnapshot>,
    ui_tx: Sender<UiEvent>,
) {
    while updates.changed().await.is_ok() {
        loop {
            let snapshot = updates.borrow_and_update().clone();
            match ui_tx.try_send(UiEvent::ChainUpdated(snapshot)) {
                Ok(()) => break,
                Err(TrySendError::Full(_)) => {
                    debug!("ui queue is full; retrying chain update");
                    tokio::time::sleep(UI_QUEUE_RETRY_DELAY).await;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
