use std::path::PathBuf;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use client_core::StaleResults;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::UiEvent,
    ui::{app::APP_TITLE, ApiChainApp},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StaleResultsArg {
    Retain,
    Clear,
}

impl From<StaleResultsArg> for StaleResults {
    fn from(value: StaleResultsArg) -> Self {
        match value {
            StaleResultsArg::Retain => Self::Retain,
            StaleResultsArg::Clear => Self::Clear,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Pick a user, create a post, and list the comments it gets back")]
struct Args {
    /// Base URL of the demo API.
    #[arg(long)]
    base_url: Option<String>,
    /// Settings file; defaults to ./api_chain.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Whether a failed submission keeps the last successful comments on screen.
    #[arg(long, value_enum)]
    stale_results: Option<StaleResultsArg>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref());
    if let Some(base_url) = args.base_url {
        settings.api_base_url = base_url;
    }
    if let Some(stale_results) = args.stale_results {
        settings.stale_results = stale_results.into();
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(settings.api_config(), settings.stale_results, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };
    let api_base_url = settings.api_base_url.clone();
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(ApiChainApp::new(cmd_tx, ui_rx, api_base_url)))),
    )
    .map_err(|err| anyhow!("desktop form exited with error: {err}"))
}
