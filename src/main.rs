mod api;
mod app;
mod config;
mod logging;
mod models;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;

use crate::api::ApiClient;
use crate::app::Scaffolder;
use crate::config::Cli;
use crate::models::RemoteSource;
use crate::ui::{Palette, Prompter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    // Before any output: may switch the Windows console into ANSI mode.
    let palette = Palette::detect();

    let api = ApiClient::new(RemoteSource::default()).context("Failed to build HTTP client")?;
    let mut scaffolder = Scaffolder::new(Prompter::stdio(palette), api);

    tracing::info!("starting scaffold session");
    scaffolder.run().await
}
