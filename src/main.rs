//! vidsearch CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidsearch::cli::{commands, Cli, Commands};
use vidsearch::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_deref())?;

    // Initialize logging; -v flags override the configured level
    let log_level = cli.log_level(&settings.general.log_level);

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vidsearch={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Ensure data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Index { files, replace } => {
            commands::run_index(files, *replace, settings).await?;
        }

        Commands::Transcribe {
            audio,
            video_id,
            title,
            output,
            replace,
        } => {
            commands::run_transcribe(audio, video_id, title.clone(), output.clone(), *replace, settings).await?;
        }

        Commands::Search { query, top_k, json } => {
            commands::run_search(query, *top_k, *json, settings).await?;
        }

        Commands::Stats => {
            commands::run_stats(settings)?;
        }

        Commands::List => {
            commands::run_list(settings)?;
        }

        Commands::Remove { video_id } => {
            commands::run_remove(video_id, settings)?;
        }

        Commands::Clear { yes } => {
            commands::run_clear(*yes, settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
