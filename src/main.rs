use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use podfeed::cli::Args;
use podfeed::config::Config;
use podfeed::feed::{self, AudioTagReader, Feed};

fn init_tracing(verbose: bool) {
    // stdout carries the feed; diagnostics go to stderr
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let file_config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => Config::default(),
    };
    Ok(args.apply_to(file_config))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let request = args.resolve()?;

    let mut feed = Feed::new(request.title, request.description);
    feed.episodes = feed::collect_episodes(
        &request.files,
        &request.base_url,
        &AudioTagReader,
        config.collect_policy(),
    )?;
    feed.sort_by_date();
    tracing::info!(episodes = feed.episodes.len(), "Collected episodes");

    match &args.output {
        Some(path) => feed::export_to_file(&feed, &config.mime_type, path)
            .with_context(|| format!("Failed to write feed to {}", path.display()))?,
        None => feed::write_feed(&feed, &config.mime_type, std::io::stdout().lock())?,
    }

    Ok(())
}
