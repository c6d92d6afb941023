use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iptv_aggregator::{
    config::Config,
    models::SourceOutcome,
    output::PlaylistEmitter,
    pipeline::Aggregator,
    sources::HttpSourceFetcher,
    template::load_template,
};

#[derive(Parser)]
#[command(name = "iptv-aggregator")]
#[command(version = "0.1.0")]
#[command(about = "Aggregates heterogeneous IPTV channel lists into one templated playlist")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Channel template path (overrides config file)
    #[arg(short, long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Output M3U path (overrides config file)
    #[arg(long, value_name = "FILE")]
    m3u_output: Option<PathBuf>,

    /// Output TXT path (overrides config file)
    #[arg(long, value_name = "FILE")]
    txt_output: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("iptv_aggregator={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting IPTV Aggregator v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config.display());

    // Override config with CLI arguments
    if let Some(template) = cli.template {
        config.template_file = template;
    }
    if let Some(m3u_output) = cli.m3u_output {
        config.output.m3u_path = m3u_output;
    }
    if let Some(txt_output) = cli.txt_output {
        config.output.txt_path = txt_output;
    }

    let template = load_template(&config.template_file)?;
    info!(
        "Template loaded from {}: {} categories, {} channels",
        config.template_file.display(),
        template.categories.len(),
        template.channel_count()
    );

    let fetcher = HttpSourceFetcher::new(&config.fetch)?;
    let emitter = PlaylistEmitter::new(&config);

    let aggregator = Aggregator::new(config);
    let result = aggregator.run(&template, &fetcher).await;

    for report in &result.reports {
        match &report.outcome {
            SourceOutcome::Parsed {
                format,
                categories,
                channels,
            } => info!(
                "Source {}: ok ({format}, {categories} categories, {channels} channels)",
                report.url
            ),
            SourceOutcome::Failed { error } => {
                warn!("Source {}: failed ({error})", report.url)
            }
        }
    }
    let failed = result.reports.iter().filter(|r| !r.is_ok()).count();
    info!(
        "Processed {} sources ({failed} failed), resolved {} channels",
        result.reports.len(),
        result.resolved_channel_count()
    );

    emitter.write(&result.resolved)?;
    info!("Playlists written");

    Ok(())
}
