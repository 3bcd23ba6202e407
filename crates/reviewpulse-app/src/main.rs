use clap::Parser;
use reviewpulse_app::{assemble, render, AppConfig, AnalyzeOutcome, Cli};
use reviewpulse_telemetry::describe_metrics;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    describe_metrics();

    let config = AppConfig::load(&cli)?;
    let assembled = assemble(&config)?;
    let session = &assembled.session;

    println!();
    println!("  reviewpulse: review sentiment analyzer");
    println!("  Source:    {}", config.source);
    println!("  Provider:  {}", config.classifier.provider);
    println!();
    println!("{}", render::status_line(&session.state()));

    let state = session.start().await;
    println!("{}", render::status_line(&state));

    for _ in 0..cli.count {
        println!();
        let outcome = session.analyze().await;
        println!("{}", render::outcome(&outcome));
        if matches!(outcome, AnalyzeOutcome::Blocked(_)) {
            break;
        }
    }

    let metrics = session.metrics().snapshot();
    info!(
        analyses = metrics.analyses,
        positive = metrics.positive,
        negative = metrics.negative,
        neutral = metrics.neutral,
        failures = metrics.failures,
        avg_latency_us = metrics.avg_latency_us(),
        "Session finished"
    );

    assembled.shutdown().await;

    if !state.is_ready() {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "reviewpulse=debug,reviewpulse_app=debug,reviewpulse_corpus=debug,reviewpulse_classifiers=debug,reviewpulse_telemetry=debug"
    } else {
        "reviewpulse=info,reviewpulse_app=info,reviewpulse_corpus=info,reviewpulse_classifiers=info,reviewpulse_telemetry=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
