//! Courtside binary.

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use courtside_cli::{analyze, parse, replay, Cli, Commands};

fn init_tracing() {
    // Colored output for dev, JSON for log collection
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("courtside=info,warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("rustls crypto provider already installed");
    }

    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let result = match cli.command {
        Commands::Analyze { video, json, payload } => analyze::run(&video, json, payload, shutdown_rx).await,
        Commands::Replay {
            shots,
            shots_file,
            duration,
            start,
            select,
        } => {
            let options = replay::ReplayOptions {
                duration_seconds: duration,
                start_seconds: start,
                select,
            };
            replay::run(shots.as_deref(), shots_file.as_deref(), options, shutdown_rx).await
        }
        Commands::Parse { response, json } => parse::run(&response, json).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
