//! `courtside analyze`: run one analysis with a progress readout.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use courtside_gemini::{
    run_analysis, AnalysisConfig, AnalysisFailure, AnalysisReport, GeminiClient, GeminiConfig, ShotAnalyzer,
    SimulatedProgress,
};

/// Analyze `video` with `analyzer`, logging progress until it finishes.
pub async fn analyze(
    analyzer: &dyn ShotAnalyzer,
    video: &Path,
    config: &AnalysisConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<AnalysisReport, AnalysisFailure> {
    let progress = SimulatedProgress::new(config);
    let mut percent = progress.subscribe();

    let reporter = tokio::spawn(async move {
        while percent.changed().await.is_ok() {
            let value = *percent.borrow_and_update();
            info!(progress = value, "Analyzing video");
        }
    });

    let result = run_analysis(analyzer, video, config, &progress, shutdown).await;
    // Dropping the progress sender ends the reporter
    drop(progress);
    reporter.await.ok();
    result
}

/// Entry point for the `analyze` subcommand.
pub async fn run(video: &Path, json: bool, payload: bool, shutdown: watch::Receiver<bool>) -> Result<()> {
    if !video.exists() {
        bail!("Video not found: {}", video.display());
    }

    let gemini = GeminiConfig::from_env().context("Gemini is not configured")?;
    info!("Gemini config: {:?}", gemini);
    let client = GeminiClient::new(gemini)?;
    let config = AnalysisConfig::from_env();

    match analyze(&client, video, &config, shutdown).await {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", crate::render::report_summary(&report));
            }
            if payload {
                println!("{}", courtside_models::encode_shots(&report.shots));
            }
            Ok(())
        }
        Err(AnalysisFailure::Cancelled) => {
            warn!("Analysis cancelled");
            Ok(())
        }
        Err(e) => Err(e).context("Analysis failed, please try again"),
    }
}
