//! Analysis flow: one video in, one [`AnalysisReport`] out.
//!
//! The flow never dead-ends. It finishes with real shots, with example
//! shots behind a banner when the API is unreachable or rate limited, with
//! an explicit "no shots" banner, or with an [`AnalysisFailure`] the caller
//! can offer a retry for. It is bounded by [`AnalysisConfig::timeout`] and
//! stops as soon as the shutdown signal fires.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::Instrument;
use uuid::Uuid;

use courtside_models::{example_shots, Shot};

use crate::client::ShotAnalyzer;
use crate::config::AnalysisConfig;
use crate::error::GeminiError;
use crate::extract::{shots_from_response, ExtractionMethod, ResponseShots};
use crate::logging::AnalysisLogger;
use crate::metrics;
use crate::progress::SimulatedProgress;

/// Where the shots in a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotSource {
    /// Live model analysis
    Analysis,
    /// Built-in example feedback
    Example,
}

/// Informational banner shown with the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Banner {
    /// Live analysis was unavailable; example feedback is shown instead
    UsingExampleFeedback { reason: String },
    /// The analysis ran but found no shots
    NoShotsDetected,
}

/// Result of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub shots: Vec<Shot>,
    pub source: ShotSource,
    /// Set when shots came from the model response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn is_example(&self) -> bool {
        self.source == ShotSource::Example
    }
}

/// Analysis ended without results.
#[derive(Debug, Error)]
pub enum AnalysisFailure {
    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Analysis timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Analysis failed: {0}")]
    Failed(#[source] GeminiError),
}

impl AnalysisFailure {
    /// Whether the caller should offer a retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AnalysisFailure::Cancelled)
    }
}

/// Progress ticks between log lines.
const PROGRESS_LOG_EVERY: u32 = 10;

/// Message shown in the example-feedback banner.
fn fallback_reason(error: &GeminiError) -> &'static str {
    if error.is_quota_exceeded() {
        "The AI coach is busy right now (rate limit reached). Showing example feedback."
    } else {
        "Couldn't reach the AI coach. Showing example feedback."
    }
}

fn no_shots_report(analysis_id: Uuid) -> AnalysisReport {
    AnalysisReport {
        analysis_id,
        shots: Vec::new(),
        source: ShotSource::Analysis,
        extraction: None,
        banner: Some(Banner::NoShotsDetected),
        completed_at: Utc::now(),
    }
}

/// Run one analysis of the video at `video`.
///
/// `progress` is advanced while waiting and completed when a report is
/// produced. Flipping `shutdown` to `true` (or dropping its sender)
/// cancels the in-flight request.
pub async fn run_analysis(
    analyzer: &dyn ShotAnalyzer,
    video: &Path,
    config: &AnalysisConfig,
    progress: &SimulatedProgress,
    mut shutdown: watch::Receiver<bool>,
) -> Result<AnalysisReport, AnalysisFailure> {
    let analysis_id = Uuid::new_v4();
    let logger = AnalysisLogger::new(&analysis_id, &video.display().to_string());
    let span = logger.create_span();

    async move {
        logger.log_start("sending video to the AI coach");

        if *shutdown.borrow() {
            return Err(AnalysisFailure::Cancelled);
        }

        let mut ticker = interval(config.progress_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        let request = analyzer.analyze_video(video);
        tokio::pin!(request);
        let deadline = sleep(config.timeout);
        tokio::pin!(deadline);

        let mut ticks: u32 = 0;
        let response = loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        logger.log_warning("cancelled before completion");
                        return Err(AnalysisFailure::Cancelled);
                    }
                }
                result = &mut request => break result,
                _ = &mut deadline => {
                    logger.log_error(&format!("no response within {:?}", config.timeout));
                    metrics::record_failure("timeout");
                    return Err(AnalysisFailure::TimedOut(config.timeout));
                }
                _ = ticker.tick() => {
                    progress.advance();
                    ticks += 1;
                    if ticks % PROGRESS_LOG_EVERY == 0 {
                        logger.log_progress(&format!("waiting for response ({}%)", progress.current()));
                    }
                }
            }
        };

        let report = match response {
            Ok(text) => match shots_from_response(&text) {
                ResponseShots::Detected { shots, method } => {
                    logger.log_completion(&format!("{} shots ({:?})", shots.len(), method));
                    metrics::record_analysis(method, shots.len());
                    AnalysisReport {
                        analysis_id,
                        shots,
                        source: ShotSource::Analysis,
                        extraction: Some(method),
                        banner: None,
                        completed_at: Utc::now(),
                    }
                }
                ResponseShots::NoShotsDetected => {
                    logger.log_completion("no shots detected");
                    metrics::record_no_shots();
                    no_shots_report(analysis_id)
                }
            },
            // A reply without text (e.g. safety blocked) is an answer, not a failure
            Err(GeminiError::EmptyResponse) => {
                logger.log_completion("empty response, no shots detected");
                metrics::record_no_shots();
                no_shots_report(analysis_id)
            }
            Err(e) if e.is_transport() => {
                logger.log_warning(&format!("using example feedback: {}", e));
                metrics::record_example_fallback(if e.is_quota_exceeded() { "quota" } else { "unreachable" });
                AnalysisReport {
                    analysis_id,
                    shots: example_shots(),
                    source: ShotSource::Example,
                    extraction: None,
                    banner: Some(Banner::UsingExampleFeedback {
                        reason: fallback_reason(&e).to_string(),
                    }),
                    completed_at: Utc::now(),
                }
            }
            Err(e) => {
                logger.log_error(&e.to_string());
                metrics::record_failure("api");
                return Err(AnalysisFailure::Failed(e));
            }
        };

        progress.complete();
        Ok(report)
    }
    .instrument(span)
    .await
}
