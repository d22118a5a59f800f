//! Structured analysis logging utilities.
//!
//! Provides consistent, structured logging for video analyses with
//! tracing spans and contextual information.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Analysis logger for structured logging with consistent formatting.
///
/// Every line carries the analysis ID and the video being analyzed.
#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    analysis_id: String,
    video: String,
}

impl AnalysisLogger {
    /// Create a new logger for an analysis.
    pub fn new(analysis_id: &Uuid, video: &str) -> Self {
        Self {
            analysis_id: analysis_id.to_string(),
            video: video.to_string(),
        }
    }

    /// Log the start of an analysis.
    pub fn log_start(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            video = %self.video,
            "Analysis started: {}", message
        );
    }

    /// Log a progress update.
    pub fn log_progress(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            video = %self.video,
            "Analysis progress: {}", message
        );
    }

    /// Log a warning, e.g. a degraded result.
    pub fn log_warning(&self, message: &str) {
        warn!(
            analysis_id = %self.analysis_id,
            video = %self.video,
            "Analysis warning: {}", message
        );
    }

    /// Log a failure.
    pub fn log_error(&self, message: &str) {
        error!(
            analysis_id = %self.analysis_id,
            video = %self.video,
            "Analysis error: {}", message
        );
    }

    /// Log the completion of an analysis.
    pub fn log_completion(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            video = %self.video,
            "Analysis completed: {}", message
        );
    }

    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }

    /// Create a tracing span for this analysis.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "analysis",
            analysis_id = %self.analysis_id,
            video = %self.video
        )
    }
}
