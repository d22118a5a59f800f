//! Gemini shot analysis for Courtside.
//!
//! This crate provides:
//! - An explicitly constructed Gemini client that uploads a video with the
//!   coaching prompt
//! - Tolerant extraction of shots from JSON, fenced JSON, or prose responses
//! - The analysis flow with simulated progress, timeout, cancellation, and
//!   example-feedback fallback

pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod metrics;
pub mod progress;
pub mod prompt;

pub use analysis::{run_analysis, AnalysisFailure, AnalysisReport, Banner, ShotSource};
pub use client::{GeminiClient, ShotAnalyzer};
pub use config::{AnalysisConfig, GeminiConfig};
pub use error::{GeminiError, GeminiResult};
pub use extract::{extract_shots, shots_from_response, ExtractionMethod, ResponseShots};
pub use logging::AnalysisLogger;
pub use progress::SimulatedProgress;
