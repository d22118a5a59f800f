//! Playback-side shot feedback for Courtside.
//!
//! This crate provides:
//! - Matching of the playback position against the shot timeline
//! - Position sampling with coalescing and pause suspension
//! - The feedback overlay with its dwell timer
//! - A playback session that serializes samples and user commands through
//!   a single owner task

pub mod config;
pub mod error;
pub mod matcher;
pub mod overlay;
pub mod player;
pub mod session;
pub mod timeline;
pub mod tracker;

pub use config::PlaybackConfig;
pub use error::{PlaybackError, PlaybackResult};
pub use matcher::{match_active, ActiveShotTracker, MatchChange, DEFAULT_TOLERANCE_SECS};
pub use overlay::{Overlay, OverlayState, DEFAULT_DWELL};
pub use player::{MediaPlayer, PlaybackState, SimulatedPlayer};
pub use session::{
    HideReason, OverlayEvent, OverlaySnapshot, PlaybackSession, SessionCommand, SessionHandle, ShowTrigger,
};
pub use timeline::{clamp_seek, marker_fraction, skip, tap_position, SKIP_SECONDS};
pub use tracker::{PositionSample, PositionTracker, SampleCoalescer, SeekEpoch};
