//! Shared shot models for Courtside.
//!
//! This crate provides:
//! - Canonical shot records and the lenient raw records the model returns
//! - Timestamp parsing for `m:ss.S` and `mm:ss`
//! - Normalization with recomputed running counters
//! - URL-safe shot payloads and example feedback

pub mod example;
pub mod normalize;
pub mod shot;
pub mod timestamp;
pub mod transport;

// Re-export common types
pub use example::example_shots;
pub use normalize::{normalize_shots, normalize_values, recount_shots, DEFAULT_SHOT_TYPE};
pub use shot::{RawShot, Shot, ShotResult};
pub use timestamp::{format_clock, format_timestamp, parse_timestamp, TimestampError, TimestampFormat};
pub use transport::{decode_shots, encode_shots, resolve_payload, ResolvedShots};
