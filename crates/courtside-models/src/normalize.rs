//! Normalization of model shot records into canonical [`Shot`]s.
//!
//! One bad record never fails the batch: anything that cannot be read is
//! filled with defaults so the player always has feedback to show.

use serde_json::Value;
use tracing::{debug, warn};

use crate::shot::{is_layup_type, RawShot, Shot, ShotResult};
use crate::timestamp::{parse_timestamp, DEFAULT_TIMESTAMP};

/// Shot type used when the model leaves it out.
pub const DEFAULT_SHOT_TYPE: &str = "Jump shot";

/// Tokens that mark a successful attempt in free text.
const SUCCESS_TOKENS: [&str; 3] = ["made", "make", "score"];

/// Normalize raw JSON shot entries. Non-object entries become empty records.
pub fn normalize_values(values: &[Value]) -> Vec<Shot> {
    let raw: Vec<RawShot> = values.iter().map(RawShot::from_value).collect();
    normalize_shots(&raw)
}

/// Normalize raw shot records.
///
/// Output is stable-sorted by timestamp and carries running counters
/// recomputed from that order. Counters sent by the model are ignored.
pub fn normalize_shots(raw: &[RawShot]) -> Vec<Shot> {
    let shots = raw
        .iter()
        .enumerate()
        .map(|(index, record)| Shot {
            timestamp_seconds: resolve_timestamp(index, record),
            result: resolve_result(record),
            shot_type: resolve_shot_type(record),
            feedback: record.feedback.clone().unwrap_or_default(),
            made_count_at_this_point: 0,
            missed_count_at_this_point: 0,
            layups_made_at_this_point: 0,
        })
        .collect();
    recount_shots(shots)
}

/// Stable-sort by timestamp and rewrite every running counter from that order.
pub fn recount_shots(mut shots: Vec<Shot>) -> Vec<Shot> {
    shots.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));

    let mut made = 0u32;
    let mut missed = 0u32;
    let mut layups = 0u32;

    for shot in &mut shots {
        match shot.result {
            ShotResult::Made => {
                made += 1;
                if is_layup_type(&shot.shot_type) {
                    layups += 1;
                }
            }
            ShotResult::Missed => missed += 1,
        }
        shot.made_count_at_this_point = made;
        shot.missed_count_at_this_point = missed;
        shot.layups_made_at_this_point = layups;
    }

    debug!(
        shots = shots.len(),
        made = made,
        missed = missed,
        layups = layups,
        "Normalized shot records"
    );
    shots
}

/// Decide made/missed for one record.
pub fn resolve_result(record: &RawShot) -> ShotResult {
    match record.outcome.as_deref() {
        Some("make") => return ShotResult::Made,
        Some("miss") => return ShotResult::Missed,
        _ => {}
    }

    match record.result.as_deref() {
        Some("made") => return ShotResult::Made,
        Some("missed") => return ShotResult::Missed,
        _ => {}
    }

    let text = [record.outcome.as_deref(), record.result.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if SUCCESS_TOKENS.iter().any(|token| text.contains(token)) {
        ShotResult::Made
    } else {
        ShotResult::Missed
    }
}

fn resolve_timestamp(index: usize, record: &RawShot) -> f64 {
    for candidate in [record.time.as_deref(), record.timestamp_of_outcome.as_deref()]
        .into_iter()
        .flatten()
    {
        match parse_timestamp(candidate) {
            Ok(secs) => return secs,
            Err(e) => debug!(index, timestamp = candidate, "Unusable shot timestamp: {}", e),
        }
    }

    warn!(
        index,
        "Shot record has no usable timestamp, defaulting to {}", DEFAULT_TIMESTAMP
    );
    parse_timestamp(DEFAULT_TIMESTAMP).unwrap_or(0.0)
}

fn resolve_shot_type(record: &RawShot) -> String {
    match record.shot_type.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_SHOT_TYPE.to_string(),
    }
}
