//! Example coaching feedback shown when live analysis is unavailable.

use serde_json::json;

use crate::normalize::normalize_values;
use crate::shot::Shot;

/// Example shots, normalized like a live response.
pub fn example_shots() -> Vec<Shot> {
    normalize_values(&[
        json!({
            "timestamp_of_outcome": "0:07.5",
            "result": "missed",
            "shot_type": "Jump shot (around free-throw line)",
            "feedback": "You're pushing that ball, not shooting it; get your elbow under, extend fully, and follow through."
        }),
        json!({
            "timestamp_of_outcome": "0:13.0",
            "result": "made",
            "shot_type": "Three-pointer",
            "feedback": "It went in, but watch that slight fade. Keep your shoulders square to the hoop through the whole motion."
        }),
        json!({
            "timestamp_of_outcome": "0:21.5",
            "result": "made",
            "shot_type": "Layup",
            "feedback": "Drive that knee on the layup, protect the ball higher with your off-hand, and finish decisively."
        }),
    ])
}
