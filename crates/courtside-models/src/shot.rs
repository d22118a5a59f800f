//! Shot models.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Outcome of a shot attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShotResult {
    Made,
    Missed,
}

impl ShotResult {
    pub fn is_made(&self) -> bool {
        matches!(self, ShotResult::Made)
    }

    /// Label shown on shot badges.
    pub fn label(&self) -> &'static str {
        match self {
            ShotResult::Made => "Made",
            ShotResult::Missed => "Missed",
        }
    }
}

impl std::fmt::Display for ShotResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShotResult::Made => write!(f, "made"),
            ShotResult::Missed => write!(f, "missed"),
        }
    }
}

/// A detected shot with coaching feedback, positioned on the video timeline.
///
/// Built by the normalizer; read-only for the rest of its life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Shot {
    /// Offset into the video in seconds (never negative)
    pub timestamp_seconds: f64,

    /// Made or missed
    pub result: ShotResult,

    /// Free-text classification ("Layup", "Three-pointer", ...)
    pub shot_type: String,

    /// Coaching feedback for this attempt
    pub feedback: String,

    /// Made shots up to and including this one
    pub made_count_at_this_point: u32,

    /// Missed shots up to and including this one
    pub missed_count_at_this_point: u32,

    /// Made layups up to and including this one
    pub layups_made_at_this_point: u32,
}

impl Shot {
    /// Whether this shot counts toward the layup tally.
    pub fn is_layup(&self) -> bool {
        is_layup_type(&self.shot_type)
    }

    /// Total attempts up to and including this one.
    pub fn attempts_at_this_point(&self) -> u32 {
        self.made_count_at_this_point + self.missed_count_at_this_point
    }
}

pub(crate) fn is_layup_type(shot_type: &str) -> bool {
    shot_type.to_lowercase().contains("layup")
}

/// Shot record as returned by the analysis model.
///
/// The model is not held to a schema: field names and enum spellings vary
/// between prompt revisions, so every field is optional and any scalar is
/// accepted as text. Non-scalar values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawShot {
    /// Current prompt: `mm:ss`
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Legacy prompt: `m:ss.S`
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub timestamp_of_outcome: Option<String>,

    /// Current prompt: `make` | `miss`
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    /// Legacy prompt: `made` | `missed`
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shot_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,

    // Running totals from the model. Accepted but never trusted; the
    // normalizer recomputes them.
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub total_shots_made_so_far: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub total_shots_missed_so_far: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub total_layups_made_so_far: Option<u64>,
}

impl RawShot {
    /// Build a record from any JSON value. Non-objects yield an empty record.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_shot_accepts_both_prompt_shapes() {
        let current = RawShot::from_value(&json!({
            "time": "00:05",
            "outcome": "make",
            "feedback": "Good form"
        }));
        assert_eq!(current.time.as_deref(), Some("00:05"));
        assert_eq!(current.outcome.as_deref(), Some("make"));
        assert!(current.result.is_none());

        let legacy = RawShot::from_value(&json!({
            "timestamp_of_outcome": "0:07.5",
            "result": "missed",
            "shot_type": "Jump shot",
            "total_shots_made_so_far": 0,
            "total_shots_missed_so_far": "1"
        }));
        assert_eq!(legacy.timestamp_of_outcome.as_deref(), Some("0:07.5"));
        assert_eq!(legacy.total_shots_made_so_far, Some(0));
        assert_eq!(legacy.total_shots_missed_so_far, Some(1));
    }

    #[test]
    fn test_raw_shot_is_lenient() {
        let raw = RawShot::from_value(&json!({
            "time": 12,
            "result": true,
            "feedback": {"nested": "object"},
            "total_layups_made_so_far": -4
        }));
        assert_eq!(raw.time.as_deref(), Some("12"));
        assert_eq!(raw.result.as_deref(), Some("true"));
        assert!(raw.feedback.is_none());
        assert!(raw.total_layups_made_so_far.is_none());

        assert_eq!(RawShot::from_value(&json!("made")), RawShot::default());
        assert_eq!(RawShot::from_value(&json!(null)), RawShot::default());
    }

    #[test]
    fn test_shot_result_serde() {
        assert_eq!(serde_json::to_string(&ShotResult::Made).unwrap(), "\"made\"");
        let parsed: ShotResult = serde_json::from_str("\"missed\"").unwrap();
        assert_eq!(parsed, ShotResult::Missed);
        assert_eq!(ShotResult::Missed.label(), "Missed");
    }

    #[test]
    fn test_layup_detection_is_case_insensitive() {
        assert!(is_layup_type("Reverse LAYUP"));
        assert!(!is_layup_type("Three-pointer"));
    }
}
