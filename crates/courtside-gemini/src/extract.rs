//! Shot extraction from model response text.
//!
//! The model is asked for JSON but does not always comply. Extraction tries,
//! in order:
//! 1. the whole text as JSON, after stripping a surrounding code fence
//! 2. the first balanced `{...}` span in the text
//! 3. prose heuristics with evenly spaced synthetic timestamps
//!
//! Finding nothing is a normal outcome ([`ResponseShots::NoShotsDetected`]),
//! not an error.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use courtside_models::{format_timestamp, normalize_shots, RawShot, Shot};

/// Longest feedback kept from prose extraction.
const MAX_HEURISTIC_FEEDBACK_CHARS: usize = 200;

/// First synthetic timestamp and spacing for prose extraction, in seconds.
const SYNTHETIC_START_SECS: usize = 30;
const SYNTHETIC_SPACING_SECS: usize = 5;

/// How the shots were recovered from the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// The response (or its fenced body) was JSON
    Json,
    /// JSON found inside surrounding prose
    EmbeddedJson,
    /// Approximated from prose; timestamps are synthetic
    Heuristic,
}

/// Raw records recovered from a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedShots {
    pub raw: Vec<RawShot>,
    pub method: ExtractionMethod,
}

/// Normalized result of reading a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShots {
    Detected {
        shots: Vec<Shot>,
        method: ExtractionMethod,
    },
    NoShotsDetected,
}

/// Read a response into normalized shots.
pub fn shots_from_response(text: &str) -> ResponseShots {
    match extract_shots(text) {
        Some(extracted) if !extracted.raw.is_empty() => {
            info!(
                shots = extracted.raw.len(),
                method = ?extracted.method,
                "Extracted shots from response"
            );
            ResponseShots::Detected {
                shots: normalize_shots(&extracted.raw),
                method: extracted.method,
            }
        }
        _ => {
            info!("No shots detected in response");
            ResponseShots::NoShotsDetected
        }
    }
}

/// Recover raw shot records from response text.
///
/// Returns `None` when no method finds any shot. Valid JSON with an empty
/// shot list returns an empty record list without trying the heuristics.
pub fn extract_shots(text: &str) -> Option<ExtractedShots> {
    let body = strip_code_fence(text);

    if let Some(entries) = parse_shot_json(body) {
        return Some(ExtractedShots {
            raw: entries.iter().map(RawShot::from_value).collect(),
            method: ExtractionMethod::Json,
        });
    }

    if let Some(entries) = first_balanced_object(body).and_then(parse_shot_json) {
        debug!("Parsed shots from JSON embedded in prose");
        return Some(ExtractedShots {
            raw: entries.iter().map(RawShot::from_value).collect(),
            method: ExtractionMethod::EmbeddedJson,
        });
    }

    warn!("Response is not JSON, falling back to prose extraction");
    let raw = extract_from_prose(body);
    if raw.is_empty() {
        None
    } else {
        Some(ExtractedShots {
            raw,
            method: ExtractionMethod::Heuristic,
        })
    }
}

/// Strip a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the info string ("json", "JSON", ...) up to the end of the line
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse text as a shot list: `{"shots": [...]}`, a bare array, or a single
/// shot object.
fn parse_shot_json(text: &str) -> Option<Vec<Value>> {
    let value: Value = serde_json::from_str(text).ok()?;
    match value {
        Value::Array(entries) => Some(entries),
        Value::Object(mut map) => match map.remove("shots") {
            Some(Value::Array(entries)) => Some(entries),
            Some(_) => None,
            None if looks_like_shot(&map) => Some(vec![Value::Object(map)]),
            None => None,
        },
        _ => None,
    }
}

fn looks_like_shot(map: &serde_json::Map<String, Value>) -> bool {
    ["time", "timestamp_of_outcome", "outcome", "result"]
        .iter()
        .any(|key| map.contains_key(*key))
}

/// Find the first balanced `{...}` span, ignoring braces inside strings.
pub fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

fn shot_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(MISSED|MADE)\s+[-–]\s+([^\x22\n]+)").expect("valid shot marker regex")
    })
}

fn outcome_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(made|makes?|missed|miss(es)?|scored?|scores)\b")
            .expect("valid outcome word regex")
    })
}

fn synthetic_time(index: usize) -> String {
    format_timestamp((SYNTHETIC_START_SECS + index * SYNTHETIC_SPACING_SECS) as f64)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Prose extraction.
///
/// `MADE - Layup` style markers come first, with the text up to the next
/// marker as feedback. Without markers, each sentence that mentions an
/// outcome becomes one shot.
fn extract_from_prose(text: &str) -> Vec<RawShot> {
    let markers: Vec<_> = shot_marker_re().captures_iter(text).collect();

    if !markers.is_empty() {
        return markers
            .iter()
            .enumerate()
            .map(|(index, caps)| {
                let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
                let next = markers
                    .get(index + 1)
                    .and_then(|c| c.get(0))
                    .map(|m| m.start())
                    .unwrap_or(text.len());
                let feedback = text.get(whole..next).unwrap_or("").trim();
                let outcome = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

                RawShot {
                    time: Some(synthetic_time(index)),
                    result: Some(if outcome == "MISSED" { "missed" } else { "made" }.to_string()),
                    shot_type: caps.get(2).map(|m| m.as_str().trim().to_string()),
                    feedback: Some(truncate_chars(feedback, MAX_HEURISTIC_FEEDBACK_CHARS)),
                    ..RawShot::default()
                }
            })
            .collect();
    }

    text.split(|c| matches!(c, '.' | '!' | '?' | '\n'))
        .map(str::trim)
        .filter(|sentence| outcome_word_re().is_match(sentence))
        .enumerate()
        .map(|(index, sentence)| {
            let lower = sentence.to_lowercase();
            let result = if lower.contains("miss") { "missed" } else { "made" };
            RawShot {
                time: Some(synthetic_time(index)),
                result: Some(result.to_string()),
                feedback: Some(truncate_chars(sentence, MAX_HEURISTIC_FEEDBACK_CHARS)),
                ..RawShot::default()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_models::ShotResult;

    #[test]
    fn test_plain_json() {
        let text = r#"{"shots":[{"time":"00:05","outcome":"make","feedback":"Good form"}]}"#;
        let extracted = extract_shots(text).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::Json);
        assert_eq!(extracted.raw.len(), 1);
        assert_eq!(extracted.raw[0].time.as_deref(), Some("00:05"));
    }

    #[test]
    fn test_fenced_json() {
        let text = "```json\n{\"shots\":[{\"time\":\"00:05\",\"outcome\":\"miss\"}]}\n```";
        let extracted = extract_shots(text).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::Json);
        assert_eq!(extracted.raw[0].outcome.as_deref(), Some("miss"));

        let text = "```\n[{\"time\":\"00:05\"}]\n```";
        assert_eq!(extract_shots(text).unwrap().method, ExtractionMethod::Json);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```JSON\n{}```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```json {}```"), "{}");
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let text = r#"Here is the analysis you asked for:
{"shots": [{"time": "00:12", "outcome": "make", "feedback": "Nice {arc} on that one"}]}
Let me know if you want more detail."#;
        let extracted = extract_shots(text).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::EmbeddedJson);
        assert_eq!(extracted.raw[0].feedback.as_deref(), Some("Nice {arc} on that one"));
    }

    #[test]
    fn test_balanced_object_ignores_string_braces() {
        let text = r#"noise {"a": "}", "b": {"c": "\"{"}} trailing }"#;
        assert_eq!(
            first_balanced_object(text),
            Some(r#"{"a": "}", "b": {"c": "\"{"}}"#)
        );
        assert_eq!(first_balanced_object("no braces"), None);
        assert_eq!(first_balanced_object("{ unterminated"), None);
    }

    #[test]
    fn test_empty_json_list_is_no_shots() {
        assert_eq!(shots_from_response(r#"{"shots": []}"#), ResponseShots::NoShotsDetected);
    }

    #[test]
    fn test_single_shot_object() {
        let extracted = extract_shots(r#"{"time": "0:07.5", "result": "missed"}"#).unwrap();
        assert_eq!(extracted.raw.len(), 1);
    }

    #[test]
    fn test_marker_prose() {
        let text = "Shot breakdown:\nMADE - Layup\nGreat finish off the glass.\nMISSED – Three-pointer\nYou faded away, stay square.";
        let extracted = extract_shots(text).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::Heuristic);
        assert_eq!(extracted.raw.len(), 2);
        assert_eq!(extracted.raw[0].result.as_deref(), Some("made"));
        assert_eq!(extracted.raw[0].shot_type.as_deref(), Some("Layup"));
        assert_eq!(extracted.raw[0].feedback.as_deref(), Some("Great finish off the glass."));
        assert_eq!(extracted.raw[0].time.as_deref(), Some("0:30.0"));
        assert_eq!(extracted.raw[1].result.as_deref(), Some("missed"));
        assert_eq!(extracted.raw[1].time.as_deref(), Some("0:35.0"));
    }

    #[test]
    fn test_lowercase_outcome_is_not_a_marker() {
        let text = "He made - despite the fade - a tough one. Then he missed badly.";
        let extracted = extract_shots(text).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::Heuristic);
        assert_eq!(extracted.raw.len(), 2);
        assert!(extracted.raw.iter().all(|r| r.shot_type.is_none()));
        assert_eq!(extracted.raw[1].result.as_deref(), Some("missed"));
    }

    #[test]
    fn test_synthetic_times_roll_over_minutes() {
        assert_eq!(synthetic_time(0), "0:30.0");
        assert_eq!(synthetic_time(6), "1:00.0");
        assert_eq!(courtside_models::parse_timestamp(&synthetic_time(6)).unwrap(), 60.0);
    }

    #[test]
    fn test_marker_feedback_truncated() {
        let long = "x".repeat(500);
        let text = format!("MADE - Jump shot\n{}", long);
        let extracted = extract_shots(&text).unwrap();
        assert_eq!(
            extracted.raw[0].feedback.as_ref().map(|f| f.chars().count()),
            Some(MAX_HEURISTIC_FEEDBACK_CHARS)
        );
    }

    #[test]
    fn test_plain_prose_missed_shot() {
        let response = shots_from_response("The player missed the shot because the elbow flared out");
        match response {
            ResponseShots::Detected { shots, method } => {
                assert_eq!(method, ExtractionMethod::Heuristic);
                assert_eq!(shots.len(), 1);
                assert_eq!(shots[0].result, ShotResult::Missed);
                assert_eq!(shots[0].timestamp_seconds, 30.0);
                assert_eq!(shots[0].missed_count_at_this_point, 1);
            }
            other => panic!("expected shots, got {:?}", other),
        }
    }

    #[test]
    fn test_prose_without_shots() {
        assert_eq!(
            shots_from_response("I could not see a basketball in this video."),
            ResponseShots::NoShotsDetected
        );
        assert_eq!(shots_from_response(""), ResponseShots::NoShotsDetected);
    }
}
