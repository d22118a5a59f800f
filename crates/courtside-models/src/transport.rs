//! URL-safe shot list payloads passed between screens.
//!
//! A payload is the JSON shot list, percent-encoded. Decoding never fails:
//! a malformed payload is "no shots", and [`resolve_payload`] swaps in the
//! example feedback in that case.

use tracing::warn;

use crate::example::example_shots;
use crate::normalize::recount_shots;
use crate::shot::Shot;

/// Encode a shot list as a URL-safe payload.
pub fn encode_shots(shots: &[Shot]) -> String {
    // Serializing plain data structs cannot fail
    let json = serde_json::to_string(shots).unwrap_or_else(|_| "[]".to_string());
    urlencoding::encode(&json).into_owned()
}

/// Decode a payload produced by [`encode_shots`]. Malformed input yields no shots.
///
/// Shots are re-sorted and their counters recomputed; a payload carrying a
/// negative or non-finite timestamp is malformed.
pub fn decode_shots(payload: &str) -> Vec<Shot> {
    let json = match urlencoding::decode(payload) {
        Ok(json) => json,
        Err(e) => {
            warn!("Shot payload is not valid percent-encoding: {}", e);
            return Vec::new();
        }
    };

    let shots = match serde_json::from_str::<Vec<Shot>>(&json) {
        Ok(shots) => shots,
        Err(e) => {
            warn!("Shot payload is not a valid shot list: {}", e);
            return Vec::new();
        }
    };

    if let Some(bad) = shots
        .iter()
        .find(|s| !s.timestamp_seconds.is_finite() || s.timestamp_seconds < 0.0)
    {
        warn!(timestamp = bad.timestamp_seconds, "Shot payload has an invalid timestamp");
        return Vec::new();
    }

    recount_shots(shots)
}

/// Shots resolved from an optional payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedShots {
    pub shots: Vec<Shot>,
    /// True when the example feedback was substituted
    pub is_example: bool,
}

/// Decode a payload, falling back to example feedback when it is missing,
/// malformed, or empty.
pub fn resolve_payload(payload: Option<&str>) -> ResolvedShots {
    let shots = payload.map(decode_shots).unwrap_or_default();
    if shots.is_empty() {
        ResolvedShots {
            shots: example_shots(),
            is_example: true,
        }
    } else {
        ResolvedShots {
            shots,
            is_example: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shot::ShotResult;

    #[test]
    fn test_payload_is_url_safe() {
        let payload = encode_shots(&example_shots());
        assert!(!payload.contains(' '));
        assert!(!payload.contains('"'));
        assert!(!payload.contains('&'));
        assert_eq!(decode_shots(&payload), example_shots());
    }

    #[test]
    fn test_malformed_payload_is_no_shots() {
        assert!(decode_shots("%7B%22shots").is_empty());
        assert!(decode_shots("not json at all").is_empty());
        assert!(decode_shots("%FF%FE").is_empty());
        assert!(decode_shots("").is_empty());
    }

    fn shot_json(ts: f64, result: &str, made: u32) -> String {
        format!(
            r#"{{"timestamp_seconds":{ts},"result":"{result}","shot_type":"Jump shot","feedback":"","made_count_at_this_point":{made},"missed_count_at_this_point":0,"layups_made_at_this_point":0}}"#
        )
    }

    #[test]
    fn test_negative_timestamp_is_no_shots() {
        let json = format!("[{}]", shot_json(-5.0, "made", 7));
        assert!(decode_shots(&urlencoding::encode(&json)).is_empty());
        assert!(resolve_payload(Some(&urlencoding::encode(&json))).is_example);
    }

    #[test]
    fn test_decoded_shots_are_sorted_and_recounted() {
        let json = format!("[{},{}]", shot_json(9.0, "made", 7), shot_json(3.0, "missed", 7));
        let shots = decode_shots(&urlencoding::encode(&json));

        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].timestamp_seconds, 3.0);
        assert_eq!(shots[0].made_count_at_this_point, 0);
        assert_eq!(shots[0].missed_count_at_this_point, 1);
        assert_eq!(shots[1].made_count_at_this_point, 1);
        assert_eq!(shots[1].missed_count_at_this_point, 1);
    }

    #[test]
    fn test_resolve_payload_falls_back_to_examples() {
        let resolved = resolve_payload(None);
        assert!(resolved.is_example);
        assert_eq!(resolved.shots.len(), 3);

        let resolved = resolve_payload(Some("garbage"));
        assert!(resolved.is_example);

        let resolved = resolve_payload(Some(&encode_shots(&[])));
        assert!(resolved.is_example);
    }

    #[test]
    fn test_resolve_payload_keeps_real_shots() {
        let mut shots = example_shots();
        shots.truncate(1);
        let resolved = resolve_payload(Some(&encode_shots(&shots)));
        assert!(!resolved.is_example);
        assert_eq!(resolved.shots.len(), 1);
        assert_eq!(resolved.shots[0].result, ShotResult::Missed);
    }
}
