//! Coaching prompt sent alongside the video.

use schemars::{schema_for, JsonSchema};
use serde::Serialize;

/// Outcome spelling requested from the model.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[allow(dead_code)]
enum RequestedOutcome {
    Make,
    Miss,
}

/// One shot as the prompt asks the model to describe it.
#[derive(Debug, Serialize, JsonSchema)]
#[allow(dead_code)]
struct RequestedShot {
    /// When the outcome is visible, "mm:ss"
    time: String,
    outcome: RequestedOutcome,
    /// "Jump shot", "Layup", "Three-pointer", ...
    shot_type: String,
    /// Specific, actionable coaching feedback on form
    feedback: String,
}

/// Response envelope requested from the model.
#[derive(Debug, Serialize, JsonSchema)]
#[allow(dead_code)]
struct RequestedResponse {
    shots: Vec<RequestedShot>,
}

/// JSON schema of the requested response, pretty-printed.
pub fn response_schema() -> String {
    let schema = schema_for!(RequestedResponse);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Build the shooting-form coaching prompt.
pub fn build_coaching_prompt() -> String {
    let schema = response_schema();
    format!(
        r#"You are a professional basketball shooting coach. Watch this video and find every shot the player attempts.
A made shot is not automatically good form: be fair but critical.

For each shot, comment on:
1. Elbow alignment and extension
2. Follow-through
3. Balance and body positioning
4. Release point consistency
5. Arc and trajectory

IMPORTANT: You must strictly follow this output format.
Return ONLY a single JSON object matching this JSON schema:
{schema}

Example:
{{
  "shots": [
    {{ "time": "00:07", "outcome": "miss", "shot_type": "Jump shot", "feedback": "Get your elbow under the ball and extend fully." }}
  ]
}}

Additional instructions:
- Return ONLY the JSON object and nothing else.
- "time" is when the outcome (make or miss) is visible, in "mm:ss" format.
- "outcome" is exactly "make" or "miss".
- List shots in the order they happen.
- If there are no shots in the video, return {{ "shots": [] }}.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_shot_fields() {
        let schema = response_schema();
        for field in ["shots", "time", "outcome", "shot_type", "feedback", "make", "miss"] {
            assert!(schema.contains(field), "schema missing {}", field);
        }
    }

    #[test]
    fn test_prompt_embeds_schema() {
        let prompt = build_coaching_prompt();
        assert!(prompt.contains("\"shots\""));
        assert!(prompt.contains("mm:ss"));
        assert!(prompt.contains("Return ONLY"));
    }
}
