//! Gemini AI client for basketball shot analysis.
//!
//! The video is sent inline (base64) together with the coaching prompt.
//! The client returns the raw response text; [`crate::extract`] turns it
//! into shots.

use std::path::Path;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GeminiConfig;
use crate::error::{GeminiError, GeminiResult};
use crate::prompt::build_coaching_prompt;

/// Anything that can turn a video into model response text.
#[async_trait]
pub trait ShotAnalyzer: Send + Sync {
    /// Analyze the video at `path` and return the model's response text.
    async fn analyze_video(&self, path: &Path) -> GeminiResult<String>;
}

/// Gemini API client.
///
/// Constructed once from a [`GeminiConfig`] and shared read-only afterwards.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Guess the upload mime type from the file extension.
pub fn video_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("m4v") => "video/x-m4v",
        Some("3gp") => "video/3gpp",
        _ => "video/mp4",
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiError::config("Gemini API key is empty"));
        }
        if config.models.is_empty() {
            return Err(GeminiError::config("No Gemini models configured"));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GeminiError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Analyze an in-memory video.
    ///
    /// Models are tried in configured order; the last error is returned if
    /// every model fails.
    pub async fn analyze_bytes(&self, video: &[u8], mime_type: &str) -> GeminiResult<String> {
        let prompt = build_coaching_prompt();
        let data = BASE64.encode(video);
        debug!(
            bytes = video.len(),
            encoded = data.len(),
            mime_type,
            "Encoded video for upload"
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let mut last_error = None;

        for model in &self.config.models {
            info!("Attempting Gemini API with model: {}", model);
            match self.call_gemini_api(model, &request).await {
                Ok(text) => {
                    info!("Got shot analysis from {}", model);
                    return Ok(text);
                }
                Err(e) => {
                    warn!("Failed with model {}: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GeminiError::config("No Gemini models configured")))
    }

    /// Call Gemini API and return the concatenated candidate text.
    async fn call_gemini_api(&self, model: &str, request: &GeminiRequest) -> GeminiResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| GeminiError::request(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status { status, body });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::InvalidResponse(e.without_url().to_string()))?;

        let text: String = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl ShotAnalyzer for GeminiClient {
    async fn analyze_video(&self, path: &Path) -> GeminiResult<String> {
        let video = tokio::fs::read(path).await?;
        info!(
            path = %path.display(),
            bytes = video.len(),
            "Starting video analysis with Gemini"
        );
        self.analyze_bytes(&video, video_mime_type(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidate(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ], "role": "model" } }
            ]
        })
    }

    fn client_for(server: &MockServer, models: &[&str]) -> GeminiClient {
        let config = GeminiConfig::new("test-key")
            .with_base_url(server.uri())
            .with_models(models.iter().copied());
        GeminiClient::new(config).unwrap()
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(video_mime_type(Path::new("a.MOV")), "video/quicktime");
        assert_eq!(video_mime_type(Path::new("a.mp4")), "video/mp4");
        assert_eq!(video_mime_type(Path::new("no_extension")), "video/mp4");
    }

    #[test]
    fn test_request_shape() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: "p".to_string() },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "video/mp4".to_string(),
                            data: "AAAA".to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "p");
        assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["mimeType"], "video/mp4");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_rejects_empty_key() {
        assert!(matches!(
            GeminiClient::new(GeminiConfig::new("  ")),
            Err(GeminiError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_analyze_bytes_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("{\"shots\":[]}")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &["gemini-2.5-flash"]);
        let text = client.analyze_bytes(b"fake video", "video/mp4").await.unwrap();
        assert_eq!(text, "{\"shots\":[]}");
    }

    #[tokio::test]
    async fn test_falls_back_to_next_model_on_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/primary:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Resource has been exhausted (e.g. check quota)."))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/secondary:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("MADE - Layup")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &["primary", "secondary"]);
        let text = client.analyze_bytes(b"v", "video/mp4").await.unwrap();
        assert_eq!(text, "MADE - Layup");
    }

    #[tokio::test]
    async fn test_all_models_failing_returns_last_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = client_for(&server, &["a", "b"]);
        let err = client.analyze_bytes(b"v", "video/mp4").await.unwrap_err();
        assert!(err.is_quota_exceeded());
    }

    #[tokio::test]
    async fn test_empty_candidates_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = client_for(&server, &["a"]);
        let err = client.analyze_bytes(b"v", "video/mp4").await.unwrap_err();
        assert!(matches!(err, GeminiError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_empty_candidates_analyze_as_no_shots() {
        use crate::analysis::{run_analysis, Banner};
        use crate::config::AnalysisConfig;
        use crate::progress::SimulatedProgress;

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        tokio::fs::write(&video, b"fake video").await.unwrap();

        let client = client_for(&server, &["a"]);
        let config = AnalysisConfig::default();
        let progress = SimulatedProgress::new(&config);
        let (_tx, rx) = tokio::sync::watch::channel(false);

        let report = run_analysis(&client, &video, &config, &progress, rx).await.unwrap();
        assert!(!report.is_example());
        assert!(report.shots.is_empty());
        assert_eq!(report.banner, Some(Banner::NoShotsDetected));
        assert_eq!(progress.current(), 100);
    }

    #[tokio::test]
    async fn test_analyze_video_reads_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("ok")))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mov");
        std::fs::write(&video, b"not really a mov").unwrap();

        let client = client_for(&server, &["a"]);
        assert_eq!(client.analyze_video(&video).await.unwrap(), "ok");

        let missing = dir.path().join("missing.mp4");
        assert!(matches!(client.analyze_video(&missing).await, Err(GeminiError::Io(_))));
    }
}
