//! Core `Translator` trait and the `NllbTranslator` HTTP implementation.
//!
//! `NllbTranslator` calls a hosted inference endpoint serving an NLLB-200
//! checkpoint. All connection details come from [`TranslationConfig`];
//! nothing is hardcoded.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{GenerationParams, TranslationConfig};
use crate::lang::LanguageInfo;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur while translating.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("translation endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The model is still being loaded on the endpoint.
    #[error("translation model is loading (ready in ~{estimated_secs:.0} s)")]
    ModelLoading { estimated_secs: f32 },

    /// The response body could not be parsed as expected JSON.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The endpoint returned no translation candidates.
    #[error("translation endpoint returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for text translation backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Translator>`).
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` into `target`.
    ///
    /// Empty or whitespace-only input yields `Ok(String::new())`.
    async fn translate(
        &self,
        text: &str,
        source: &LanguageInfo,
        target: &LanguageInfo,
    ) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TranslationCandidate {
    translation_text: String,
}

#[derive(Debug, Deserialize)]
struct EndpointError {
    error: String,
    #[serde(default)]
    estimated_time: Option<f32>,
}

/// Build the inference request body.
///
/// The target tag is what forces the decoder's first token, so it must be a
/// FLORES-200 code and not a speech tag.
fn request_body(
    text: &str,
    source: &LanguageInfo,
    target: &LanguageInfo,
    generation: &GenerationParams,
) -> serde_json::Value {
    serde_json::json!({
        "inputs": text,
        "parameters": {
            "src_lang":       source.model_code,
            "tgt_lang":       target.model_code,
            "max_length":     generation.max_length,
            "num_beams":      generation.num_beams,
            "early_stopping": generation.early_stopping
        }
    })
}

// ---------------------------------------------------------------------------
// NllbTranslator
// ---------------------------------------------------------------------------

/// Calls `POST {base_url}/models/{model}` on a hosted inference API.
///
/// The response is a JSON array of candidates; the first one's
/// `translation_text` is the result.
pub struct NllbTranslator {
    client: reqwest::Client,
    config: TranslationConfig,
    api_key: Option<String>,
}

impl NllbTranslator {
    /// Build an `NllbTranslator` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`. A default client is used if the builder fails.
    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key: config.resolved_api_key(),
            config: config.clone(),
        }
    }

    /// Full URL of the model endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Translator for NllbTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &LanguageInfo,
        target: &LanguageInfo,
    ) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let body = request_body(text, source, target, &self.config.generation);
        log::debug!(
            "translate: {} -> {} ({} chars)",
            source.model_code,
            target.model_code,
            text.chars().count()
        );

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        if self.config.wait_for_model {
            req = req.header("x-wait-for-model", "true");
        }

        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let parsed = serde_json::from_slice::<EndpointError>(&bytes).ok();
            return Err(match parsed {
                Some(EndpointError {
                    estimated_time: Some(estimated_secs),
                    ..
                }) if status.as_u16() == 503 => TranslateError::ModelLoading { estimated_secs },
                Some(err) => TranslateError::Status {
                    status: status.as_u16(),
                    message: err.error,
                },
                None => TranslateError::Status {
                    status: status.as_u16(),
                    message: String::from_utf8_lossy(&bytes).trim().to_string(),
                },
            });
        }

        let candidates: Vec<TranslationCandidate> =
            serde_json::from_slice(&bytes).map_err(|e| TranslateError::Parse(e.to_string()))?;

        let translated = candidates
            .into_iter()
            .next()
            .ok_or(TranslateError::EmptyResponse)?
            .translation_text
            .trim()
            .to_string();

        Ok(translated)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{resolve_source, resolve_target};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(base_url: &str) -> TranslationConfig {
        TranslationConfig {
            base_url: base_url.into(),
            api_key: Some("hf_test".into()),
            timeout_secs: 5,
            ..TranslationConfig::default()
        }
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let t = NllbTranslator::from_config(&make_config("http://localhost:1234/"));
        assert_eq!(
            t.endpoint(),
            "http://localhost:1234/models/facebook/nllb-200-distilled-600M"
        );
    }

    #[test]
    fn body_uses_model_codes_and_generation_params() {
        let body = request_body(
            "hello",
            resolve_source("1. English"),
            resolve_target("3. Bengali"),
            &GenerationParams::default(),
        );
        assert_eq!(body["inputs"], "hello");
        assert_eq!(body["parameters"]["src_lang"], "eng_Latn");
        assert_eq!(body["parameters"]["tgt_lang"], "ben_Beng");
        assert_eq!(body["parameters"]["max_length"], 512);
        assert_eq!(body["parameters"]["num_beams"], 10);
        assert_eq!(body["parameters"]["early_stopping"], true);
    }

    #[test]
    fn translator_is_object_safe() {
        let t: Box<dyn Translator> =
            Box::new(NllbTranslator::from_config(&TranslationConfig::default()));
        drop(t);
    }

    #[tokio::test]
    async fn blank_input_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let t = NllbTranslator::from_config(&make_config(&server.uri()));
        let out = t
            .translate("   \n", resolve_source("1"), resolve_target("2"))
            .await
            .unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn slow_endpoint_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "translation_text": "late" }]))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let t = NllbTranslator::from_config(&TranslationConfig {
            timeout_secs: 1,
            ..make_config(&server.uri())
        });
        let err = t
            .translate("hello", resolve_source("1"), resolve_target("2"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Timeout), "got {err:?}");
    }

    #[tokio::test]
    async fn returns_first_candidate_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/facebook/nllb-200-distilled-600M"))
            .and(header("authorization", "Bearer hf_test"))
            .and(header("x-wait-for-model", "true"))
            .and(body_partial_json(serde_json::json!({
                "inputs": "How are you?",
                "parameters": { "src_lang": "eng_Latn", "tgt_lang": "hin_Deva" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "translation_text": " आप कैसे हैं? " }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let t = NllbTranslator::from_config(&make_config(&server.uri()));
        let out = t
            .translate(
                "How are you?",
                resolve_source("1. English"),
                resolve_target("2. Hindi"),
            )
            .await
            .unwrap();
        assert_eq!(out, "आप कैसे हैं?");
    }

    #[tokio::test]
    async fn empty_array_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let t = NllbTranslator::from_config(&make_config(&server.uri()));
        let err = t
            .translate("hi", resolve_source("1"), resolve_target("2"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::EmptyResponse));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let t = NllbTranslator::from_config(&make_config(&server.uri()));
        let err = t
            .translate("hi", resolve_source("1"), resolve_target("2"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Parse(_)));
    }

    #[tokio::test]
    async fn cold_model_maps_to_model_loading() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model facebook/nllb-200-distilled-600M is currently loading",
                "estimated_time": 20.5
            })))
            .mount(&server)
            .await;

        let t = NllbTranslator::from_config(&make_config(&server.uri()));
        let err = t
            .translate("hi", resolve_source("1"), resolve_target("2"))
            .await
            .unwrap_err();
        match err {
            TranslateError::ModelLoading { estimated_secs } => {
                assert!((estimated_secs - 20.5).abs() < f32::EPSILON)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_error_carries_endpoint_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "error": "Invalid credentials" })),
            )
            .mount(&server)
            .await;

        let t = NllbTranslator::from_config(&make_config(&server.uri()));
        let err = t
            .translate("hi", resolve_source("1"), resolve_target("2"))
            .await
            .unwrap_err();
        match err {
            TranslateError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
