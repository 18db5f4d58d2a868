//! Core speech-synthesis trait and the Google Translate implementation.
//!
//! # Overview
//!
//! [`SpeechSynthesizer`] is the public interface used by the pipeline. It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn SpeechSynthesizer>`.
//!
//! [`GoogleTts`] speaks to the same `batchexecute` RPC the Google Translate
//! web page uses. Each chunk from [`split_text`] is one request; the MP3
//! fragments in the responses are concatenated in order.
//!
//! [`MockSynthesizer`] (available under `#[cfg(test)]`) returns canned bytes
//! and records every call so tests can assert what reached the service.

use std::sync::OnceLock;

use async_trait::async_trait;
use base64::Engine as _;
use regex::Regex;
use thiserror::Error;

use crate::config::TtsConfig;
use crate::lang::is_supported_speech_code;
use crate::tts::tokenizer::{split_text, MAX_CHUNK_CHARS};

/// RPC id of the speech endpoint.
const RPC_ID: &str = "jQ1olc";
const BATCHEXECUTE_PATH: &str = "/_/TranslateWebserverUi/data/batchexecute";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/120.0 Safari/537.36";

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// All errors that can arise from speech synthesis.
#[derive(Debug, Clone, Error)]
pub enum TtsError {
    /// Nothing speakable was left after pre-processing.
    #[error("no text to speak")]
    EmptyText,

    /// The speech service has no voice for this language tag.
    #[error("language not supported by the speech service: {0}")]
    UnsupportedLanguage(String),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// A chunk request did not complete within the configured timeout.
    #[error("speech request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("speech service returned {0}")]
    Status(u16),

    /// A response line carried the RPC id but no audio payload, or no line
    /// carried audio at all.
    #[error("no audio stream in response")]
    NoAudio,

    /// The audio payload was not valid base64.
    #[error("could not decode audio payload: {0}")]
    Decode(String),

    /// Writing the MP3 file failed.
    #[error("could not write speech file: {0}")]
    Io(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

impl From<std::io::Error> for TtsError {
    fn from(e: std::io::Error) -> Self {
        TtsError::Io(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async, thread-safe interface for text-to-speech backends.
///
/// # Contract
///
/// - Returns MP3 bytes.
/// - Returns `Err(TtsError::EmptyText)` when `text` holds nothing speakable.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` in the language identified by `speech_code`.
    async fn synthesize(&self, text: &str, speech_code: &str) -> Result<Vec<u8>, TtsError>;
}

// ---------------------------------------------------------------------------
// RPC packaging / response parsing
// ---------------------------------------------------------------------------

/// Build the `f.req` form value for one chunk.
///
/// The inner parameter list is itself JSON-encoded into a string, then
/// wrapped in the outer envelope.
pub fn package_rpc(text: &str, lang: &str, slow: bool) -> String {
    let speed = if slow {
        serde_json::Value::Bool(true)
    } else {
        serde_json::Value::Null
    };
    let parameter = serde_json::json!([text, lang, speed, "null"]).to_string();
    serde_json::json!([[[RPC_ID, parameter, null, "generic"]]]).to_string()
}

fn audio_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"jQ1olc","\[\\"(.*)\\"\]"#).expect("valid regex"))
}

/// Extract and decode every audio payload in a `batchexecute` response body.
pub fn extract_audio(body: &str) -> Result<Vec<u8>, TtsError> {
    let mut audio = Vec::new();

    for line in body.lines().filter(|l| l.contains(RPC_ID)) {
        let caps = audio_line().captures(line).ok_or(TtsError::NoAudio)?;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&caps[1])
            .map_err(|e| TtsError::Decode(e.to_string()))?;
        audio.extend_from_slice(&decoded);
    }

    Ok(audio)
}

// ---------------------------------------------------------------------------
// GoogleTts
// ---------------------------------------------------------------------------

/// Google Translate speech client.
pub struct GoogleTts {
    client: reqwest::Client,
    config: TtsConfig,
}

impl GoogleTts {
    /// Build a `GoogleTts` from application config.
    pub fn from_config(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Full URL of the RPC endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.config.host(), BATCHEXECUTE_PATH)
    }

    async fn synthesize_chunk(&self, chunk: &str, lang: &str) -> Result<Vec<u8>, TtsError> {
        let rpc = package_rpc(chunk, lang, self.config.slow);
        let referer = format!("{}/", self.config.host());

        let response = self
            .client
            .post(self.endpoint())
            .header(reqwest::header::REFERER, referer)
            .form(&[("f.req", rpc)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        extract_audio(&body)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, speech_code: &str) -> Result<Vec<u8>, TtsError> {
        if !is_supported_speech_code(speech_code) {
            return Err(TtsError::UnsupportedLanguage(speech_code.to_string()));
        }

        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        log::debug!("tts: {} chunk(s) for lang={speech_code}", chunks.len());

        let mut audio = Vec::new();
        for chunk in &chunks {
            let part = self.synthesize_chunk(chunk, speech_code).await?;
            audio.extend_from_slice(&part);
        }

        if audio.is_empty() {
            return Err(TtsError::NoAudio);
        }
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response and records the
/// `(text, speech_code)` of every call.
#[cfg(test)]
pub struct MockSynthesizer {
    response: Result<Vec<u8>, TtsError>,
    pub calls: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl MockSynthesizer {
    /// Create a mock that always returns `Ok(bytes)`.
    pub fn ok(bytes: &[u8]) -> Self {
        Self {
            response: Ok(bytes.to_vec()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: TtsError) -> Self {
        Self {
            response: Err(error),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, speech_code: &str) -> Result<Vec<u8>, TtsError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), speech_code.to_string()));
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
