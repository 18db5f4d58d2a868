//! Pipeline orchestrator — drives the translate → speak flow.
//!
//! [`PipelineOrchestrator`] owns the [`SharedState`] and responds to
//! [`PipelineCommand`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! PipelineCommand::Translate(request)
//!   └─▶ resolve labels → translator.translate            [Translating]
//!         ├─ Err → Error
//!         └─ Ok(text)
//!               ├─ text empty / TTS off → Result (no audio)
//!               └─ tts.synthesize → spawn_blocking(save) [Synthesizing]
//!                     ├─ Ok  → Result (audio path)
//!                     └─ Err → warn, Result (no audio)
//!
//! PipelineCommand::Clear
//!   └─▶ Idle
//! ```
//!
//! Requests are handled one at a time in arrival order.

use std::path::PathBuf;
use std::sync::{Arc, MutexGuard};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::lang::{resolve_source, resolve_target, speech_code_for};
use crate::translate::{TranslateError, Translator};
use crate::tts::{save_to_temp_mp3, SpeechSynthesizer, TtsError};

use super::state::{AppState, PipelineState, SharedState};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// One "Translate & Speak" submission, as the UI holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// User text, verbatim.
    pub text: String,
    /// Source dropdown label, e.g. `"1. English"`.
    pub source_label: String,
    /// Target dropdown label, e.g. `"2. Hindi"`.
    pub target_label: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_label: impl Into<String>,
        target_label: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_label: source_label.into(),
            target_label: target_label.into(),
        }
    }
}

/// The three display values produced for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub original: String,
    pub translated: String,
    /// `None` when the translation was empty, TTS is disabled, or synthesis
    /// failed.
    pub audio_path: Option<PathBuf>,
}

/// Commands sent from the UI thread to the orchestrator.
#[derive(Debug, Clone)]
pub enum PipelineCommand {
    /// Translate, then speak the translation.
    Translate(TranslationRequest),
    /// Drop all outputs and return to idle.
    Clear,
}

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that can surface from a request.
///
/// Speech failures are not here: they degrade to "no audio".
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Translation failed: {0}")]
    Translate(#[from] TranslateError),
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Drives the complete translate-and-speak pipeline.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use bhashalink::config::{AppConfig, AppPaths};
/// use bhashalink::pipeline::{new_shared_state, PipelineOrchestrator};
/// use bhashalink::translate::NllbTranslator;
/// use bhashalink::tts::GoogleTts;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let orchestrator = PipelineOrchestrator::new(
///     new_shared_state(config.clone()),
///     Arc::new(NllbTranslator::from_config(&config.translation)),
///     Arc::new(GoogleTts::from_config(&config.tts)),
///     AppPaths::new().speech_dir,
/// );
///
/// let (command_tx, command_rx) = tokio::sync::mpsc::channel(16);
/// # drop(command_tx);
/// orchestrator.run(command_rx).await;
/// # }
/// ```
pub struct PipelineOrchestrator {
    state: SharedState,
    translator: Arc<dyn Translator>,
    tts: Arc<dyn SpeechSynthesizer>,
    speech_dir: PathBuf,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator.
    ///
    /// * `state`      — shared application state (also read by the UI).
    /// * `translator` — translation backend (e.g. `NllbTranslator`).
    /// * `tts`        — speech backend (e.g. `GoogleTts`).
    /// * `speech_dir` — where synthesized `.mp3` files are written.
    pub fn new(
        state: SharedState,
        translator: Arc<dyn Translator>,
        tts: Arc<dyn SpeechSynthesizer>,
        speech_dir: PathBuf,
    ) -> Self {
        Self {
            state,
            translator,
            tts,
            speech_dir,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `command_rx` is closed.
    pub async fn run(self, mut command_rx: mpsc::Receiver<PipelineCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                PipelineCommand::Translate(request) => self.handle_translate(request).await,
                PipelineCommand::Clear => {
                    log::debug!("pipeline: Clear → Idle");
                    self.lock_state().clear_outputs();
                }
            }
        }

        log::info!("pipeline: command channel closed, orchestrator shutting down");
    }

    async fn handle_translate(&self, request: TranslationRequest) {
        {
            let mut st = self.lock_state();
            st.error_message = None;
            st.audio_path = None;
        }

        match self.translate_and_speak(&request).await {
            Ok(outcome) => {
                let mut st = self.lock_state();
                st.pipeline = PipelineState::Result;
                st.original = Some(outcome.original);
                st.translated = Some(outcome.translated);
                st.audio_path = outcome.audio_path;
                st.result_generation += 1;
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    // -----------------------------------------------------------------------
    // Request handling
    // -----------------------------------------------------------------------

    /// Translate `request.text`, then synthesize speech for the translation.
    ///
    /// Speech is only requested for non-empty translations, in the language the
    /// target label names (English when the label is unknown). A speech
    /// failure is logged and yields `audio_path: None`.
    pub async fn translate_and_speak(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationOutcome, PipelineError> {
        let source = resolve_source(&request.source_label);
        let target = resolve_target(&request.target_label);

        self.set_pipeline(PipelineState::Translating);
        log::debug!(
            "pipeline: translating {} → {}",
            source.display_name,
            target.display_name
        );

        let translated = self
            .translator
            .translate(&request.text, source, target)
            .await?;

        let tts_enabled = self.lock_state().config.tts.enabled;
        let audio_path = if translated.trim().is_empty() {
            log::debug!("pipeline: empty translation — skipping speech");
            None
        } else if !tts_enabled {
            None
        } else {
            self.set_pipeline(PipelineState::Synthesizing);
            let speech_code = speech_code_for(&request.target_label);
            match self.speak(&translated, speech_code).await {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("pipeline: speech synthesis failed ({e}); continuing without audio");
                    None
                }
            }
        };

        Ok(TranslationOutcome {
            original: request.text.clone(),
            translated,
            audio_path,
        })
    }

    async fn speak(&self, text: &str, speech_code: &str) -> Result<PathBuf, TtsError> {
        let audio = self.tts.synthesize(text, speech_code).await?;

        let dir = self.speech_dir.clone();
        let path = tokio::task::spawn_blocking(move || save_to_temp_mp3(&dir, &audio))
            .await
            .map_err(|e| TtsError::Io(e.to_string()))??;

        log::debug!("pipeline: speech saved to {}", path.display());
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_pipeline(&self, state: PipelineState) {
        self.lock_state().pipeline = state;
    }

    fn set_error(&self, message: String) {
        log::error!("pipeline error: {message}");
        let mut st = self.lock_state();
        st.pipeline = PipelineState::Error;
        st.error_message = Some(message);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::lang::LanguageInfo;
    use crate::pipeline::state::new_shared_state;
    use crate::tts::MockSynthesizer;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Echoes a fixed translation and records the model codes it was given.
    struct FixedTranslator {
        output: String,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl FixedTranslator {
        fn new(output: &str) -> Self {
            Self {
                output: output.into(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Translator for FixedTranslator {
        async fn translate(
            &self,
            text: &str,
            source: &LanguageInfo,
            target: &LanguageInfo,
        ) -> Result<String, TranslateError> {
            self.seen
                .lock()
                .unwrap()
                .push((source.model_code.into(), target.model_code.into()));
            if text.trim().is_empty() {
                return Ok(String::new());
            }
            Ok(self.output.clone())
        }
    }

    struct FailTranslator;

    #[async_trait]
    impl Translator for FailTranslator {
        async fn translate(
            &self,
            _text: &str,
            _source: &LanguageInfo,
            _target: &LanguageInfo,
        ) -> Result<String, TranslateError> {
            Err(TranslateError::Timeout)
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn make_orchestrator(
        config: AppConfig,
        translator: Arc<dyn Translator>,
        tts: Arc<dyn SpeechSynthesizer>,
    ) -> (PipelineOrchestrator, SharedState, TempDir) {
        let dir = tempdir().expect("temp dir");
        let state = new_shared_state(config);
        let orc = PipelineOrchestrator::new(
            Arc::clone(&state),
            translator,
            tts,
            dir.path().join("speech"),
        );
        (orc, state, dir)
    }

    async fn run_commands(orc: PipelineOrchestrator, commands: Vec<PipelineCommand>) {
        let (tx, rx) = mpsc::channel(8);
        for command in commands {
            tx.send(command).await.unwrap();
        }
        drop(tx);
        orc.run(rx).await;
    }

    fn hindi_request(text: &str) -> PipelineCommand {
        PipelineCommand::Translate(TranslationRequest::new(text, "1. English", "2. Hindi"))
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn translate_reaches_result_with_audio() {
        let tts = Arc::new(MockSynthesizer::ok(b"ID3audio"));
        let (orc, state, dir) = make_orchestrator(
            AppConfig::default(),
            Arc::new(FixedTranslator::new("नमस्ते")),
            tts.clone(),
        );

        run_commands(orc, vec![hindi_request("Hello")]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Result);
        assert_eq!(st.original.as_deref(), Some("Hello"));
        assert_eq!(st.translated.as_deref(), Some("नमस्ते"));
        assert_eq!(st.result_generation, 1);

        let path = st.audio_path.as_ref().expect("audio path");
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read(path).unwrap(), b"ID3audio");

        let calls = tts.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("नमस्ते".to_string(), "hi".to_string())]);
    }

    #[tokio::test]
    async fn blank_input_never_reaches_tts() {
        let tts = Arc::new(MockSynthesizer::ok(b"ID3"));
        let (orc, state, _dir) = make_orchestrator(
            AppConfig::default(),
            Arc::new(FixedTranslator::new("unused")),
            tts.clone(),
        );

        run_commands(orc, vec![hindi_request("   ")]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Result);
        assert_eq!(st.translated.as_deref(), Some(""));
        assert!(st.audio_path.is_none());
        assert_eq!(tts.call_count(), 0);
    }

    #[tokio::test]
    async fn tts_failure_still_shows_translation() {
        let tts = Arc::new(MockSynthesizer::err(TtsError::Status(503)));
        let (orc, state, _dir) = make_orchestrator(
            AppConfig::default(),
            Arc::new(FixedTranslator::new("வணக்கம்")),
            tts.clone(),
        );

        run_commands(
            orc,
            vec![PipelineCommand::Translate(TranslationRequest::new(
                "Hello", "1. English", "4. Tamil",
            ))],
        )
        .await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Result);
        assert_eq!(st.translated.as_deref(), Some("வணக்கம்"));
        assert!(st.audio_path.is_none());
        assert!(st.error_message.is_none());
        assert_eq!(tts.call_count(), 1);
    }

    #[tokio::test]
    async fn translation_failure_sets_error_state() {
        let tts = Arc::new(MockSynthesizer::ok(b"ID3"));
        let (orc, state, _dir) =
            make_orchestrator(AppConfig::default(), Arc::new(FailTranslator), tts.clone());

        run_commands(orc, vec![hindi_request("Hello")]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Error);
        assert!(st
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("timed out")));
        assert_eq!(tts.call_count(), 0);
    }

    #[tokio::test]
    async fn disabled_tts_is_skipped() {
        let mut config = AppConfig::default();
        config.tts.enabled = false;
        let tts = Arc::new(MockSynthesizer::ok(b"ID3"));
        let (orc, state, _dir) =
            make_orchestrator(config, Arc::new(FixedTranslator::new("নমস্কার")), tts.clone());

        run_commands(orc, vec![hindi_request("Hello")]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Result);
        assert!(st.audio_path.is_none());
        assert_eq!(tts.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_labels_translate_to_hindi_but_speak_english() {
        let translator = Arc::new(FixedTranslator::new("ठीक"));
        let tts = Arc::new(MockSynthesizer::ok(b"ID3"));
        let (orc, _state, _dir) =
            make_orchestrator(AppConfig::default(), translator.clone(), tts.clone());

        run_commands(
            orc,
            vec![PipelineCommand::Translate(TranslationRequest::new(
                "ok", "", "99. Elvish",
            ))],
        )
        .await;

        let seen = translator.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[("eng_Latn".to_string(), "hin_Deva".to_string())]
        );
        assert_eq!(tts.calls.lock().unwrap()[0].1, "en");
    }

    #[tokio::test]
    async fn clear_returns_to_idle() {
        let (orc, state, _dir) = make_orchestrator(
            AppConfig::default(),
            Arc::new(FixedTranslator::new("नमस्ते")),
            Arc::new(MockSynthesizer::ok(b"ID3")),
        );

        run_commands(orc, vec![hindi_request("Hello"), PipelineCommand::Clear]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Idle);
        assert!(st.translated.is_none());
        assert!(st.audio_path.is_none());
    }

    #[tokio::test]
    async fn each_request_bumps_generation() {
        let (orc, state, _dir) = make_orchestrator(
            AppConfig::default(),
            Arc::new(FixedTranslator::new("नमस्ते")),
            Arc::new(MockSynthesizer::ok(b"ID3")),
        );

        run_commands(orc, vec![hindi_request("one"), hindi_request("two")]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.result_generation, 2);
        assert_eq!(st.original.as_deref(), Some("two"));
    }
}
