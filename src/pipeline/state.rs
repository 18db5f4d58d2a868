//! Pipeline state machine and shared application state.
//!
//! [`PipelineState`] drives the orchestrator's state machine. The UI reads
//! it via [`SharedState`] to decide what to render and whether the
//! "Translate & Speak" button is enabled.
//!
//! [`AppState`] is the single source of truth for everything the UI shows:
//! current phase, the three output values, config snapshot, and any error.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the translate-and-speak pipeline.
///
/// ```text
/// Idle ──Translate──▶ Translating
///                     ──text ready──▶ Synthesizing  (non-empty text, TTS on)
///                                     ──audio ready / TTS failed──▶ Result
///                     ──text ready──▶ Result         (empty text or TTS off)
///      Translating ──error──▶ Error
/// any ──Clear──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Nothing in flight.
    #[default]
    Idle,

    /// The translation request is in flight.
    Translating,

    /// Translation is done; speech is being synthesized.
    Synthesizing,

    /// Outputs are ready.
    Result,

    /// Translation failed. The next request starts over.
    Error,
}

impl PipelineState {
    /// Returns `true` while a request is in flight.
    ///
    /// ```
    /// use bhashalink::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Translating.is_busy());
    /// assert!(PipelineState::Synthesizing.is_busy());
    /// assert!(!PipelineState::Result.is_busy());
    /// assert!(!PipelineState::Error.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Translating | PipelineState::Synthesizing)
    }

    /// A short human-readable label suitable for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Ready",
            PipelineState::Translating => "Translating",
            PipelineState::Synthesizing => "Synthesizing speech",
            PipelineState::Result => "Done",
            PipelineState::Error => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state.
///
/// Held behind [`SharedState`]. The orchestrator mutates it; the egui update
/// loop reads it each frame.
pub struct AppState {
    /// Current phase.
    pub pipeline: PipelineState,

    /// The text the user submitted, echoed back.
    pub original: Option<String>,

    /// The translation. `Some("")` when the input was blank.
    pub translated: Option<String>,

    /// Path of the synthesized MP3, when speech was produced.
    pub audio_path: Option<PathBuf>,

    /// Error message to display when `pipeline == PipelineState::Error`.
    pub error_message: Option<String>,

    /// Bumped on every completed request so the UI can tell a fresh result
    /// (e.g. for autoplay) from one it has already seen.
    pub result_generation: u64,

    /// Current application configuration.
    ///
    /// The orchestrator reads `tts.enabled` on every request.
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            pipeline: PipelineState::Idle,
            original: None,
            translated: None,
            audio_path: None,
            error_message: None,
            result_generation: 0,
            config,
        }
    }

    /// Drop all outputs and return to `Idle`.
    pub fn clear_outputs(&mut self) {
        self.pipeline = PipelineState::Idle;
        self.original = None;
        self.translated = None;
        self.audio_path = None;
        self.error_message = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`].
pub fn new_shared_state(config: AppConfig) -> SharedState {
    Arc::new(Mutex::new(AppState::new(config)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_in_flight_states_are_busy() {
        assert!(!PipelineState::Idle.is_busy());
        assert!(PipelineState::Translating.is_busy());
        assert!(PipelineState::Synthesizing.is_busy());
        assert!(!PipelineState::Result.is_busy());
        assert!(!PipelineState::Error.is_busy());
    }

    #[test]
    fn labels() {
        assert_eq!(PipelineState::Idle.label(), "Ready");
        assert_eq!(PipelineState::Translating.label(), "Translating");
        assert_eq!(PipelineState::Synthesizing.label(), "Synthesizing speech");
        assert_eq!(PipelineState::Result.label(), "Done");
        assert_eq!(PipelineState::Error.label(), "Error");
    }

    #[test]
    fn default_pipeline_state_is_idle() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }

    #[test]
    fn clear_outputs_resets_everything_but_generation() {
        let mut state = AppState::default();
        state.pipeline = PipelineState::Result;
        state.original = Some("hi".into());
        state.translated = Some("नमस्ते".into());
        state.audio_path = Some(PathBuf::from("/tmp/speech-x.mp3"));
        state.result_generation = 3;

        state.clear_outputs();

        assert_eq!(state.pipeline, PipelineState::Idle);
        assert!(state.original.is_none());
        assert!(state.translated.is_none());
        assert!(state.audio_path.is_none());
        assert_eq!(state.result_generation, 3);
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state(AppConfig::default());
        let state2 = Arc::clone(&state);

        state.lock().unwrap().pipeline = PipelineState::Translating;
        assert_eq!(
            state2.lock().unwrap().pipeline,
            PipelineState::Translating
        );
    }
}
