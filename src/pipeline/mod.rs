//! Pipeline orchestrator module for BhashaLink.
//!
//! This module wires translation and speech synthesis together and exposes
//! the shared state that the UI reads every frame.
//!
//! # Architecture
//!
//! ```text
//! UI "Translate & Speak"
//!        │ PipelineCommand (mpsc)
//!        ▼
//! PipelineOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ Translator::translate           → Translating
//!        ├─ SpeechSynthesizer::synthesize   → Synthesizing  (non-empty text only)
//!        └─ spawn_blocking(save_to_temp_mp3) → Result
//!
//! SharedState (Arc<Mutex<AppState>>) ←─── read by egui update() each frame
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{
    PipelineCommand, PipelineError, PipelineOrchestrator, TranslationOutcome, TranslationRequest,
};
pub use state::{new_shared_state, AppState, PipelineState, SharedState};
