//! Text-to-speech module.
//!
//! # Architecture
//!
//! ```text
//! translated text
//!        │
//!        ▼
//!  tokenizer::split_text      (≤100-char chunks, cut at punctuation/spaces)
//!        │
//!        ▼
//!  GoogleTts::synthesize      (one batchexecute RPC per chunk)
//!        │  MP3 fragments, concatenated
//!        ▼
//!  output::save_to_temp_mp3   (speech-*.mp3 in the speech dir)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use bhashalink::config::{AppConfig, AppPaths};
//! use bhashalink::tts::{save_to_temp_mp3, GoogleTts, SpeechSynthesizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let tts = GoogleTts::from_config(&config.tts);
//!     let mp3 = tts.synthesize("नमस्ते", "hi").await.unwrap();
//!     let path = save_to_temp_mp3(&AppPaths::new().speech_dir, &mp3).unwrap();
//!     println!("{}", path.display());
//! }
//! ```

pub mod engine;
pub mod output;
pub mod tokenizer;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{extract_audio, package_rpc, GoogleTts, SpeechSynthesizer, TtsError};
pub use output::{remove_stale, save_to_temp_mp3};
pub use tokenizer::{split_text, MAX_CHUNK_CHARS};

#[cfg(test)]
pub use engine::MockSynthesizer;
