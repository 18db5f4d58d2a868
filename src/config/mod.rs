//! Configuration module for BhashaLink.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the translation
//! endpoint, the TTS service and the UI, `AppPaths` for cross-platform
//! directories, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, GenerationParams, TranslationConfig, TtsConfig, UiConfig};
