//! BhashaLink: translate a sentence between eight languages with NLLB-200
//! and hear the result through Google Translate text-to-speech.

pub mod app;
pub mod audio;
pub mod config;
pub mod lang;
pub mod pipeline;
pub mod translate;
pub mod tts;
