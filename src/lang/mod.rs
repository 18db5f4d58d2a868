//! Language catalog.
//!
//! Maps a dropdown selection such as `"2. Hindi"` to the code triple that
//! drives both external calls: the NLLB-200 language tag, the speech-service
//! language tag, and the display name.

pub mod catalog;

pub use catalog::{
    find_by_key, find_by_label, is_supported_speech_code, menu_labels, parse_choice,
    resolve_source, resolve_target, speech_code_for, LanguageInfo, DEFAULT_SOURCE,
    DEFAULT_SPEECH_CODE, DEFAULT_TARGET, LANGUAGES,
};
