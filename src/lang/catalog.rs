//! Language registry and menu-label resolution.
//!
//! [`LANGUAGES`] is the fixed set of languages offered in both dropdowns.
//! Each entry ties one menu key to the tag the translation model expects and
//! the tag the speech service expects.

// ---------------------------------------------------------------------------
// LanguageInfo
// ---------------------------------------------------------------------------

/// Static metadata for one selectable language.
#[derive(Debug, PartialEq, Eq)]
pub struct LanguageInfo {
    /// Menu key, the leading token of the dropdown label (e.g. `"2"`).
    pub key: &'static str,
    /// FLORES-200 tag understood by NLLB-200 (e.g. `"hin_Deva"`).
    pub model_code: &'static str,
    /// ISO-639-1 tag understood by the speech service (e.g. `"hi"`).
    pub speech_code: &'static str,
    /// Human-readable name shown in the dropdown.
    pub display_name: &'static str,
}

impl LanguageInfo {
    /// Dropdown label, `"<key>. <name>"`.
    pub fn menu_label(&self) -> String {
        format!("{}. {}", self.key, self.display_name)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// All selectable languages, in menu order.
pub const LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        key: "1",
        model_code: "eng_Latn",
        speech_code: "en",
        display_name: "English",
    },
    LanguageInfo {
        key: "2",
        model_code: "hin_Deva",
        speech_code: "hi",
        display_name: "Hindi",
    },
    LanguageInfo {
        key: "3",
        model_code: "ben_Beng",
        speech_code: "bn",
        display_name: "Bengali",
    },
    LanguageInfo {
        key: "4",
        model_code: "tam_Taml",
        speech_code: "ta",
        display_name: "Tamil",
    },
    LanguageInfo {
        key: "5",
        model_code: "tel_Telu",
        speech_code: "te",
        display_name: "Telugu",
    },
    LanguageInfo {
        key: "6",
        model_code: "mar_Deva",
        speech_code: "mr",
        display_name: "Marathi",
    },
    LanguageInfo {
        key: "7",
        model_code: "guj_Gujr",
        speech_code: "gu",
        display_name: "Gujarati",
    },
    LanguageInfo {
        key: "8",
        model_code: "pan_Guru",
        speech_code: "pa",
        display_name: "Punjabi",
    },
];

/// Fallback source language (English).
pub const DEFAULT_SOURCE: &LanguageInfo = &LANGUAGES[0];
/// Fallback target language (Hindi).
pub const DEFAULT_TARGET: &LanguageInfo = &LANGUAGES[1];
/// Speech tag used when a label cannot be resolved.
pub const DEFAULT_SPEECH_CODE: &str = "en";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Every dropdown label, in menu order.
pub fn menu_labels() -> Vec<String> {
    LANGUAGES.iter().map(LanguageInfo::menu_label).collect()
}

/// Extract the menu key from a dropdown label: everything before the first
/// `.`, trimmed. A label without a `.` is returned trimmed as a whole.
///
/// ```
/// use bhashalink::lang::parse_choice;
///
/// assert_eq!(parse_choice("2. Hindi"), "2");
/// assert_eq!(parse_choice(" 7 "), "7");
/// ```
pub fn parse_choice(label: &str) -> &str {
    label.split('.').next().unwrap_or_default().trim()
}

/// Find a [`LanguageInfo`] by its menu key.
pub fn find_by_key(key: &str) -> Option<&'static LanguageInfo> {
    LANGUAGES.iter().find(|l| l.key == key)
}

/// Find a [`LanguageInfo`] by its full dropdown label.
pub fn find_by_label(label: &str) -> Option<&'static LanguageInfo> {
    find_by_key(parse_choice(label))
}

/// Resolve a source-language label, falling back to English.
pub fn resolve_source(label: &str) -> &'static LanguageInfo {
    find_by_label(label).unwrap_or(DEFAULT_SOURCE)
}

/// Resolve a target-language label, falling back to Hindi.
pub fn resolve_target(label: &str) -> &'static LanguageInfo {
    find_by_label(label).unwrap_or(DEFAULT_TARGET)
}

/// Speech tag for a label, falling back to [`DEFAULT_SPEECH_CODE`].
pub fn speech_code_for(label: &str) -> &'static str {
    find_by_label(label)
        .map(|l| l.speech_code)
        .unwrap_or(DEFAULT_SPEECH_CODE)
}

/// Returns `true` when `code` is a speech tag used by the registry.
pub fn is_supported_speech_code(code: &str) -> bool {
    LANGUAGES.iter().any(|l| l.speech_code == code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
