//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every section is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// GenerationParams
// ---------------------------------------------------------------------------

/// Decoding parameters forwarded to the model's `generate` routine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Upper bound on generated sequence length, in tokens.
    pub max_length: u32,
    /// Beam-search width.
    pub num_beams: u32,
    /// Stop beam search as soon as `num_beams` finished candidates exist.
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 512,
            num_beams: 10,
            early_stopping: true,
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted NLLB-200 inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Base URL of the inference API; the model path is appended as
    /// `{base_url}/models/{model}`.
    pub base_url: String,
    /// Model repository id.
    pub model: String,
    /// Access token. `None` falls back to the `HF_TOKEN` environment variable.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for a translation before timing out.
    pub timeout_secs: u64,
    /// Ask the endpoint to block until a cold model is loaded instead of
    /// answering 503.
    pub wait_for_model: bool,
    /// Beam-search settings.
    pub generation: GenerationParams,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.huggingface.co/hf-inference".into(),
            model: "facebook/nllb-200-distilled-600M".into(),
            api_key: None,
            timeout_secs: 60,
            wait_for_model: true,
            generation: GenerationParams::default(),
        }
    }
}

impl TranslationConfig {
    /// The configured key if non-empty, else `HF_TOKEN` from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("HF_TOKEN").ok().filter(|k| !k.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the Google Translate speech service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Whether speech is synthesized at all.
    pub enabled: bool,
    /// Top-level domain of the Google Translate host (`"com"`, `"co.in"` …).
    pub tld: String,
    /// Full host override, e.g. for a proxy. Takes precedence over `tld`.
    pub base_url: Option<String>,
    /// Request the slower speaking rate.
    pub slow: bool,
    /// Maximum seconds to wait for each chunk request.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tld: "com".into(),
            base_url: None,
            slow: false,
            timeout_secs: 15,
        }
    }
}

impl TtsConfig {
    /// Host the batchexecute endpoint lives on, without a trailing slash.
    pub fn host(&self) -> String {
        match &self.base_url {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://translate.google.{}", self.tld),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window appearance and behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Source language selected at startup, as a menu label.
    pub default_source: String,
    /// Target language selected at startup, as a menu label.
    pub default_target: String,
    /// Start playback as soon as speech is ready.
    pub autoplay: bool,
    /// Playback volume, 1.0 = unchanged.
    pub volume: f32,
    /// Initial window size `(width, height)` in logical pixels.
    pub window_size: (f32, f32),
    /// Font files tried as fallbacks for Indic scripts. Missing files are
    /// skipped; every one that loads is used.
    pub font_paths: Vec<String>,
}

fn default_font_paths() -> Vec<String> {
    [
        // Windows: one face covering every Indic script.
        r"C:\Windows\Fonts\Nirmala.ttf",
        // macOS
        "/System/Library/Fonts/Supplemental/DevanagariMT.ttc",
        "/System/Library/Fonts/Kohinoor.ttc",
        // Debian / Ubuntu (fonts-noto-core)
        "/usr/share/fonts/truetype/noto/NotoSansDevanagari-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansBengali-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansTamil-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansTelugu-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansGujarati-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansGurmukhi-Regular.ttf",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_source: "1. English".into(),
            default_target: "2. Hindi".into(),
            autoplay: false,
            volume: 1.0,
            window_size: (720.0, 560.0),
            font_paths: default_font_paths(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use bhashalink::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Translation endpoint settings.
    pub translation: TranslationConfig,
    /// Speech synthesis settings.
    pub tts: TtsConfig,
    /// UI settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
