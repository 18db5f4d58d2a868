//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\bhashalink\
//!   macOS:   ~/Library/Application Support/bhashalink/
//!   Linux:   ~/.config/bhashalink/
//!
//! Cache dir (synthesized speech):
//!   Windows: %LOCALAPPDATA%\bhashalink\speech\
//!   macOS:   ~/Library/Caches/bhashalink/speech/
//!   Linux:   ~/.cache/bhashalink/speech/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory that receives the synthesized `.mp3` files.
    pub speech_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "bhashalink";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the system temp directory if the platform cannot provide
    /// a standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let speech_dir = cache_dir.join("speech");

        Self {
            config_dir,
            settings_file,
            speech_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
