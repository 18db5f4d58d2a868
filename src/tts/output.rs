//! Persisting synthesized speech to disk.
//!
//! The UI plays audio from a file path, so every synthesis result is written
//! to a uniquely named `.mp3` under the speech directory and kept there.
//! [`remove_stale`] clears files left by previous sessions.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::engine::TtsError;

const FILE_PREFIX: &str = "speech-";
const FILE_SUFFIX: &str = ".mp3";

/// Write `audio` to a new `speech-*.mp3` file in `dir` and return its path.
///
/// Creates `dir` if needed. The file outlives the returned handle.
pub fn save_to_temp_mp3(dir: &Path, audio: &[u8]) -> Result<PathBuf, TtsError> {
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::Builder::new()
        .prefix(FILE_PREFIX)
        .suffix(FILE_SUFFIX)
        .tempfile_in(dir)?;
    file.write_all(audio)?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| TtsError::from(e.error))?;
    Ok(path)
}

/// Delete `speech-*.mp3` files in `dir`. Returns how many were removed.
///
/// A missing directory counts as nothing to remove.
pub fn remove_stale(dir: &Path) -> std::io::Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        let is_speech = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(FILE_SUFFIX));
        if is_speech && path.is_file() {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
