//! Speech playback via `rodio`.
//!
//! [`AudioPlayer::play`] decodes an MP3 file on the calling thread, then
//! hands it to a dedicated playback thread that owns the output stream
//! (`rodio::OutputStream` is not `Send`). The returned [`PlaybackHandle`]
//! is a RAII guard; dropping it stops playback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

/// How often the playback thread checks for a stop request.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Errors that can occur while starting playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot open audio file: {0}")]
    Open(#[from] std::io::Error),

    #[error("cannot decode audio file: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("no output device available: {0}")]
    Device(String),

    #[error("failed to spawn playback thread: {0}")]
    Thread(String),
}

// ---------------------------------------------------------------------------
// PlaybackHandle
// ---------------------------------------------------------------------------

/// Handle to an in-progress playback.
pub struct PlaybackHandle {
    stop: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PlaybackHandle {
    /// Ask the playback thread to stop. Returns immediately.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// `true` once the audio has played out or playback was stopped.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// ---------------------------------------------------------------------------
// AudioPlayer
// ---------------------------------------------------------------------------

/// Plays synthesized speech files on the default output device.
#[derive(Debug, Clone, Copy)]
pub struct AudioPlayer {
    volume: f32,
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

impl AudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style volume override (1.0 = unchanged).
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.max(0.0);
        self
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Start playing the file at `path`.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::Open`] / [`PlaybackError::Decode`] are reported before
    /// any device is touched. [`PlaybackError::Device`] is reported once the
    /// playback thread fails to open the output stream.
    pub fn play(&self, path: &Path) -> Result<PlaybackHandle, PlaybackError> {
        let file = File::open(path)?;
        let source = rodio::Decoder::new(BufReader::new(file))?;

        let stop = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), PlaybackError>>();

        let stop_thread = Arc::clone(&stop);
        let finished_thread = Arc::clone(&finished);
        let volume = self.volume;

        let thread = std::thread::Builder::new()
            .name("speech-playback".into())
            .spawn(move || {
                let (_stream, handle) = match rodio::OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let _ = ready_tx.send(Err(PlaybackError::Device(e.to_string())));
                        finished_thread.store(true, Ordering::Relaxed);
                        return;
                    }
                };
                let sink = match rodio::Sink::try_new(&handle) {
                    Ok(sink) => sink,
                    Err(e) => {
                        let _ = ready_tx.send(Err(PlaybackError::Device(e.to_string())));
                        finished_thread.store(true, Ordering::Relaxed);
                        return;
                    }
                };

                sink.set_volume(volume);
                sink.append(source);
                let _ = ready_tx.send(Ok(()));

                while !sink.empty() && !stop_thread.load(Ordering::Relaxed) {
                    std::thread::sleep(POLL_INTERVAL);
                }
                sink.stop();
                finished_thread.store(true, Ordering::Relaxed);
                log::debug!("playback: finished");
            })
            .map_err(|e| PlaybackError::Thread(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(PlaybackError::Thread("playback thread exited early".into()));
            }
        }

        Ok(PlaybackHandle {
            stop,
            finished,
            thread: Some(thread),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempdir().expect("temp dir");
        let err = AudioPlayer::new()
            .play(&dir.path().join("missing.mp3"))
            .err()
            .expect("should fail");
        assert!(matches!(err, PlaybackError::Open(_)));
    }

    #[test]
    fn non_audio_file_is_decode_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("speech-garbage.mp3");
        std::fs::write(&path, b"definitely not audio").expect("write");

        let err = AudioPlayer::new().play(&path).err().expect("should fail");
        assert!(matches!(err, PlaybackError::Decode(_)));
    }

    #[test]
    fn negative_volume_is_clamped() {
        let player = AudioPlayer::new().with_volume(-2.0);
        assert_eq!(player.volume(), 0.0);
    }

    #[test]
    fn handle_flags_start_cleared() {
        let handle = PlaybackHandle {
            stop: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
            thread: None,
        };
        assert!(!handle.is_finished());
        handle.stop();
        assert!(handle.stop.load(Ordering::Relaxed));
    }
}
