//! Audio output — plays the synthesized speech file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use bhashalink::audio::AudioPlayer;
//!
//! let handle = AudioPlayer::new().play(Path::new("speech-abc123.mp3")).unwrap();
//! while !handle.is_finished() {
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! ```

pub mod playback;

pub use playback::{AudioPlayer, PlaybackError, PlaybackHandle};
