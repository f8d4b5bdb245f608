//! Timed presentation of a triplet over a noise bed.
//!
//! `AudioService` is what the test engine talks to. `SequencedAudioService`
//! implements it once on top of any `AudioBackend`, which only has to know
//! how to start and stop named clips.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::AudioError;
use crate::services::staircase::{is_valid_difficulty, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::services::triplet_generator::is_valid_triplet;

pub const CLIP_EXTENSION: &str = "m4a";

pub fn digit_clip(digit: char) -> String {
    format!("{}.{}", digit, CLIP_EXTENSION)
}

pub fn noise_clip(level: u8) -> String {
    format!("noise_{}.{}", level, CLIP_EXTENSION)
}

/// The 19 clip names a complete asset set must contain.
pub fn expected_clips() -> Vec<String> {
    ('1'..='9')
        .map(digit_clip)
        .chain((MIN_DIFFICULTY..=MAX_DIFFICULTY).map(noise_clip))
        .collect()
}

/// Names from `expected_clips` the backend cannot resolve.
pub fn missing_clips(backend: &dyn AudioBackend) -> Vec<String> {
    expected_clips()
        .into_iter()
        .filter(|name| !backend.has_clip(name))
        .collect()
}

/// Logs the outcome of an asset check and returns the missing names.
pub fn log_asset_validation(backend: &dyn AudioBackend) -> Vec<String> {
    let missing = missing_clips(backend);
    if missing.is_empty() {
        tracing::info!("All audio assets validated successfully");
    } else {
        tracing::warn!("Missing audio files: {}", missing.join(", "));
    }
    missing
}

/// Collaborator used by the test engine to present stimuli.
#[async_trait]
pub trait AudioService: Send + Sync {
    fn configure_session(&self) -> Result<(), AudioError>;

    /// Completes only after the whole sequence (noise, digits, tail) is over.
    async fn play_triplet(&self, triplet: &str, difficulty: u8) -> Result<(), AudioError>;

    /// Safe to call when nothing is playing.
    fn stop(&self);
}

/// Clip-level playback primitives.
///
/// `start_loop` and `play_clip` start playback and return immediately; the
/// sequencer owns all timing.
pub trait AudioBackend: Send + Sync {
    fn activate(&self) -> Result<(), AudioError> {
        Ok(())
    }

    fn has_clip(&self, name: &str) -> bool;

    fn start_loop(&self, name: &str, volume: f32) -> Result<(), AudioError>;

    fn play_clip(&self, name: &str, volume: f32) -> Result<(), AudioError>;

    fn stop_all(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTiming {
    /// Noise alone before the first digit.
    pub lead_in: Duration,
    /// Between consecutive digits.
    pub digit_gap: Duration,
    /// Noise after the last digit.
    pub noise_tail: Duration,
}

impl AudioTiming {
    pub fn from_unit(unit: Duration) -> Self {
        Self {
            lead_in: unit,
            digit_gap: unit,
            // 1.3 units
            noise_tail: unit * 13 / 10,
        }
    }
}

impl Default for AudioTiming {
    fn default() -> Self {
        Self::from_unit(Duration::from_secs(1))
    }
}

pub struct SequencedAudioService<B> {
    backend: B,
    timing: AudioTiming,
}

impl<B: AudioBackend> SequencedAudioService<B> {
    pub fn new(backend: B, timing: AudioTiming) -> Self {
        Self { backend, timing }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn require_clip(&self, name: String) -> Result<String, AudioError> {
        if self.backend.has_clip(&name) {
            Ok(name)
        } else {
            Err(AudioError::FileNotFound(name))
        }
    }

    async fn run_sequence(&self, triplet: &str, difficulty: u8) -> Result<(), AudioError> {
        let noise = self.require_clip(noise_clip(difficulty))?;
        self.backend.start_loop(&noise, 1.0)?;

        sleep(self.timing.lead_in).await;

        let digits: Vec<char> = triplet.chars().collect();
        for (index, digit) in digits.iter().enumerate() {
            let clip = self.require_clip(digit_clip(*digit))?;
            self.backend.play_clip(&clip, 1.0)?;

            if index + 1 < digits.len() {
                sleep(self.timing.digit_gap).await;
            }
        }

        sleep(self.timing.noise_tail).await;
        self.backend.stop_all();
        Ok(())
    }
}

#[async_trait]
impl<B: AudioBackend> AudioService for SequencedAudioService<B> {
    fn configure_session(&self) -> Result<(), AudioError> {
        self.backend.activate()
    }

    async fn play_triplet(&self, triplet: &str, difficulty: u8) -> Result<(), AudioError> {
        if !is_valid_difficulty(difficulty) {
            return Err(AudioError::InvalidDifficulty(difficulty));
        }
        if !is_valid_triplet(triplet) {
            return Err(AudioError::InvalidTriplet(triplet.to_string()));
        }

        self.stop();

        tracing::debug!("Playing triplet {} at difficulty {}", triplet, difficulty);
        let result = self.run_sequence(triplet, difficulty).await;
        if let Err(e) = &result {
            tracing::error!("Triplet playback failed: {}", e);
            self.backend.stop_all();
        }
        result
    }

    fn stop(&self) {
        self.backend.stop_all();
    }
}

/// Resolves clips as files under an asset directory and logs playback
/// instead of driving an output device.
pub struct LoggingBackend {
    root: PathBuf,
    active: AtomicBool,
}

impl LoggingBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active: AtomicBool::new(false),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl AudioBackend for LoggingBackend {
    fn activate(&self) -> Result<(), AudioError> {
        if !self.root.is_dir() {
            return Err(AudioError::Session(format!(
                "asset directory {} does not exist",
                self.root.display()
            )));
        }
        Ok(())
    }

    fn has_clip(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }

    fn start_loop(&self, name: &str, volume: f32) -> Result<(), AudioError> {
        self.active.store(true, Ordering::SeqCst);
        tracing::info!(clip = name, volume, "noise loop started");
        Ok(())
    }

    fn play_clip(&self, name: &str, volume: f32) -> Result<(), AudioError> {
        tracing::info!(clip = name, volume, "clip played");
        Ok(())
    }

    fn stop_all(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            tracing::info!("playback stopped");
        }
    }
}
