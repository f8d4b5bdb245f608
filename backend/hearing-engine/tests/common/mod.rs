#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use hearing_engine::{
    error::{AudioError, GeneratorError, NetworkError, StorageError},
    models::{TestResult, TestSession, TestState},
    services::{
        audio::AudioService,
        session_store::{MemorySessionStore, SessionStore},
        triplet_generator::TripletGenerator,
        upload_service::ResultUploader,
    },
    HearingTest, TestSettings,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Hands out triplets from a fixed list, failing once it runs dry.
pub struct ScriptedGenerator {
    triplets: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new(triplets: &[&str]) -> Self {
        Self {
            triplets: Mutex::new(triplets.iter().map(|t| t.to_string()).collect()),
        }
    }

    /// Ten triplets where no two neighbours share a digit position.
    pub fn ten_rounds() -> Self {
        Self::new(&[
            "123", "456", "789", "214", "365", "897", "132", "546", "978", "241",
        ])
    }
}

impl TripletGenerator for ScriptedGenerator {
    fn generate(
        &self,
        _previous: Option<&str>,
        _used: &HashSet<String>,
    ) -> Result<String, GeneratorError> {
        self.triplets
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(GeneratorError::MaxAttemptsExceeded)
    }
}

#[derive(Default)]
pub struct FakeAudio {
    pub played: Mutex<Vec<(String, u8)>>,
    pub stops: AtomicUsize,
    pub play_duration: Duration,
    pub fail_configure: bool,
    pub fail_play: bool,
}

impl FakeAudio {
    pub fn with_play_duration(play_duration: Duration) -> Self {
        Self {
            play_duration,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<(String, u8)> {
        self.played.lock().unwrap().clone()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioService for FakeAudio {
    fn configure_session(&self) -> Result<(), AudioError> {
        if self.fail_configure {
            return Err(AudioError::Session("device unavailable".to_string()));
        }
        Ok(())
    }

    async fn play_triplet(&self, triplet: &str, difficulty: u8) -> Result<(), AudioError> {
        if self.fail_play {
            return Err(AudioError::FileNotFound(format!("noise_{}.m4a", difficulty)));
        }
        tokio::time::sleep(self.play_duration).await;
        self.played
            .lock()
            .unwrap()
            .push((triplet.to_string(), difficulty));
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Replays queued outcomes, then succeeds.
#[derive(Default)]
pub struct FakeUploader {
    outcomes: Mutex<VecDeque<Result<(), NetworkError>>>,
    pub uploaded: Mutex<Vec<TestResult>>,
    pub delay: Duration,
}

impl FakeUploader {
    pub fn failing_with(error: NetworkError) -> Self {
        let uploader = Self::default();
        uploader.outcomes.lock().unwrap().push_back(Err(error));
        uploader
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn uploaded(&self) -> Vec<TestResult> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultUploader for FakeUploader {
    async fn upload(&self, result: &TestResult) -> Result<(), NetworkError> {
        tokio::time::sleep(self.delay).await;
        self.uploaded.lock().unwrap().push(result.clone());
        self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

pub struct FailingStore;

#[async_trait]
impl SessionStore for FailingStore {
    async fn save(&self, _session: &TestSession) -> Result<(), StorageError> {
        Err(StorageError::SaveFailed)
    }

    async fn fetch_all(&self) -> Result<Vec<TestSession>, StorageError> {
        Err(StorageError::FetchFailed)
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<(), StorageError> {
        Err(StorageError::DeleteFailed)
    }
}

pub struct Harness {
    pub test: HearingTest,
    pub audio: Arc<FakeAudio>,
    pub uploader: Arc<FakeUploader>,
    pub store: Arc<MemorySessionStore>,
}

impl Harness {
    pub fn new(generator: ScriptedGenerator, audio: FakeAudio, uploader: FakeUploader) -> Self {
        init_tracing();
        let audio = Arc::new(audio);
        let uploader = Arc::new(uploader);
        let store = Arc::new(MemorySessionStore::new());
        let test = HearingTest::new(
            Arc::new(generator),
            audio.clone(),
            uploader.clone(),
            Some(store.clone()),
            TestSettings::default(),
        );
        Self {
            test,
            audio,
            uploader,
            store,
        }
    }

    pub fn standard() -> Self {
        Self::new(
            ScriptedGenerator::ten_rounds(),
            FakeAudio::default(),
            FakeUploader::default(),
        )
    }

    /// The triplet played in the current round.
    pub fn current_triplet(&self) -> String {
        self.test
            .rounds()
            .last()
            .map(|r| r.triplet.clone())
            .unwrap_or_default()
    }

    pub fn type_answer(&self, answer: &str) {
        for c in answer.chars() {
            self.test.add_digit(c);
        }
    }

    pub async fn answer(&self, correct: bool) -> TestState {
        let triplet = self.current_triplet();
        let answer = if correct {
            triplet
        } else {
            wrong_answer(&triplet)
        };
        self.type_answer(&answer);
        self.test.submit_answer().await
    }
}

/// A valid answer that differs from `triplet` in every position.
pub fn wrong_answer(triplet: &str) -> String {
    triplet
        .chars()
        .map(|c| if c == '9' { '1' } else { (c as u8 + 1) as char })
        .collect()
}

pub fn drain(rx: &mut broadcast::Receiver<TestState>) -> Vec<TestState> {
    let mut states = Vec::new();
    while let Ok(state) = rx.try_recv() {
        states.push(state);
    }
    states
}
