use serde::{Deserialize, Serialize};

pub mod result;
pub mod session;

pub use result::{RoundResult, TestResult};
pub use session::{PerformanceLevel, RoundRow, SessionSummary, TestSession};

/// One presentation-and-answer cycle while a test is running.
///
/// `user_answer` stays empty until the subject submits; the engine writes it
/// exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub round_number: u32,
    pub difficulty: u8,
    pub triplet: String,
    pub user_answer: String,
}

impl Round {
    pub fn new(round_number: u32, difficulty: u8, triplet: String) -> Self {
        Self {
            round_number,
            difficulty,
            triplet,
            user_answer: String::new(),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.triplet == self.user_answer
    }

    pub fn points_awarded(&self) -> u32 {
        if self.is_correct() {
            self.difficulty as u32
        } else {
            0
        }
    }

    pub fn to_round_result(&self) -> RoundResult {
        RoundResult {
            difficulty: self.difficulty,
            triplet_played: self.triplet.clone(),
            triplet_answered: self.user_answer.clone(),
        }
    }
}

/// Observable state of a hearing test, published on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestState {
    Idle,
    Countdown { seconds_remaining: u32 },
    PlayingAudio,
    WaitingForInput,
    ProcessingAnswer,
    UploadingResults,
    Completed { score: u32 },
    Error { message: String },
}

impl TestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TestState::Completed { .. } | TestState::Error { .. })
    }
}

/// Figures shown to the subject once a test completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSummary {
    pub correct_answers: u32,
    pub total_rounds: u32,
    pub average_difficulty: f64,
    pub total_points: u32,
}

/// Sum of points over `rounds`.
pub fn total_score<'a>(rounds: impl IntoIterator<Item = &'a Round>) -> u32 {
    rounds.into_iter().map(Round::points_awarded).sum()
}

/// Mean difficulty over the correctly answered rounds, 0.0 when none.
pub fn average_correct_difficulty(pairs: impl IntoIterator<Item = (bool, u8)>) -> f64 {
    let (count, sum) = pairs
        .into_iter()
        .filter(|(correct, _)| *correct)
        .fold((0u32, 0u32), |(count, sum), (_, difficulty)| {
            (count + 1, sum + difficulty as u32)
        });

    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
