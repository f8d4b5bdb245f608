use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{average_correct_difficulty, RoundResult, TestResult};

/// A completed, uploaded test as kept in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSession {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub score: u32,
    pub rounds: Vec<RoundResult>,
}

impl TestSession {
    pub fn from_result(result: &TestResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            score: result.score,
            rounds: result.rounds.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    NeedsPractice,
}

impl PerformanceLevel {
    pub fn from_accuracy(accuracy: u32) -> Self {
        if accuracy >= 80 {
            PerformanceLevel::Excellent
        } else if accuracy >= 60 {
            PerformanceLevel::Good
        } else {
            PerformanceLevel::NeedsPractice
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::NeedsPractice => "Practice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRow {
    pub round_number: u32,
    pub difficulty: u8,
    pub triplet_played: String,
    pub triplet_answered: String,
    pub correct: bool,
}

/// Statistics for one stored session, as rendered by the history screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub score: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    /// Integer percentage, truncated.
    pub accuracy: u32,
    pub average_difficulty: f64,
    pub performance_level: PerformanceLevel,
    pub rounds: Vec<RoundRow>,
}

impl SessionSummary {
    pub fn from_session(session: &TestSession) -> Self {
        let total = session.rounds.len() as u32;
        let correct_count = session.rounds.iter().filter(|r| r.is_correct()).count() as u32;
        let accuracy = if total == 0 {
            0
        } else {
            correct_count * 100 / total
        };

        let rounds = session
            .rounds
            .iter()
            .enumerate()
            .map(|(index, round)| RoundRow {
                round_number: index as u32 + 1,
                difficulty: round.difficulty,
                triplet_played: round.triplet_played.clone(),
                triplet_answered: round.triplet_answered.clone(),
                correct: round.is_correct(),
            })
            .collect();

        Self {
            id: session.id,
            date: session.date,
            score: session.score,
            correct_count,
            incorrect_count: total - correct_count,
            accuracy,
            average_difficulty: average_correct_difficulty(
                session.rounds.iter().map(|r| (r.is_correct(), r.difficulty)),
            ),
            performance_level: PerformanceLevel::from_accuracy(accuracy),
            rounds,
        }
    }
}
