use serde::{Deserialize, Serialize};

/// Wire and storage shape of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub difficulty: u8,
    pub triplet_played: String,
    pub triplet_answered: String,
}

impl RoundResult {
    pub fn is_correct(&self) -> bool {
        self.triplet_played == self.triplet_answered
    }

    pub fn points_awarded(&self) -> u32 {
        if self.is_correct() {
            self.difficulty as u32
        } else {
            0
        }
    }
}

/// Payload posted to the results collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub score: u32,
    pub rounds: Vec<RoundResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_snake_case_fields() {
        let result = TestResult {
            score: 5,
            rounds: vec![RoundResult {
                difficulty: 5,
                triplet_played: "123".to_string(),
                triplet_answered: "123".to_string(),
            }],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "score": 5,
                "rounds": [
                    { "difficulty": 5, "triplet_played": "123", "triplet_answered": "123" }
                ]
            })
        );
    }
}
