//! Adaptive difficulty staircase.

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;
pub const STARTING_DIFFICULTY: u8 = 5;

/// One step up after a correct answer, one step down after a miss, clamped
/// to `MIN_DIFFICULTY..=MAX_DIFFICULTY`.
pub fn next_difficulty(current: u8, was_correct: bool) -> u8 {
    if was_correct {
        current.saturating_add(1).min(MAX_DIFFICULTY)
    } else {
        current.saturating_sub(1).max(MIN_DIFFICULTY)
    }
}

pub fn is_valid_difficulty(difficulty: u8) -> bool {
    (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty)
}
