use std::collections::HashSet;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::GeneratorError;

pub const MAX_ATTEMPTS: usize = 1000;

/// Source of the digit triplets presented each round.
pub trait TripletGenerator: Send + Sync {
    fn generate(
        &self,
        previous: Option<&str>,
        used: &HashSet<String>,
    ) -> Result<String, GeneratorError>;
}

/// Rejection sampler over uniform digits 1-9.
///
/// Digits may repeat inside a triplet ("112" is a valid draw); only the
/// session-wide uniqueness and the position-wise clash with the previous
/// triplet are enforced.
pub struct RandomTripletGenerator {
    rng: Mutex<StdRng>,
    max_attempts: usize,
}

impl RandomTripletGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            max_attempts: MAX_ATTEMPTS,
        }
    }

    fn draw_candidate(rng: &mut StdRng) -> String {
        (0..3)
            .map(|_| char::from(b'0' + rng.random_range(1..=9u8)))
            .collect()
    }
}

impl Default for RandomTripletGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TripletGenerator for RandomTripletGenerator {
    fn generate(
        &self,
        previous: Option<&str>,
        used: &HashSet<String>,
    ) -> Result<String, GeneratorError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        for _ in 0..self.max_attempts {
            let candidate = Self::draw_candidate(&mut rng);

            if used.contains(&candidate) {
                continue;
            }

            if let Some(previous) = previous {
                if shares_position(&candidate, previous) {
                    continue;
                }
            }

            return Ok(candidate);
        }

        tracing::warn!(
            "Triplet generation gave up after {} attempts ({} used)",
            self.max_attempts,
            used.len()
        );
        Err(GeneratorError::MaxAttemptsExceeded)
    }
}

/// True when the two triplets hold the same digit at any position.
pub fn shares_position(candidate: &str, previous: &str) -> bool {
    candidate
        .bytes()
        .zip(previous.bytes())
        .any(|(c, p)| c == p)
}

/// Three characters, each a digit 1-9.
pub fn is_valid_triplet(triplet: &str) -> bool {
    triplet.len() == 3 && triplet.bytes().all(|b| (b'1'..=b'9').contains(&b))
}
