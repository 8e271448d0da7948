// Candidate ↔ posting matching.
// One implementation for every caller: handlers go through `MatchScorer`,
// never through inline scoring of their own.

pub mod experience;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod scorer;
pub mod skills;
pub mod track;

use serde::{Deserialize, Serialize};

/// Result of a single scored axis (experience or track).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMatch {
    pub matched: bool,
    pub score: u32,
}

impl AxisMatch {
    pub fn new(matched: bool, score: u32) -> Self {
        Self { matched, score }
    }

    pub fn none() -> Self {
        Self::new(false, 0)
    }
}
