use serde::{Deserialize, Serialize};

/// Attempt and accuracy counts over a user's scoring history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSummary {
    pub total_answers: usize,
    pub correct_answers_count: usize,
}
