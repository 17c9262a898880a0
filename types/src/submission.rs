use serde::{Deserialize, Serialize};

/// Outcome of scoring one submitted choice. Always reports the canonical
/// correct answer so clients can show it whether or not the player got it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub answer_status: bool,
    pub points: i64,
    pub correct_answer_id: i64,
    pub correct_answer: String,
}
