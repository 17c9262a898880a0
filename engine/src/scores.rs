use store::RecordStore;
use types::{Principal, RankSummary};

use crate::error::QuizError;

/// Lifetime point total across every game the user has played. An empty
/// history is simply zero, never an error.
pub async fn total_points(
    store: &dyn RecordStore,
    principal: &Principal,
) -> Result<i64, QuizError> {
    let ranks = store.ranks_for_user(principal.user_id, None).await?;
    Ok(ranks.iter().map(|rank| rank.points).sum())
}

/// Attempt and accuracy counts, optionally scoped to one game.
///
/// Filtering by a game the user never played yields `None`, so callers can
/// tell "never played" apart from "played and scored nothing". Correctness
/// comes from the flag stored on each rank row, not from the point award.
pub async fn rank_summary(
    store: &dyn RecordStore,
    principal: &Principal,
    game_id: Option<i64>,
) -> Result<Option<RankSummary>, QuizError> {
    let ranks = store.ranks_for_user(principal.user_id, game_id).await?;
    if game_id.is_some() && ranks.is_empty() {
        return Ok(None);
    }
    let correct_answers_count = ranks.iter().filter(|rank| rank.correct).count();
    Ok(Some(RankSummary {
        total_answers: ranks.len(),
        correct_answers_count,
    }))
}
