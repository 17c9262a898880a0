use store::{NewRank, RecordStore};
use types::{Principal, SubmissionResult};

use crate::error::QuizError;

/// Scores one submitted choice and appends the scoring event.
///
/// The canonical correct answer is the choice with the lowest id among
/// those marked correct. A question with no correct choice is reported as
/// a data error before anything is written; repeated submissions are never
/// deduplicated, each one appends its own rank row.
pub async fn submit(
    store: &dyn RecordStore,
    principal: &Principal,
    choice_id: i64,
) -> Result<SubmissionResult, QuizError> {
    let choice = store
        .answer_by_id(choice_id)
        .await?
        .ok_or(QuizError::NotFound("choice"))?;
    let question = store.question_by_id(choice.question_id).await?.ok_or_else(|| {
        QuizError::Integrity(format!("choice {} references a missing question", choice.id))
    })?;
    let game = store.game_by_id(question.game_id).await?.ok_or_else(|| {
        QuizError::Integrity(format!("question {} references a missing game", question.id))
    })?;

    let correct_choices = store.correct_answers(question.id).await?;
    let canonical = correct_choices.first().ok_or(QuizError::NoCorrectAnswer {
        question_id: question.id,
    })?;
    if correct_choices.len() > 1 {
        log::warn!(
            "question {} has {} choices marked correct; using choice {}",
            question.id,
            correct_choices.len(),
            canonical.id
        );
    }

    let points = if choice.correct { question.points } else { 0 };
    store
        .insert_rank(&NewRank {
            user_id: principal.user_id,
            game_id: game.id,
            question_id: question.id,
            points,
            correct: choice.correct,
        })
        .await?;

    Ok(SubmissionResult {
        answer_status: choice.correct,
        points,
        correct_answer_id: canonical.id,
        correct_answer: canonical.text.clone(),
    })
}
