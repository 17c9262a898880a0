use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    AnswerPatch, AnswerRecord, ChoiceSummary, GamePatch, GameRecord, NewAnswer, NewQuestion,
    NewRank, NewUser, QuestionPatch, QuestionRecord, RankRecord, UserPatch, UserRecord,
};
use crate::StoreError;

/// Durable record storage for the quiz domain.
///
/// Reads of absent rows return `Ok(None)`; updates and deletes report
/// whether a row was touched so callers can map `false` to their own
/// not-found error. Writes that would orphan a foreign reference fail with
/// [`StoreError::Integrity`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_game(&self, name: &str) -> Result<GameRecord, StoreError>;
    async fn game_by_id(&self, game_id: i64) -> Result<Option<GameRecord>, StoreError>;
    async fn list_games(&self) -> Result<Vec<GameRecord>, StoreError>;
    async fn update_game(&self, game_id: i64, patch: &GamePatch) -> Result<bool, StoreError>;
    async fn delete_game(&self, game_id: i64) -> Result<bool, StoreError>;

    async fn create_question(&self, new: &NewQuestion) -> Result<QuestionRecord, StoreError>;
    async fn question_by_id(&self, question_id: i64) -> Result<Option<QuestionRecord>, StoreError>;
    async fn questions_for_game(&self, game_id: i64) -> Result<Vec<QuestionRecord>, StoreError>;
    async fn update_question(
        &self,
        question_id: i64,
        patch: &QuestionPatch,
    ) -> Result<bool, StoreError>;
    async fn delete_question(&self, question_id: i64) -> Result<bool, StoreError>;

    async fn create_answer(&self, new: &NewAnswer) -> Result<AnswerRecord, StoreError>;
    async fn answer_by_id(&self, choice_id: i64) -> Result<Option<AnswerRecord>, StoreError>;
    /// Choices of a question as shown to players, correctness withheld.
    async fn choices_for_question(
        &self,
        question_id: i64,
    ) -> Result<Vec<ChoiceSummary>, StoreError>;
    /// Every choice of the question marked correct, ascending by id. The
    /// first entry is the canonical correct answer; callers rely on that
    /// ordering as part of the contract.
    async fn correct_answers(&self, question_id: i64) -> Result<Vec<AnswerRecord>, StoreError>;
    async fn update_answer(&self, choice_id: i64, patch: &AnswerPatch) -> Result<bool, StoreError>;
    async fn delete_answer(&self, choice_id: i64) -> Result<bool, StoreError>;

    async fn create_user(&self, new: &NewUser) -> Result<UserRecord, StoreError>;
    async fn user_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError>;
    async fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError>;
    async fn update_user(&self, user_id: Uuid, patch: &UserPatch) -> Result<bool, StoreError>;
    async fn delete_user(&self, user_id: Uuid) -> Result<bool, StoreError>;

    /// Appends one scoring event. There is intentionally no update or
    /// delete counterpart; the ledger is append-only.
    async fn insert_rank(&self, new: &NewRank) -> Result<RankRecord, StoreError>;
    async fn ranks_for_user(
        &self,
        user_id: Uuid,
        game_id: Option<i64>,
    ) -> Result<Vec<RankRecord>, StoreError>;
}
