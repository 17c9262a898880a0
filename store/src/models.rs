use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GameRecord {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamePatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuestionRecord {
    pub id: i64,
    pub game_id: i64,
    pub prompt: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub game_id: i64,
    pub prompt: String,
    pub points: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionPatch {
    pub game_id: Option<i64>,
    pub prompt: Option<String>,
    pub points: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnswerRecord {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAnswer {
    pub question_id: i64,
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerPatch {
    pub question_id: Option<i64>,
    pub text: Option<String>,
    pub correct: Option<bool>,
}

/// Player-facing view of a choice. The correctness flag is deliberately
/// absent so listings never reveal the right answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChoiceSummary {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    /// Always an argon2 hash, never plaintext.
    pub password: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
}

/// One immutable scoring event. Rows are only ever inserted; the stored
/// `correct` flag records the outcome instead of leaving it to be inferred
/// from a nonzero point award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub game_id: i64,
    pub question_id: i64,
    pub points: i64,
    pub correct: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRank {
    pub user_id: Uuid,
    pub game_id: i64,
    pub question_id: i64,
    pub points: i64,
    pub correct: bool,
}

impl From<&UserRecord> for types::Principal {
    fn from(user: &UserRecord) -> Self {
        types::Principal::new(user.id, user.is_superuser)
    }
}
