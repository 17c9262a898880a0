use std::sync::Arc;

use serde_json::{Map, Value};
use store::{
    AnswerPatch, AnswerRecord, ChoiceSummary, GamePatch, GameRecord, NewAnswer, NewQuestion,
    NewUser, QuestionPatch, QuestionRecord, RecordStore, UserPatch, UserRecord,
};
use types::{Principal, RankSummary, SubmissionResult, ALLOWED_POINTS};
use uuid::Uuid;

use crate::error::QuizError;
use crate::gate::require_admin;
use crate::validate::{validate, FieldKind, FieldSpec};
use crate::{play, scores};

const GAME_CREATE: &[FieldSpec] = &[FieldSpec::required("name", FieldKind::Str).bounded(2, 50)];

const GAME_UPDATE: &[FieldSpec] = &[FieldSpec::optional("name", FieldKind::Str).bounded(2, 50)];

const QUESTION_CREATE: &[FieldSpec] = &[
    FieldSpec::required("prompt", FieldKind::Str).bounded(1, 250),
    FieldSpec::required("points", FieldKind::IntEnum(&ALLOWED_POINTS)),
];

const QUESTION_UPDATE: &[FieldSpec] = &[
    FieldSpec::optional("prompt", FieldKind::Str).bounded(1, 250),
    FieldSpec::optional("points", FieldKind::IntEnum(&ALLOWED_POINTS)),
    FieldSpec::optional("game_id", FieldKind::Int),
];

const CHOICE_CREATE: &[FieldSpec] = &[
    FieldSpec::required("text", FieldKind::Str).bounded(1, 80),
    FieldSpec::required("correct", FieldKind::Bool),
];

const CHOICE_UPDATE: &[FieldSpec] = &[
    FieldSpec::optional("question_id", FieldKind::Int),
    FieldSpec::optional("text", FieldKind::Str).bounded(1, 80),
    FieldSpec::optional("correct", FieldKind::Bool),
];

const USER_CREATE: &[FieldSpec] = &[
    FieldSpec::required("username", FieldKind::Str).bounded(8, 15),
    FieldSpec::required("password", FieldKind::Str).bounded(8, 20),
    FieldSpec::required("email", FieldKind::Email),
    FieldSpec::optional("first_name", FieldKind::Str).bounded(2, 30),
    FieldSpec::optional("last_name", FieldKind::Str),
    FieldSpec::optional("is_staff", FieldKind::Bool),
];

const USER_UPDATE: &[FieldSpec] = &[
    FieldSpec::optional("username", FieldKind::Str).bounded(8, 15),
    FieldSpec::optional("password", FieldKind::Str).bounded(8, 20),
    FieldSpec::optional("email", FieldKind::Email),
    FieldSpec::optional("first_name", FieldKind::Str).bounded(2, 30),
    FieldSpec::optional("last_name", FieldKind::Str),
    FieldSpec::optional("is_staff", FieldKind::Bool),
];

fn take_str(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_owned)
}

fn take_i64(fields: &Map<String, Value>, name: &str) -> Option<i64> {
    fields.get(name).and_then(Value::as_i64)
}

fn take_bool(fields: &Map<String, Value>, name: &str) -> Option<bool> {
    fields.get(name).and_then(Value::as_bool)
}

fn required_str(fields: &Map<String, Value>, name: &'static str) -> Result<String, QuizError> {
    take_str(fields, name).ok_or_else(|| QuizError::validation(name, "is required"))
}

fn required_i64(fields: &Map<String, Value>, name: &'static str) -> Result<i64, QuizError> {
    take_i64(fields, name).ok_or_else(|| QuizError::validation(name, "is required"))
}

fn required_bool(fields: &Map<String, Value>, name: &'static str) -> Result<bool, QuizError> {
    take_bool(fields, name).ok_or_else(|| QuizError::validation(name, "is required"))
}

/// The transport-agnostic boundary of the backend. Every operation takes
/// the acting [`Principal`] explicitly; there is no ambient current user.
pub struct QuizService {
    store: Arc<dyn RecordStore>,
}

impl QuizService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub async fn list_games(&self) -> Result<Vec<GameRecord>, QuizError> {
        Ok(self.store.list_games().await?)
    }

    pub async fn create_game(
        &self,
        principal: &Principal,
        payload: &Map<String, Value>,
    ) -> Result<GameRecord, QuizError> {
        require_admin(principal)?;
        let fields = validate(GAME_CREATE, payload)?;
        let name = required_str(&fields, "name")?;
        Ok(self.store.create_game(&name).await?)
    }

    pub async fn update_game(
        &self,
        principal: &Principal,
        game_id: i64,
        payload: &Map<String, Value>,
    ) -> Result<(), QuizError> {
        require_admin(principal)?;
        let fields = validate(GAME_UPDATE, payload)?;
        let patch = GamePatch {
            name: take_str(&fields, "name"),
        };
        if self.store.update_game(game_id, &patch).await? {
            Ok(())
        } else {
            Err(QuizError::NotFound("game"))
        }
    }

    pub async fn delete_game(&self, principal: &Principal, game_id: i64) -> Result<(), QuizError> {
        require_admin(principal)?;
        if self.store.delete_game(game_id).await? {
            Ok(())
        } else {
            Err(QuizError::NotFound("game"))
        }
    }

    pub async fn questions_for_game(
        &self,
        game_id: i64,
    ) -> Result<Vec<QuestionRecord>, QuizError> {
        Ok(self.store.questions_for_game(game_id).await?)
    }

    pub async fn create_question(
        &self,
        principal: &Principal,
        game_id: i64,
        payload: &Map<String, Value>,
    ) -> Result<QuestionRecord, QuizError> {
        require_admin(principal)?;
        let fields = validate(QUESTION_CREATE, payload)?;
        let new = NewQuestion {
            game_id,
            prompt: required_str(&fields, "prompt")?,
            points: required_i64(&fields, "points")?,
        };
        Ok(self.store.create_question(&new).await?)
    }

    pub async fn update_question(
        &self,
        principal: &Principal,
        question_id: i64,
        payload: &Map<String, Value>,
    ) -> Result<(), QuizError> {
        require_admin(principal)?;
        let fields = validate(QUESTION_UPDATE, payload)?;
        let patch = QuestionPatch {
            game_id: take_i64(&fields, "game_id"),
            prompt: take_str(&fields, "prompt"),
            points: take_i64(&fields, "points"),
        };
        if self.store.update_question(question_id, &patch).await? {
            Ok(())
        } else {
            Err(QuizError::NotFound("question"))
        }
    }

    pub async fn delete_question(
        &self,
        principal: &Principal,
        question_id: i64,
    ) -> Result<(), QuizError> {
        require_admin(principal)?;
        if self.store.delete_question(question_id).await? {
            Ok(())
        } else {
            Err(QuizError::NotFound("question"))
        }
    }

    /// Choices as players see them: the correctness flag never leaves the
    /// store through this read.
    pub async fn choices_for_question(
        &self,
        question_id: i64,
    ) -> Result<Vec<ChoiceSummary>, QuizError> {
        Ok(self.store.choices_for_question(question_id).await?)
    }

    pub async fn create_choice(
        &self,
        principal: &Principal,
        question_id: i64,
        payload: &Map<String, Value>,
    ) -> Result<AnswerRecord, QuizError> {
        require_admin(principal)?;
        let fields = validate(CHOICE_CREATE, payload)?;
        let new = NewAnswer {
            question_id,
            text: required_str(&fields, "text")?,
            correct: required_bool(&fields, "correct")?,
        };
        Ok(self.store.create_answer(&new).await?)
    }

    pub async fn update_choice(
        &self,
        principal: &Principal,
        choice_id: i64,
        payload: &Map<String, Value>,
    ) -> Result<(), QuizError> {
        require_admin(principal)?;
        let fields = validate(CHOICE_UPDATE, payload)?;
        let patch = AnswerPatch {
            question_id: take_i64(&fields, "question_id"),
            text: take_str(&fields, "text"),
            correct: take_bool(&fields, "correct"),
        };
        if self.store.update_answer(choice_id, &patch).await? {
            Ok(())
        } else {
            Err(QuizError::NotFound("choice"))
        }
    }

    pub async fn delete_choice(
        &self,
        principal: &Principal,
        choice_id: i64,
    ) -> Result<(), QuizError> {
        require_admin(principal)?;
        if self.store.delete_answer(choice_id).await? {
            Ok(())
        } else {
            Err(QuizError::NotFound("choice"))
        }
    }

    /// User listing is the one read that stays behind the admin gate.
    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<UserRecord>, QuizError> {
        require_admin(principal)?;
        Ok(self.store.list_users().await?)
    }

    /// Creates a regular account. The administrator capability cannot be
    /// granted through this surface; bootstrap paths set it directly on
    /// the store.
    pub async fn create_user(
        &self,
        principal: &Principal,
        payload: &Map<String, Value>,
    ) -> Result<UserRecord, QuizError> {
        require_admin(principal)?;
        let fields = validate(USER_CREATE, payload)?;
        let new = NewUser {
            username: required_str(&fields, "username")?,
            // Already hashed by the validator; plaintext stops there.
            password: required_str(&fields, "password")?,
            email: required_str(&fields, "email")?,
            first_name: take_str(&fields, "first_name"),
            last_name: take_str(&fields, "last_name"),
            is_staff: take_bool(&fields, "is_staff").unwrap_or(false),
            is_superuser: false,
        };
        Ok(self.store.create_user(&new).await?)
    }

    pub async fn update_user(
        &self,
        principal: &Principal,
        user_id: Uuid,
        payload: &Map<String, Value>,
    ) -> Result<(), QuizError> {
        require_admin(principal)?;
        let fields = validate(USER_UPDATE, payload)?;
        let patch = UserPatch {
            username: take_str(&fields, "username"),
            password: take_str(&fields, "password"),
            email: take_str(&fields, "email"),
            first_name: take_str(&fields, "first_name"),
            last_name: take_str(&fields, "last_name"),
            is_staff: take_bool(&fields, "is_staff"),
        };
        if self.store.update_user(user_id, &patch).await? {
            Ok(())
        } else {
            Err(QuizError::NotFound("user"))
        }
    }

    pub async fn delete_user(&self, principal: &Principal, user_id: Uuid) -> Result<(), QuizError> {
        require_admin(principal)?;
        if self.store.delete_user(user_id).await? {
            Ok(())
        } else {
            Err(QuizError::NotFound("user"))
        }
    }

    pub async fn submit_answer(
        &self,
        principal: &Principal,
        choice_id: i64,
    ) -> Result<SubmissionResult, QuizError> {
        play::submit(self.store.as_ref(), principal, choice_id).await
    }

    pub async fn total_points(&self, principal: &Principal) -> Result<i64, QuizError> {
        scores::total_points(self.store.as_ref(), principal).await
    }

    pub async fn rank_summary(
        &self,
        principal: &Principal,
        game_id: Option<i64>,
    ) -> Result<Option<RankSummary>, QuizError> {
        scores::rank_summary(self.store.as_ref(), principal, game_id).await
    }
}
