use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::traits::RecordStore;
use crate::models::{
    AnswerPatch, AnswerRecord, ChoiceSummary, GamePatch, GameRecord, NewAnswer, NewQuestion,
    NewRank, NewUser, QuestionPatch, QuestionRecord, RankRecord, UserPatch, UserRecord,
};
use crate::StoreError;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        tracing::info!("database schema is up to date");
        Ok(())
    }
}

fn exec_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::Integrity(db.message().to_string())
        }
        _ => StoreError::Query(e.to_string()),
    }
}

fn map_user(row: &SqliteRow) -> Result<UserRecord, StoreError> {
    let id: String = row.get("id");
    Ok(UserRecord {
        id: Uuid::parse_str(&id)?,
        username: row.get("username"),
        password: row.get("password"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        is_staff: row.get("is_staff"),
        is_superuser: row.get("is_superuser"),
        created_at: row.get("created_at"),
    })
}

fn map_rank(row: &SqliteRow) -> Result<RankRecord, StoreError> {
    let user_id: String = row.get("user_id");
    Ok(RankRecord {
        id: row.get("id"),
        user_id: Uuid::parse_str(&user_id)?,
        game_id: row.get("game_id"),
        question_id: row.get("question_id"),
        points: row.get("points"),
        correct: row.get("correct"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn create_game(&self, name: &str) -> Result<GameRecord, StoreError> {
        let result = sqlx::query("INSERT INTO games (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(exec_err)?;
        Ok(GameRecord {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    async fn game_by_id(&self, game_id: i64) -> Result<Option<GameRecord>, StoreError> {
        sqlx::query_as::<_, GameRecord>("SELECT id, name FROM games WHERE id = ?")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(exec_err)
    }

    async fn list_games(&self) -> Result<Vec<GameRecord>, StoreError> {
        sqlx::query_as::<_, GameRecord>("SELECT id, name FROM games ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(exec_err)
    }

    async fn update_game(&self, game_id: i64, patch: &GamePatch) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE games SET name = COALESCE(?, name) WHERE id = ?")
            .bind(patch.name.as_deref())
            .bind(game_id)
            .execute(&self.pool)
            .await
            .map_err(exec_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_game(&self, game_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(game_id)
            .execute(&self.pool)
            .await
            .map_err(exec_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_question(&self, new: &NewQuestion) -> Result<QuestionRecord, StoreError> {
        let result = sqlx::query("INSERT INTO questions (game_id, prompt, points) VALUES (?, ?, ?)")
            .bind(new.game_id)
            .bind(&new.prompt)
            .bind(new.points)
            .execute(&self.pool)
            .await
            .map_err(exec_err)?;
        Ok(QuestionRecord {
            id: result.last_insert_rowid(),
            game_id: new.game_id,
            prompt: new.prompt.clone(),
            points: new.points,
        })
    }

    async fn question_by_id(&self, question_id: i64) -> Result<Option<QuestionRecord>, StoreError> {
        sqlx::query_as::<_, QuestionRecord>(
            "SELECT id, game_id, prompt, points FROM questions WHERE id = ?",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(exec_err)
    }

    async fn questions_for_game(&self, game_id: i64) -> Result<Vec<QuestionRecord>, StoreError> {
        sqlx::query_as::<_, QuestionRecord>(
            "SELECT id, game_id, prompt, points FROM questions WHERE game_id = ? ORDER BY id",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(exec_err)
    }

    async fn update_question(
        &self,
        question_id: i64,
        patch: &QuestionPatch,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE questions SET game_id = COALESCE(?, game_id), prompt = COALESCE(?, prompt), \
             points = COALESCE(?, points) WHERE id = ?",
        )
        .bind(patch.game_id)
        .bind(patch.prompt.as_deref())
        .bind(patch.points)
        .bind(question_id)
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_question(&self, question_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(question_id)
            .execute(&self.pool)
            .await
            .map_err(exec_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_answer(&self, new: &NewAnswer) -> Result<AnswerRecord, StoreError> {
        let result = sqlx::query("INSERT INTO choices (question_id, text, correct) VALUES (?, ?, ?)")
            .bind(new.question_id)
            .bind(&new.text)
            .bind(new.correct)
            .execute(&self.pool)
            .await
            .map_err(exec_err)?;
        Ok(AnswerRecord {
            id: result.last_insert_rowid(),
            question_id: new.question_id,
            text: new.text.clone(),
            correct: new.correct,
        })
    }

    async fn answer_by_id(&self, choice_id: i64) -> Result<Option<AnswerRecord>, StoreError> {
        sqlx::query_as::<_, AnswerRecord>(
            "SELECT id, question_id, text, correct FROM choices WHERE id = ?",
        )
        .bind(choice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(exec_err)
    }

    async fn choices_for_question(
        &self,
        question_id: i64,
    ) -> Result<Vec<ChoiceSummary>, StoreError> {
        sqlx::query_as::<_, ChoiceSummary>(
            "SELECT id, question_id, text FROM choices WHERE question_id = ? ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await
        .map_err(exec_err)
    }

    async fn correct_answers(&self, question_id: i64) -> Result<Vec<AnswerRecord>, StoreError> {
        sqlx::query_as::<_, AnswerRecord>(
            "SELECT id, question_id, text, correct FROM choices \
             WHERE question_id = ? AND correct = TRUE ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await
        .map_err(exec_err)
    }

    async fn update_answer(&self, choice_id: i64, patch: &AnswerPatch) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE choices SET question_id = COALESCE(?, question_id), text = COALESCE(?, text), \
             correct = COALESCE(?, correct) WHERE id = ?",
        )
        .bind(patch.question_id)
        .bind(patch.text.as_deref())
        .bind(patch.correct)
        .bind(choice_id)
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_answer(&self, choice_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM choices WHERE id = ?")
            .bind(choice_id)
            .execute(&self.pool)
            .await
            .map_err(exec_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_user(&self, new: &NewUser) -> Result<UserRecord, StoreError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, username, password, email, first_name, last_name, is_staff, \
             is_superuser, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new.username)
        .bind(&new.password)
        .bind(&new.email)
        .bind(new.first_name.as_deref())
        .bind(new.last_name.as_deref())
        .bind(new.is_staff)
        .bind(new.is_superuser)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;
        Ok(UserRecord {
            id,
            username: new.username.clone(),
            password: new.password.clone(),
            email: new.email.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            is_staff: new.is_staff,
            is_superuser: new.is_superuser,
            created_at,
        })
    }

    async fn user_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(exec_err)?;
        row.as_ref().map(map_user).transpose()
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(exec_err)?;
        row.as_ref().map(map_user).transpose()
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(exec_err)?;
        rows.iter().map(map_user).collect()
    }

    async fn update_user(&self, user_id: Uuid, patch: &UserPatch) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET username = COALESCE(?, username), password = COALESCE(?, password), \
             email = COALESCE(?, email), first_name = COALESCE(?, first_name), \
             last_name = COALESCE(?, last_name), is_staff = COALESCE(?, is_staff) WHERE id = ?",
        )
        .bind(patch.username.as_deref())
        .bind(patch.password.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .bind(patch.is_staff)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(exec_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_rank(&self, new: &NewRank) -> Result<RankRecord, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO ranks (user_id, game_id, question_id, points, correct, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new.user_id.to_string())
        .bind(new.game_id)
        .bind(new.question_id)
        .bind(new.points)
        .bind(new.correct)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;
        Ok(RankRecord {
            id: result.last_insert_rowid(),
            user_id: new.user_id,
            game_id: new.game_id,
            question_id: new.question_id,
            points: new.points,
            correct: new.correct,
            created_at,
        })
    }

    async fn ranks_for_user(
        &self,
        user_id: Uuid,
        game_id: Option<i64>,
    ) -> Result<Vec<RankRecord>, StoreError> {
        let user_id = user_id.to_string();
        let rows = match game_id {
            Some(game_id) => {
                sqlx::query(
                    "SELECT id, user_id, game_id, question_id, points, correct, created_at \
                     FROM ranks WHERE user_id = ? AND game_id = ? ORDER BY id",
                )
                .bind(user_id)
                .bind(game_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT id, user_id, game_id, question_id, points, correct, created_at \
                     FROM ranks WHERE user_id = ? ORDER BY id",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(exec_err)?;
        rows.iter().map(map_rank).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");
        let store = SqliteStore::new(pool);
        store.run_migrations().await.expect("migrations failed");
        store
    }

    #[tokio::test]
    async fn migrations_create_a_usable_schema() {
        let store = memory_store().await;
        let game = store.create_game("Trivia").await.expect("create game");
        assert!(game.id > 0);
        assert_eq!(
            store.game_by_id(game.id).await.expect("read game"),
            Some(game)
        );
    }

    #[tokio::test]
    async fn orphan_question_is_an_integrity_error() {
        let store = memory_store().await;
        let err = store
            .create_question(&NewQuestion {
                game_id: 4242,
                prompt: "2+2?".to_string(),
                points: 5,
            })
            .await
            .expect_err("insert must fail");
        assert!(matches!(err, StoreError::Integrity(_)), "got {err:?}");
    }
}
