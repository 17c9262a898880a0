//! End-to-end scenarios for the scoring core, run against an in-memory
//! SQLite store through the same service surface a transport layer would
//! use.

use std::sync::Arc;

use engine::validate::verify_password;
use engine::{QuizError, QuizService};
use serde_json::{json, Map, Value};
use sqlx::sqlite::SqlitePoolOptions;
use store::{RecordStore, SqliteStore};
use types::Principal;
use uuid::Uuid;

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("payload must be an object"),
    }
}

async fn memory_service() -> QuizService {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    let store = SqliteStore::new(pool);
    store.run_migrations().await.expect("migrations failed");
    QuizService::new(Arc::new(store))
}

fn admin() -> Principal {
    // Admin principals arrive from the authentication collaborator; they
    // do not need a stored row to drive record management.
    Principal::new(Uuid::new_v4(), true)
}

async fn register_player(service: &QuizService, username: &str) -> Principal {
    let user = service
        .create_user(
            &admin(),
            &payload(json!({
                "username": username,
                "password": "secret-pass-1",
                "email": format!("{username}@example.com"),
            })),
        )
        .await
        .expect("player created");
    Principal::from(&user)
}

/// Builds the canonical demo content: Trivia -> "2+2?" (5 points) with
/// choices "4" (correct) and "5" (wrong). Returns (game, question, correct
/// choice, wrong choice) ids.
async fn seed_trivia(service: &QuizService) -> (i64, i64, i64, i64) {
    let admin = admin();
    let game = service
        .create_game(&admin, &payload(json!({"name": "Trivia"})))
        .await
        .expect("game created");
    let question = service
        .create_question(&admin, game.id, &payload(json!({"prompt": "2+2?", "points": 5})))
        .await
        .expect("question created");
    let correct = service
        .create_choice(
            &admin,
            question.id,
            &payload(json!({"text": "4", "correct": true})),
        )
        .await
        .expect("choice created");
    let wrong = service
        .create_choice(
            &admin,
            question.id,
            &payload(json!({"text": "5", "correct": false})),
        )
        .await
        .expect("choice created");
    (game.id, question.id, correct.id, wrong.id)
}

#[tokio::test]
async fn correct_submission_awards_the_question_points() {
    let service = memory_service().await;
    let (game_id, _, correct_id, _) = seed_trivia(&service).await;
    let player = register_player(&service, "test_player").await;

    let outcome = service
        .submit_answer(&player, correct_id)
        .await
        .expect("submission succeeds");
    assert!(outcome.answer_status);
    assert_eq!(outcome.points, 5);
    assert_eq!(outcome.correct_answer_id, correct_id);
    assert_eq!(outcome.correct_answer, "4");

    let ranks = service
        .store()
        .ranks_for_user(player.user_id, Some(game_id))
        .await
        .expect("ranks readable");
    assert_eq!(ranks.len(), 1);
    assert_eq!(ranks[0].points, 5);
    assert!(ranks[0].correct);
}

#[tokio::test]
async fn wrong_submission_awards_zero_but_reveals_the_answer() {
    let service = memory_service().await;
    let (_, _, correct_id, wrong_id) = seed_trivia(&service).await;
    let player = register_player(&service, "test_player").await;

    let outcome = service
        .submit_answer(&player, wrong_id)
        .await
        .expect("submission succeeds");
    assert!(!outcome.answer_status);
    assert_eq!(outcome.points, 0);
    assert_eq!(outcome.correct_answer_id, correct_id);
    assert_eq!(outcome.correct_answer, "4");

    let ranks = service
        .store()
        .ranks_for_user(player.user_id, None)
        .await
        .expect("ranks readable");
    assert_eq!(ranks.len(), 1);
    assert_eq!(ranks[0].points, 0);
    assert!(!ranks[0].correct);
}

#[tokio::test]
async fn repeated_correct_submissions_accumulate_linearly() {
    let service = memory_service().await;
    let (_, _, correct_id, _) = seed_trivia(&service).await;
    let player = register_player(&service, "test_player").await;

    for _ in 0..3 {
        service
            .submit_answer(&player, correct_id)
            .await
            .expect("submission succeeds");
    }

    assert_eq!(service.total_points(&player).await.expect("total"), 15);
    let ranks = service
        .store()
        .ranks_for_user(player.user_id, None)
        .await
        .expect("ranks readable");
    assert_eq!(ranks.len(), 3);
}

#[tokio::test]
async fn unknown_choice_is_not_found_and_writes_nothing() {
    let service = memory_service().await;
    seed_trivia(&service).await;
    let player = register_player(&service, "test_player").await;

    let err = service
        .submit_answer(&player, 424242)
        .await
        .expect_err("must fail");
    assert!(matches!(err, QuizError::NotFound("choice")), "got {err:?}");

    let ranks = service
        .store()
        .ranks_for_user(player.user_id, None)
        .await
        .expect("ranks readable");
    assert!(ranks.is_empty());
}

#[tokio::test]
async fn unscorable_question_is_reported_and_writes_nothing() {
    let service = memory_service().await;
    let admin = admin();
    let game = service
        .create_game(&admin, &payload(json!({"name": "Trivia"})))
        .await
        .expect("game created");
    let question = service
        .create_question(
            &admin,
            game.id,
            &payload(json!({"prompt": "Unanswerable?", "points": 10})),
        )
        .await
        .expect("question created");
    let only_choice = service
        .create_choice(
            &admin,
            question.id,
            &payload(json!({"text": "nope", "correct": false})),
        )
        .await
        .expect("choice created");
    let player = register_player(&service, "test_player").await;

    let err = service
        .submit_answer(&player, only_choice.id)
        .await
        .expect_err("must fail");
    assert!(
        matches!(err, QuizError::NoCorrectAnswer { question_id } if question_id == question.id),
        "got {err:?}"
    );

    let ranks = service
        .store()
        .ranks_for_user(player.user_id, None)
        .await
        .expect("ranks readable");
    assert!(ranks.is_empty());
}

#[tokio::test]
async fn canonical_correct_answer_is_the_lowest_id() {
    let service = memory_service().await;
    let admin = admin();
    let game = service
        .create_game(&admin, &payload(json!({"name": "Trivia"})))
        .await
        .expect("game created");
    let question = service
        .create_question(
            &admin,
            game.id,
            &payload(json!({"prompt": "Name an even number", "points": 5})),
        )
        .await
        .expect("question created");
    let first_correct = service
        .create_choice(
            &admin,
            question.id,
            &payload(json!({"text": "2", "correct": true})),
        )
        .await
        .expect("choice created");
    let second_correct = service
        .create_choice(
            &admin,
            question.id,
            &payload(json!({"text": "4", "correct": true})),
        )
        .await
        .expect("choice created");
    let player = register_player(&service, "test_player").await;

    let outcome = service
        .submit_answer(&player, second_correct.id)
        .await
        .expect("submission succeeds");
    assert!(outcome.answer_status);
    assert_eq!(outcome.correct_answer_id, first_correct.id);
    assert_eq!(outcome.correct_answer, "2");
}

#[tokio::test]
async fn total_points_over_an_empty_history_is_zero() {
    let service = memory_service().await;
    let player = register_player(&service, "test_player").await;
    assert_eq!(service.total_points(&player).await.expect("total"), 0);
}

#[tokio::test]
async fn summary_distinguishes_never_played_from_scored_nothing() {
    let service = memory_service().await;
    let (game_id, _, _, wrong_id) = seed_trivia(&service).await;
    let player = register_player(&service, "test_player").await;

    // Never played this game: explicit no-content.
    assert_eq!(
        service
            .rank_summary(&player, Some(game_id))
            .await
            .expect("summary"),
        None
    );
    // An unfiltered query over an empty history still yields counts.
    let lifetime = service
        .rank_summary(&player, None)
        .await
        .expect("summary")
        .expect("always some");
    assert_eq!(lifetime.total_answers, 0);
    assert_eq!(lifetime.correct_answers_count, 0);

    // Played and scored nothing: a real zero-score summary, not no-content.
    service
        .submit_answer(&player, wrong_id)
        .await
        .expect("submission succeeds");
    let summary = service
        .rank_summary(&player, Some(game_id))
        .await
        .expect("summary")
        .expect("played this game");
    assert_eq!(summary.total_answers, 1);
    assert_eq!(summary.correct_answers_count, 0);
}

#[tokio::test]
async fn history_across_games_aggregates_like_the_ledger() {
    let service = memory_service().await;
    let admin = admin();
    let (_, _, trivia_correct, trivia_wrong) = seed_trivia(&service).await;

    let capitals = service
        .create_game(&admin, &payload(json!({"name": "Capitals"})))
        .await
        .expect("game created");
    let question = service
        .create_question(
            &admin,
            capitals.id,
            &payload(json!({"prompt": "Capital of France?", "points": 10})),
        )
        .await
        .expect("question created");
    let paris = service
        .create_choice(
            &admin,
            question.id,
            &payload(json!({"text": "Paris", "correct": true})),
        )
        .await
        .expect("choice created");

    let player = register_player(&service, "test_player").await;
    // Rank history ends up as [5, 0, 10].
    service.submit_answer(&player, trivia_correct).await.expect("submit");
    service.submit_answer(&player, trivia_wrong).await.expect("submit");
    service.submit_answer(&player, paris.id).await.expect("submit");

    assert_eq!(service.total_points(&player).await.expect("total"), 15);
    let summary = service
        .rank_summary(&player, None)
        .await
        .expect("summary")
        .expect("has history");
    assert_eq!(summary.total_answers, 3);
    assert_eq!(summary.correct_answers_count, 2);

    let capitals_summary = service
        .rank_summary(&player, Some(capitals.id))
        .await
        .expect("summary")
        .expect("played capitals");
    assert_eq!(capitals_summary.total_answers, 1);
    assert_eq!(capitals_summary.correct_answers_count, 1);
}

#[tokio::test]
async fn mutations_require_the_admin_capability() {
    let service = memory_service().await;
    let (game_id, question_id, choice_id, _) = seed_trivia(&service).await;
    let player = register_player(&service, "test_player").await;

    let attempts = [
        service
            .create_game(&player, &payload(json!({"name": "Nope"})))
            .await
            .err(),
        service
            .update_game(&player, game_id, &payload(json!({"name": "Nope"})))
            .await
            .err(),
        service.delete_game(&player, game_id).await.err(),
        service
            .create_question(
                &player,
                game_id,
                &payload(json!({"prompt": "?", "points": 5})),
            )
            .await
            .err(),
        service.delete_question(&player, question_id).await.err(),
        service
            .create_choice(
                &player,
                question_id,
                &payload(json!({"text": "x", "correct": false})),
            )
            .await
            .err(),
        service.delete_choice(&player, choice_id).await.err(),
        service.list_users(&player).await.err(),
        service
            .create_user(&player, &payload(json!({})))
            .await
            .err(),
    ];
    for err in attempts {
        assert!(
            matches!(err, Some(QuizError::Unauthorized)),
            "expected Unauthorized, got {err:?}"
        );
    }

    // Reads and gameplay stay open to any authenticated user.
    assert!(service.list_games().await.is_ok());
    assert!(service.questions_for_game(game_id).await.is_ok());
    assert!(service.choices_for_question(question_id).await.is_ok());
    assert!(service.submit_answer(&player, choice_id).await.is_ok());
    assert!(service.total_points(&player).await.is_ok());
}

#[tokio::test]
async fn question_points_must_come_from_the_enum() {
    let service = memory_service().await;
    let admin = admin();
    let game = service
        .create_game(&admin, &payload(json!({"name": "Trivia"})))
        .await
        .expect("game created");

    let err = service
        .create_question(&admin, game.id, &payload(json!({"prompt": "2+2?", "points": 7})))
        .await
        .expect_err("must fail");
    assert!(
        matches!(&err, QuizError::Validation { field, .. } if field == "points"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn creating_a_question_under_a_missing_game_is_an_integrity_error() {
    let service = memory_service().await;
    let err = service
        .create_question(&admin(), 999, &payload(json!({"prompt": "2+2?", "points": 5})))
        .await
        .expect_err("must fail");
    assert!(matches!(err, QuizError::Integrity(_)), "got {err:?}");
}

#[tokio::test]
async fn deleting_a_game_cascades_through_questions_and_choices() {
    let service = memory_service().await;
    let admin = admin();
    let (game_id, question_id, correct_id, _) = seed_trivia(&service).await;

    service
        .delete_game(&admin, game_id)
        .await
        .expect("delete succeeds");
    assert!(service
        .questions_for_game(game_id)
        .await
        .expect("readable")
        .is_empty());
    assert_eq!(
        service
            .store()
            .answer_by_id(correct_id)
            .await
            .expect("readable"),
        None
    );
    assert!(service
        .choices_for_question(question_id)
        .await
        .expect("readable")
        .is_empty());
}

#[tokio::test]
async fn updates_and_deletes_of_missing_records_are_not_found() {
    let service = memory_service().await;
    let admin = admin();

    let err = service
        .update_game(&admin, 999, &payload(json!({"name": "Renamed"})))
        .await
        .expect_err("must fail");
    assert!(matches!(err, QuizError::NotFound("game")), "got {err:?}");

    let err = service.delete_choice(&admin, 999).await.expect_err("must fail");
    assert!(matches!(err, QuizError::NotFound("choice")), "got {err:?}");

    let err = service
        .delete_user(&admin, Uuid::new_v4())
        .await
        .expect_err("must fail");
    assert!(matches!(err, QuizError::NotFound("user")), "got {err:?}");
}

#[tokio::test]
async fn stored_passwords_are_hashes_of_the_submitted_secret() {
    let service = memory_service().await;
    register_player(&service, "test_player").await;

    let stored = service
        .store()
        .user_by_username("test_player")
        .await
        .expect("readable")
        .expect("user exists");
    assert_ne!(stored.password, "secret-pass-1");
    assert!(verify_password("secret-pass-1", &stored.password));
}

#[tokio::test]
async fn user_create_rejects_malformed_email_and_short_username() {
    let service = memory_service().await;
    let admin = admin();

    let err = service
        .create_user(
            &admin,
            &payload(json!({
                "username": "test_player",
                "password": "secret-pass-1",
                "email": "not-an-email",
            })),
        )
        .await
        .expect_err("must fail");
    assert!(matches!(&err, QuizError::Validation { field, .. } if field == "email"));

    let err = service
        .create_user(
            &admin,
            &payload(json!({
                "username": "short",
                "password": "secret-pass-1",
                "email": "short@example.com",
            })),
        )
        .await
        .expect_err("must fail");
    assert!(matches!(&err, QuizError::Validation { field, .. } if field == "username"));
}
