use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rand::seq::SliceRandom;

use engine::{seed, QuizService};
use store::{retry_with_backoff, SqliteStore, StoreConfig};
use types::Principal;

#[derive(Parser, Debug)]
struct Params {
    /// SQLite database URL; falls back to DATABASE_URL, then in-memory.
    #[arg(short, long)]
    database: Option<String>,

    /// YAML seed file; the built-in demo quiz is used when absent.
    #[arg(short, long)]
    seed: Option<std::path::PathBuf>,

    /// Username of the demo player to create and play as.
    #[arg(short, long, default_value = "demo_player")]
    player: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let config = StoreConfig::from_cli_or_env(args.database.clone());
    let pool = retry_with_backoff(
        || {
            let config = config.clone();
            Box::pin(async move { config.create_pool().await })
        },
        3,
        Duration::from_millis(100),
    )
    .await?;
    let store = SqliteStore::new(pool);
    store.run_migrations().await?;
    let service = QuizService::new(Arc::new(store));

    // Stand-in for the external authentication collaborator: resolve the
    // acting users up front and pass them into every call.
    let admin_user = seed::ensure_admin(service.store(), "quiz_admin", "change-me-please").await?;
    let admin = Principal::from(&admin_user);

    let quiz = match &args.seed {
        Some(path) => seed::from_yaml(&std::fs::read_to_string(path)?)?,
        None => seed::builtin(),
    };
    let game_ids = seed::apply(&service, &admin, &quiz).await?;
    log::info!("seeded {} game(s)", game_ids.len());

    let player_user = seed::ensure_player(&service, &admin, &args.player).await?;
    let player = Principal::from(&player_user);

    let mut rng = rand::thread_rng();
    for &game_id in &game_ids {
        for question in service.questions_for_game(game_id).await? {
            let choices = service.choices_for_question(question.id).await?;
            let choice = match choices.choose(&mut rng) {
                Some(choice) => choice,
                None => continue,
            };
            let outcome = service.submit_answer(&player, choice.id).await?;
            println!(
                "{} -> \"{}\": {} ({} points, correct answer: {})",
                question.prompt,
                choice.text,
                if outcome.answer_status { "correct" } else { "wrong" },
                outcome.points,
                outcome.correct_answer,
            );
        }
    }

    println!("total points: {}", service.total_points(&player).await?);
    for &game_id in &game_ids {
        if let Some(summary) = service.rank_summary(&player, Some(game_id)).await? {
            println!(
                "game {game_id}: {}/{} correct",
                summary.correct_answers_count, summary.total_answers
            );
        }
    }

    Ok(())
}
