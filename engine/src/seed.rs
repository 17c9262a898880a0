use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use store::{NewUser, RecordStore, UserRecord};
use types::Principal;

use crate::error::QuizError;
use crate::service::QuizService;
use crate::validate::hash_password;

/// Declarative quiz content, loadable from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedQuiz {
    pub games: Vec<SeedGame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedGame {
    pub name: String,
    pub questions: Vec<SeedQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedQuestion {
    pub prompt: String,
    pub points: i64,
    pub choices: Vec<SeedChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedChoice {
    pub text: String,
    pub correct: bool,
}

pub fn from_yaml(source: &str) -> Result<SeedQuiz, serde_yaml::Error> {
    serde_yaml::from_str(source)
}

/// The demo quiz used when no seed file is given.
pub fn builtin() -> SeedQuiz {
    SeedQuiz {
        games: vec![
            SeedGame {
                name: "Trivia".to_string(),
                questions: vec![
                    SeedQuestion {
                        prompt: "2+2?".to_string(),
                        points: 5,
                        choices: vec![
                            SeedChoice {
                                text: "4".to_string(),
                                correct: true,
                            },
                            SeedChoice {
                                text: "5".to_string(),
                                correct: false,
                            },
                        ],
                    },
                    SeedQuestion {
                        prompt: "Largest planet in the solar system?".to_string(),
                        points: 10,
                        choices: vec![
                            SeedChoice {
                                text: "Jupiter".to_string(),
                                correct: true,
                            },
                            SeedChoice {
                                text: "Saturn".to_string(),
                                correct: false,
                            },
                            SeedChoice {
                                text: "Earth".to_string(),
                                correct: false,
                            },
                        ],
                    },
                ],
            },
            SeedGame {
                name: "Capitals".to_string(),
                questions: vec![SeedQuestion {
                    prompt: "Capital of France?".to_string(),
                    points: 15,
                    choices: vec![
                        SeedChoice {
                            text: "Paris".to_string(),
                            correct: true,
                        },
                        SeedChoice {
                            text: "Lyon".to_string(),
                            correct: false,
                        },
                    ],
                }],
            },
        ],
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Loads the seed content through the regular service surface, so seeding
/// is subject to the same gate and validation as any other client.
pub async fn apply(
    service: &QuizService,
    admin: &Principal,
    seed: &SeedQuiz,
) -> Result<Vec<i64>, QuizError> {
    let mut game_ids = Vec::with_capacity(seed.games.len());
    for game in &seed.games {
        let created = service
            .create_game(admin, &object(json!({ "name": game.name })))
            .await?;
        for question in &game.questions {
            let created_question = service
                .create_question(
                    admin,
                    created.id,
                    &object(json!({ "prompt": question.prompt, "points": question.points })),
                )
                .await?;
            for choice in &question.choices {
                service
                    .create_choice(
                        admin,
                        created_question.id,
                        &object(json!({ "text": choice.text, "correct": choice.correct })),
                    )
                    .await?;
            }
        }
        game_ids.push(created.id);
    }
    Ok(game_ids)
}

/// Bootstrap administrator, created directly on the store because the
/// service surface cannot mint the capability. Idempotent by username.
pub async fn ensure_admin(
    store: &dyn RecordStore,
    username: &str,
    password: &str,
) -> Result<UserRecord, QuizError> {
    if let Some(existing) = store.user_by_username(username).await? {
        return Ok(existing);
    }
    let user = store
        .create_user(&NewUser {
            username: username.to_string(),
            password: hash_password(password)?,
            email: format!("{username}@example.com"),
            first_name: None,
            last_name: None,
            is_staff: true,
            is_superuser: true,
        })
        .await?;
    Ok(user)
}

/// Demo player account, created through the service like any other user.
/// Idempotent by username.
pub async fn ensure_player(
    service: &QuizService,
    admin: &Principal,
    username: &str,
) -> Result<UserRecord, QuizError> {
    if let Some(existing) = service.store().user_by_username(username).await? {
        return Ok(existing);
    }
    service
        .create_user(
            admin,
            &object(json!({
                "username": username,
                "password": "let-me-play-1",
                "email": format!("{username}@example.com"),
            })),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ALLOWED_POINTS;

    #[test]
    fn builtin_seed_respects_the_point_enum() {
        for game in builtin().games {
            for question in game.questions {
                assert!(ALLOWED_POINTS.contains(&question.points));
                assert!(question.choices.iter().any(|c| c.correct));
            }
        }
    }

    #[test]
    fn yaml_seed_roundtrips() {
        let source = "\
games:
  - name: Trivia
    questions:
      - prompt: 2+2?
        points: 5
        choices:
          - text: '4'
            correct: true
          - text: '5'
            correct: false
";
        let seed = from_yaml(source).expect("parses");
        assert_eq!(seed.games.len(), 1);
        assert_eq!(seed.games[0].questions[0].choices.len(), 2);
        assert!(seed.games[0].questions[0].choices[0].correct);
    }
}
