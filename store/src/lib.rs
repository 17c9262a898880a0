pub mod config;
pub mod error;
pub mod models;
pub mod records;
pub mod retry;

pub use config::StoreConfig;
pub use error::StoreError;
pub use models::{
    AnswerPatch, AnswerRecord, ChoiceSummary, GamePatch, GameRecord, NewAnswer, NewQuestion,
    NewRank, NewUser, QuestionPatch, QuestionRecord, RankRecord, UserPatch, UserRecord,
};
pub use records::{RecordStore, SqliteStore};
pub use retry::retry_with_backoff;
