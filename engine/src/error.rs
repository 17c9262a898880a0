use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    /// Capability check failed; the caller lacks administrator rights.
    #[error("accessible with administrator privileges")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    /// A write referenced a record that does not exist. Client-caused, as
    /// opposed to [`QuizError::Store`] infrastructure faults.
    #[error("inexistent referenced record: {0}")]
    Integrity(String),

    /// Data defect detected at play time: the question cannot be scored
    /// because no choice is marked correct. The client did nothing wrong.
    #[error("question {question_id} has no choice marked correct")]
    NoCorrectAnswer { question_id: i64 },

    #[error("record store failure: {0}")]
    Store(StoreError),
}

impl QuizError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for QuizError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Integrity(detail) => Self::Integrity(detail),
            other => Self::Store(other),
        }
    }
}
