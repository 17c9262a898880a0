use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query execution error: {0}")]
    Query(String),

    #[error("foreign reference violation: {0}")]
    Integrity(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("UUID parsing error: {0}")]
    UuidParsing(#[from] uuid::Error),
}
