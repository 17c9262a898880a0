pub mod points;
pub mod principal;
pub mod submission;
pub mod summary;

pub use points::ALLOWED_POINTS;
pub use principal::Principal;
pub use submission::SubmissionResult;
pub use summary::RankSummary;
