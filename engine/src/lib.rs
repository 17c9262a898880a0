pub mod error;
pub mod gate;
pub mod play;
pub mod scores;
pub mod seed;
pub mod service;
pub mod validate;

pub use error::QuizError;
pub use gate::require_admin;
pub use play::submit;
pub use scores::{rank_summary, total_points};
pub use service::QuizService;
pub use validate::{validate, FieldKind, FieldSpec};
