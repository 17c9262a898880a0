use types::Principal;

use crate::error::QuizError;

/// Administrator capability check, applied before any mutating record
/// operation. Gameplay and self-service stats never pass through here.
pub fn require_admin(principal: &Principal) -> Result<(), QuizError> {
    if principal.is_superuser {
        Ok(())
    } else {
        Err(QuizError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn admins_pass() {
        let admin = Principal::new(Uuid::new_v4(), true);
        assert!(require_admin(&admin).is_ok());
    }

    #[test]
    fn everyone_else_is_rejected() {
        let player = Principal::new(Uuid::new_v4(), false);
        assert!(matches!(
            require_admin(&player),
            Err(QuizError::Unauthorized)
        ));
    }
}
