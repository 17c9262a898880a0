use uuid::Uuid;

/// The authenticated acting user for a single call, already resolved by the
/// authentication layer. Carries only what the core needs: identity and the
/// administrator capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub is_superuser: bool,
}

impl Principal {
    pub fn new(user_id: Uuid, is_superuser: bool) -> Self {
        Self {
            user_id,
            is_superuser,
        }
    }
}
