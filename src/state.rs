use remote_authority::{Identity, Role};

/// Full observable state of a [`crate::SessionStore`].
///
/// The predicates are computed from `identity` on every call and are never
/// stored alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Authenticated principal, or `None` when logged out.
    pub identity: Option<Identity>,
    /// True while an authenticate call is in flight.
    pub busy: bool,
    /// Message from the most recent failed authenticate call.
    pub last_error: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.role() == role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.has_role(Role::User)
    }
}
