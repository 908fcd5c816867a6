//! Capability port exposing the signed-in user.

use crate::domain::UserId;

/// Read access to the current session.
///
/// Mutating services take this instead of reaching for global state, so a
/// test can sign a user in or out by swapping the provider.
#[cfg_attr(test, mockall::automock)]
pub trait SessionProvider: Send + Sync {
    /// The signed-in user, or `None` when signed out.
    fn current_user(&self) -> Option<UserId>;
}

/// Fixture provider with a fixed answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSession(pub Option<UserId>);

impl FixtureSession {
    /// Provider reporting `user` as signed in.
    #[must_use]
    pub const fn signed_in(user: UserId) -> Self {
        Self(Some(user))
    }

    /// Provider reporting no session.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self(None)
    }
}

impl SessionProvider for FixtureSession {
    fn current_user(&self) -> Option<UserId> {
        self.0
    }
}
