//! FILENAME: core/dashboard/src/auth.rs
//! Authentication collaborator interface.
//!
//! How the elevated capability is granted and verified is up to the
//! implementor. The table only ever asks through `PrivilegeGate`.

use serde::{Deserialize, Serialize};
use table_engine::PrivilegeGate;

use crate::error::AuthFailure;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

pub trait Authenticator {
    fn is_privileged(&self) -> bool;

    /// Verifies `credentials` and grants the capability on success.
    fn authenticate(&mut self, credentials: &Credentials) -> bool;

    fn logout(&mut self);
}

/// Runs `authenticate` and reports a rejection as `AuthFailure`.
pub fn login<A: Authenticator + ?Sized>(auth: &mut A, credentials: &Credentials) -> Result<(), AuthFailure> {
    if auth.authenticate(credentials) {
        log::info!("[AUTH] '{}' granted elevated access", credentials.username);
        Ok(())
    } else {
        log::warn!("[AUTH] rejected credentials for '{}'", credentials.username);
        Err(AuthFailure)
    }
}

/// Presents an `Authenticator` to the table as a `PrivilegeGate`.
pub struct AuthGate<'a, A: Authenticator + ?Sized>(pub &'a A);

impl<A: Authenticator + ?Sized> PrivilegeGate for AuthGate<'_, A> {
    fn is_privileged(&self, _column: &str) -> bool {
        self.0.is_privileged()
    }

    fn may_add_rows(&self) -> bool {
        self.0.is_privileged()
    }
}
