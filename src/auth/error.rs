use thiserror::Error;

use crate::db::StoreError;

/// Failure kinds of the login / password lifecycle.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user and wrong password share this variant and its text.
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("User already exists")]
    UserExists,
    #[error("New password must differ from the old password")]
    PasswordUnchanged,
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Invalid token")]
    MalformedOrInvalidToken,
    #[error("failed to hash password: {0}")]
    HashingFailure(String),
    #[error("failed to sign token: {0}")]
    SigningFailure(String),
    #[error("failed to update password: {0}")]
    UpdateFailure(#[source] StoreError),
    #[error("credential store failure: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// True for kinds caused by the server, not by the caller.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::HashingFailure(_)
                | AuthError::SigningFailure(_)
                | AuthError::UpdateFailure(_)
                | AuthError::Store(_)
        )
    }
}
