use serde::{Deserialize, Serialize};

/// JWT payload as it travels on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    pub sub: String,      // user ID
    pub username: String,
    pub role: String,
    pub iat: i64,         // issued at (unix timestamp)
    pub exp: i64,         // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub issued_at: i64,
    pub expires_at: i64,
}
