use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, warn};

use crate::{
    auth::{
        claims::{Claims, TokenClaims},
        error::AuthError,
    },
    config::JwtConfig,
};

/// Upper bound on the configured token lifetime: one year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Signs and verifies bearer tokens. Stateless: a token stays valid until `exp`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    leeway: u64,
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        let ttl_minutes = cfg.ttl_minutes.clamp(1, MAX_TTL_MINUTES);
        if ttl_minutes != cfg.ttl_minutes {
            warn!(
                configured = cfg.ttl_minutes,
                used = ttl_minutes,
                "JWT ttl out of range; clamped"
            );
        }
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs(ttl_minutes as u64 * 60),
            leeway: cfg.leeway_seconds,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i64, username: &str, role: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, username, role, OffsetDateTime::now_utc())
    }

    pub fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        role: &str,
        issued_at: OffsetDateTime,
    ) -> Result<String, AuthError> {
        let exp = issued_at
            .checked_add(TimeDuration::seconds(self.ttl.as_secs() as i64))
            .ok_or_else(|| AuthError::SigningFailure("token expiry out of range".into()))?;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iat: issued_at.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            error!(error = %e, "jwt encode failed");
            AuthError::SigningFailure(e.to_string())
        })?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        let data = decode::<TokenClaims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::MalformedOrInvalidToken,
            }
        })?;
        let TokenClaims {
            sub,
            username,
            role,
            iat,
            exp,
            ..
        } = data.claims;
        let user_id = sub
            .parse::<i64>()
            .map_err(|_| AuthError::MalformedOrInvalidToken)?;
        debug!(user_id, "jwt verified");
        Ok(Claims {
            user_id,
            username,
            role,
            issued_at: iat,
            expires_at: exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(secret: &str, issuer: &str, audience: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 60 * 24,
            leeway_seconds: 0,
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&cfg("dev-secret", "test-issuer", "test-aud"))
    }

    #[test]
    fn issue_and_verify_roundtrips_identity() {
        let keys = keys();
        let token = keys.issue(7, "alice", "admin").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.expires_at - claims.issued_at, 24 * 60 * 60);
    }

    #[test]
    fn token_issued_just_inside_ttl_is_valid() {
        let keys = keys();
        let issued = OffsetDateTime::now_utc() - TimeDuration::hours(23);
        let token = keys.issue_at(1, "alice", "admin", issued).unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn token_older_than_ttl_is_expired() {
        let keys = keys();
        let issued = OffsetDateTime::now_utc() - TimeDuration::hours(25);
        let token = keys.issue_at(1, "alice", "admin", issued).unwrap();
        assert!(matches!(keys.verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn leeway_tolerates_small_skew() {
        let mut c = cfg("dev-secret", "iss", "aud");
        c.leeway_seconds = 120;
        let keys = JwtKeys::from_config(&c);
        let issued = OffsetDateTime::now_utc() - TimeDuration::hours(24) - TimeDuration::seconds(30);
        let token = keys.issue_at(1, "alice", "admin", issued).unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = keys().issue(1, "alice", "admin").unwrap();
        let other = JwtKeys::from_config(&cfg("other-secret", "test-issuer", "test-aud"));
        assert!(matches!(
            other.verify(&token),
            Err(AuthError::MalformedOrInvalidToken)
        ));
    }

    #[test]
    fn wrong_issuer_or_audience_is_invalid() {
        let token = keys().issue(1, "alice", "admin").unwrap();
        let other = JwtKeys::from_config(&cfg("dev-secret", "bad-iss", "bad-aud"));
        assert!(matches!(
            other.verify(&token),
            Err(AuthError::MalformedOrInvalidToken)
        ));
    }

    #[test]
    fn truncated_or_garbage_token_is_invalid() {
        let keys = keys();
        let token = keys.issue(1, "alice", "admin").unwrap();
        let truncated = &token[..token.len() - 5];
        assert!(matches!(
            keys.verify(truncated),
            Err(AuthError::MalformedOrInvalidToken)
        ));
        assert!(matches!(
            keys.verify("not.a.token"),
            Err(AuthError::MalformedOrInvalidToken)
        ));
    }

    #[test]
    fn non_numeric_subject_is_invalid() {
        let now = OffsetDateTime::now_utc();
        let claims = TokenClaims {
            sub: "alice".into(),
            username: "alice".into(),
            role: "admin".into(),
            iat: now.unix_timestamp(),
            exp: (now + TimeDuration::hours(1)).unix_timestamp(),
            iss: "test-issuer".into(),
            aud: "test-aud".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert!(matches!(
            keys().verify(&token),
            Err(AuthError::MalformedOrInvalidToken)
        ));
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let keys = keys();
        let now = OffsetDateTime::now_utc();
        let claims = TokenClaims {
            sub: "1".into(),
            username: "alice".into(),
            role: "admin".into(),
            iat: now.unix_timestamp(),
            exp: (now + TimeDuration::hours(1)).unix_timestamp(),
            iss: "test-issuer".into(),
            aud: "test-aud".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert!(matches!(
            keys.verify(&token),
            Err(AuthError::MalformedOrInvalidToken)
        ));
    }

    #[test]
    fn out_of_range_ttl_is_clamped() {
        let mut c = cfg("dev-secret", "iss", "aud");
        c.ttl_minutes = i64::MAX;
        let keys = JwtKeys::from_config(&c);
        assert_eq!(keys.ttl(), Duration::from_secs(MAX_TTL_MINUTES as u64 * 60));
        let token = keys.issue(1, "alice", "admin").unwrap();
        assert!(keys.verify(&token).is_ok());

        c.ttl_minutes = -5;
        assert_eq!(JwtKeys::from_config(&c).ttl(), Duration::from_secs(60));
    }

    #[test]
    fn expiry_past_the_calendar_is_an_error() {
        let err = keys()
            .issue_at(1, "alice", "admin", time::PrimitiveDateTime::MAX.assume_utc())
            .unwrap_err();
        assert!(matches!(err, AuthError::SigningFailure(_)));
    }
}
