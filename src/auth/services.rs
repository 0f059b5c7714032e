use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        error::AuthError,
        jwt::JwtKeys,
        password::{hash_password, verify_dummy, verify_password},
        repo::{StoreError, UserStore},
        repo_types::{NewUser, User, DEFAULT_ROLE},
    },
    config::AuthPolicy,
};

/// Login, user creation and password change over a [`UserStore`].
///
/// Holds no mutable state of its own; concurrent calls are safe as long as
/// the store enforces unique usernames atomically.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
    policy: AuthPolicy,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, keys: JwtKeys, policy: AuthPolicy) -> Self {
        Self {
            store,
            keys,
            policy,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn policy(&self) -> AuthPolicy {
        self.policy
    }

    pub async fn find_user(&self, user_id: i64) -> Result<Option<User>, AuthError> {
        Ok(self.store.find_by_id(user_id).await?)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, User), AuthError> {
        let user = match self.store.find_by_username(username).await? {
            Some(u) => u,
            None => {
                verify_dummy(password);
                warn!("login unknown username");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.issue(user.id, &user.username, &user.role)?;
        info!(user_id = user.id, "user logged in");
        Ok((token, user))
    }

    #[instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<User, AuthError> {
        if self.store.find_by_username(username).await?.is_some() {
            warn!("username already taken");
            return Err(AuthError::UserExists);
        }
        if let (true, Some(email)) = (self.policy.unique_email, email) {
            if self.store.find_by_email(email).await?.is_some() {
                warn!("email already taken");
                return Err(AuthError::UserExists);
            }
        }

        let password_hash = hash_password(password)?;
        let new_user = NewUser {
            username: username.to_string(),
            password_hash,
            email: email.map(String::from),
            role: DEFAULT_ROLE.to_string(),
        };

        let user = match self.store.insert(new_user).await {
            Ok(u) => u,
            // lost the race against a concurrent insert of the same username
            Err(StoreError::Duplicate) => {
                warn!("username taken during insert");
                return Err(AuthError::UserExists);
            }
            Err(e) => {
                error!(error = %e, "insert user failed");
                return Err(e.into());
            }
        };

        info!(user_id = user.id, "user created");
        Ok(user)
    }

    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<User, AuthError> {
        let user = match self.store.find_by_id(user_id).await? {
            Some(u) => u,
            None => {
                warn!("password change for unknown user");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(old_password, &user.password_hash) {
            warn!("password change with wrong old password");
            return Err(AuthError::InvalidCredentials);
        }

        if self.policy.reject_unchanged_password && old_password == new_password {
            return Err(AuthError::PasswordUnchanged);
        }

        let password_hash = hash_password(new_password)?;
        let updated = self
            .store
            .update_password_hash(user.id, &password_hash)
            .await
            .map_err(|e| {
                error!(error = %e, "update password hash failed");
                AuthError::UpdateFailure(e)
            })?;

        info!("password changed");
        Ok(updated)
    }
}
