use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthUser, LoginInput, SignupInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub password_algorithm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Create a new account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::SignupInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = SignupInput { name: "Test".into(), email: "user@example.com".into(), password: "Secret1".into() };
    /// let user = tokio_test::block_on(svc.signup(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signup(&self, input: SignupInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 6 {
            return Err(AuthError::Validation("password too short (>=6)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&input.email, &input.name).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, "user_signed_up");
        Ok(user)
    }

    /// Verify credentials and return the account identity. Session issuance
    /// is the caller's concern; every failure collapses to `Unauthorized` so
    /// the response does not reveal whether the email exists.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{SignupInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::default());
    /// let _ = tokio_test::block_on(svc.signup(SignupInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let user = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(user.email, "u@e.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthUser, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        info!(user_id = %user.id, email = %user.email, "user_logged_in");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn service() -> AuthService<MockAuthRepository> {
        AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = service();
        let input = SignupInput { name: "A".into(), email: "dup@example.com".into(), password: "secret1".into() };
        svc.signup(input.clone()).await.unwrap();
        assert!(matches!(svc.signup(input).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn signup_normalizes_email_for_lookup() {
        let svc = service();
        svc.signup(SignupInput { name: "A".into(), email: "Mixed@Example.COM".into(), password: "secret1".into() })
            .await
            .unwrap();
        let user = svc
            .login(LoginInput { email: "mixed@example.com".into(), password: "secret1".into() })
            .await
            .unwrap();
        assert_eq!(user.email, "mixed@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = service();
        svc.signup(SignupInput { name: "A".into(), email: "a@example.com".into(), password: "secret1".into() })
            .await
            .unwrap();
        let err = svc
            .login(LoginInput { email: "a@example.com".into(), password: "nope".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized_not_not_found() {
        let svc = service();
        let err = svc
            .login(LoginInput { email: "ghost@example.com".into(), password: "whatever".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let svc = service();
        let err = svc
            .signup(SignupInput { name: "A".into(), email: "short@example.com".into(), password: "abc".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
