use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::debug;

use crate::auth::domain::AuthUser;
use crate::sessions::{generate_token, CurrentUser, IssuedSession, SessionError, SessionStore};

/// Session store backed by the `session` table.
pub struct SeaOrmSessionStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl SessionStore for SeaOrmSessionStore {
    async fn create(&self, user: &AuthUser, ttl: Duration) -> Result<IssuedSession, SessionError> {
        let token = generate_token();
        let expires_at = Utc::now() + ttl;
        models::session::create(&self.db, user.id, &token, expires_at.into())
            .await
            .map_err(|e| SessionError::Repository(e.to_string()))?;
        Ok(IssuedSession { token, expires_at })
    }

    async fn resolve(&self, token: &str) -> Result<Option<CurrentUser>, SessionError> {
        let Some(session) = models::session::find_by_token(&self.db, token)
            .await
            .map_err(|e| SessionError::Repository(e.to_string()))?
        else {
            return Ok(None);
        };

        if session.expires_at < Utc::now() {
            // Lazy cleanup; an expired row is as good as absent.
            let _ = models::session::delete_by_token(&self.db, token)
                .await
                .map_err(|e| SessionError::Repository(e.to_string()))?;
            debug!(session_id = %session.id, "expired session removed");
            return Ok(None);
        }

        let user = models::user::Entity::find_by_id(session.user_id)
            .one(&self.db)
            .await
            .map_err(|e| SessionError::Repository(e.to_string()))?;
        Ok(user.map(|u| CurrentUser { id: u.id, email: u.email, name: u.name }))
    }

    async fn revoke(&self, token: &str) -> Result<bool, SessionError> {
        models::session::delete_by_token(&self.db, token)
            .await
            .map_err(|e| SessionError::Repository(e.to_string()))
    }
}
