use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use service::auth::domain::{AuthUser, LoginInput, SignupInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthService;
use service::products::repository::SeaOrmProductRepository;
use service::products::service::ProductService;
use service::sessions::SessionStore;

use crate::errors::JsonApiError;
use crate::validation;

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub products: Arc<ProductService<SeaOrmProductRepository>>,
    pub sessions: Arc<dyn SessionStore>,
    pub session_cfg: configs::SessionConfig,
}

#[derive(Serialize)]
pub struct UserOutput {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<AuthUser> for UserOutput {
    fn from(u: AuthUser) -> Self {
        Self { id: u.id, name: u.name, email: u.email }
    }
}

#[derive(Serialize)]
pub struct SignupOutput {
    pub success: bool,
    pub message: String,
    pub user: UserOutput,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub success: bool,
    pub message: String,
    pub user: UserOutput,
}

#[derive(Serialize)]
pub struct LogoutOutput {
    pub success: bool,
    pub message: String,
}

fn session_cookie(state: &ServerState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(state.session_cfg.cookie_name.clone(), token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.session_cfg.secure);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[utoipa::path(post, path = "/api/auth/signup", tag = "auth", request_body = crate::openapi::SignupRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn signup(
    State(state): State<ServerState>,
    Json(input): Json<SignupInput>,
) -> Result<(StatusCode, Json<SignupOutput>), JsonApiError> {
    let errors = validation::validate_signup(&input);
    if !errors.is_empty() {
        return Err(JsonApiError::validation(errors));
    }

    let user = state.auth.signup(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupOutput {
            success: true,
            message: "User registered successfully".into(),
            user: user.into(),
        }),
    ))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 400, description = "Validation Error"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let errors = validation::validate_login(&input);
    if !errors.is_empty() {
        return Err(JsonApiError::validation(errors));
    }

    let user = state.auth.login(input).await?;
    let issued = state
        .sessions
        .create(&user, Duration::hours(state.session_cfg.ttl_hours))
        .await?;

    info!(user_id = %user.id, expires_at = %issued.expires_at, "session_issued");
    let jar = jar.add(session_cookie(&state, issued.token));
    Ok((
        jar,
        Json(LoginOutput {
            success: true,
            message: "Login successful".into(),
            user: user.into(),
        }),
    ))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 200, description = "Logged Out"), (status = 401, description = "Unauthorized")))]
pub async fn logout(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<LogoutOutput>), JsonApiError> {
    if let Some(cookie) = jar.get(&state.session_cfg.cookie_name) {
        let revoked = state.sessions.revoke(cookie.value()).await?;
        info!(revoked, "session_revoked");
    }
    let jar = jar.remove(Cookie::from(state.session_cfg.cookie_name.clone()));
    Ok((jar, Json(LogoutOutput { success: true, message: "Logged out successfully".into() })))
}
