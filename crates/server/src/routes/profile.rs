use axum::{Extension, Json};
use serde::Serialize;

use service::sessions::CurrentUser;

#[derive(Serialize)]
pub struct ProfileOutput {
    pub success: bool,
    pub user: CurrentUser,
}

/// The gate already resolved the session against the store, so the returned
/// identity is current as of this request.
#[utoipa::path(get, path = "/api/profile", tag = "profile", responses((status = 200, description = "OK"), (status = 401, description = "Unauthorized")))]
pub async fn get_profile(Extension(user): Extension<CurrentUser>) -> Json<ProfileOutput> {
    Json(ProfileOutput { success: true, user })
}
