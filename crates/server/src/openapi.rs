use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct SignupRequest { pub name: String, pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::profile::get_profile,
        crate::routes::products::list,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            SignupRequest,
            LoginRequest,
            ProductRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "profile"),
        (name = "products")
    )
)]
pub struct ApiDoc;
