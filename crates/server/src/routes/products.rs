use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use service::products::domain::{ProductInput, ProductRecord};
use service::sessions::CurrentUser;

use crate::errors::JsonApiError;
use crate::validation;

use super::auth::ServerState;

#[derive(Serialize)]
pub struct ProductOutput {
    pub success: bool,
    pub message: String,
    pub product: ProductRecord,
}

#[derive(Serialize)]
pub struct ProductListOutput {
    pub success: bool,
    pub count: usize,
    pub products: Vec<ProductRecord>,
}

#[derive(Serialize)]
pub struct ProductDeletedOutput {
    pub success: bool,
    pub message: String,
}

fn check(input: &ProductInput) -> Result<(), JsonApiError> {
    let errors = validation::validate_product(input);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(JsonApiError::validation(errors))
    }
}

#[utoipa::path(get, path = "/api/products", tag = "products", responses((status = 200, description = "List OK"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ProductListOutput>, JsonApiError> {
    let products = state.products.list(&user).await?;
    Ok(Json(ProductListOutput { success: true, count: products.len(), products }))
}

#[utoipa::path(post, path = "/api/products", tag = "products", request_body = crate::openapi::ProductRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 401, description = "Unauthorized")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductOutput>), JsonApiError> {
    check(&input)?;
    let product = state.products.create(&user, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductOutput {
            success: true,
            message: "Product created successfully".into(),
            product,
        }),
    ))
}

#[utoipa::path(put, path = "/api/products/{id}", tag = "products", params(("id" = Uuid, Path, description = "Product ID")), request_body = crate::openapi::ProductRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductOutput>, JsonApiError> {
    check(&input)?;
    let product = state.products.update(&user, id, input).await?;
    Ok(Json(ProductOutput {
        success: true,
        message: "Product updated successfully".into(),
        product,
    }))
}

#[utoipa::path(delete, path = "/api/products/{id}", tag = "products", params(("id" = Uuid, Path, description = "Product ID")), responses((status = 200, description = "Deleted"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDeletedOutput>, JsonApiError> {
    state.products.delete(&user, id).await?;
    Ok(Json(ProductDeletedOutput {
        success: true,
        message: "Product deleted successfully".into(),
    }))
}
