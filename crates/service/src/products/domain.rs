use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create/update payload; both operations carry the full field set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

/// Audit reference shown next to a product; display only, never consulted
/// for authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A product row with its creator/updater references resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(flatten)]
    pub product: models::product::Model,
    pub created_by_user: Option<UserRef>,
    pub updated_by_user: Option<UserRef>,
}
