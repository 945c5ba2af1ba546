use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, user};

/// The fixed category set; anything outside it is rejected at validation.
pub const CATEGORIES: [&str; 6] = ["Electronics", "Clothing", "Books", "Home", "Sports", "Other"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    CreatedBy,
    UpdatedBy,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::CreatedBy => Entity::belongs_to(user::Entity)
                .from(Column::CreatedBy)
                .to(user::Column::Id)
                .into(),
            Relation::UpdatedBy => Entity::belongs_to(user::Entity)
                .from(Column::UpdatedBy)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, errors::ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("product name is required".into()));
    }
    Ok(trimmed.to_string())
}

pub fn validate_description(description: &str) -> Result<String, errors::ModelError> {
    let trimmed = description.trim();
    if trimmed.chars().count() < 10 {
        return Err(errors::ModelError::Validation(
            "description must be at least 10 characters long".into(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_price(price: f64) -> Result<f64, errors::ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(errors::ModelError::Validation("price must be a non-negative number".into()));
    }
    Ok(price)
}

pub fn validate_category(category: &str) -> Result<String, errors::ModelError> {
    if !CATEGORIES.contains(&category) {
        return Err(errors::ModelError::Validation("invalid category".into()));
    }
    Ok(category.to_string())
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    price: f64,
    category: &str,
    created_by: Uuid,
) -> Result<Model, errors::ModelError> {
    let name = validate_name(name)?;
    let description = validate_description(description)?;
    let price = validate_price(price)?;
    let category = validate_category(category)?;

    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(description),
        price: Set(price),
        category: Set(category),
        created_by: Set(created_by),
        updated_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Newest first, matching the original listing order.
pub async fn list_newest_first(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite the mutable fields and stamp `updated_by`. `created_by` is left
/// untouched; callers have already authorized the write.
pub async fn update_fields(
    db: &DatabaseConnection,
    id: Uuid,
    name: &str,
    description: &str,
    price: f64,
    category: &str,
    updated_by: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    let name = validate_name(name)?;
    let description = validate_description(description)?;
    let price = validate_price(price)?;
    let category = validate_category(category)?;

    let Some(found) = find_by_id(db, id).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.name = Set(name);
    am.description = Set(description);
    am.price = Set(price);
    am.category = Set(category);
    am.updated_by = Set(Some(updated_by));
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(Some(updated))
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
