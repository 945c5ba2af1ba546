use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    token: &str,
    expires_at: DateTimeWithTimeZone,
) -> Result<Model, errors::ModelError> {
    if token.trim().is_empty() {
        return Err(errors::ModelError::Validation("session token required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        token: Set(token.to_string()),
        user_id: Set(user_id),
        created_at: Set(Utc::now().into()),
        expires_at: Set(expires_at),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_token(db: &DatabaseConnection, token: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Token.eq(token))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn delete_by_token(db: &DatabaseConnection, token: &str) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Token.eq(token))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
