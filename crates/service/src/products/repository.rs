use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::products::domain::ProductInput;

/// Persistence seam for products. Implementations persist what they are
/// given; authorization and input validation happen in the service above.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<models::product::Model>, ServiceError>;
    async fn create(&self, input: &ProductInput, created_by: Uuid) -> Result<models::product::Model, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<models::product::Model>, ServiceError>;
    async fn update(&self, id: Uuid, input: &ProductInput, updated_by: Uuid) -> Result<Option<models::product::Model>, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;

    /// Batch-resolve users for audit display on returned records.
    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<models::user::Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn list(&self) -> Result<Vec<models::product::Model>, ServiceError> {
        models::product::list_newest_first(&self.db).await.map_err(ServiceError::from_model)
    }

    async fn create(&self, input: &ProductInput, created_by: Uuid) -> Result<models::product::Model, ServiceError> {
        models::product::create(&self.db, &input.name, &input.description, input.price, &input.category, created_by)
            .await
            .map_err(ServiceError::from_model)
    }

    async fn get(&self, id: Uuid) -> Result<Option<models::product::Model>, ServiceError> {
        models::product::find_by_id(&self.db, id).await.map_err(ServiceError::from_model)
    }

    async fn update(&self, id: Uuid, input: &ProductInput, updated_by: Uuid) -> Result<Option<models::product::Model>, ServiceError> {
        models::product::update_fields(&self.db, id, &input.name, &input.description, input.price, &input.category, updated_by)
            .await
            .map_err(ServiceError::from_model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        models::product::delete_by_id(&self.db, id).await.map_err(ServiceError::from_model)
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<models::user::Model>, ServiceError> {
        models::user::find_by_ids(&self.db, ids).await.map_err(ServiceError::from_model)
    }
}

/// In-memory mock for service-level tests.
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockProductRepository {
        products: Mutex<Vec<models::product::Model>>,
        users: Mutex<HashMap<Uuid, (String, String)>>, // id -> (name, email)
    }

    impl MockProductRepository {
        /// Make a user resolvable for audit display.
        pub fn add_user(&self, id: Uuid, name: &str, email: &str) {
            self.users.lock().unwrap().insert(id, (name.to_string(), email.to_string()));
        }

        pub fn stored(&self, id: Uuid) -> Option<models::product::Model> {
            self.products.lock().unwrap().iter().find(|p| p.id == id).cloned()
        }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn list(&self) -> Result<Vec<models::product::Model>, ServiceError> {
            let mut items = self.products.lock().unwrap().clone();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(items)
        }

        async fn create(&self, input: &ProductInput, created_by: Uuid) -> Result<models::product::Model, ServiceError> {
            let now = Utc::now().into();
            let m = models::product::Model {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                description: input.description.clone(),
                price: input.price,
                category: input.category.clone(),
                created_by,
                updated_by: None,
                created_at: now,
                updated_at: now,
            };
            self.products.lock().unwrap().push(m.clone());
            Ok(m)
        }

        async fn get(&self, id: Uuid) -> Result<Option<models::product::Model>, ServiceError> {
            Ok(self.stored(id))
        }

        async fn update(&self, id: Uuid, input: &ProductInput, updated_by: Uuid) -> Result<Option<models::product::Model>, ServiceError> {
            let mut products = self.products.lock().unwrap();
            let Some(m) = products.iter_mut().find(|p| p.id == id) else {
                return Ok(None);
            };
            m.name = input.name.clone();
            m.description = input.description.clone();
            m.price = input.price;
            m.category = input.category.clone();
            m.updated_by = Some(updated_by);
            m.updated_at = Utc::now().into();
            Ok(Some(m.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut products = self.products.lock().unwrap();
            let before = products.len();
            products.retain(|p| p.id != id);
            Ok(products.len() < before)
        }

        async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<models::user::Model>, ServiceError> {
            let users = self.users.lock().unwrap();
            let now = Utc::now().into();
            Ok(ids
                .iter()
                .filter_map(|id| {
                    users.get(id).map(|(name, email)| models::user::Model {
                        id: *id,
                        email: email.clone(),
                        name: name.clone(),
                        created_at: now,
                        updated_at: now,
                    })
                })
                .collect())
        }
    }
}
