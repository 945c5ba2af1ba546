use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::identity;
use crate::products::domain::{ProductInput, ProductRecord, UserRef};
use crate::products::repository::ProductRepository;
use crate::sessions::CurrentUser;

/// Application service enforcing the ownership contract over products.
///
/// Reads are open to any authenticated identity; mutation and deletion are
/// gated on the stored `created_by` matching the acting identity. Existence
/// is always checked before ownership, so callers cannot distinguish "not
/// yours" from "not there" by probing with mutations.
pub struct ProductService<R: ProductRepository> {
    repo: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    fn validate(input: &ProductInput) -> Result<ProductInput, ServiceError> {
        let name = models::product::validate_name(&input.name).map_err(ServiceError::from_model)?;
        let description =
            models::product::validate_description(&input.description).map_err(ServiceError::from_model)?;
        let price = models::product::validate_price(input.price).map_err(ServiceError::from_model)?;
        let category =
            models::product::validate_category(&input.category).map_err(ServiceError::from_model)?;
        Ok(ProductInput { name, description, price, category })
    }

    /// No ownership filtering on reads: every authenticated identity sees
    /// all records, newest first. Only mutation is owner-scoped.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn list(&self, actor: &CurrentUser) -> Result<Vec<ProductRecord>, ServiceError> {
        let products = self.repo.list().await?;
        info!(user = %actor.name, email = %actor.email, count = products.len(), "products_accessed");
        self.with_audit_refs(products).await
    }

    #[instrument(skip(self, actor, input), fields(user_id = %actor.id))]
    pub async fn create(&self, actor: &CurrentUser, input: ProductInput) -> Result<ProductRecord, ServiceError> {
        let input = Self::validate(&input)?;
        let created = self.repo.create(&input, actor.id).await?;
        info!(product_id = %created.id, user_id = %actor.id, "product_created");
        self.one_with_audit_refs(created).await
    }

    #[instrument(skip(self, actor, input), fields(user_id = %actor.id, product_id = %id))]
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        input: ProductInput,
    ) -> Result<ProductRecord, ServiceError> {
        let input = Self::validate(&input)?;

        // Existence first; the ownership check never runs for a missing row.
        let existing = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("product"))?;
        if !identity::same_identity(&actor.id, &existing.created_by) {
            return Err(ServiceError::Forbidden(
                "you can only update your own products".into(),
            ));
        }

        let updated = self
            .repo
            .update(id, &input, actor.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))?;
        info!(product_id = %updated.id, user = %actor.name, email = %actor.email, "product_updated");
        self.one_with_audit_refs(updated).await
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.id, product_id = %id))]
    pub async fn delete(&self, actor: &CurrentUser, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("product"))?;
        if !identity::same_identity(&actor.id, &existing.created_by) {
            return Err(ServiceError::Forbidden(
                "you can only delete your own products".into(),
            ));
        }

        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("product"));
        }
        info!(product_id = %id, user = %actor.name, email = %actor.email, "product_deleted");
        Ok(())
    }

    async fn one_with_audit_refs(&self, product: models::product::Model) -> Result<ProductRecord, ServiceError> {
        let mut records = self.with_audit_refs(vec![product]).await?;
        records.pop().ok_or_else(|| ServiceError::Db("record vanished during enrichment".into()))
    }

    /// Resolve creator/updater references in one batch lookup.
    async fn with_audit_refs(&self, products: Vec<models::product::Model>) -> Result<Vec<ProductRecord>, ServiceError> {
        let mut ids: Vec<Uuid> = Vec::new();
        for p in &products {
            if !ids.contains(&p.created_by) {
                ids.push(p.created_by);
            }
            if let Some(u) = p.updated_by {
                if !ids.contains(&u) {
                    ids.push(u);
                }
            }
        }
        let users: HashMap<Uuid, UserRef> = self
            .repo
            .users_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, UserRef { id: u.id, name: u.name, email: u.email }))
            .collect();

        Ok(products
            .into_iter()
            .map(|p| {
                let created_by_user = users.get(&p.created_by).cloned();
                let updated_by_user = p.updated_by.and_then(|u| users.get(&u).cloned());
                ProductRecord { product: p, created_by_user, updated_by_user }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::repository::mock::MockProductRepository;

    fn actor(id: Uuid, name: &str, email: &str) -> CurrentUser {
        CurrentUser { id, email: email.into(), name: name.into() }
    }

    fn input(name: &str, price: f64, category: &str) -> ProductInput {
        ProductInput {
            name: name.into(),
            description: "a proper description".into(),
            price,
            category: category.into(),
        }
    }

    fn service() -> (ProductService<MockProductRepository>, Arc<MockProductRepository>) {
        let repo = Arc::new(MockProductRepository::default());
        (ProductService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn non_owner_update_is_forbidden_and_leaves_record_unchanged() {
        let (svc, repo) = service();
        let alice = actor(Uuid::new_v4(), "Alice", "alice@example.com");
        let bob = actor(Uuid::new_v4(), "Bob", "bob@example.com");
        repo.add_user(alice.id, "Alice", "alice@example.com");

        let created = svc.create(&alice, input("X", 10.0, "Books")).await.unwrap();

        let err = svc.update(&bob, created.product.id, input("X", 99.0, "Books")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let stored = repo.stored(created.product.id).unwrap();
        assert_eq!(stored.price, 10.0);
        assert_eq!(stored.created_by, alice.id);
        assert!(stored.updated_by.is_none());
    }

    #[tokio::test]
    async fn non_owner_delete_is_forbidden_and_record_survives() {
        let (svc, repo) = service();
        let alice = actor(Uuid::new_v4(), "Alice", "alice@example.com");
        let bob = actor(Uuid::new_v4(), "Bob", "bob@example.com");
        repo.add_user(alice.id, "Alice", "alice@example.com");

        let created = svc.create(&alice, input("X", 10.0, "Books")).await.unwrap();
        let err = svc.delete(&bob, created.product.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(repo.stored(created.product.id).is_some());
    }

    #[tokio::test]
    async fn owner_update_succeeds_and_stamps_updated_by() {
        let (svc, repo) = service();
        let alice = actor(Uuid::new_v4(), "Alice", "alice@example.com");
        repo.add_user(alice.id, "Alice", "alice@example.com");

        let created = svc.create(&alice, input("X", 10.0, "Books")).await.unwrap();
        let updated = svc.update(&alice, created.product.id, input("X", 20.0, "Books")).await.unwrap();

        assert_eq!(updated.product.price, 20.0);
        assert_eq!(updated.product.created_by, alice.id);
        assert_eq!(updated.product.updated_by, Some(alice.id));
        assert_eq!(updated.updated_by_user.as_ref().unwrap().email, "alice@example.com");
    }

    #[tokio::test]
    async fn missing_product_is_not_found_before_ownership() {
        let (svc, _repo) = service();
        let anyone = actor(Uuid::new_v4(), "Anyone", "anyone@example.com");

        let err = svc.update(&anyone, Uuid::new_v4(), input("X", 1.0, "Books")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = svc.delete(&anyone, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_input_persists_nothing() {
        let (svc, repo) = service();
        let alice = actor(Uuid::new_v4(), "Alice", "alice@example.com");

        let err = svc.create(&alice, input("X", -1.0, "Books")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = svc.create(&alice, input("X", 1.0, "Groceries")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert!(svc.list(&alice).await.unwrap().is_empty());

        // Invalid update also leaves the stored row alone.
        let created = svc.create(&alice, input("X", 10.0, "Books")).await.unwrap();
        let err = svc.update(&alice, created.product.id, input("X", f64::NAN, "Books")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(repo.stored(created.product.id).unwrap().price, 10.0);
    }

    #[tokio::test]
    async fn list_returns_all_owners_products() {
        let (svc, repo) = service();
        let alice = actor(Uuid::new_v4(), "Alice", "alice@example.com");
        let bob = actor(Uuid::new_v4(), "Bob", "bob@example.com");
        repo.add_user(alice.id, "Alice", "alice@example.com");
        repo.add_user(bob.id, "Bob", "bob@example.com");

        svc.create(&alice, input("A", 1.0, "Books")).await.unwrap();
        svc.create(&bob, input("B", 2.0, "Sports")).await.unwrap();

        // Either identity sees both records; reads are not owner-scoped.
        let seen_by_alice = svc.list(&alice).await.unwrap();
        let seen_by_bob = svc.list(&bob).await.unwrap();
        assert_eq!(seen_by_alice.len(), 2);
        assert_eq!(seen_by_bob.len(), 2);
    }

    #[tokio::test]
    async fn ownership_scenario_end_to_end() {
        // User A creates {name:"X", price:10, category:"Books"}; B's update
        // is rejected; A's update to price 20 succeeds and stamps A.
        let (svc, repo) = service();
        let a = actor(Uuid::new_v4(), "A", "a@example.com");
        let b = actor(Uuid::new_v4(), "B", "b@example.com");
        repo.add_user(a.id, "A", "a@example.com");
        repo.add_user(b.id, "B", "b@example.com");

        let created = svc.create(&a, input("X", 10.0, "Books")).await.unwrap();

        let err = svc.update(&b, created.product.id, input("X", 20.0, "Books")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let updated = svc.update(&a, created.product.id, input("X", 20.0, "Books")).await.unwrap();
        assert_eq!(updated.product.price, 20.0);
        assert_eq!(updated.product.updated_by, Some(a.id));
        assert_eq!(updated.product.created_by, a.id);
    }
}
