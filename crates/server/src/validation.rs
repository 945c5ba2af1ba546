//! Declarative request validation with field-level messages.
//!
//! These checks run before any service call; a non-empty result becomes a
//! 400 with the collected `errors` array. The service layer re-checks its
//! own invariants independently.

use common::types::FieldError;
use models::product::CATEGORIES;
use service::auth::domain::{LoginInput, SignupInput};
use service::products::domain::ProductInput;

fn email_is_valid(email: &str) -> bool {
    let e = email.trim();
    !e.is_empty() && e.contains('@') && !e.starts_with('@') && !e.ends_with('@')
}

pub fn validate_signup(input: &SignupInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.name.trim().chars().count() < 2 {
        errors.push(FieldError::new("name", "Name must be at least 2 characters long"));
    }
    if !email_is_valid(&input.email) {
        errors.push(FieldError::new("email", "Please enter a valid email"));
    }
    if input.password.chars().count() < 6 {
        errors.push(FieldError::new("password", "Password must be at least 6 characters long"));
    }
    errors
}

pub fn validate_login(input: &LoginInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !email_is_valid(&input.email) {
        errors.push(FieldError::new("email", "Please enter a valid email"));
    }
    if input.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    errors
}

pub fn validate_product(input: &ProductInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Product name is required"));
    }
    if input.description.trim().chars().count() < 10 {
        errors.push(FieldError::new("description", "Description must be at least 10 characters long"));
    }
    if !input.price.is_finite() || input.price < 0.0 {
        errors.push(FieldError::new("price", "Price must be a positive number"));
    }
    if !CATEGORIES.contains(&input.category.as_str()) {
        errors.push(FieldError::new("category", "Please select a valid category"));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, description: &str, price: f64, category: &str) -> ProductInput {
        ProductInput {
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(validate_product(&product("X", "a proper description", 10.0, "Books")).is_empty());
        assert!(validate_product(&product("X", "a proper description", 0.0, "Other")).is_empty());
    }

    #[test]
    fn each_bad_field_is_reported() {
        let errors = validate_product(&product(" ", "short", -5.0, "Groceries"));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "description", "price", "category"]);
    }

    #[test]
    fn signup_rules_match_the_declared_constraints() {
        let ok = SignupInput {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
        };
        assert!(validate_signup(&ok).is_empty());

        let bad = SignupInput { name: "A".into(), email: "nope".into(), password: "12345".into() };
        let errors = validate_signup(&bad);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn login_requires_password_presence_only() {
        let input = LoginInput { email: "ada@example.com".into(), password: "x".into() };
        assert!(validate_login(&input).is_empty());
        let input = LoginInput { email: "ada@example.com".into(), password: "".into() };
        assert_eq!(validate_login(&input).len(), 1);
    }
}
