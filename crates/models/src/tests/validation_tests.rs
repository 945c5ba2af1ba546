use crate::{product, user};

#[test]
fn category_set_is_closed() {
    for c in product::CATEGORIES {
        assert!(product::validate_category(c).is_ok(), "{c} should be valid");
    }
    assert!(product::validate_category("Groceries").is_err());
    assert!(product::validate_category("").is_err());
    // Case matters; the set is exact strings.
    assert!(product::validate_category("books").is_err());
}

#[test]
fn price_must_be_non_negative_and_finite() {
    assert_eq!(product::validate_price(0.0).unwrap(), 0.0);
    assert_eq!(product::validate_price(19.99).unwrap(), 19.99);
    assert!(product::validate_price(-0.01).is_err());
    assert!(product::validate_price(f64::NAN).is_err());
    assert!(product::validate_price(f64::INFINITY).is_err());
}

#[test]
fn description_requires_ten_characters() {
    assert!(product::validate_description("short").is_err());
    assert!(product::validate_description("   padded    ").is_err());
    assert_eq!(
        product::validate_description("  a proper description  ").unwrap(),
        "a proper description"
    );
}

#[test]
fn product_name_is_trimmed_and_required() {
    assert!(product::validate_name("   ").is_err());
    assert_eq!(product::validate_name(" Widget ").unwrap(), "Widget");
}

#[test]
fn email_normalization_lowercases() {
    assert_eq!(user::normalize_email("  Alice@Example.COM "), "alice@example.com");
}

#[test]
fn email_shape_is_checked() {
    assert!(user::validate_email("alice@example.com").is_ok());
    assert!(user::validate_email("no-at-sign").is_err());
    assert!(user::validate_email("@leading").is_err());
    assert!(user::validate_email("trailing@").is_err());
    assert!(user::validate_email("").is_err());
}
