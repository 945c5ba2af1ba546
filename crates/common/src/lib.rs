pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn field_error_serializes_field_and_message() {
        let e = types::FieldError::new("price", "Price must be a positive number");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["field"], "price");
        assert_eq!(json["message"], "Price must be a positive number");
    }
}
