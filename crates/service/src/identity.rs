//! Canonical identity comparison for ownership checks.
//!
//! Identifiers can reach the ownership check from different sources (session
//! store, path parameter, stored row), so both sides are reduced to one
//! canonical string form before the equality test.

use uuid::Uuid;

/// Lowercase hyphenated form; the single representation used for comparison.
pub fn canonical(id: &Uuid) -> String {
    id.as_hyphenated().to_string().to_ascii_lowercase()
}

/// Stable equality of identifiers via their canonical forms.
pub fn same_identity(a: &Uuid, b: &Uuid) -> bool {
    canonical(a) == canonical(b)
}
