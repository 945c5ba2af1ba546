pub mod auth;
pub mod errors;
pub mod identity;
pub mod products;
pub mod sessions;
