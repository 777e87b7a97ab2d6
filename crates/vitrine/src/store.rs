//! Key-by-id stores for users and products
//!
//! Flows only see these traits. [`crate::memory::MemoryStore`] implements both
//! and is what the CLI and the tests run against.

use crate::models::{NewUser, Product, ProductInput, User, UserUpdate};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("e-mail already registered: {0}")]
    DuplicateEmail(String),

    #[error("user id {0} is already taken")]
    IdTaken(i64),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("failed to access store snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid store snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub trait UserStore {
    /// Insert a user, assigning the next id
    fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    fn user_by_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    fn password_hash_by_email(&self, email: &str) -> Result<Option<String>, StoreError>;

    /// Set or clear the session token of the user with this e-mail.
    /// Returns whether a user matched.
    fn set_token_by_email(&self, token: Option<&str>, email: &str) -> Result<bool, StoreError>;

    fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, StoreError>;

    fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, StoreError>;

    fn delete_user(&self, id: i64) -> Result<bool, StoreError>;

    /// All users ordered by id
    fn all_users(&self) -> Result<Vec<User>, StoreError>;
}

pub trait ProductStore {
    /// Insert a product, assigning the next id
    fn insert_product(&self, product: ProductInput) -> Result<Product, StoreError>;

    fn product_by_id(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Replace the stored fields. Returns whether the product existed.
    fn update_product(&self, product: &Product) -> Result<bool, StoreError>;

    fn delete_product(&self, id: i64) -> Result<bool, StoreError>;

    /// All products ordered by id
    fn all_products(&self) -> Result<Vec<Product>, StoreError>;
}
