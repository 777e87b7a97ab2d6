// File: src/models.rs
// Purpose: Records kept by the user and product stores

use serde::{Deserialize, Serialize};

/// Administrator created with the store; it can be neither edited nor deleted
pub const DEFAULT_ADMIN_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

/// Public projection of a user, safe to hand to templates or print
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub admin: bool,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            admin: self.admin,
        }
    }
}

/// User fields supplied on creation; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub admin: Option<bool>,
}

/// Apply updates to a user without touching credentials
pub fn apply_user_update(user: User, update: UserUpdate) -> User {
    User {
        name: update.name.unwrap_or(user.name),
        email: update.email.unwrap_or(user.email),
        admin: update.admin.unwrap_or(user.admin),
        ..user
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// Product fields supplied on creation or full update
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub description: String,
}

impl ProductInput {
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
        }
    }
}
