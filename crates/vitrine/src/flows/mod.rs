//! Form flows
//!
//! Each flow is the body of one form handler: read the submitted fields,
//! normalize them, run the rule set, and either ask for the form to be shown
//! again or perform the side effect and redirect. Routing, cookies and HTML
//! stay with the caller.

pub mod account;
pub mod auth;
pub mod products;
pub mod users;

use crate::product_image::ProductImageError;
use crate::security::AccessError;
use crate::store::StoreError;
use thiserror::Error;

/// Field error on `email` when another account already uses the address
pub const DUPLICATE_EMAIL: &str = "Email já está cadastrado.";

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Image(#[from] ProductImageError),
}

impl FlowError {
    pub fn status_code(&self) -> u16 {
        match self {
            FlowError::Access(access) => access.status_code(),
            FlowError::NotFound { .. } => 404,
            FlowError::Store(_) | FlowError::Hash(_) | FlowError::Image(_) => 500,
        }
    }
}

impl From<argon2::password_hash::Error> for FlowError {
    fn from(err: argon2::password_hash::Error) -> Self {
        FlowError::Hash(err.to_string())
    }
}
