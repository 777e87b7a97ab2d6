//! Password hashing, session tokens and request access checks.
//!
//! Hashes use Argon2id in PHC string format so salt and parameters travel with
//! the hash. The current user of a request is an explicit [`Viewer`]; handlers
//! ask it for a capability instead of testing for a missing user.

use crate::models::User;
use crate::store::{StoreError, UserStore};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;
use uuid::Uuid;

/// Hash a plaintext password using Argon2id with a random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Fresh opaque session token
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthorized,

    #[error("administrator access required")]
    Forbidden,
}

impl AccessError {
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::Unauthorized => 401,
            AccessError::Forbidden => 403,
        }
    }
}

/// Who is making the request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewer {
    user: Option<User>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Resolve the viewer from the session cookie value
    pub fn from_token<S: UserStore + ?Sized>(
        store: &S,
        token: Option<&str>,
    ) -> Result<Self, StoreError> {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => Ok(Self {
                user: store.user_by_token(token)?,
            }),
            None => Ok(Self::anonymous()),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.admin)
    }

    pub fn require_authenticated(&self) -> Result<&User, AccessError> {
        self.user.as_ref().ok_or(AccessError::Unauthorized)
    }

    /// 401 for anonymous viewers, 403 for authenticated non-admins
    pub fn require_admin(&self) -> Result<&User, AccessError> {
        let user = self.require_authenticated()?;
        if user.admin {
            Ok(user)
        } else {
            Err(AccessError::Forbidden)
        }
    }
}
