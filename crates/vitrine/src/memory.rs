// File: src/memory.rs
// Purpose: In-memory user/product store with JSON snapshots

use crate::models::{
    apply_user_update, NewUser, Product, ProductInput, User, UserUpdate, DEFAULT_ADMIN_ID,
};
use crate::store::{ProductStore, StoreError, UserStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    users: BTreeMap<i64, User>,
    #[serde(default)]
    products: BTreeMap<i64, Product>,
    #[serde(default)]
    last_user_id: i64,
    #[serde(default)]
    last_product_id: i64,
}

/// Both stores in one lock; ids are never reused after deletion
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot, or start empty when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no store snapshot, starting empty");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let tables: Tables = serde_json::from_str(&content)?;
        debug!(
            path = %path.display(),
            users = tables.users.len(),
            products = tables.products.len(),
            "store snapshot loaded"
        );

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Write the current contents as a JSON snapshot
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&*self.read()?)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }

    /// Whether the default administrator exists yet
    pub fn has_default_admin(&self) -> Result<bool, StoreError> {
        Ok(self
            .read()?
            .users
            .get(&DEFAULT_ADMIN_ID)
            .is_some_and(|user| user.admin))
    }

    /// Store the default administrator under its reserved id.
    /// Works on a store that already has members.
    pub fn seed_default_admin(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        if tables.users.contains_key(&DEFAULT_ADMIN_ID) {
            return Err(StoreError::IdTaken(DEFAULT_ADMIN_ID));
        }
        if email_taken(&tables, &user.email, None) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        let admin = User {
            id: DEFAULT_ADMIN_ID,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            token: None,
            admin: true,
        };
        tables.users.insert(admin.id, admin.clone());
        tables.last_user_id = tables.last_user_id.max(DEFAULT_ADMIN_ID);
        Ok(admin)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

fn email_taken(tables: &Tables, email: &str, except_id: Option<i64>) -> bool {
    tables
        .users
        .values()
        .any(|u| u.email == email && Some(u.id) != except_id)
}

impl UserStore for MemoryStore {
    fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        if email_taken(&tables, &user.email, None) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        // id 1 is reserved for the default administrator
        if !user.admin && tables.last_user_id < DEFAULT_ADMIN_ID {
            tables.last_user_id = DEFAULT_ADMIN_ID;
        }
        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            token: None,
            admin: user.admin,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    fn user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    fn password_hash_by_email(&self, email: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| u.password_hash.clone()))
    }

    fn set_token_by_email(&self, token: Option<&str>, email: &str) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.users.values_mut().find(|u| u.email == email) {
            Some(user) => {
                user.token = token.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, StoreError> {
        let mut tables = self.write()?;
        if let Some(email) = update.email.as_deref() {
            if email_taken(&tables, email, Some(id)) {
                return Err(StoreError::DuplicateEmail(email.to_string()));
            }
        }

        let Some(current) = tables.users.remove(&id) else {
            return Ok(None);
        };
        let updated = apply_user_update(current, update);
        tables.users.insert(id, updated.clone());
        Ok(Some(updated))
    }

    fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.write()?.users.remove(&id).is_some())
    }

    fn all_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read()?.users.values().cloned().collect())
    }
}

impl ProductStore for MemoryStore {
    fn insert_product(&self, product: ProductInput) -> Result<Product, StoreError> {
        let mut tables = self.write()?;
        tables.last_product_id += 1;
        let product = product.into_product(tables.last_product_id);
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn product_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    fn update_product(&self, product: &Product) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.write()?.products.remove(&id).is_some())
    }

    fn all_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.read()?.products.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ana Souza".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            admin: false,
        }
    }

    fn product(name: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price: 10.0,
            description: "desc".to_string(),
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = store.insert_user(new_user("a@x.com")).unwrap();
        let second = store.insert_user(new_user("b@x.com")).unwrap();
        assert_eq!(first.id, 2);
        assert_eq!(second.id, 3);
        assert!(!store.has_default_admin().unwrap());
    }

    #[test]
    fn test_admin_inserted_first_gets_default_id() {
        let store = MemoryStore::new();
        let admin = store
            .insert_user(NewUser {
                admin: true,
                ..new_user("admin@x.com")
            })
            .unwrap();
        assert_eq!(admin.id, DEFAULT_ADMIN_ID);
        assert!(store.has_default_admin().unwrap());
    }

    #[test]
    fn test_seed_default_admin_after_members() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@x.com")).unwrap();

        let admin = store.seed_default_admin(new_user("admin@x.com")).unwrap();
        assert_eq!(admin.id, DEFAULT_ADMIN_ID);
        assert!(admin.admin);
        assert!(store.has_default_admin().unwrap());
        assert_eq!(store.insert_user(new_user("b@x.com")).unwrap().id, 3);

        assert!(matches!(
            store.seed_default_admin(new_user("other@x.com")),
            Err(StoreError::IdTaken(DEFAULT_ADMIN_ID))
        ));
    }

    #[test]
    fn test_seed_default_admin_rejects_member_email() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@x.com")).unwrap();
        assert!(matches!(
            store.seed_default_admin(new_user("a@x.com")),
            Err(StoreError::DuplicateEmail(_))
        ));
        assert!(!store.has_default_admin().unwrap());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        store.insert_product(product("a")).unwrap();
        let second = store.insert_product(product("b")).unwrap();
        assert!(store.delete_product(second.id).unwrap());
        let third = store.insert_product(product("c")).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@x.com")).unwrap();
        let err = store.insert_user(new_user("a@x.com")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "a@x.com"));
    }

    #[test]
    fn test_update_to_own_email_allowed() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("a@x.com")).unwrap();
        store.insert_user(new_user("b@x.com")).unwrap();

        let same = UserUpdate {
            email: Some("a@x.com".to_string()),
            ..Default::default()
        };
        assert!(store.update_user(user.id, same).unwrap().is_some());

        let taken = UserUpdate {
            email: Some("b@x.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_user(user.id, taken),
            Err(StoreError::DuplicateEmail(_))
        ));
    }

    #[test]
    fn test_token_lookup() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@x.com")).unwrap();

        assert!(store.set_token_by_email(Some("abc"), "a@x.com").unwrap());
        assert_eq!(store.user_by_token("abc").unwrap().map(|u| u.id), Some(2));
        assert!(store.user_by_token("").unwrap().is_none());

        assert!(store.set_token_by_email(None, "a@x.com").unwrap());
        assert!(store.user_by_token("abc").unwrap().is_none());
        assert!(!store.set_token_by_email(Some("x"), "nobody@x.com").unwrap());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");

        let store = MemoryStore::new();
        store.insert_user(new_user("a@x.com")).unwrap();
        store.insert_product(product("Caneca")).unwrap();
        store.save(&path).unwrap();

        let loaded = MemoryStore::load(&path).unwrap();
        assert_eq!(loaded.all_users().unwrap().len(), 1);
        assert_eq!(loaded.all_products().unwrap()[0].name, "Caneca");
        assert_eq!(loaded.insert_product(product("Prato")).unwrap().id, 2);
    }

    #[test]
    fn test_load_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::load(dir.path().join("none.json")).unwrap();
        assert!(store.all_users().unwrap().is_empty());
        assert!(!store.has_default_admin().unwrap());
    }
}
