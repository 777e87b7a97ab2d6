// Vitrine - account, authentication and product flows
// Form handling for a small store admin, independent of any HTTP or template layer

pub mod config;
pub mod filters;
pub mod form_data;
pub mod outcome;
pub mod product_image;

// Persistence
pub mod memory;
pub mod models;
pub mod store;

// Access and flows
pub mod flows;
pub mod security;

// Re-export core types
pub use config::Config;
pub use filters::{id_img, FilterFn, FilterRegistry};
pub use form_data::{FormData, UploadedFile};
pub use outcome::{echo_values, FormOutcome, Redirect, SessionCookie};

pub use memory::MemoryStore;
pub use models::{NewUser, Product, ProductInput, User, UserSummary, UserUpdate, DEFAULT_ADMIN_ID};
pub use store::{ProductStore, StoreError, UserStore};

pub use flows::FlowError;
pub use security::{generate_token, hash_password, verify_password, AccessError, Viewer};

// Re-export the validation core
pub use vitrine_validation;
pub use vitrine_validation::{ErrorMap, PasswordPolicy};
