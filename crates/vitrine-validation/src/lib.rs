//! Vitrine Validation
//!
//! Field rules, error collection and string normalization shared by every
//! form flow of the admin site. Everything here is pure: no I/O, no shared state.

pub mod error_map;
pub mod format;
pub mod normalize;
pub mod password;
pub mod pipeline;
pub mod rules;

pub use error_map::ErrorMap;
pub use format::{format_id, ID_WIDTH};
pub use normalize::{capitalize_proper_noun, normalize_email, normalize_name, STOP_WORDS};
pub use password::{PasswordPolicy, PasswordRequirement, DEFAULT_MIN_LENGTH};
pub use pipeline::{FieldRules, Rule, Validator};
pub use rules::{
    add_error, display_name, is_matching_fields, is_not_empty, is_password, is_password_with,
    is_person_fullname,
};
