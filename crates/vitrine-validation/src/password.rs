//! Password strength policy

use serde::{Deserialize, Serialize};

/// Minimum length when no policy is configured
pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Requirement a password failed, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRequirement {
    MinLength(usize),
    Uppercase,
    Lowercase,
    Digit,
}

/// Length plus character-class policy: upper-case, lower-case and a digit.
///
/// Length is counted in characters, not bytes, so accented letters count once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// First unmet requirement, if any
    pub fn check(&self, password: &str) -> Result<(), PasswordRequirement> {
        if password.chars().count() < self.min_length {
            return Err(PasswordRequirement::MinLength(self.min_length));
        }
        if !password.chars().any(char::is_uppercase) {
            return Err(PasswordRequirement::Uppercase);
        }
        if !password.chars().any(char::is_lowercase) {
            return Err(PasswordRequirement::Lowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordRequirement::Digit);
        }
        Ok(())
    }

    pub fn accepts(&self, password: &str) -> bool {
        self.check(password).is_ok()
    }
}
