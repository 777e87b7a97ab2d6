//! Field rules
//!
//! Each rule inspects one value and appends at most one message to the error
//! map under the given field. Rules never short-circuit each other: callers run
//! every rule configured for a field, so one field can collect several messages.

use crate::error_map::ErrorMap;
use crate::password::PasswordPolicy;

/// Human label for a field name used in messages.
///
/// Underscores, dashes and camelCase boundaries become spaces; the result is
/// lower-cased with the first letter upper-cased.
///
/// # Examples
/// ```
/// use vitrine_validation::display_name;
/// assert_eq!(display_name("nome"), "Nome");
/// assert_eq!(display_name("senha_atual"), "Senha atual");
/// assert_eq!(display_name("confSenha"), "Conf senha");
/// ```
pub fn display_name(field: &str) -> String {
    let mut spaced = String::with_capacity(field.len() + 4);
    let mut prev_lower = false;

    for c in field.chars() {
        if c == '_' || c == '-' {
            spaced.push(' ');
            prev_lower = false;
        } else if c.is_uppercase() && prev_lower {
            spaced.push(' ');
            spaced.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            spaced.extend(c.to_lowercase());
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    let words = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Record a caller-defined failure for a field
pub fn add_error(field: &str, message: impl Into<String>, errors: &mut ErrorMap) {
    errors.add(field, message);
}

/// Fails when the value is empty or whitespace-only
pub fn is_not_empty(value: &str, field: &str, errors: &mut ErrorMap) {
    if value.trim().is_empty() {
        errors.add(field, format!("{} é obrigatório.", display_name(field)));
    }
}

/// Fails unless the value has at least two whitespace-separated tokens made
/// only of letters
pub fn is_person_fullname(value: &str, field: &str, errors: &mut ErrorMap) {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let valid = tokens.len() >= 2
        && tokens
            .iter()
            .all(|token| token.chars().all(char::is_alphabetic));

    if !valid {
        errors.add(
            field,
            format!("{} deve ser um nome completo.", display_name(field)),
        );
    }
}

/// Fails when the value does not satisfy the default [`PasswordPolicy`]
pub fn is_password(value: &str, field: &str, errors: &mut ErrorMap) {
    is_password_with(value, field, &PasswordPolicy::default(), errors);
}

/// Fails when the value does not satisfy `policy`
pub fn is_password_with(value: &str, field: &str, policy: &PasswordPolicy, errors: &mut ErrorMap) {
    if !policy.accepts(value) {
        errors.add(
            field,
            format!("{} não atende aos requisitos de senha.", display_name(field)),
        );
    }
}

/// Fails when the value differs from `other_value`.
///
/// `other_label` is shown verbatim in the message.
pub fn is_matching_fields(
    value: &str,
    field: &str,
    other_value: &str,
    other_label: &str,
    errors: &mut ErrorMap,
) {
    if value != other_value {
        errors.add(
            field,
            format!("{} não corresponde a {}.", display_name(field), other_label),
        );
    }
}
