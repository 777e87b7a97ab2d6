//! String normalization applied before validation and persistence

/// Connectives that stay lower-case inside a proper name
pub const STOP_WORDS: &[&str] = &["de", "da", "do", "di", "das", "com", "dos"];

/// Proper-noun casing for person names.
///
/// Lower-cases everything, splits on whitespace, capitalizes each token
/// except [`STOP_WORDS`] and rejoins with single spaces.
///
/// # Examples
/// ```
/// use vitrine_validation::capitalize_proper_noun;
/// assert_eq!(capitalize_proper_noun("MARIA DA SILVA"), "Maria da Silva");
/// assert_eq!(capitalize_proper_noun("  joão   dos santos "), "João dos Santos");
/// ```
pub fn capitalize_proper_noun(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .map(|word| {
            if STOP_WORDS.contains(&word) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name as stored: proper-noun casing, surrounding whitespace removed
pub fn normalize_name(raw: &str) -> String {
    capitalize_proper_noun(raw).trim().to_string()
}

/// E-mail as stored and looked up: lower-cased and trimmed
pub fn normalize_email(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}
