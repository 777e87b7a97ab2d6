//! Zero-padded id formatting for image filenames and display

/// Minimum number of digits produced by [`format_id`]
pub const ID_WIDTH: usize = 4;

/// Left-pad an id with zeros up to [`ID_WIDTH`] digits.
///
/// Longer ids are never truncated and a missing id renders as an empty string.
///
/// # Examples
/// ```
/// use vitrine_validation::format_id;
/// assert_eq!(format_id(Some(7)), "0007");
/// assert_eq!(format_id(Some(12345)), "12345");
/// assert_eq!(format_id(None), "");
/// ```
pub fn format_id(id: Option<i64>) -> String {
    match id {
        Some(id) => format!("{:0width$}", id, width = ID_WIDTH),
        None => String::new(),
    }
}
