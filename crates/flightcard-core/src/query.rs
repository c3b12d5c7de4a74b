//! Flight query normalization.

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Turn raw user input into a canonical flight identifier.
///
/// Trims surrounding whitespace, including a pasted byte-order mark, and
/// uppercases. No character-set or length validation happens here; an empty
/// result means "no search" and callers must not attempt a resolution for it.
///
/// # Examples
///
/// ```
/// use flightcard_core::query::normalize;
///
/// assert_eq!(normalize("  aa100 "), "AA100");
/// assert_eq!(normalize("   "), "");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
        .to_uppercase()
}
