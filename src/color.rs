//! Hex color normalization.
//!
//! Color entry comes from picker widgets and free-form text fields, so the
//! normalizer is total: any input that is not a strict hex color degrades to
//! [`FALLBACK`] instead of erroring. The editor must never crash on a typo.

/// The color every invalid input degrades to, and the initial active color.
pub const FALLBACK: &str = "#000000";

/// Canonicalizes a color string into strict hex form.
///
/// Leading/trailing whitespace is trimmed and a missing `#` prefix is added.
/// Exactly 3, 6, or 8 hex digits are accepted, case-insensitive; digit case
/// is preserved. Anything else returns [`FALLBACK`].
///
/// # Example
///
/// ```
/// use sneaker_hues::color::normalize;
///
/// assert_eq!(normalize("ABC"), "#ABC");
/// assert_eq!(normalize("  #ff0000 "), "#ff0000");
/// assert_eq!(normalize("zzz"), "#000000");
/// ```
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return FALLBACK.to_string();
    }

    let candidate = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };

    if is_normalized(&candidate) {
        candidate
    } else {
        FALLBACK.to_string()
    }
}

/// Returns true if `value` matches the strict hex pattern: a `#` prefix
/// followed by exactly 3, 6, or 8 hex digits.
pub fn is_normalized(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Formats an opaque RGB triple as a 6-digit hex color.
///
/// Used by the eyedropper to turn a sampled pixel back into an active color.
pub fn from_rgb8(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}
