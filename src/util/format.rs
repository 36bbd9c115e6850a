//! Number and secret formatting utilities.

/// Format a measured or predicted value for display: two decimals, using
/// Rust's `{:.2}` rounding of the stored `f64`.
#[must_use]
pub fn format_measure(value: f64) -> String {
    format!("{value:.2}")
}

/// Mask a secret for display, keeping a short prefix for recognition.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "********".to_string()
    } else {
        format!("{visible}********")
    }
}
