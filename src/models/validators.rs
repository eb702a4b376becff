// src/models/validators.rs
// DOCUMENTATION: Custom field validators shared by the request DTOs
// PURPOSE: Checks the validator derive has no built-in for

use validator::ValidationError;

/// Reject any value that contains markup
/// A `<` followed by a letter, `/`, `!` or `?` opens a tag, comment or directive.
pub fn no_html(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let opens_tag = bytes.windows(2).any(|pair| {
        pair[0] == b'<' && (pair[1].is_ascii_alphabetic() || matches!(pair[1], b'/' | b'!' | b'?'))
    });

    if opens_tag {
        return Err(ValidationError::new("no_html"));
    }
    Ok(())
}

/// `[longitude, latitude]` within WGS84 bounds
pub fn valid_coordinates(value: &[f64; 2]) -> Result<(), ValidationError> {
    let [lng, lat] = *value;
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::new("coordinates"));
    }
    Ok(())
}

/// Reject NaN and the infinities, which pass range checks
pub fn finite<T: std::borrow::Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    if !value.borrow().is_finite() {
        return Err(ValidationError::new("finite"));
    }
    Ok(())
}
