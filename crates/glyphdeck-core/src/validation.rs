use crate::error::ValidationError;

/// Validator for identifiers and paths coming from the manifest or the URL.
pub struct Validator;

impl Validator {
    /// Collection ids must be non-empty and at most 128 chars.
    pub fn validate_collection_id(id: &str) -> Result<(), ValidationError> {
        if id.is_empty() {
            return Err(ValidationError::UnexpectedShape(
                "collection id cannot be empty".to_string(),
            ));
        }
        if id.len() > 128 {
            return Err(ValidationError::UnexpectedShape(format!(
                "collection id too long: {} chars (max 128)",
                id.len()
            )));
        }
        Ok(())
    }

    /// File-system safe store name for a collection,
    /// e.g. "fontawesome-7.1.0" -> "fontawesome_2d7_2e1_2e0_icons_db".
    ///
    /// Lowercase ASCII letters and digits pass through; every other byte
    /// becomes `_` plus two hex digits. Distinct ids never share a name, even
    /// on case-insensitive file systems.
    pub fn store_name(id: &str) -> String {
        let mut safe = String::with_capacity(id.len());
        for byte in id.bytes() {
            if byte.is_ascii_lowercase() || byte.is_ascii_digit() {
                safe.push(byte as char);
            } else {
                safe.push_str(&format!("_{:02x}", byte));
            }
        }
        format!("{}_icons_db", safe)
    }

    /// Source paths are relative and may not climb out of the content root.
    pub fn validate_source_path(path: &str) -> Result<(), ValidationError> {
        if path.is_empty() {
            return Err(ValidationError::UnexpectedShape(
                "source path cannot be empty".to_string(),
            ));
        }
        if path.split(['/', '\\']).any(|segment| segment == "..") {
            return Err(ValidationError::UnexpectedShape(format!(
                "source path escapes the content root: {}",
                path
            )));
        }
        Ok(())
    }
}
