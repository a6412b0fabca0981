use crate::error::{CoreError, Result};

const MAX_IDENTIFIER_LEN: usize = 128;

/// Validates an identifier that is interpolated into an upstream URL path
/// (VSAC value set OIDs, UMLS CUIs).
///
/// Accepts ASCII letters, digits, `.`, `-` and `_`.
pub fn validate_identifier(kind: &str, id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id.len() <= MAX_IDENTIFIER_LEN
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

    if valid {
        Ok(())
    } else {
        Err(CoreError::invalid_identifier(kind, id))
    }
}
