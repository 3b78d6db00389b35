use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidateUrl, ValidationError};

use crate::shared::constants::MAX_CATEGORY_LENGTH;
use crate::shared::patch::Patch;

lazy_static! {
    /// Regex for mod category tags
    /// Must be lowercase alphanumeric words joined by single hyphens
    /// - Valid: "engine", "exhaust", "forced-induction", "stage2"
    /// - Invalid: "-engine", "engine-", "forced--induction", "Engine", "forced_induction"
    pub static ref CATEGORY_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.len() as u64 > MAX_CATEGORY_LENGTH || !CATEGORY_REGEX.is_match(category) {
        let mut error = ValidationError::new("category");
        error.message = Some(
            "category must be lowercase words separated by single hyphens (e.g. 'forced-induction')"
                .into(),
        );
        return Err(error);
    }
    Ok(())
}

pub fn validate_category_patch(category: &Patch<String>) -> Result<(), ValidationError> {
    match category {
        Patch::Set(value) => validate_category(value),
        Patch::Unchanged | Patch::Clear => Ok(()),
    }
}

/// URL check for a patched image field; `null` and omitted pass
pub fn validate_url_patch(url: &Patch<String>) -> Result<(), ValidationError> {
    match url {
        Patch::Set(value) if !value.validate_url() => {
            let mut error = ValidationError::new("url");
            error.message = Some("image_url must be a valid URL".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

/// Reject strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}
