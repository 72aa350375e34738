// 📐 Shape Layer - Field Validation
// Validates incoming record payloads before they reach storage

use serde::Serialize;
use std::collections::BTreeMap;

// ============================================================================
// MESSAGES
// ============================================================================

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_BLANK: &str = "This field may not be blank.";

pub fn msg_too_long(max_len: usize) -> String {
    format!("Ensure this field has no more than {} characters.", max_len)
}

pub fn msg_missing_reference(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Field name → list of messages, rendered as-is in error payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for an error set holding exactly one message
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded against one field
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(|messages| messages.as_slice())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|name| name.as_str())
    }

    /// Ok(value) if nothing was recorded, otherwise the collected errors
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// FIELD RULES
// ============================================================================

/// Required, non-blank text bounded by `max_len` characters.
///
/// Surrounding whitespace is trimmed before the checks. On failure the
/// message is recorded and an empty string is returned so callers can keep
/// collecting errors for the remaining fields.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> String {
    let Some(raw) = value else {
        errors.add(field, MSG_REQUIRED);
        return String::new();
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, MSG_BLANK);
        return String::new();
    }

    if trimmed.chars().count() > max_len {
        errors.add(field, msg_too_long(max_len));
        return String::new();
    }

    trimmed.to_string()
}

/// Required reference to another record by id
pub fn required_id(errors: &mut ValidationErrors, field: &str, value: Option<i64>) -> i64 {
    match value {
        Some(id) => id,
        None => {
            errors.add(field, MSG_REQUIRED);
            0
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_accepts_and_trims() {
        let mut errors = ValidationErrors::new();
        let value = required_text(&mut errors, "name", Some("  hammer ".to_string()), 50);

        assert_eq!(value, "hammer");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_required_text_missing_blank_and_long() {
        let mut errors = ValidationErrors::new();
        required_text(&mut errors, "first", None, 50);
        required_text(&mut errors, "last", Some("   ".to_string()), 50);
        required_text(&mut errors, "title", Some("Professor Emeritus".to_string()), 10);

        assert_eq!(errors.field("first").unwrap(), [MSG_REQUIRED]);
        assert_eq!(errors.field("last").unwrap(), [MSG_BLANK]);
        assert_eq!(
            errors.field("title").unwrap(),
            ["Ensure this field has no more than 10 characters."]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        let value = required_text(&mut errors, "title", Some("Señoraññññ".to_string()), 10);

        assert_eq!(value, "Señoraññññ");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_errors_serialize_as_field_map() {
        let mut errors = ValidationErrors::single("vehicle", msg_missing_reference(9));
        errors.add("name", MSG_REQUIRED);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": ["This field is required."],
                "vehicle": ["Invalid pk \"9\" - object does not exist."],
            })
        );
        assert_eq!(
            errors.to_string(),
            "name: This field is required.; vehicle: Invalid pk \"9\" - object does not exist."
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(7), Ok(7));
        assert!(ValidationErrors::single("x", "bad").into_result(7).is_err());
    }
}
