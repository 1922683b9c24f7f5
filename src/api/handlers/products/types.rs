use std::collections::BTreeMap;

use crate::api::error::AppError;

/// Decodes a JSON-encoded array of label strings as submitted by the admin
/// form. An empty field is a valid empty list.
pub fn parse_label_array(field: &str, raw: &str) -> Result<Vec<String>, AppError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| {
        AppError::Validation(format!("{} must be a JSON array of strings: {}", field, e))
    })
}

/// Decodes the JSON-encoded specifications object (string keys and values).
pub fn parse_spec_object(raw: &str) -> Result<BTreeMap<String, String>, AppError> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(raw).map_err(|e| {
        AppError::Validation(format!(
            "specifications must be a JSON object of string to string: {}",
            e
        ))
    })
}

/// Presence check for the required text fields.
pub fn require_text(field: &str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_array() {
        assert_eq!(
            parse_label_array("applications", r#"["a","b"]"#).unwrap(),
            vec!["a", "b"]
        );
        assert!(parse_label_array("applications", "").unwrap().is_empty());
        assert!(parse_label_array("applications", "not json").is_err());
    }

    #[test]
    fn test_parse_spec_object() {
        let specs = parse_spec_object(r#"{"Weight":"1kg"}"#).unwrap();
        assert_eq!(specs["Weight"], "1kg");
        assert!(parse_spec_object("").unwrap().is_empty());
        assert!(parse_spec_object(r#"["x"]"#).is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("modelName", " Cube ".into()).unwrap(), "Cube");
        assert!(require_text("modelName", "   ".into()).is_err());
    }
}
