use serde_json::{json, Value};
use validator::{Validate, ValidationErrors};

use crate::utils::error::AppError;

/// Run derive-based validation on a request body, converting field errors
/// into the standard 400 envelope with per-field details.
pub fn check<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|errs| AppError::ValidationError {
        message: "Validation failed".to_string(),
        details: Some(field_details(&errs)),
    })
}

fn field_details(errs: &ValidationErrors) -> Value {
    let mut fields = Vec::new();
    for (field, errors) in errs.field_errors() {
        for e in errors {
            let message = e
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string());
            fields.push(json!({ "field": field, "message": message }));
        }
    }
    Value::Array(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
        name: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[test]
    fn valid_payload_passes() {
        let payload = Sample {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert!(check(&payload).is_ok());
    }

    #[test]
    fn invalid_payload_reports_fields() {
        let payload = Sample {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
        };
        let err = check(&payload).unwrap_err();
        match err {
            AppError::ValidationError { details, .. } => {
                let details = details.unwrap();
                let fields: Vec<&str> = details
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|v| v["field"].as_str().unwrap())
                    .collect();
                assert!(fields.contains(&"name"));
                assert!(fields.contains(&"email"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
