/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: health check endpoint
/// - `users`: user CRUD and a user's tasks
/// - `tasks`: task CRUD

pub mod health;
pub mod tasks;
pub mod users;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Acknowledgement returned by create, update and delete endpoints
///
/// ```json
/// { "status_code": 201, "transaction": "Successful", "id": 42 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// HTTP status the response is sent with
    pub status_code: u16,

    /// Outcome description
    pub transaction: String,

    /// ID of the created row (create endpoints only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl TransactionResponse {
    /// 201 acknowledgement for a newly inserted row
    pub fn created(id: i64) -> Self {
        Self {
            status_code: StatusCode::CREATED.as_u16(),
            transaction: "Successful".to_string(),
            id: Some(id),
        }
    }

    /// 200 acknowledgement for an update or delete
    pub fn ok(transaction: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            transaction: transaction.into(),
            id: None,
        }
    }
}

/// Rejects text PostgreSQL cannot store (NUL characters)
pub(crate) fn validate_text(value: &str) -> Result<(), ValidationError> {
    if !value.contains('\0') {
        return Ok(());
    }

    let mut error = ValidationError::new("null_character");
    error.message = Some("Must not contain NUL characters".into());
    Err(error)
}

/// Rejects names that would produce an empty slug or cannot be stored
pub(crate) fn validate_sluggable(value: &str) -> Result<(), ValidationError> {
    validate_text(value)?;

    if taskhub_shared::slug::is_sluggable(value) {
        return Ok(());
    }

    let mut error = ValidationError::new("sluggable");
    error.message = Some("Must contain at least one ASCII letter or digit".into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_ack_shape() {
        let json = serde_json::to_value(TransactionResponse::created(5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status_code": 201, "transaction": "Successful", "id": 5 })
        );
    }

    #[test]
    fn test_ok_ack_omits_id() {
        let ack = TransactionResponse::ok("Task delete is successful");
        let json = serde_json::to_value(ack).unwrap();
        assert_eq!(json["status_code"], 200);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_validate_sluggable() {
        assert!(validate_sluggable("alice").is_ok());
        assert!(validate_sluggable("---").is_err());
    }

    #[test]
    fn test_nul_characters_are_rejected() {
        assert!(validate_text("plain text").is_ok());
        assert!(validate_text("").is_ok());

        let err = validate_text("al\0ice").unwrap_err();
        assert_eq!(err.code, "null_character");

        let err = validate_sluggable("al\0ice").unwrap_err();
        assert_eq!(err.code, "null_character");
    }
}
