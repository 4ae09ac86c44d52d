//! Error handlers
//!
//! Maps storage errors onto HTTP status codes and JSON bodies.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::error::types::StorageError;
use crate::protocol::responses::OpResponse;

/// Convert a storage error to its HTTP status code
pub fn error_to_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::PathTraversal(_) => StatusCode::FORBIDDEN,
        StorageError::Validation(_) => StatusCode::BAD_REQUEST,
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::Operational(_) => StatusCode::BAD_REQUEST,
    }
}

impl ResponseError for StorageError {
    fn status_code(&self) -> StatusCode {
        error_to_status(self)
    }

    fn error_response(&self) -> HttpResponse {
        // Violations carry no body.
        if self.is_traversal() {
            return HttpResponse::Forbidden().finish();
        }
        HttpResponse::build(self.status_code()).json(OpResponse::failure(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(
            error_to_status(&StorageError::PathTraversal("..".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_to_status(&StorageError::Validation("Folder name required".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status(&StorageError::NotFound("/x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_to_status(&StorageError::Operational("Directory not empty".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn traversal_response_has_empty_body() {
        let response = StorageError::PathTraversal("../etc".into()).error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = response.into_body().try_into_bytes().unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn validation_response_carries_message() {
        let response = StorageError::Validation("No selected file".into()).error_response();
        let body = response.into_body().try_into_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "No selected file");
    }
}
