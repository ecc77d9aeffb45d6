use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::ServiceError;
use thiserror::Error;

/// Error body shared by the user routes: `{"status": "error", "errors": [...]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub errors: Vec<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, errors: Vec<String>) -> Self {
        Self { status, errors }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, vec![msg.into()])
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let status = match e {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::IdsExhausted => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.messages())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"status": "error", "errors": self.errors});
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_errors_to_status() {
        let e = JsonApiError::from(ServiceError::Validation(vec!["Name is required".into()]));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.errors, vec!["Name is required"]);

        let e = JsonApiError::from(ServiceError::NotFound(42));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.errors, vec!["User with ID 42 not found."]);

        let e = JsonApiError::from(ServiceError::IdsExhausted);
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.errors, vec!["no user ids left to assign"]);
    }

    #[test]
    fn renders_error_payload() {
        let res = JsonApiError::bad_request("bad id").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
