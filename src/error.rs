use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::auth::AuthError;
use crate::dashboard::StoreError;

/// Everything an endpoint can answer with besides success.
///
/// The body is always a flat JSON object carrying a human-readable
/// `message`; clients never see structured error codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// Unknown `action` selector on a multiplexed endpoint.
    #[error("Invalid action")]
    InvalidAction,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidAction => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Internal(detail) => {
                log::error!("internal error: {}", detail);
                json!({
                    "success": false,
                    "error": "Internal server error",
                    "message": "An error occurred while processing your request",
                })
            }
            ApiError::MethodNotAllowed => json!({
                "success": false,
                "error": "Method not allowed",
                "message": "Method not allowed",
            }),
            ApiError::InvalidAction => json!({ "success": false, "error": "Invalid action" }),
            other => json!({ "success": false, "message": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials
            | AuthError::EmailNotVerified
            | AuthError::InvalidSession => ApiError::Unauthorized(e.to_string()),
            AuthError::MissingField(_) | AuthError::Validation(_) => {
                ApiError::BadRequest(e.to_string())
            }
            AuthError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            AuthError::NotFound => ApiError::NotFound(e.to_string()),
            AuthError::Storage(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn internal_errors_hide_their_detail() {
        let err = ApiError::Internal("disk on fire".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Internal server error");
        assert!(!value.to_string().contains("disk on fire"));
    }

    #[test]
    fn auth_errors_map_onto_the_http_taxonomy() {
        let unauthorized: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.to_string(), "Invalid email or password");

        let conflict: ApiError = AuthError::AlreadyExists("User already exists".into()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let missing: ApiError = AuthError::MissingField("email".into()).into();
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn invalid_action_uses_the_error_key() {
        let body = to_bytes(ApiError::InvalidAction.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({"success": false, "error": "Invalid action"}));
    }
}
