use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{
    services::{MailError, UploadError},
    store::StoreError,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by HTTP handlers.
///
/// Client errors carry their message through to the JSON body. Server side
/// failures are logged with their details and answered with a generic message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("{0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Store(StoreError),

    #[error("mail failure: {0}")]
    Mail(#[from] MailError),

    #[error("upload signing failure: {0}")]
    Upload(#[from] UploadError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Mail(_) | Self::Upload(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::BadRequest(msg) | Self::Unauthorized(msg) | Self::Conflict(msg) => msg.clone(),
            Self::NotFound { .. } => self.to_string(),
            Self::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                "Internal server error".to_owned()
            }
            Self::Mail(e) => {
                tracing::error!(error = %e, "mail delivery failure");
                "Unable to send email at this time".to_owned()
            }
            Self::Upload(e) => {
                tracing::error!(error = %e, "upload signing failure");
                "Unable to prepare upload".to_owned()
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_owned()
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { resource } => Self::NotFound { resource },
            StoreError::Duplicate { field, value } => {
                Self::Conflict(format!("{field} '{value}' is already in use"))
            }
            StoreError::InvalidOrder(invalid) => Self::BadRequest(invalid.to_string()),
            other => Self::Store(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");

        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON body",
            JsonRejection::JsonDataError(_) => "Invalid request body",
            _ => "Unable to read request body",
        };
        Self::BadRequest(message.to_owned())
    }
}

/// Parse a positive integer id taken from the request path.
pub fn parse_id(raw: &str, what: &str) -> ApiResult<i32> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest(format!("Invalid {what} ID"))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::OrderingError;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_keeps_message() {
        let response = ApiError::bad_request("Missing page name").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Missing page name" }));
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let err: ApiError = StoreError::Pool(bb8::RunError::TimedOut).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "Internal server error" }));
    }

    #[test]
    fn test_store_errors_map_to_client_statuses() {
        let missing: ApiError = StoreError::NotFound { resource: "page" }.into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let duplicate: ApiError = StoreError::Duplicate {
            field: "slug",
            value: "about-us".to_owned(),
        }
        .into();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(duplicate.to_string(), "slug 'about-us' is already in use");

        let invalid: ApiError = StoreError::InvalidOrder(OrderingError::Missing(2)).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.to_string(), "order must list every page (2 missing)");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "page").unwrap(), 42);
        assert_eq!(parse_id("0", "section").unwrap_err().to_string(), "Invalid section ID");
        assert!(parse_id("abc", "page").is_err());
        assert!(parse_id("-3", "page").is_err());
    }
}
