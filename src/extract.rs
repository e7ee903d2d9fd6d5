//! Request extractors whose rejections answer in the API's JSON error shape.

use axum::{extract::FromRequest, Json};

use crate::error::ApiError;

/// JSON request body.
///
/// Like [`Json`], but a missing content type, a malformed body or a field of
/// the wrong type is answered with 400 and `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod test {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
        response::IntoResponse,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Order {
        order: Vec<i32>,
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Order, ApiError> {
        let mut request = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        let request = request.body(Body::from(body)).unwrap();
        ApiJson::<Order>::from_request(request, &()).await.map(|ApiJson(order)| order)
    }

    async fn rejection_body(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_accepts_json() {
        let order = extract(Some("application/json"), r#"{"order":[2,1]}"#).await.unwrap();
        assert_eq!(order.order, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_rejections_are_json_400() {
        let cases = [
            (Some("application/json"), "{}", "Invalid request body"),
            (Some("application/json"), r#"{"order":"x"}"#, "Invalid request body"),
            (Some("application/json"), r#"{"order":[1,"#, "Malformed JSON body"),
            (None, r#"{"order":[1]}"#, "Expected a JSON request body"),
            (Some("text/plain"), r#"{"order":[1]}"#, "Expected a JSON request body"),
        ];

        for (content_type, body, message) in cases {
            let err = extract(content_type, body).await.unwrap_err();
            let (status, json) = rejection_body(err).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json, serde_json::json!({ "error": message }), "{body}");
        }
    }
}
