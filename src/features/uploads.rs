use axum::{routing::post, Extension, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    services::object_key,
    session::Session,
    state::AppState,
    Feature,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest {
    filename: Option<String>,
    content_type: Option<String>,
}

async fn upload_url(
    Extension(state): Extension<AppState>,
    Session(user): Session,
    ApiJson(body): ApiJson<UploadRequest>,
) -> ApiResult<Json<Value>> {
    let (Some(filename), Some(content_type)) = (
        body.filename.filter(|f| !f.trim().is_empty()),
        body.content_type.filter(|c| !c.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request("Missing parameters"));
    };

    let uploads = &state.config.uploads;
    let key = object_key(&uploads.prefix, &filename, Utc::now().timestamp_millis());

    let upload_url = state
        .uploads
        .sign_put(&key, &content_type, state.upload_expiry())
        .await?;

    tracing::info!(key = %key, content_type = %content_type, user_id = user.id, "upload url issued");

    Ok(Json(json!({
        "uploadUrl": upload_url,
        "publicUrl": uploads.public_url(&key),
    })))
}

/// Presigned direct-to-storage image uploads for the admin.
#[derive(Default)]
pub struct UploadsFeature;

impl Feature for UploadsFeature {
    fn name(&self) -> String {
        "uploads".to_owned()
    }

    fn api(&self) -> Option<Router> {
        Some(Router::new().route("/api/upload-url", post(upload_url)))
    }
}
