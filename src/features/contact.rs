use axum::{routing::post, Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Mail,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    services::Email,
    state::AppState,
    Feature,
};

#[derive(Debug, Deserialize)]
pub struct FormField {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub fields: Option<Vec<FormField>>,
    pub recipient: Option<String>,
    pub subject: Option<String>,
    #[serde(alias = "replyToEmail")]
    pub sender_email: Option<String>,
    pub form_title: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build the notification email for a submitted form.
///
/// Fails when the form carries no fields.
pub fn compose(form: &ContactForm, mail: &Mail) -> ApiResult<Email> {
    let fields = match &form.fields {
        Some(fields) if !fields.is_empty() => fields,
        _ => return Err(ApiError::bad_request("Missing form fields")),
    };

    let title = non_empty(&form.form_title)
        .or(non_empty(&form.subject))
        .unwrap_or("Contact Form");
    let sender = non_empty(&form.sender_email);

    let mut body = format!("Form Submission for: {title}\n\n");
    if let Some(sender) = sender {
        body.push_str(&format!("From: {sender}\n\n"));
    }
    for field in fields {
        body.push_str(&format!("{}: {}\n", field.label, field_value(&field.value)));
    }

    Ok(Email {
        from: mail.sender.clone(),
        to: vec![mail.recipient_for(non_empty(&form.recipient))],
        reply_to: sender.map(str::to_owned).into_iter().collect(),
        subject: format!("New Form Submission - {title}"),
        body,
    })
}

async fn submit(
    Extension(state): Extension<AppState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> ApiResult<Json<Value>> {
    let email = compose(&form, &state.config.mail)?;
    let to = email.to.clone();

    let message_id = state.mailer.send(email).await?;
    tracing::info!(message_id = %message_id, to = ?to, "contact form sent");

    Ok(Json(json!({
        "message": "Form submitted successfully!",
        "messageId": message_id,
    })))
}

/// Contact form submissions relayed by email.
#[derive(Default)]
pub struct ContactFeature;

impl Feature for ContactFeature {
    fn name(&self) -> String {
        "contact".to_owned()
    }

    fn api(&self) -> Option<Router> {
        Some(Router::new().route("/api/contact", post(submit)))
    }
}
