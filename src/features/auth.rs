use axum::{
    extract::{FromRequest, Request},
    http::{
        header::{CONTENT_TYPE, LOCATION, SET_COOKIE},
        StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use maud::html;
use serde::Deserialize;
use serde_json::json;

use crate::{
    context::SharedContext,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    session::{self, Session},
    state::AppState,
    Feature,
};

use super::site::prepare_context;

/// "Remember me" as sent by a JSON client (`true`, `"true"`) or a checkbox
/// (`"on"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Remember {
    Flag(bool),
    Text(String),
}

impl Remember {
    fn enabled(&self) -> bool {
        match self {
            Remember::Flag(flag) => *flag,
            Remember::Text(text) => matches!(text.as_str(), "true" | "on"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: Option<String>,
    password: Option<String>,
    remember: Option<Remember>,
}

impl Credentials {
    fn remember(&self) -> bool {
        self.remember.as_ref().is_some_and(Remember::enabled)
    }
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn invalid_login() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_owned())
}

async fn login(Extension(state): Extension<AppState>, request: Request) -> ApiResult<Response> {
    let json_client = is_json(&request);

    let credentials: Credentials = if json_client {
        let ApiJson(credentials) = ApiJson::<Credentials>::from_request(request, &()).await?;
        credentials
    } else {
        let Form(credentials) = Form::<Credentials>::from_request(request, &())
            .await
            .map_err(|e| {
                tracing::debug!(error = %e.body_text(), "rejected login form");
                ApiError::bad_request("Invalid login form")
            })?;
        credentials
    };

    let remember = credentials.remember();
    let (Some(email), Some(password)) = (
        credentials.email.filter(|e| !e.is_empty()),
        credentials.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Missing email or password"));
    };

    let Some(user) = state.store().find_user_by_email(&email).await? else {
        tracing::info!(email = %email, "login for unknown account");
        return Err(invalid_login());
    };

    // bcrypt blocks, run it on the blocking pool
    let hash = user.encrypted_password.clone();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("password check aborted: {e}")))?
        .map_err(|e| ApiError::Internal(format!("unreadable password hash for user {}: {e}", user.id)))?;

    if !verified {
        tracing::info!(user_id = user.id, "login with wrong password");
        return Err(invalid_login());
    }

    let cookie = session::session_cookie(
        &session::encode(user.id, &user.email),
        remember,
        state.config.session.secure,
    );
    tracing::info!(user_id = user.id, remember, "signed in");

    if !json_client {
        return Ok((
            StatusCode::FOUND,
            [(SET_COOKIE, cookie), (LOCATION, "/admin".to_owned())],
        )
            .into_response());
    }

    Ok((
        [(SET_COOKIE, cookie)],
        Json(json!({
            "message": "Authentication successful",
            "user": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
            },
        })),
    )
        .into_response())
}

async fn logout(Extension(state): Extension<AppState>) -> Response {
    (
        StatusCode::FOUND,
        [
            (SET_COOKIE, session::clear_cookie(state.config.session.secure)),
            (LOCATION, "/login".to_owned()),
        ],
    )
        .into_response()
}

async fn login_screen(
    Extension(state): Extension<AppState>,
    Extension(context): Extension<SharedContext>,
    session: Option<Session>,
) -> ApiResult<Response> {
    if session.is_some() {
        return Ok(Redirect::to("/admin").into_response());
    }

    prepare_context(&context, state.store(), Some("Sign in")).await?;

    let markup = html! {
        section class="max-w-sm mx-auto py-16" {
            h1 class="text-3xl font-bold mb-6" { "Sign in" }
            form method="post" action="/api/login" class="space-y-4" hx-boost="false" {
                label class="block" {
                    span class="text-sm text-gray-600" { "Email" }
                    input type="email" name="email" required autocomplete="username"
                        class="block w-full border rounded px-3 py-2";
                }
                label class="block" {
                    span class="text-sm text-gray-600" { "Password" }
                    input type="password" name="password" required autocomplete="current-password"
                        class="block w-full border rounded px-3 py-2";
                }
                label class="flex items-center gap-2" {
                    input type="checkbox" name="remember" value="true";
                    span { "Remember me" }
                }
                button type="submit" class="w-full bg-gray-900 text-white rounded px-4 py-2" { "Sign in" }
            }
        }
    };

    Ok(markup.into_response())
}

/// Sign in and out with the session cookie.
#[derive(Default)]
pub struct AuthFeature;

impl Feature for AuthFeature {
    fn name(&self) -> String {
        "auth".to_owned()
    }

    fn api(&self) -> Option<Router> {
        Some(
            Router::new()
                .route("/api/login", post(login))
                .route("/api/logout", post(logout)),
        )
    }

    fn web(&self) -> Option<Router> {
        Some(Router::new().route("/login", get(login_screen)))
    }
}
