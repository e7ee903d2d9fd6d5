use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use maud::{html, Markup};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    content::{slug, templates, NewPage, NewSection, Section, SectionKind},
    context::SharedContext,
    error::{parse_id, ApiError, ApiResult},
    extract::ApiJson,
    session::Session,
    state::AppState,
    Feature,
};

use super::{public::get_page_by_slug, site::prepare_context};

/// An id sent either as a JSON number or as a string, as HTML forms do.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    fn id(&self) -> Option<i32> {
        let id = match self {
            IdInput::Number(n) => i32::try_from(*n).ok()?,
            IdInput::Text(s) => s.trim().parse().ok()?,
        };
        (id > 0).then_some(id)
    }
}

#[derive(Debug, Deserialize)]
struct CreatePage {
    name: Option<String>,
    slug: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PageOrder {
    order: Vec<IdInput>,
}

#[derive(Debug, Deserialize)]
struct CreateSection {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "pageId")]
    page_id: Option<IdInput>,
}

/// Check an edited section payload and fill in image defaults.
///
/// The payload must be an object. An `image` object gets empty `src`/`alt`
/// when they are missing, and a bare image URL becomes `{src, alt: "Image"}`.
pub fn normalize_section_data(mut data: Value) -> ApiResult<Value> {
    let Some(fields) = data.as_object_mut() else {
        return Err(ApiError::bad_request("Section data must be a JSON object"));
    };

    let replacement = match fields.get_mut("image") {
        Some(Value::Object(image)) => {
            for key in ["src", "alt"] {
                let missing = match image.get(key) {
                    None | Some(Value::Null) => true,
                    Some(Value::String(s)) => s.is_empty(),
                    Some(_) => false,
                };
                if missing {
                    image.insert(key.to_owned(), json!(""));
                }
            }
            None
        }
        Some(Value::String(src)) => Some(json!({ "src": std::mem::take(src), "alt": "Image" })),
        _ => None,
    };

    if let Some(image) = replacement {
        fields.insert("image".to_owned(), image);
    }

    Ok(data)
}

async fn create_page(
    Extension(state): Extension<AppState>,
    Session(user): Session,
    ApiJson(body): ApiJson<CreatePage>,
) -> ApiResult<Json<Value>> {
    let name = match body.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => return Err(ApiError::bad_request("Missing page name")),
    };

    let supplied = body.slug.as_ref().and_then(Value::as_str);
    let Some(slug) = slug::resolve(&name, supplied) else {
        return Err(ApiError::bad_request("Page slug must contain letters or digits"));
    };

    let page = state.store().create_page(NewPage { name, slug }).await?;
    tracing::info!(page_id = page.id, slug = %page.slug, user_id = user.id, "page created");

    Ok(Json(json!({ "success": true, "slug": page.slug })))
}

async fn delete_page(
    Extension(state): Extension<AppState>,
    Session(user): Session,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&key, "page")?;

    if state.store().delete_page(id).await? {
        tracing::info!(page_id = id, user_id = user.id, "page deleted");
    } else {
        tracing::debug!(page_id = id, "page already absent");
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn update_page_order(
    Extension(state): Extension<AppState>,
    Session(user): Session,
    ApiJson(body): ApiJson<PageOrder>,
) -> ApiResult<Json<Value>> {
    let ids = body
        .order
        .iter()
        .map(|id| id.id().ok_or_else(|| ApiError::bad_request("Invalid page ID")))
        .collect::<ApiResult<Vec<i32>>>()?;

    state.store().set_page_order(&ids).await?;
    tracing::info!(pages = ids.len(), user_id = user.id, "page order updated");

    Ok(Json(json!({ "success": true })))
}

async fn create_section(
    Extension(state): Extension<AppState>,
    Session(_): Session,
    ApiJson(body): ApiJson<CreateSection>,
) -> ApiResult<Json<Value>> {
    let (Some(kind), Some(page_id)) = (body.kind.as_deref(), body.page_id.as_ref()) else {
        return Err(ApiError::bad_request("Missing type or pageId"));
    };

    let page_id = page_id.id().ok_or_else(|| ApiError::bad_request("Invalid page ID"))?;
    let kind = kind
        .parse::<SectionKind>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let section = state
        .store()
        .create_section(NewSection {
            page_id,
            kind,
            data: templates::template(kind),
        })
        .await?;

    tracing::info!(section_id = section.id, page_id, kind = %kind, order = section.order, "section created");

    Ok(Json(json!({
        "id": section.id,
        "order": section.order,
        "data": section.data,
    })))
}

async fn update_section(
    Extension(state): Extension<AppState>,
    Session(_): Session,
    Path(key): Path<String>,
    ApiJson(data): ApiJson<Value>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&key, "section")?;
    let data = normalize_section_data(data)?;

    if !state.store().update_section_data(id, data).await? {
        return Err(ApiError::NotFound { resource: "section" });
    }

    tracing::info!(section_id = id, "section updated");
    Ok(Json(json!({
        "success": true,
        "message": "Section updated successfully",
    })))
}

async fn delete_section(
    Extension(state): Extension<AppState>,
    Session(_): Session,
    Path(key): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&key, "section")?;

    if !state.store().delete_section(id).await? {
        tracing::debug!(section_id = id, "section already absent");
    }

    Ok(Json(json!({ "message": "Section deleted" })))
}

async fn dashboard(
    Extension(state): Extension<AppState>,
    Extension(context): Extension<SharedContext>,
    session: Option<Session>,
) -> ApiResult<Response> {
    if session.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    prepare_context(&context, state.store(), Some("Admin")).await?;
    let pages = state.store().list_pages().await?;

    let markup = html! {
        section class="py-8" {
            h1 class="text-3xl font-bold mb-6" { "Pages" }

            ul #pages class="divide-y border rounded" {
                @for page in &pages {
                    li class="flex items-center gap-4 p-3" {
                        span class="text-gray-400 w-8" { (page.sort_order) }
                        a href={"/admin/pages/" (page.slug)} class="font-medium" { (page.name) }
                        span class="text-gray-500 text-sm" { "/" (page.slug) }
                        button class="ml-auto text-red-600"
                            hx-delete={"/api/pages/" (page.id)}
                            hx-confirm={"Delete " (page.name) " and all of its sections?"}
                            hx-target="closest li"
                            hx-swap="outerHTML" { "Delete" }
                    }
                }
            }

            form class="flex gap-2 mt-6"
                hx-post="/api/pages"
                hx-ext="json-enc"
                hx-on="htmx:afterRequest: if (event.detail.successful) window.location.reload()" {
                    input type="text" name="name" placeholder="Page name" required
                        class="border rounded px-3 py-2";
                    input type="text" name="slug" placeholder="slug (optional)"
                        class="border rounded px-3 py-2";
                    button type="submit" class="bg-gray-900 text-white rounded px-4 py-2" { "Add page" }
            }
        }
    };

    Ok(markup.into_response())
}

async fn page_editor(
    Extension(state): Extension<AppState>,
    Extension(context): Extension<SharedContext>,
    session: Option<Session>,
    Path(slug): Path<String>,
) -> ApiResult<Response> {
    if session.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    prepare_context(&context, state.store(), Some("Admin")).await?;

    let Some(found) = get_page_by_slug(state.store(), &slug).await? else {
        let markup = html! {
            section class="py-8" {
                h1 class="text-2xl font-bold" { "No page at /" (slug) }
                a href="/admin" class="underline" { "Back to pages" }
            }
        };
        return Ok((StatusCode::NOT_FOUND, markup).into_response());
    };

    Ok(editor(&found.page.name, found.page.id, &found.sections).into_response())
}

fn editor(name: &str, page_id: i32, sections: &[Section]) -> Markup {
    html! {
        section class="py-8" {
            a href="/admin" class="text-sm underline" { "All pages" }
            h1 class="text-3xl font-bold my-4" { (name) }

            ol #sections class="space-y-4" {
                @for section in sections {
                    li class="border rounded p-4" {
                        div class="flex items-center gap-4" {
                            span class="text-gray-400" { "#" (section.order) }
                            span class="font-medium" { (section.kind) }
                            button class="ml-auto text-red-600"
                                hx-delete={"/api/sections/" (section.id)}
                                hx-target="closest li"
                                hx-swap="outerHTML" { "Delete" }
                        }
                        pre class="mt-2 text-xs overflow-x-auto bg-gray-50 p-2" {
                            (serde_json::to_string_pretty(&section.data).unwrap_or_default())
                        }
                    }
                }
            }

            form class="flex gap-2 mt-6"
                hx-post="/api/sections"
                hx-ext="json-enc"
                hx-on="htmx:afterRequest: if (event.detail.successful) window.location.reload()" {
                    input type="hidden" name="pageId" value=(page_id);
                    select name="type" class="border rounded px-3 py-2" {
                        @for kind in SectionKind::ALL {
                            option value=(kind) { (kind) }
                        }
                    }
                    button type="submit" class="bg-gray-900 text-white rounded px-4 py-2" { "Add section" }
            }
        }
    }
}

/// Content editing: JSON endpoints plus the admin screens driving them.
#[derive(Default)]
pub struct AdminFeature;

impl Feature for AdminFeature {
    fn name(&self) -> String {
        "admin".to_owned()
    }

    fn api(&self) -> Option<Router> {
        Some(
            Router::new()
                .route("/api/pages", post(create_page))
                .route("/api/pages/:key", delete(delete_page))
                .route("/api/admin/update-page-order", post(update_page_order))
                .route("/api/sections", post(create_section))
                .route("/api/sections/:key", put(update_section).delete(delete_section)),
        )
    }

    fn web(&self) -> Option<Router> {
        Some(
            Router::new()
                .route("/admin", get(dashboard))
                .route("/admin/pages/:slug", get(page_editor)),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_image_object_gets_defaults() {
        let data = normalize_section_data(json!({ "title": "t", "image": { "src": "a.png" } })).unwrap();
        assert_eq!(data["image"], json!({ "src": "a.png", "alt": "" }));
        assert_eq!(data["title"], "t");

        let data = normalize_section_data(json!({ "image": { "src": null } })).unwrap();
        assert_eq!(data["image"], json!({ "src": "", "alt": "" }));
    }

    #[test]
    fn test_image_string_becomes_object() {
        let data = normalize_section_data(json!({ "image": "https://cdn/x.png" })).unwrap();
        assert_eq!(data["image"], json!({ "src": "https://cdn/x.png", "alt": "Image" }));
    }

    #[test]
    fn test_payload_must_be_object() {
        assert!(normalize_section_data(json!([1, 2])).is_err());
        assert!(normalize_section_data(json!("text")).is_err());
        assert_eq!(normalize_section_data(json!({})).unwrap(), json!({}));
    }

    #[test]
    fn test_id_input() {
        let ids: Vec<IdInput> = serde_json::from_value(json!([3, "4", " 5 ", "x", 0, -1])).unwrap();
        let parsed: Vec<Option<i32>> = ids.iter().map(IdInput::id).collect();
        assert_eq!(parsed, vec![Some(3), Some(4), Some(5), None, None, None]);
    }
}
