use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;

use crate::{
    content::{PageWithSections, SiteRoute},
    error::ApiResult,
    state::AppState,
    store::{ContentStore, StoreResult},
    Feature,
};

/// Navigation entries for every page, in navigation order.
pub async fn list_routes(store: &dyn ContentStore) -> StoreResult<Vec<SiteRoute>> {
    let pages = store.list_pages().await?;
    Ok(pages.iter().map(SiteRoute::from).collect())
}

/// A page with its sections in display order, or `None` when the slug is free.
pub async fn get_page_by_slug(
    store: &dyn ContentStore,
    slug: &str,
) -> StoreResult<Option<PageWithSections>> {
    let Some(page) = store.find_page_by_slug(slug).await? else {
        return Ok(None);
    };

    let sections = store.list_sections(page.id).await?;
    Ok(Some(PageWithSections { page, sections }))
}

async fn routes(Extension(state): Extension<AppState>) -> ApiResult<Json<Vec<SiteRoute>>> {
    Ok(Json(list_routes(state.store()).await?))
}

async fn page(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Response> {
    match get_page_by_slug(state.store(), &slug).await? {
        Some(page) => Ok(Json(page).into_response()),
        None => {
            tracing::debug!(slug = %slug, "page not found");
            Ok((StatusCode::NOT_FOUND, Json(json!({ "page": null }))).into_response())
        }
    }
}

/// Read-only content API used by the site and its client-side code.
#[derive(Default)]
pub struct PublicFeature;

impl Feature for PublicFeature {
    fn name(&self) -> String {
        "public".to_owned()
    }

    fn api(&self) -> Option<Router> {
        Some(
            Router::new()
                .route("/api/routes", get(routes))
                // shares its path with the admin page delete
                .route("/api/pages/:key", get(page)),
        )
    }
}
