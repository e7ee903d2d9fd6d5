use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use maud::html;

use crate::{
    content::SiteRoute,
    context::SharedContext,
    error::ApiResult,
    state::AppState,
    store::{ContentStore, StoreResult},
    Component, Feature, Navigator,
};

use super::public::{get_page_by_slug, list_routes};

/// Fill the request context with site navigation and an optional title.
pub(crate) async fn prepare_context(
    context: &SharedContext,
    store: &dyn ContentStore,
    title: Option<&str>,
) -> StoreResult<()> {
    let routes = list_routes(store).await?;

    let mut context = context.lock().await;
    context.navigator = Navigator::new(routes);
    let path = context.path.clone();
    context.navigator.set_current(&path);
    if let Some(title) = title {
        context.title = Some(title.to_owned());
    }

    Ok(())
}

async fn render_page(state: &AppState, context: &SharedContext, slug: &str) -> ApiResult<Response> {
    prepare_context(context, state.store(), None).await?;

    let Some(found) = get_page_by_slug(state.store(), slug).await? else {
        tracing::debug!(slug = %slug, "no page to render");
        context.lock().await.title = Some("Not found".to_owned());

        let markup = html! {
            section class="py-24 text-center" {
                h1 class="text-4xl font-bold" { "Page not found" }
                p class="text-gray-600 mt-4" { "There is nothing at this address." }
                a href="/" class="underline mt-6 inline-block" { "Back home" }
            }
        };
        return Ok((StatusCode::NOT_FOUND, markup).into_response());
    };

    let mut context = context.lock().await;
    context.title = Some(found.page.name.clone());

    let markup = html! {
        @for section in &found.sections {
            (section.render(&context))
        }
    };

    Ok(markup.into_response())
}

async fn home(
    Extension(state): Extension<AppState>,
    Extension(context): Extension<SharedContext>,
) -> ApiResult<Response> {
    render_page(&state, &context, SiteRoute::HOME_SLUG).await
}

async fn page(
    Extension(state): Extension<AppState>,
    Extension(context): Extension<SharedContext>,
    Path(slug): Path<String>,
) -> ApiResult<Response> {
    render_page(&state, &context, &slug).await
}

/// Server-rendered public pages.
#[derive(Default)]
pub struct SiteFeature;

impl Feature for SiteFeature {
    fn name(&self) -> String {
        "site".to_owned()
    }

    fn web(&self) -> Option<Router> {
        Some(
            Router::new()
                .route("/", get(home))
                .route("/:slug", get(page)),
        )
    }
}
