use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context as TaskContext, Poll},
};
use tokio::sync::Mutex;

use axum::extract::Request;
use axum_htmx::HX_BOOSTED;
use hyper::{HeaderMap, Response};
use maud::Markup;
use tower::{Layer, Service};

use crate::{navigator::Navigator, session::{self, SessionUser}};

/// Trait for rendering maud components with context
pub trait Component {
    fn render(&self, context: &Context) -> Markup;
}

/// Shared handle to the per-request [`Context`], found in request extensions.
pub type SharedContext = Arc<Mutex<Context>>;

/// Per-request UI state shared between a rendered handler and the template
/// layer wrapping it:
/// - incoming headers (HTMX-aware)
/// - the signed-in user, if any
/// - navigation, filled in by the handler
pub struct Context {
    pub path: String,
    pub title: Option<String>,
    pub navigator: Navigator,
    pub user: Option<SessionUser>,

    // request headers
    headers: HeaderMap,
}

impl Context {
    pub fn build(request: &Request) -> Self {
        let headers: HeaderMap = request.headers().clone();
        let path: String = request.uri().path().to_owned();

        Context {
            user: session::from_headers(&headers),
            title: None,
            navigator: Navigator::default(),
            path,
            headers,
        }
    }

    pub fn title(&self) -> String {
        match (&self.title, self.navigator.current_link()) {
            (Some(title), _) => title.clone(),
            (None, Some(link)) => link.label.clone(),
            (None, None) => String::new(),
        }
    }

    pub fn is_boosted(&self) -> bool {
        self.headers.contains_key(HX_BOOSTED)
    }
}

#[derive(Clone, Default)]
pub struct ContextLayer;

impl ContextLayer {
    pub fn new() -> Self {
        Self {}
    }
}

impl<S> Layer<S> for ContextLayer {
    type Service = ContextService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ContextService { inner }
    }
}

#[derive(Clone)]
pub struct ContextService<S> {
    inner: S,
}

impl<S> Service<Request> for ContextService<S>
where
    S: Service<Request, Response = Response<axum::body::Body>> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let context: SharedContext = Arc::new(Mutex::new(Context::build(&req)));

        // send the context into the handler
        req.extensions_mut().insert(Arc::clone(&context));

        let inner = self.inner.call(req);

        Box::pin(inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_plain_request_is_not_boosted() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let context = Context::build(&request);
        assert!(!context.is_boosted());
        assert!(context.user.is_none());
    }

    #[test]
    fn test_context_from_request() {
        let request = Request::builder()
            .uri("/about-us")
            .header(HX_BOOSTED, "true")
            .header("cookie", format!("session={}", session::encode(2, "ed@site.io")))
            .body(Body::empty())
            .unwrap();

        let context = Context::build(&request);
        assert_eq!(context.path, "/about-us");
        assert!(context.is_boosted());
        assert_eq!(context.user.as_ref().map(|u| u.id), Some(2));
        assert_eq!(context.title(), "");
    }
}
