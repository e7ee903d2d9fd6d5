use std::{future::Future, pin::Pin, task::{Context as TaskContext, Poll}};

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    response::IntoResponse,
};
use axum_htmx::HX_TRIGGER;
use hyper::{header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE}, Response, StatusCode};
use maud::PreEscaped;
use serde_json::json;
use tower::{Layer, Service};

use crate::{context::SharedContext, template::Template};

/// Wraps HTML fragments returned by web handlers in the page template.
///
/// Needs a [`crate::context::ContextLayer`] outside of it. Boosted HTMX
/// requests get the bare fragment plus an `HX-Trigger` naming the active link.
#[derive(Clone)]
pub struct TemplateLayer<T: Template> {
    template: T,
}

impl<T> TemplateLayer<T>
where T: Template {
    pub fn new(template: T) -> Self {
        Self { template }
    }
}

impl<S, T> Layer<S> for TemplateLayer<T>
where T: Template {
    type Service = TemplateMiddleware<S, T>;

    fn layer(&self, inner: S) -> Self::Service {
        TemplateMiddleware {
            inner,
            template: self.template.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TemplateMiddleware<S, T> {
    inner: S,
    template: T,
}

impl<S, T> Service<Request> for TemplateMiddleware<S, T>
where
    S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    T: Template,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let context: Option<SharedContext> = req.extensions().get::<SharedContext>().cloned();
        let template = self.template.clone();

        let inner = self.inner.call(req);

        Box::pin(async move {
            let mut response: Response<Body> = inner.await?;

            let Some(context) = context else {
                tracing::warn!("template layer without request context");
                return Ok(response);
            };

            // redirects and JSON errors pass through untouched
            if !is_html(&response) {
                return Ok(response);
            }

            let context = context.lock().await;

            if context.is_boosted() {
                // HX-Trigger https://htmx.org/headers/hx-trigger/
                let trigger = json!({ "navigator": context.navigator.current_link() }).to_string();
                if let Ok(value) = HeaderValue::from_str(&trigger) {
                    response.headers_mut().insert(HX_TRIGGER, value);
                }
                return Ok(response);
            }

            let (parts, body) = response.into_parts();

            // read the entire fragment, then hand it to the page template
            let fragment = match to_bytes(body, usize::MAX).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::error!(error = %e, path = %context.path, "unable to read fragment");
                    return Ok((StatusCode::INTERNAL_SERVER_ERROR, "Unable to render page").into_response());
                }
            };

            let mut page = template.page(&context, PreEscaped(fragment)).into_response();
            *page.status_mut() = parts.status;
            for (name, value) in parts.headers.iter() {
                if !page.headers().contains_key(name) && *name != CONTENT_LENGTH {
                    page.headers_mut().append(name, value.clone());
                }
            }

            Ok(page)
        })
    }
}

fn is_html(response: &Response<Body>) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"))
}
