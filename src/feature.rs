use axum::Router;

/// A slice of the site contributing routes.
///
/// `api` routes are merged as-is. `web` routes return HTML fragments and get
/// wrapped in the site template by the app builder.
pub trait Feature {
    fn name(&self) -> String;

    fn api(&self) -> Option<Router> {
        None
    }

    fn web(&self) -> Option<Router> {
        None
    }
}
