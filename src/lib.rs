mod app;
mod feature;
mod db;
mod context;
mod navigator;
mod middleware;
mod template;

pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod features;
pub mod render;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

pub use config::{Config, ConfigError};
pub use db::{Connection, ConnectionPool};
pub use navigator::{Link, Navigator};
pub use feature::Feature;
pub use context::{Component, Context, ContextLayer, SharedContext};
pub use app::{init_tracing, App, AppError, NoState};
pub use middleware::{TemplateLayer, TemplateMiddleware};
pub use template::{SiteTemplate, Template};
pub use state::AppState;

pub use axum::{Router, routing::get, response::IntoResponse};
pub use hyper::{HeaderMap, StatusCode};
