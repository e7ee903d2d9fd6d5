use std::{sync::Arc, time::Duration};

use axum::{http::StatusCode, response::IntoResponse, Extension, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::builder::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    context::ContextLayer,
    db,
    feature::Feature,
    middleware::TemplateLayer,
    state::AppState,
    store::{schema, PgContentStore, StoreError},
    template::Template,
    Config,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("database connection failed: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("schema setup failed: {0}")]
    Schema(#[from] StoreError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Not yet connected to any store.
#[derive(Clone)]
pub struct NoState;

pub type Features = Vec<Box<dyn Feature + 'static>>;

/// Composes features into one router and runs it.
///
/// ```ignore
/// App::new(config, SiteTemplate::new("Acme"))
///     .connect().await?
///     .register_feature_default::<SiteFeature>()
///     .run().await?;
/// ```
pub struct App<S, T>
where T: Template {
    config: Config,
    state: S,
    features: Features,
    template: T,
}

impl<T> App<NoState, T>
where T: Template {
    pub fn new(config: Config, template: T) -> Self {
        App {
            config,
            state: NoState,
            features: Vec::new(),
            template,
        }
    }

    /// Open the PostgreSQL pool, create missing tables and use the database
    /// store.
    pub async fn connect(self) -> Result<App<AppState, T>, AppError> {
        let pool = db::connect(&self.config.database).await?;
        schema::migrate(&pool).await?;
        tracing::info!(max_connections = self.config.database.max_connections, "database ready");

        let state = AppState::from_config(Arc::new(PgContentStore::new(pool)), self.config.clone());
        Ok(self.with_state(state))
    }

    pub fn with_state(self, state: AppState) -> App<AppState, T> {
        App {
            config: self.config,
            state,
            features: self.features,
            template: self.template,
        }
    }
}

impl<S, T> App<S, T>
where T: Template {
    pub fn register_feature(mut self, feature: impl Feature + 'static) -> Self {
        tracing::debug!(feature = %feature.name(), "registering feature");
        self.features.push(Box::new(feature));
        self
    }

    pub fn register_feature_default<F: Feature + Default + 'static>(self) -> Self {
        self.register_feature(F::default())
    }
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}

impl<T> App<AppState, T>
where T: Template {
    /// Merge every feature into one router and apply the core layers.
    pub fn build(self) -> Router {
        let mut router: Router = Router::new();

        for feature in self.features.iter() {
            if let Some(api) = feature.api() {
                router = router.merge(api);
            }

            if let Some(web) = feature.web() {
                // the context layer runs first so the template can read it
                let web = web
                    .layer(TemplateLayer::new(self.template.clone()))
                    .layer(ContextLayer::new());
                router = router.merge(web);
            }
        }

        router
            .fallback(handler_404)
            // core layers
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::new())
                    .layer(CompressionLayer::new())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        self.config.server.request_timeout_secs,
                    ))),
            )
            // shared handles for every handler
            .layer(Extension(self.state))
    }

    pub async fn run(self) -> Result<(), AppError> {
        let address = format!(
            "{host}:{port}",
            host = self.config.server.host,
            port = self.config.server.port
        );
        let listener: TcpListener = TcpListener::bind(&address).await?;
        tracing::info!(address = %address, "listening");

        axum::serve(listener, self.build())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // dropping the state here closes the pool
        tracing::info!("server shutdown complete");
        Ok(())
    }
}

/// Install the global subscriber: fmt output filtered by `RUST_LOG`,
/// `info` when unset. Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
