use axum::Router;
use serde::Deserialize;
use tower_http::services::ServeDir;

use crate::{Config, Feature};

/// A directory on disk served under `/static/{key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPath {
    key: String,
    mountpoint: String,
}

impl ContentPath {
    pub fn new(key: &str, mountpoint: &str) -> Self {
        Self {
            key: key.to_owned(),
            mountpoint: mountpoint.to_owned(),
        }
    }

    pub fn path(&self) -> String {
        format!("/static/{0}", self.key)
    }
}

#[derive(Default)]
pub struct AssetsFeature {
    roots: Vec<ContentPath>,
}

impl From<&Config> for AssetsFeature {
    fn from(config: &Config) -> Self {
        let mut feature = AssetsFeature::default();
        config
            .server
            .content_paths
            .iter()
            .for_each(|path| feature.add_path(path.clone()));
        feature
    }
}

impl AssetsFeature {
    pub fn add_path(&mut self, content_path: ContentPath) {
        self.roots.push(content_path);
    }
}

impl Feature for AssetsFeature {
    fn name(&self) -> String {
        "assets".to_owned()
    }

    fn api(&self) -> Option<Router> {
        if self.roots.is_empty() {
            return None;
        }

        let mut app: Router = Router::new();

        for static_path in self.roots.iter() {
            tracing::debug!(route = %static_path.path(), dir = %static_path.mountpoint, "serving static files");
            app = app.nest_service(&static_path.path(), ServeDir::new(&static_path.mountpoint));
        }

        Some(app)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_paths_from_config() {
        let config = Config::from_toml(r#"
            [server]
            content_paths = [{ key = 'images', mountpoint = './images' }]
        "#).unwrap();

        let feature = AssetsFeature::from(&config);
        assert_eq!(feature.roots.len(), 1);
        assert_eq!(feature.roots[0].path(), "/static/images");
        assert!(feature.api().is_some());
        assert!(AssetsFeature::default().api().is_none());
    }
}
