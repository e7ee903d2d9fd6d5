use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    services::{Mailer, StaticUploadSigner, TracingMailer, UploadSigner},
    store::ContentStore,
};

/// Shared handles injected into every handler through an `Extension` layer.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub mailer: Arc<dyn Mailer>,
    pub uploads: Arc<dyn UploadSigner>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ContentStore>,
        mailer: Arc<dyn Mailer>,
        uploads: Arc<dyn UploadSigner>,
        config: Config,
    ) -> Self {
        Self {
            store,
            mailer,
            uploads,
            config: Arc::new(config),
        }
    }

    /// State with the logging mailer and the static upload signer taken from
    /// `config`.
    pub fn from_config(store: Arc<dyn ContentStore>, config: Config) -> Self {
        let uploads = StaticUploadSigner::new(&config.uploads.upload_base);
        Self::new(store, Arc::new(TracingMailer), Arc::new(uploads), config)
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    pub fn upload_expiry(&self) -> Duration {
        Duration::from_secs(self.config.uploads.expires_secs)
    }
}
