use std::{env, path::PathBuf, process::ExitCode, sync::Arc};

use sitework::{
    features::{
        AdminFeature, AssetsFeature, AuthFeature, ContactFeature, PublicFeature, SiteFeature,
        UploadsFeature,
    },
    init_tracing,
    store::MemoryContentStore,
    App, AppState, Config, SiteTemplate,
};

const CONFIG_ENV: &str = "SITEWORK_CONFIG";

struct Args {
    config: Option<PathBuf>,
    memory: bool,
}

fn parse_args() -> Args {
    let mut args = Args { config: None, memory: false };

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--memory" => args.memory = true,
            path if args.config.is_none() => args.config = Some(PathBuf::from(path)),
            other => tracing::warn!(arg = %other, "ignoring argument"),
        }
    }

    if args.config.is_none() {
        args.config = env::var_os(CONFIG_ENV).map(PathBuf::from);
    }

    args
}

fn load_config(path: Option<PathBuf>) -> Result<Config, sitework::ConfigError> {
    let mut config = match path {
        Some(path) if path.exists() => {
            tracing::info!(path = %path.display(), "loading config");
            Config::from_path(&path)?
        }
        Some(path) => {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Config::default()
        }
        None => Config::default(),
    };

    if let Ok(url) = env::var("DATABASE_URL") {
        config.database.url = Some(url);
    }

    Ok(config)
}

/// Create the account named by `SITEWORK_ADMIN_EMAIL` and
/// `SITEWORK_ADMIN_PASSWORD` so an in-memory run can sign in.
async fn seed_admin(store: &MemoryContentStore) -> Result<(), bcrypt::BcryptError> {
    let (Ok(email), Ok(password)) = (env::var("SITEWORK_ADMIN_EMAIL"), env::var("SITEWORK_ADMIN_PASSWORD")) else {
        return Ok(());
    };

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let user = store.add_user("Admin", &email, &hash).await;
    tracing::info!(user_id = user.id, email = %user.email, "seeded admin account");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = parse_args();
    let config = match load_config(args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "unable to load config");
            return ExitCode::FAILURE;
        }
    };

    let assets = AssetsFeature::from(&config);
    let app = App::new(config.clone(), SiteTemplate::new(config.title.clone()));

    let app = if args.memory {
        tracing::warn!("using in-memory content store, nothing will be persisted");
        let store = MemoryContentStore::new();
        if let Err(e) = seed_admin(&store).await {
            tracing::error!(error = %e, "unable to seed admin account");
            return ExitCode::FAILURE;
        }
        app.with_state(AppState::from_config(Arc::new(store), config))
    } else {
        match app.connect().await {
            Ok(app) => app,
            Err(e) => {
                tracing::error!(error = %e, "unable to start");
                return ExitCode::FAILURE;
            }
        }
    };

    let result = app
        .register_feature(assets)
        .register_feature_default::<PublicFeature>()
        .register_feature_default::<AdminFeature>()
        .register_feature_default::<AuthFeature>()
        .register_feature_default::<ContactFeature>()
        .register_feature_default::<UploadsFeature>()
        .register_feature_default::<SiteFeature>()
        .run()
        .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}
