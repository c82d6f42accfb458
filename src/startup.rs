use crate::config::Config;
use crate::error::Error;
use crate::store::{DocumentStore, InMemoryDb, RedisDb};
use std::sync::Arc;
use tracing::{error, info};
#[cfg(feature = "web-interface")]
use {
    crate::error::AppResult,
    crate::models::{Role, UserAccount},
    crate::store::Repository,
    tracing::warn,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Connect to Redis, or fall back to an in-memory store when it cannot be
/// reached. Data in the fallback store is lost on restart.
pub async fn open_store(config: &Config) -> Arc<dyn DocumentStore> {
    let redis = match RedisDb::new(&config.redis_url) {
        Ok(redis) => redis,
        Err(e) => {
            error!("Failed to create Redis client: {}", e);
            info!("Using in-memory database as fallback");
            return Arc::new(InMemoryDb::new());
        }
    };

    match redis.ping().await {
        Ok(()) => {
            info!("Connected to Redis successfully");
            Arc::new(redis)
        }
        Err(e) => {
            error!("Failed to connect to Redis: {}", e);
            info!("Using in-memory database as fallback");
            Arc::new(InMemoryDb::new())
        }
    }
}

/// Create the configured administrator when no account exists yet
#[cfg(feature = "web-interface")]
pub async fn bootstrap_admin(users: &Repository<UserAccount>, config: &Config) -> AppResult<()> {
    if !users.list().await?.is_empty() {
        return Ok(());
    }

    let password_hash = crate::auth::hash_password(&config.admin_password)?;

    users
        .insert(UserAccount {
            id: None,
            username: config.admin_username.clone(),
            password_hash,
            role: Role::Administrator,
        })
        .await?;
    warn!(
        "No user accounts found, created administrator {}",
        config.admin_username
    );
    Ok(())
}

/// Build the application and serve it until a shutdown signal arrives
#[cfg(feature = "web-interface")]
pub async fn start_server(config: Config) -> miette::Result<()> {
    use crate::web::{build_router, AppState};
    use std::net::SocketAddr;

    let store = open_store(&config).await;
    bootstrap_admin(&Repository::new(Arc::clone(&store)), &config).await?;

    let addr = format!("{}:{}", config.bind_address, config.port)
        .parse::<SocketAddr>()
        .map_err(|e| {
            crate::error::config_error(&format!(
                "Invalid bind address {}:{}: {}",
                config.bind_address, config.port, e
            ))
        })?;

    let app = build_router(AppState::new(config, store));

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(crate::shutdown::shutdown_signal())
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}
