// Main entry point for the calendar backend

use anyhow::{anyhow, Context};
use calendar_backend::api::{create_router, AppState};
use calendar_backend::auth::audit_logger::AuditLogger;
use calendar_backend::auth::auth_middleware::AuthState;
use calendar_backend::auth::password::PasswordHasher;
use calendar_backend::auth::token::TokenService;
use calendar_backend::config::Config;
use calendar_backend::core::accounts::AccountService;
use calendar_backend::core::repository::CalendarRepository;
use calendar_backend::infra::pg_store::PgUserStore;
use calendar_backend::state::{InMemoryUserStore, UserStore};

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber with config values
    init_tracing(&config)?;

    info!("Starting calendar backend");
    info!(
        bind_address = %config.bind_address,
        port = config.port,
        static_dir = ?config.static_dir,
        "Configuration loaded"
    );

    // 3. Initialize database pool (if configured)
    let db_pool: Option<Arc<sqlx::PgPool>> = match config.database_url {
        Some(ref database_url) => Some(Arc::new(
            sqlx::PgPool::connect(database_url)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to connect to database");
                    e
                })
                .context("connecting to DATABASE_URL")?,
        )),
        None => None,
    };

    // 4. Initialize user store (Postgres or in-memory)
    let user_store: Arc<dyn UserStore + Send + Sync> = match db_pool {
        Some(ref pool) => {
            let store = PgUserStore::new((**pool).clone());
            store.ensure_schema().await.context("creating schema")?;
            info!("Postgres user store initialized");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            Arc::new(InMemoryUserStore::new())
        }
    };

    // 5. Initialize audit logger
    let audit_logger = Arc::new(AuditLogger::new(db_pool.clone()));

    // 6. Initialize token service and password hasher
    let token_service = Arc::new(TokenService::new(config.jwt_secret.as_bytes()));
    let hasher = Arc::new(PasswordHasher::new().context("initializing password hasher")?);

    info!(bcrypt_cost = hasher.cost(), "Auth components initialized");

    // 7. Create AuthState
    let auth_state = Arc::new(AuthState {
        token_service: token_service.clone(),
        audit_logger: audit_logger.clone(),
    });

    // 8. Create AppState
    let app_state = AppState {
        user_store: user_store.clone(),
        accounts: Arc::new(AccountService::new(
            user_store.clone(),
            hasher,
            token_service,
            audit_logger,
        )),
        calendars: Arc::new(CalendarRepository::new(user_store)),
        config: Arc::new(config.clone()),
    };

    // 9. Create router
    let router = create_router(&app_state, auth_state).with_state(app_state);

    info!("Router created");

    // 10. Start HTTP server
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            error!(error = %e, addr = %addr, "Failed to bind to address");
            e
        })
        .with_context(|| format!("binding {}", addr))?;

    info!(addr = %addr, "Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber based on configuration
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let level = parse_log_level(&config.log_level).map_err(|e| anyhow!(e))?;

    // RUST_LOG takes precedence over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_env_filter(filter);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> Result<tracing::Level, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(format!("Invalid log level: {}", level)),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}
