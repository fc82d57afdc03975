use std::sync::Arc;

use kitchen_service::config::Config;
use kitchen_service::domain::auth::service::AuthService;
use kitchen_service::inbound::http::router::create_router;
use kitchen_service::inbound::http::sessions::SessionStore;
use kitchen_service::outbound::repositories::PostgresUserStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitchen_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "kitchen-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    // Missing session secret or database URL is fatal: log and refuse to
    // serve rather than start an unauthenticatable gate.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error, refusing to start");
            std::process::exit(1);
        }
    };

    tracing::info!(
        http_port = config.server.http_port,
        session_secret_bytes = config.session.secret.len(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_store = Arc::new(PostgresUserStore::new(pg_pool));
    let auth_service = Arc::new(AuthService::new(user_store));
    let sessions = Arc::new(SessionStore::new(config.session.secret.as_bytes()));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, sessions);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
