use std::sync::Arc;

use auth::TokenCodec;
use dashboard_service::config::Config;
use dashboard_service::domain::principal::service::AuthService;
use dashboard_service::domain::settings::service::SettingsService;
use dashboard_service::inbound::http::router::create_router;
use dashboard_service::outbound::repositories::PostgresAdminRepository;
use dashboard_service::outbound::repositories::PostgresDeviceRepository;
use dashboard_service::outbound::repositories::PostgresSettingsRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "dashboard-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    // Fails when the signing key is missing or too weak; there is no
    // fallback secret
    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_hours = config.jwt.expiration_hours,
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

    let token_codec = TokenCodec::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    );

    let admin_repository = Arc::new(PostgresAdminRepository::new(pg_pool.clone()));
    let device_repository = Arc::new(PostgresDeviceRepository::new(pg_pool.clone()));
    let settings_repository = Arc::new(PostgresSettingsRepository::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        admin_repository,
        device_repository,
        token_codec,
    ));
    let settings_service = Arc::new(SettingsService::new(settings_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, settings_service);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
