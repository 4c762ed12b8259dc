use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cardatabase::auth::{KeySource, SigningKey, TokenService};
use cardatabase::config::AppConfig;
use cardatabase::database::{seed, DatabaseManager};
use cardatabase::{app, AppState};

/// Car database REST API
#[derive(Debug, Parser)]
#[command(name = "cardatabase", version, about)]
struct Args {
    /// Port to listen on (overrides CARDB_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// PostgreSQL connection string; the in-memory store is used when absent
    #[arg(long)]
    database_url: Option<String>,

    /// Do not load the sample owners, cars and users
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = cardatabase::config::config().clone();
    apply_args(&mut config, args);
    tracing::info!("Starting car database in {:?} mode", config.environment);

    let stores = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open store")?;

    if config.seed.enabled {
        seed::seed(&stores).await.context("failed to seed store")?;
    }

    let key = SigningKey::from_config(config.security.jwt_secret.as_deref());
    match key.source() {
        KeySource::Configured => tracing::info!("Using configured token signing key"),
        KeySource::Generated => tracing::warn!(
            "No SECURITY_JWT_SECRET set, generated a signing key; tokens do not survive restart"
        ),
    }
    let ttl = config.security.token_ttl().with_context(|| {
        format!(
            "token lifetime of {} hours is out of range",
            config.security.jwt_expiry_hours
        )
    })?;
    let tokens = TokenService::new(&key, ttl);

    if !config.security.require_auth {
        tracing::warn!("Data routes are open; set SECURITY_REQUIRE_AUTH=true to require a bearer token");
    }

    let state = AppState::new(stores, tokens, config.security.require_auth);

    let bind_addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Car database listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

fn apply_args(config: &mut AppConfig, args: Args) {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }
    if args.no_seed {
        config.seed.enabled = false;
    }
}
