use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use configs::{AppConfig, LogFormat};
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use service::user::repo::seaorm::SeaOrmUserRepository;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};

/// Initialize logging via shared common utils
pub fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => init_logging_default(),
        LogFormat::Json => init_logging_json(),
    }
}

/// `config.toml` (or `CONFIG_PATH`) when present, else defaults plus server
/// environment variables. The database URL falls back to `DATABASE_URL`.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let mut cfg = if Path::new(&configs::config_path()).exists() {
        configs::load_default()?
    } else {
        AppConfig::from_env()
    };
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Connect, migrate, build the app and serve until the listener fails.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = connect_with_config(&DatabaseConfig::from(&cfg.database)).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    let state = ServerState::new(Arc::new(SeaOrmUserRepository::new(db)));
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, max_connections = cfg.database.max_connections, "starting users api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_server_section() {
        let cfg = configs::parse("[server]\nhost = \"0.0.0.0\"\nport = 9090\n").unwrap();
        assert_eq!(bind_addr(&cfg).unwrap().to_string(), "0.0.0.0:9090");
    }

    #[test]
    fn bind_addr_rejects_garbage_host() {
        let cfg = configs::parse("[server]\nhost = \"not a host\"\nport = 9090\n").unwrap();
        assert!(bind_addr(&cfg).is_err());
    }
}
