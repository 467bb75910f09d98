//! Room Service Library
//!
//! Authoritative room-assignment endpoint over HTTP. Every assignment is re-checked
//! against persisted occupancy inside the transaction that writes it.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::RoomServiceConfig;
use crate::infra::Database;
use crate::repository::OccupancyStore;
use crate::service::{AssignmentManager, JwtVerifier};

/// Start the HTTP server on `host:port`; everything else comes from the environment.
pub async fn serve(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RoomServiceConfig::from_env();
    config.server.host = host.to_string();
    config.server.port = port;
    run_server_with_config(config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = RoomServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for migration in db.migration_status().await? {
                let marker = if migration.applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, migration.name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

async fn run_server_with_config(
    config: RoomServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    info!(?config, "Starting room service");

    let db = Database::connect(&config.database).await?;

    let repo = Arc::new(OccupancyStore::new(db.get_connection()));
    let assignments = Arc::new(AssignmentManager::new(repo));
    let sessions = Arc::new(JwtVerifier::new(&config.jwt.secret));

    let state = AppState::new(assignments, sessions);
    let app = create_router(state, config.cors_allowed_origin.as_deref());

    let addr: SocketAddr = config.server.addr().parse()?;
    info!("Room service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
