//! User Service Library
//!
//! User registration and lookup over HTTP, backed by PostgreSQL or an
//! in-memory store.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;
pub mod shutdown;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

use common::ServerConfig;

use crate::api::{create_router, AppState};
use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::InMemoryUserStore;
use crate::service::UserManager;
use crate::shutdown::shutdown_signal;

/// Overrides for the `serve` command.
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Serve from [`InMemoryUserStore`] instead of PostgreSQL
    pub in_memory: bool,
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Build the application from the environment and serve it until a
/// shutdown signal arrives.
pub async fn run_server(options: ServeOptions) -> Result<(), Box<dyn std::error::Error>> {
    let (mut server, state) = if options.in_memory {
        let server = UserServiceConfig::server_from_env()?;
        warn!("Serving from the in-memory store; data is lost on exit");

        let service = UserManager::builder()
            .with_repository(Arc::new(InMemoryUserStore::new()))
            .build()?;
        (server, AppState::new(Arc::new(service)))
    } else {
        let config = UserServiceConfig::from_env()?;
        info!(database = ?config.database, "Loaded configuration");

        let db = Database::connect(&config.database).await?;
        let service = UserManager::builder()
            .with_store(db.get_connection())
            .build()?;
        (config.server, AppState::new(Arc::new(service)).with_database(db))
    };

    if let Some(host) = options.host {
        server.host = host;
    }
    if let Some(port) = options.port {
        server.port = port;
    }

    let state = state.with_request_timeout(Duration::from_secs(server.request_timeout_seconds));
    serve(create_router(state), &server, shutdown_signal()).await
}

/// Bind the configured address and serve `app` until `signal` resolves.
pub async fn serve<F>(
    app: Router,
    server: &ServerConfig,
    signal: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()>,
{
    let addr: SocketAddr = server.addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("User service listening on {}", listener.local_addr()?);

    let grace = Duration::from_secs(server.shutdown_grace_seconds);
    serve_on(listener, app, grace, signal).await
}

/// Serve on a bound listener. After `signal` resolves, new connections are
/// refused and in-flight requests get `grace` to finish.
pub async fn serve_on<F>(
    listener: TcpListener,
    app: Router,
    grace: Duration,
    signal: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()>,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server_task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server_task => {
            result??;
            return Ok(());
        }
        _ = signal => {}
    }

    info!(grace_ms = grace.as_millis() as u64, "Draining in-flight requests");
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server_task).await {
        Ok(joined) => {
            joined??;
            info!("Server stopped");
        }
        Err(_) => {
            warn!("Grace period expired, abandoning open connections");
            server_task.abort();
        }
    }

    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env()?;
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
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::routing::get;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::time::Instant;

    use super::*;

    #[tokio::test]
    async fn test_serve_returns_after_signal() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            shutdown_grace_seconds: 1,
            ..ServerConfig::default()
        };
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        stop_tx.send(()).unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            serve(Router::new(), &server, async {
                let _ = stop_rx.await;
            }),
        )
        .await
        .expect("serve did not return after the signal");

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_grace_period_bounds_stuck_request() {
        let (arrived_tx, arrived_rx) = oneshot::channel::<()>();
        let arrived = Arc::new(Mutex::new(Some(arrived_tx)));
        let app = Router::new().route(
            "/stuck",
            get(move || {
                let arrived = arrived.clone();
                async move {
                    let tx = arrived.lock().unwrap().take();
                    if let Some(tx) = tx {
                        let _ = tx.send(());
                    }
                    std::future::pending::<()>().await
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream
                .write_all(b"GET /stuck HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .await
                .unwrap();
            let mut buf = [0u8; 64];
            let _ = stream.read(&mut buf).await;
        });

        let started = Instant::now();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            serve_on(listener, app, Duration::from_millis(200), async {
                let _ = arrived_rx.await;
            }),
        )
        .await
        .expect("shutdown waited past the grace period");

        assert!(result.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
