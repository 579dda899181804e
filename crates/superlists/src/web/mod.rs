//! HTTP layer for superlists.
//!
//! Wires the views from [`views`] to the paths in [`urls`] and runs the
//! server until it receives Ctrl+C or SIGTERM.

pub mod templates;
pub mod urls;
pub mod views;

use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::Storage;

use self::urls::Route;

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    storage: Arc<Mutex<Storage>>,
}

impl AppState {
    /// Wrap an open storage for sharing between requests.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// Run `f` against the storage on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or an internal error if the storage
    /// lock is poisoned or the blocking task panics.
    pub async fn with_storage<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Storage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let guard = storage
                .lock()
                .map_err(|_| Error::internal("storage lock poisoned"))?;
            f(&guard)
        })
        .await
        .map_err(|e| Error::internal(format!("storage task failed: {e}")))?
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            Route::Home.path(),
            get(views::home_page).post(views::save_item),
        )
        .route(Route::List.path(), get(views::view_list))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the configured database and serve until shutdown is requested.
///
/// # Errors
///
/// Returns an error if the bind address is invalid, the database cannot be
/// opened, or the listener fails.
pub async fn serve(config: &Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let storage = Storage::open(config.database_path())?;
    let listener = TcpListener::bind(addr).await?;

    run(listener, AppState::new(storage), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn run(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
