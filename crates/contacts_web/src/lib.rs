//! HTTP surface of the contacts manager.
//!
//! Server-rendered pages over the core contact service. Routes mirror the
//! page structure:
//!
//! | Method | Path                     | Handler            |
//! |--------|--------------------------|--------------------|
//! | GET    | `/`                      | index + sidebar    |
//! | POST   | `/`                      | create, redirect to edit |
//! | GET    | `/contacts/{id}`         | contact detail     |
//! | POST   | `/contacts/{id}`         | favorite toggle (fragment for background requests) |
//! | GET    | `/contacts/{id}/edit`    | edit form          |
//! | POST   | `/contacts/{id}/edit`    | save edit          |
//! | POST   | `/contacts/{id}/destroy` | delete             |
//!
//! # Running
//! ```sh
//! CONTACTS_PORT=3000 CONTACTS_DB_PATH=contacts.sqlite3 contacts serve
//! ```
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use log::{error, info};
use tokio::{net::TcpListener, signal};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod views;

use config::Config;
use error::ServerError;
use routes::{
    contact_loader, create_action, destroy_action, edit_action, edit_loader, favorite_action,
    health_handler, index_loader, script_handler, stylesheet_handler,
};
use state::{ContactStore, State};

pub fn build_router(state: Arc<State>) -> Router {
    Router::new()
        .route("/", get(index_loader).post(create_action))
        .route("/contacts/{id}", get(contact_loader).post(favorite_action))
        .route("/contacts/{id}/edit", get(edit_loader).post(edit_action))
        .route("/contacts/{id}/destroy", post(destroy_action))
        .route("/healthz", get(health_handler))
        .route("/app.css", get(stylesheet_handler))
        .route("/app.js", get(script_handler))
        .with_state(state)
}

/// Initializes logging and the store, then serves until Ctrl+C or SIGTERM.
pub async fn start_server(config: Config) -> Result<(), ServerError> {
    let log_dir = config.log_dir.to_string_lossy().to_string();
    contacts_core::init_logging(&config.log_level, &log_dir).map_err(ServerError::Logging)?;

    info!(
        "event=server_init module=web status=start port={} db_path={} memory_store={}",
        config.port,
        config.db_path,
        config.uses_memory_store()
    );
    let store = ContactStore::open(&config)?;
    let address = config.address();
    let state = State::new(store);

    let app = build_router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("event=server_listen module=web status=ok address={address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=web status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown module=web reason=ctrl_c"),
            Err(err) => {
                error!("event=shutdown module=web status=error error_code=ctrl_c_handler error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown module=web reason=sigterm");
            }
            Err(err) => {
                error!("event=shutdown module=web status=error error_code=sigterm_handler error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
