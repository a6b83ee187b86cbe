//! Embedded REST API server
//!
//! Exposes the file-backed record store over HTTP so a front-end or form
//! processor can list/get/create/update/delete customer records. Every
//! route requires a static bearer token matching the configured secret.
//!
//! Routes:
//! - `GET    /api/customers`        — list all records
//! - `POST   /api/customers`        — create from a JSON draft
//! - `GET    /api/customers/{id}`   — fetch one record
//! - `PUT    /api/customers/{id}`   — replace a record's fields
//! - `DELETE /api/customers/{id}`   — remove a record
//! - `POST   /api/intake`           — create from fixed-order form values

mod customers;
mod intake;

use actix_web::web::{delete, get, post, put, scope, Data};
use actix_web::{App, HttpRequest, HttpServer, Scope};
use tracing::info;

use crate::config::Config;
use crate::store::RecordStore;

const API_PATH: &str = "/api";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    /// Static bearer secret compared against the Authorization header
    pub api_token: String,
}

/// Checks the `Authorization: Bearer <token>` header against the
/// configured secret.
fn authorized(req: &HttpRequest, state: &AppState) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == state.api_token)
}

/// Configures and returns the Actix scope for the customer API routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/customers", get().to(customers::list))
        .route("/customers", post().to(customers::create))
        .route("/customers/{id}", get().to(customers::get_one))
        .route("/customers/{id}", put().to(customers::update))
        .route("/customers/{id}", delete().to(customers::remove))
        .route("/intake", post().to(intake::process))
}

/// Runs the API server until interrupted.
///
/// Refuses to start without a configured api token: the bearer check is
/// the only thing standing between the store and the network.
pub async fn run(config: &Config, store: RecordStore) -> std::io::Result<()> {
    if config.server.api_token.trim().is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "refusing to serve without an api token (set server.api_token or PAWDESK_API_TOKEN)",
        ));
    }

    let state = AppState {
        store,
        api_token: config.server.api_token.clone(),
    };
    let port = config.server.port;

    info!(port, "starting API server");

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(state.clone()))
            .service(configure_routes())
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
