//! Equipment Registry Service
//!
//! Assigns sequential ids to physical equipment and tracks who owns each
//! item. Only the current owner may transfer a record to someone else.
//!
//! ## Endpoints
//!
//! - `POST /api/equipment` - Register equipment owned by the caller
//! - `POST /api/equipment/{id}/transfer` - Transfer equipment to a new owner
//! - `GET /api/equipment/{id}` - Look up a record
//! - `GET /api/equipment/last-id` - Most recently assigned id
//! - `GET /health` - Health check
//!
//! The caller principal is read from the header named in [`Config`].

pub mod clock;
pub mod config;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod storage;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use config::Config;
pub use handlers::AppState;
pub use registry::Registry;
pub use storage::{Mirror, Storage};
pub use store::{MemoryStore, RecordStore};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/api/equipment",
            post(handlers::register_equipment_handler),
        )
        .route(
            "/api/equipment/last-id",
            get(handlers::get_last_id_handler),
        )
        .route(
            "/api/equipment/{id}",
            get(handlers::get_equipment_handler),
        )
        .route(
            "/api/equipment/{id}/transfer",
            post(handlers::transfer_equipment_handler),
        )
        .fallback(handlers::unknown_operation_handler)
        .method_not_allowed_fallback(handlers::unknown_operation_handler)
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
