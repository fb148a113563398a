//! API request handlers for the Equipment Registry
//!
//! Handlers act as the caller-context collaborator: they authenticate the
//! caller from a request header, stamp the call with the clock, and hold the
//! registry lock for the whole call so calls are applied in a single order.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use equipment_common::{CallerContext, Error, NewEquipment, Principal};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
    clock::Clock,
    models::{
        EquipmentResponse, LastIdResponse, RegisterEquipmentRequest, RegisterEquipmentResponse,
        TransferEquipmentRequest, TransferEquipmentResponse,
    },
    registry::Registry,
    storage::Mirror,
};

/// Shared application state
pub struct AppState {
    pub registry: Mutex<Registry>,
    pub mirror: Option<Mutex<Box<dyn Mirror>>>,
    pub clock: Arc<dyn Clock>,
    pub caller_header: HeaderName,
}

impl AppState {
    pub fn new(registry: Registry, clock: Arc<dyn Clock>, caller_header: HeaderName) -> Self {
        Self {
            registry: Mutex::new(registry),
            mirror: None,
            clock,
            caller_header,
        }
    }

    /// Write every mutation to `mirror` before applying it
    pub fn with_mirror(mut self, mirror: impl Mirror + 'static) -> Self {
        let mirror: Box<dyn Mirror> = Box::new(mirror);
        self.mirror = Some(Mutex::new(mirror));
        self
    }

    fn caller(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
        let value = headers.get(&self.caller_header).ok_or_else(|| ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: format!("Missing caller principal header: {}", self.caller_header),
            code: None,
        })?;

        let raw = value.to_str().map_err(|_| ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: "Caller principal header is not valid text".to_string(),
            code: None,
        })?;

        Principal::parse(raw).map_err(|e| ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: e.to_string(),
            code: None,
        })
    }
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<u32>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.code {
            Some(code) => serde_json::json!({
                "error": self.message,
                "code": code
            }),
            None => serde_json::json!({
                "error": self.message
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::NotFound { .. } | Error::UnknownOperation(_) => StatusCode::NOT_FOUND,
            Error::NotAuthorized { .. } => StatusCode::FORBIDDEN,
            Error::InvalidInput(_) | Error::InvalidPrincipal(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiError {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            status: rejection.status(),
            message: rejection.body_text(),
            code: None,
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError {
            status: rejection.status(),
            message: rejection.body_text(),
            code: None,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!("Internal error: {:#}", err);
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
            code: None,
        }
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "equipment-registry"
    }))
}

/// Register equipment owned by the caller
pub async fn register_equipment_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<RegisterEquipmentRequest>, JsonRejection>,
) -> Result<Json<RegisterEquipmentResponse>, ApiError> {
    let caller = state.caller(&headers)?;
    let Json(payload) = payload?;
    let equipment: NewEquipment = payload.into();
    equipment.validate()?;

    let mut registry = state.registry.lock().await;
    let ctx = CallerContext::new(caller, state.clock.now());
    let record = registry.next_record(&ctx, equipment);

    if let Some(mirror) = &state.mirror {
        mirror.lock().await.save_registration(&record).await?;
    }

    let id = registry.commit_registration(record);
    Ok(Json(RegisterEquipmentResponse { id }))
}

/// Transfer equipment to a new owner
pub async fn transfer_equipment_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<TransferEquipmentRequest>, JsonRejection>,
) -> Result<Json<TransferEquipmentResponse>, ApiError> {
    let Path(id) = path?;
    let caller = state.caller(&headers)?;
    let Json(payload) = payload?;
    // Malformed input is rejected before the registry is consulted, so a bad
    // new_owner on an unknown id is a 400 rather than NotFound.
    let new_owner = Principal::parse(&payload.new_owner)?;

    let mut registry = state.registry.lock().await;
    let ctx = CallerContext::new(caller, state.clock.now());

    let updated = match registry.check_transfer(&ctx, id, &new_owner) {
        Ok(updated) => updated,
        Err(e) => {
            warn!("Transfer of equipment {} by {} failed: {}", id, ctx.caller, e);
            return Err(e.into());
        }
    };

    if let Some(mirror) = &state.mirror {
        mirror.lock().await.save_owner(&updated).await?;
    }

    registry.transfer(&ctx, id, new_owner)?;
    Ok(Json(TransferEquipmentResponse { success: true }))
}

/// Get equipment by id
pub async fn get_equipment_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<EquipmentResponse>, ApiError> {
    let Path(id) = path?;
    let registry = state.registry.lock().await;

    Ok(Json(EquipmentResponse {
        equipment: registry.get(id).cloned(),
    }))
}

/// Get the most recently assigned equipment id
pub async fn get_last_id_handler(State(state): State<Arc<AppState>>) -> Json<LastIdResponse> {
    let registry = state.registry.lock().await;

    Json(LastIdResponse {
        last_id: registry.get_last_id(),
    })
}

/// Fallback for calls that match no registry operation
pub async fn unknown_operation_handler(method: Method, uri: Uri) -> ApiError {
    info!("Unknown operation: {} {}", method, uri.path());
    Error::UnknownOperation(format!("{} {}", method, uri.path())).into()
}
