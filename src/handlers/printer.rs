use crate::probe::probe;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use model::entities::emittente;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{instrument, error, warn, debug, trace};
use utoipa::{IntoParams, ToSchema};

/// Fallback port for printers speaking the raw TCP 9100 protocol.
const DEFAULT_PRINTER_PORT: i32 = 9100;

/// Query parameters for the printer status check
#[derive(Debug, Deserialize, IntoParams)]
pub struct PrinterStatusQuery {
    /// Issuing entity whose printer should be checked
    pub emittente_id: i32,
}

/// Reachability report for one printer endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrinterStatusResponse {
    /// Configured printer host; empty when none is set
    pub host: String,
    /// Configured printer port, or 9100 when unset
    pub port: i32,
    /// Whether a TCP connection could be established right now
    pub online: bool,
}

/// Check whether an issuing entity's receipt printer answers on its TCP port
#[utoipa::path(
    get,
    path = "/printer/status",
    tag = "printer",
    params(PrinterStatusQuery),
    responses(
        (status = 200, description = "Printer status determined", body = ApiResponse<PrinterStatusResponse>),
        (status = 404, description = "Issuing entity not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[instrument(skip(state))]
pub async fn printer_status(
    State(state): State<AppState>,
    Query(query): Query<PrinterStatusQuery>,
) -> Result<Json<ApiResponse<PrinterStatusResponse>>, StatusCode> {
    trace!("Entering printer_status function");
    debug!("Checking printer for emittente_id: {}", query.emittente_id);

    let entity = match emittente::Entity::find_by_id(query.emittente_id)
        .one(&state.db)
        .await
    {
        Ok(Some(entity)) => entity,
        Ok(None) => {
            warn!("Issuing entity with ID {} not found", query.emittente_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!(
                "Failed to look up issuing entity with ID {}: {}",
                query.emittente_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let host = entity.printer_host.unwrap_or_default();
    let port = entity.printer_port.unwrap_or(DEFAULT_PRINTER_PORT);

    // A port outside the TCP range cannot be reached by definition.
    let online = match u16::try_from(port) {
        Ok(tcp_port) => probe(&host, tcp_port, state.probe_timeout).await,
        Err(_) => {
            warn!("Configured printer port {} is not a valid TCP port", port);
            false
        }
    };

    debug!("Printer at '{}:{}' online: {}", host, port, online);
    let response = ApiResponse {
        data: PrinterStatusResponse { host, port, online },
        message: "Printer status determined".to_string(),
        success: true,
    };
    Ok(Json(response))
}
