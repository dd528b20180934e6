use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::credentials;
use serde::{Deserialize, Serialize};
use tracing::{instrument, error, warn, info, debug, trace};
use utoipa::ToSchema;

/// Request body for credential verification
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Username of the account to check
    pub username: String,
    /// Plaintext password to verify
    pub password: String,
}

/// Verify a username/password pair
///
/// No session or token is issued; a successful check simply returns the
/// account's public profile. Unknown usernames and wrong passwords are
/// indistinguishable from the outside.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = ApiResponse<UserResponse>),
        (status = 401, description = "Credentials rejected", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering login function");
    debug!("Verifying credentials for username: {}", request.username);

    match credentials::verify_login(&state.db, &request.username, &request.password).await {
        Ok(Some(user)) => {
            info!("Login accepted for user ID: {}", user.id);
            let response = ApiResponse {
                data: UserResponse::from(user),
                message: "Login successful".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Login rejected for username: {}", request.username);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid username or password".to_string(),
                    code: "INVALID_CREDENTIALS".to_string(),
                    success: false,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to verify credentials for '{}': {}", request.username, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during login".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
