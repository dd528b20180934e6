use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use model::credentials;
use model::entities::utente;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, error, warn, info, debug, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    /// Username (must be unique; surrounding whitespace is ignored)
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub username: String,
    /// Plaintext password, hashed before it reaches the database
    #[validate(length(min = 4, message = "password must be at least 4 characters"))]
    pub password: String,
    /// First name
    pub nome: Option<String>,
    /// Last name
    pub cognome: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub telefono: Option<String>,
    /// Role label; defaults to "user" when omitted
    pub ruolo: Option<String>,
    /// Issuing entity the account belongs to
    pub emittente_id: Option<i32>,
}

/// Deserialize helper that keeps `null` apart from an absent field: present
/// fields land in `Some`, even when their value is `null`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Request body for updating a user
///
/// Absent fields are left untouched, fields set to `null` are cleared and
/// fields carrying a value are replaced. The username is fixed at creation
/// and cannot be changed here.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// New plaintext password; empty strings are ignored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// First name
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub nome: Option<Option<String>>,
    /// Last name
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub cognome: Option<Option<String>>,
    /// Contact email
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    /// Contact phone number
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub telefono: Option<Option<String>>,
    /// Role label; can be replaced but not cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruolo: Option<String>,
    /// Issuing entity the account belongs to
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub emittente_id: Option<Option<i32>>,
}

/// Query parameters for listing users
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Restrict the listing to accounts of one issuing entity
    pub emittente_id: Option<i32>,
}

/// User response model
///
/// `password_hash` and `salt` have no counterpart here, so credential
/// material never reaches a response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub nome: Option<String>,
    pub cognome: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub ruolo: String,
    pub emittente_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<utente::Model> for UserResponse {
    fn from(model: utente::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            nome: model.nome,
            cognome: model.cognome,
            email: model.email,
            telefono: model.telefono,
            ruolo: model.ruolo,
            emittente_id: model.emittente_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 409, description = "Username already taken", body = ErrorResponse),
        (status = 422, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_user function");

    // The trimmed username is what gets validated, stored and checked
    // against existing accounts.
    request.username = request.username.trim().to_string();
    debug!("Creating user with username: {}", request.username);

    if let Err(validation_errors) = request.validate() {
        warn!("Rejected user creation: {}", validation_errors);
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: validation_errors.to_string(),
                code: "VALIDATION_ERROR".to_string(),
                success: false,
            }),
        ));
    }

    trace!("Checking username availability");
    match utente::Entity::find()
        .filter(utente::Column::Username.eq(request.username.clone()))
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => {
            warn!("Username '{}' is already taken", request.username);
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Username '{}' already exists", request.username),
                    code: "USERNAME_ALREADY_EXISTS".to_string(),
                    success: false,
                }),
            ));
        }
        Ok(None) => {}
        Err(db_error) => {
            error!("Failed to check username availability: {}", db_error);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while creating user".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    }

    let password_hash = match credentials::hash_password(&request.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash password for user '{}': {}", request.username, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while creating user".to_string(),
                    code: "HASHING_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let now = Utc::now();
    let new_user = utente::ActiveModel {
        username: Set(request.username.clone()),
        password_hash: Set(password_hash),
        salt: Set(String::new()),
        nome: Set(request.nome),
        cognome: Set(request.cognome),
        email: Set(request.email),
        telefono: Set(request.telefono),
        ruolo: Set(request.ruolo.unwrap_or_else(|| "user".to_string())),
        emittente_id: Set(request.emittente_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!("User created successfully with ID: {}, username: {}",
                  user_model.id, user_model.username);
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create user '{}': {}", request.username, db_error);

            // The unique index is the real duplicate guard; a concurrent
            // create can slip past the availability check and surface here.
            // Both SQLite and Postgres spell uniqueness violations with
            // "unique"; other constraint failures (foreign keys) are not
            // duplicates and fall through below.
            let (status, error_response) = match db_error {
                DbErr::Exec(ref exec_err) => {
                    let error_msg = exec_err.to_string().to_lowercase();
                    if error_msg.contains("unique") {
                        (
                            StatusCode::CONFLICT,
                            ErrorResponse {
                                error: format!("Username '{}' already exists", request.username),
                                code: "USERNAME_ALREADY_EXISTS".to_string(),
                                success: false,
                            },
                        )
                    } else {
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorResponse {
                                error: "Failed to create user due to database constraint".to_string(),
                                code: "DATABASE_CONSTRAINT_ERROR".to_string(),
                                success: false,
                            },
                        )
                    }
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error while creating user".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    },
                ),
            };

            Err((status, Json(error_response)))
        }
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, StatusCode> {
    trace!("Entering get_users function");
    debug!("Fetching users from database");

    let mut finder = utente::Entity::find().order_by_asc(utente::Column::Id);
    if let Some(emittente_id) = query.emittente_id {
        debug!("Restricting listing to emittente_id: {}", emittente_id);
        finder = finder.filter(utente::Column::EmittenteId.eq(emittente_id));
    }

    match finder.all(&state.db).await {
        Ok(users) => {
            let user_count = users.len();
            debug!("Retrieved {} users from database", user_count);

            let user_responses: Vec<UserResponse> = users
                .into_iter()
                .map(UserResponse::from)
                .collect();

            info!("Successfully retrieved {} users", user_count);
            let response = ApiResponse {
                data: user_responses,
                message: "Users retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve users from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a user
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_user function for user_id: {}", user_id);
    debug!("Updating user with ID: {}", user_id);

    // Password rules match creation; the length check counts characters,
    // not bytes, the same way the creation validator does.
    if let Some(password) = request.password.as_deref() {
        if !password.is_empty() && password.chars().count() < 4 {
            warn!("Rejected password change for user ID {}: too short", user_id);
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: "password must be at least 4 characters".to_string(),
                    code: "VALIDATION_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    }

    // First, find the existing user
    trace!("Looking up existing user with ID: {}", user_id);
    let existing_user = match utente::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user)) => {
            debug!("Found existing user: {}", user.username);
            user
        }
        Ok(None) => {
            warn!("User with ID {} not found for update", user_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("User with ID {} does not exist", user_id),
                    code: "USER_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!("Failed to lookup user with ID {} for update: {}", user_id, db_error);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while updating user".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    // Create active model for update
    let mut user_active: utente::ActiveModel = existing_user.clone().into();
    let mut updated_fields = Vec::new();

    // Update only provided fields
    if let Some(nome) = request.nome {
        user_active.nome = Set(nome);
        updated_fields.push("nome");
    }
    if let Some(cognome) = request.cognome {
        user_active.cognome = Set(cognome);
        updated_fields.push("cognome");
    }
    if let Some(email) = request.email {
        user_active.email = Set(email);
        updated_fields.push("email");
    }
    if let Some(telefono) = request.telefono {
        user_active.telefono = Set(telefono);
        updated_fields.push("telefono");
    }
    if let Some(ruolo) = request.ruolo {
        user_active.ruolo = Set(ruolo);
        updated_fields.push("ruolo");
    }
    if let Some(emittente_id) = request.emittente_id {
        user_active.emittente_id = Set(emittente_id);
        updated_fields.push("emittente_id");
    }
    if let Some(password) = request.password.as_deref() {
        if !password.is_empty() {
            let password_hash = match credentials::hash_password(password) {
                Ok(hash) => hash,
                Err(e) => {
                    error!("Failed to hash password for user ID {}: {}", user_id, e);
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Internal server error while updating user".to_string(),
                            code: "HASHING_ERROR".to_string(),
                            success: false,
                        }),
                    ));
                }
            };
            user_active.password_hash = Set(password_hash);
            user_active.salt = Set(String::new());
            updated_fields.push("password");
        }
    }

    // An empty update is a plain read: nothing is written and updated_at
    // keeps its value.
    if updated_fields.is_empty() {
        debug!("No fields to update for user ID: {}", user_id);
        return Ok(Json(ApiResponse {
            data: UserResponse::from(existing_user),
            message: "User updated successfully".to_string(),
            success: true,
        }));
    }

    user_active.updated_at = Set(Utc::now());
    debug!("Updating fields: {}", updated_fields.join(", "));

    trace!("Attempting to update user in database");
    match user_active.update(&state.db).await {
        Ok(updated_user) => {
            info!("User with ID {} updated successfully. Updated fields: {}",
                  user_id, updated_fields.join(", "));
            let response = ApiResponse {
                data: UserResponse::from(updated_user),
                message: "User updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update user with ID {}: {}", user_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while updating user".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<StatusCode, StatusCode> {
    trace!("Entering delete_user function for user_id: {}", user_id);
    debug!("Attempting to delete user with ID: {}", user_id);

    match utente::Entity::delete_by_id(user_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!("Delete operation completed. Rows affected: {}", delete_result.rows_affected);
            if delete_result.rows_affected > 0 {
                info!("User with ID {} deleted successfully", user_id);
                Ok(StatusCode::NO_CONTENT)
            } else {
                warn!("User with ID {} not found for deletion (no rows affected)", user_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete user with ID {}: {}", user_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
