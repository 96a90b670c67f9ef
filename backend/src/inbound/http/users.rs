//! Account endpoints: registration, login, and the profile lookup.
//!
//! ```text
//! POST /v1/auth/register
//! POST /v1/auth/login
//! GET  /v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{self, Login, Registration};
use crate::domain::{ApiResult, Error, Identity, Role, User};
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USER_NOT_FOUND: &str = "User not found";

/// Request body for registration.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// Login email address.
    #[schema(example = "reader@example.com")]
    pub email: String,
    /// Clear-text password.
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    /// Requested role; defaults to the base role when absent.
    pub role: Option<Role>,
}

/// Request body for login.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    /// Login email address.
    #[schema(example = "reader@example.com")]
    pub email: String,
    /// Clear-text password.
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// Public account representation; never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable account identifier.
    pub id: String,
    /// Login email address.
    pub email: String,
    /// Assigned role.
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

/// Response body for a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Account the token was issued for.
    pub user: UserResponse,
}

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Malformed or rejected payload", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    // Semantic validation failures share the body-level message so the
    // client cannot tell a rejected password from a malformed payload.
    let registration = Registration::new(&body.email, &body.password)
        .map_err(|_| Error::invalid_request("Invalid request body"))?;
    let hash = auth::password::hash(registration.password())
        .map_err(|error| Error::internal(error.to_string()))?;
    let role = body.role.unwrap_or(Role::User);
    let user = User::create(registration.email().clone(), hash, role);
    let stored = state.users.insert(user).await?;
    tracing::info!(user_id = %stored.id, "account registered");
    Ok(HttpResponse::Created().json(UserResponse::from(stored)))
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Malformed payload", body = ErrorBody),
        (status = 401, description = "Unknown account or wrong password", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    body: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let login = Login::new(&body.email, &body.password)
        .map_err(|_| Error::invalid_request("Invalid request body"))?;
    // Unknown address, inactive account, and wrong password all collapse
    // into the same rejection so login cannot enumerate accounts.
    let user = state
        .users
        .find_by_email(login.email())
        .await?
        .filter(|user| user.active)
        .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
    let matches = auth::password::verify(login.password(), &user.password_hash)
        .map_err(|error| Error::internal(error.to_string()))?;
    if !matches {
        return Err(Error::unauthorized(INVALID_CREDENTIALS));
    }
    let identity = Identity::new(user.id, user.role);
    let token = state
        .tokens
        .issue(&identity)
        .map_err(|error| Error::internal(error.to_string()))?;
    tracing::info!(user_id = %user.id, "login succeeded");
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Requester's account", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Account no longer exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "me",
    security(("BearerToken" = []))
)]
#[get("/auth/me")]
pub async fn me(state: web::Data<HttpState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    // A token can outlive its account; the lookup re-checks liveness.
    let user = state
        .users
        .find_by_id(&auth.identity().id)
        .await?
        .filter(|user| user.active)
        .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
