//! Category CRUD endpoints.
//!
//! ```text
//! GET    /v1/categories
//! POST   /v1/categories
//! GET    /v1/categories/{id}
//! PUT    /v1/categories/{id}
//! DELETE /v1/categories/{id}
//! ```
//!
//! Reads require the viewer role, mutations the editor role; admin
//! passes both checks.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, Category, CategoryDraft, CategoryPatch, Error, Role};
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;

/// Request body for category creation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryRequest {
    /// Display name.
    #[schema(example = "Science Fiction")]
    pub name: String,
}

/// Request body for a partial category update.
///
/// Unknown fields are rejected, so the soft-delete flag cannot be set
/// through this endpoint.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryRequest {
    /// Replacement display name.
    pub name: Option<String>,
}

/// Wire representation of a category row.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Liveness flag; always `true` on responses from live lookups.
    pub active: bool,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name,
            active: category.active,
            created_at: category.created_at.to_rfc3339(),
        }
    }
}

/// List envelope: visible rows plus their count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponse {
    /// Number of rows visible to the requester.
    pub total: usize,
    /// Rows in creation order.
    pub items: Vec<CategoryResponse>,
}

#[utoipa::path(
    get,
    path = "/v1/categories",
    responses(
        (status = 200, description = "Visible categories", body = CategoryListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Role lacks read access", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["categories"],
    operation_id = "listCategories",
    security(("BearerToken" = []))
)]
#[get("/categories")]
pub async fn list(state: web::Data<HttpState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    let requester = auth.require_role(Role::Viewer)?;
    let items: Vec<CategoryResponse> = state
        .categories
        .list(requester)
        .await?
        .into_iter()
        .map(CategoryResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(CategoryListResponse {
        total: items.len(),
        items,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Empty name", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Role lacks write access", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["categories"],
    operation_id = "createCategory",
    security(("BearerToken" = []))
)]
#[post("/categories")]
pub async fn create(
    state: web::Data<HttpState>,
    auth: AuthContext,
    body: web::Json<CreateCategoryRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_role(Role::Editor)?;
    let draft =
        CategoryDraft::new(&body.name).map_err(|error| Error::invalid_request(error.to_string()))?;
    let created = state.categories.create(draft).await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/v1/categories/{id}",
    params(("id" = String, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Role lacks read access", body = ErrorBody),
        (status = 404, description = "Absent or deleted category", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["categories"],
    operation_id = "getCategory",
    security(("BearerToken" = []))
)]
#[get("/categories/{id}")]
pub async fn get(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = auth.require_role(Role::Viewer)?;
    let category = state.categories.get(requester, &path).await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

#[utoipa::path(
    put,
    path = "/v1/categories/{id}",
    params(("id" = String, Path, description = "Category identifier")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = CategoryResponse),
        (status = 400, description = "No valid fields to update", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Role lacks write access", body = ErrorBody),
        (status = 404, description = "Absent or deleted category", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["categories"],
    operation_id = "updateCategory",
    security(("BearerToken" = []))
)]
#[put("/categories/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
    body: web::Json<UpdateCategoryRequest>,
) -> ApiResult<HttpResponse> {
    let requester = auth.require_role(Role::Editor)?;
    let patch = CategoryPatch::new(body.name.as_deref())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    let updated = state.categories.update(requester, &path, patch).await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/v1/categories/{id}",
    params(("id" = String, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category soft-deleted", body = CategoryResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Role lacks write access", body = ErrorBody),
        (status = 404, description = "Absent or already deleted category", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory",
    security(("BearerToken" = []))
)]
#[delete("/categories/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = auth.require_role(Role::Editor)?;
    let deleted = state.categories.delete(requester, &path).await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(deleted)))
}
