//! Entry CRUD endpoints.
//!
//! ```text
//! GET    /v1/entries?categoryId=&sortByCategory=
//! POST   /v1/entries
//! GET    /v1/entries/{id}
//! PUT    /v1/entries/{id}
//! DELETE /v1/entries/{id}
//! ```
//!
//! Any authenticated requester may call these; visibility is decided by
//! ownership, so every route only ever touches the requester's own rows.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, CategoryId, Entry, EntryDraft, EntryListing, EntryPatch, EntryQuery, Error,
};
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;

const UNKNOWN_CATEGORY: &str = "Unknown category";

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesQuery {
    /// Restrict to entries in this category.
    pub category_id: Option<String>,
    /// Group the listing by category display name.
    #[serde(default)]
    pub sort_by_category: bool,
}

/// Request body for entry creation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEntryRequest {
    /// Display name.
    #[schema(example = "Dune")]
    pub name: String,
    /// Category the entry belongs to; must reference a live category.
    pub category_id: String,
    /// Optional free-text description.
    pub description: Option<String>,
}

/// Request body for a partial entry update.
///
/// `description` distinguishes "leave untouched" (field absent) from
/// "clear" (explicit `null`). Unknown fields are rejected, so neither the
/// owner nor the soft-delete flag can be set through this endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEntryRequest {
    /// Replacement display name.
    pub name: Option<String>,
    /// Move the entry to another live category.
    pub category_id: Option<String>,
    /// Replacement description, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

/// Deserialize a present-but-nullable field into `Some(Option<T>)`,
/// leaving absence as `None` via `#[serde(default)]`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Wire representation of an entry row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Referenced category.
    pub category_id: String,
    /// Free-text description, if any.
    pub description: Option<String>,
    /// Liveness flag; always `true` on responses from live lookups.
    pub active: bool,
    /// Owning account.
    pub created_by: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name,
            category_id: entry.category_id.to_string(),
            description: entry.description,
            active: entry.active,
            created_by: entry.created_by.to_string(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// List envelope; `items` is an array normally and a name-keyed map when
/// the listing is grouped.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum EntryListResponse {
    /// Creation-ordered rows.
    Flat {
        /// Number of rows visible to the requester.
        total: usize,
        /// Rows in creation order.
        items: Vec<EntryResponse>,
    },
    /// Rows bucketed under category display names.
    Grouped {
        /// Number of rows visible to the requester.
        total: usize,
        /// Buckets keyed by category name, sorted by key.
        items: BTreeMap<String, Vec<EntryResponse>>,
    },
}

impl From<EntryListing> for EntryListResponse {
    fn from(listing: EntryListing) -> Self {
        let total = listing.total();
        match listing {
            EntryListing::Flat(items) => Self::Flat {
                total,
                items: items.into_iter().map(EntryResponse::from).collect(),
            },
            EntryListing::Grouped(groups) => Self::Grouped {
                total,
                items: groups
                    .into_iter()
                    .map(|(name, rows)| {
                        (name, rows.into_iter().map(EntryResponse::from).collect())
                    })
                    .collect(),
            },
        }
    }
}

fn parse_category_id(raw: &str) -> Result<CategoryId, Error> {
    CategoryId::parse(raw).map_err(|_| Error::invalid_request(UNKNOWN_CATEGORY))
}

#[utoipa::path(
    get,
    path = "/v1/entries",
    params(
        ("categoryId" = Option<String>, Query, description = "Restrict to one category"),
        ("sortByCategory" = Option<bool>, Query, description = "Group rows by category name")
    ),
    responses(
        (status = 200, description = "Requester's entries", body = EntryListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["entries"],
    operation_id = "listEntries",
    security(("BearerToken" = []))
)]
#[get("/entries")]
pub async fn list(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<ListEntriesQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let listing = state
        .entries
        .list(
            auth.identity(),
            EntryQuery {
                category_id: query.category_id,
                sort_by_category: query.sort_by_category,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(EntryListResponse::from(listing)))
}

#[utoipa::path(
    post,
    path = "/v1/entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Empty name or unknown category", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["entries"],
    operation_id = "createEntry",
    security(("BearerToken" = []))
)]
#[post("/entries")]
pub async fn create(
    state: web::Data<HttpState>,
    auth: AuthContext,
    body: web::Json<CreateEntryRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let category_id = parse_category_id(&body.category_id)?;
    let draft = EntryDraft::new(&body.name, category_id, body.description.as_deref())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    let created = state.entries.create(auth.identity(), draft).await?;
    Ok(HttpResponse::Created().json(EntryResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/v1/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry", body = EntryResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Absent, deleted, or foreign entry", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["entries"],
    operation_id = "getEntry",
    security(("BearerToken" = []))
)]
#[get("/entries/{id}")]
pub async fn get(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let entry = state.entries.get(auth.identity(), &path).await?;
    Ok(HttpResponse::Ok().json(EntryResponse::from(entry)))
}

#[utoipa::path(
    put,
    path = "/v1/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Updated entry", body = EntryResponse),
        (status = 400, description = "No valid fields or unknown category", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Absent, deleted, or foreign entry", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["entries"],
    operation_id = "updateEntry",
    security(("BearerToken" = []))
)]
#[put("/entries/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
    body: web::Json<UpdateEntryRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let category_id = body
        .category_id
        .as_deref()
        .map(parse_category_id)
        .transpose()?;
    let patch = EntryPatch::new(
        body.name.as_deref(),
        category_id,
        body.description.as_ref().map(Option::as_deref),
    )
    .map_err(|error| Error::invalid_request(error.to_string()))?;
    let updated = state.entries.update(auth.identity(), &path, patch).await?;
    Ok(HttpResponse::Ok().json(EntryResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/v1/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry soft-deleted", body = EntryResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Absent, already deleted, or foreign entry", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["entries"],
    operation_id = "deleteEntry",
    security(("BearerToken" = []))
)]
#[delete("/entries/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let deleted = state.entries.delete(auth.identity(), &path).await?;
    Ok(HttpResponse::Ok().json(EntryResponse::from(deleted)))
}
