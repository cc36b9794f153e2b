use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use shelf_domain::id::UserId;
use shelf_domain::kind::EntityKind;
use shelf_domain::user::UserRole;

use crate::domain::types::{User, UserSortField};
use crate::error::CatalogError;
use crate::handlers::{ListParams, ListResponse, parse_id};
use crate::state::AppState;
use crate::usecase::lifecycle::ArchiveUserUseCase;
use crate::usecase::query::ListUseCase;
use crate::usecase::user::{CreateUserInput, CreateUserUseCase, GetUserUseCase};

// ── Response types ───────────────────────────────────────────────────────────

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub role: UserRole,
    #[serde(serialize_with = "shelf_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Creator summary embedded in category and product details.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    pub archived: bool,
}

// ── POST /api/v1/users ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default, deserialize_with = "shelf_core::serde::trimmed_opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "shelf_core::serde::trimmed_opt_string")]
    pub avatar: Option<String>,
    pub role: Option<UserRole>,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), CatalogError> {
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
        sequence: state.sequence(),
        hasher: state.hasher(),
    };
    let user = usecase
        .execute(CreateUserInput {
            username: body.username,
            password: body.password,
            email: body.email,
            avatar: body.avatar,
            role: body.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /api/v1/users ────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<UserResponse>>, CatalogError> {
    let usecase = ListUseCase {
        repo: state.user_repo(),
    };
    let page = usecase
        .execute::<UserSortField>(&params.into())
        .await?;
    Ok(Json(ListResponse::from_page(page, UserResponse::from)))
}

// ── GET /api/v1/users/{id} ───────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, CatalogError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(parse_id(&id)?).await?;
    if user.visibility.is_archived() {
        return Err(CatalogError::NotFound(EntityKind::User));
    }
    Ok(Json(user.into()))
}

// ── POST /api/v1/users/{id}/archive ──────────────────────────────────────────

pub async fn archive_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArchiveResponse>, CatalogError> {
    let usecase = ArchiveUserUseCase {
        users: state.user_repo(),
    };
    let archived = usecase.execute(parse_id(&id)?).await?;
    Ok(Json(ArchiveResponse { archived }))
}
