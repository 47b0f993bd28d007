use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::Viewer;
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::types::{RecipeSummary, SubscribedAuthor, User};
use crate::error::ApiError;
use crate::handlers::{ApiJson, parse_query, require_user};
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, GetUserUseCase, ListSubscriptionsUseCase,
    ListUsersUseCase,
};
use crate::usecase::visibility::VisibilityUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeSummaryResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(recipe: RecipeSummary) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// An author with their newest recipes, as shown under subscriptions.
#[derive(Debug, Serialize)]
pub struct SubscribedAuthorResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl From<SubscribedAuthor> for SubscribedAuthorResponse {
    fn from(author: SubscribedAuthor) -> Self {
        Self {
            user: UserResponse::new(author.user, true),
            recipes: author
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: author.recipes_count,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UserListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Deserialize, Default)]
pub struct SubscriptionListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<u64>,
}

pub(crate) fn page_request(page: Option<u32>, limit: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest {
        limit: limit.unwrap_or(defaults.limit),
        page: page.unwrap_or(defaults.page),
    }
    .clamped()
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn get_users(
    viewer: Viewer,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let query: UserListQuery = parse_query(raw_query)?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let page = usecase
        .execute(page_request(query.page, query.limit))
        .await?;

    let ids: Vec<Uuid> = page.results.iter().map(|u| u.id).collect();
    let visibility = VisibilityUseCase {
        repo: state.relation_repo(),
    };
    let followed = visibility.subscribed(viewer.user_id(), &ids).await?;
    Ok(Json(page.map(|user| {
        let is_subscribed = followed.contains(&user.id);
        UserResponse::new(user, is_subscribed)
    })))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    viewer: Viewer,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let identity = require_user(viewer)?;
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(UserResponse::new(user, false)))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(user_id).await?;
    let visibility = VisibilityUseCase {
        repo: state.relation_repo(),
    };
    let followed = visibility.subscribed(viewer.user_id(), &[user.id]).await?;
    let is_subscribed = followed.contains(&user.id);
    Ok(Json(UserResponse::new(user, is_subscribed)))
}

// ── GET /users/subscriptions ─────────────────────────────────────────────────

pub async fn get_subscriptions(
    viewer: Viewer,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<SubscribedAuthorResponse>>, ApiError> {
    let identity = require_user(viewer)?;
    let query: SubscriptionListQuery = parse_query(raw_query)?;
    let usecase = ListSubscriptionsUseCase {
        users: state.user_repo(),
        recipes: state.recipe_repo(),
    };
    let page = usecase
        .execute(
            identity.user_id,
            page_request(query.page, query.limit),
            query.recipes_limit,
        )
        .await?;
    Ok(Json(page.map(SubscribedAuthorResponse::from)))
}
