use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use foodgram_auth_types::identity::Viewer;

use crate::domain::relation::{Relation, RelationKind};
use crate::error::ApiError;
use crate::handlers::users::{RecipeSummaryResponse, SubscribedAuthorResponse};
use crate::handlers::{parse_query, require_user};
use crate::state::AppState;
use crate::usecase::recipe::GetRecipeSummaryUseCase;
use crate::usecase::relation::{AddRelationUseCase, RemoveRelationUseCase};
use crate::usecase::user::GetSubscribedAuthorUseCase;

async fn add_recipe_relation(
    state: &AppState,
    viewer: Viewer,
    kind: RelationKind,
    recipe_id: i32,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), ApiError> {
    let identity = require_user(viewer)?;
    let relation = Relation::for_recipe(kind, identity.user_id, recipe_id)
        .ok_or_else(|| anyhow::anyhow!("{kind} is not a recipe relation"))?;
    let usecase = AddRelationUseCase {
        repo: state.relation_repo(),
    };
    usecase.execute(relation).await?;

    let recipe = GetRecipeSummaryUseCase {
        repo: state.recipe_repo(),
    }
    .execute(recipe_id)
    .await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

async fn remove_recipe_relation(
    state: &AppState,
    viewer: Viewer,
    kind: RelationKind,
    recipe_id: i32,
) -> Result<StatusCode, ApiError> {
    let identity = require_user(viewer)?;
    let relation = Relation::for_recipe(kind, identity.user_id, recipe_id)
        .ok_or_else(|| anyhow::anyhow!("{kind} is not a recipe relation"))?;
    let usecase = RemoveRelationUseCase {
        repo: state.relation_repo(),
    };
    usecase.execute(relation).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST/DELETE /recipes/{id}/favorite ───────────────────────────────────────

pub async fn add_favorite(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), ApiError> {
    add_recipe_relation(&state, viewer, RelationKind::Favorite, recipe_id).await
}

pub async fn remove_favorite(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove_recipe_relation(&state, viewer, RelationKind::Favorite, recipe_id).await
}

// ── POST/DELETE /recipes/{id}/shopping_cart ──────────────────────────────────

pub async fn add_to_shopping_cart(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), ApiError> {
    add_recipe_relation(&state, viewer, RelationKind::ShoppingCart, recipe_id).await
}

pub async fn remove_from_shopping_cart(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove_recipe_relation(&state, viewer, RelationKind::ShoppingCart, recipe_id).await
}

// ── POST/DELETE /users/{id}/subscribe ────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u64>,
}

pub async fn subscribe(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> Result<(StatusCode, Json<SubscribedAuthorResponse>), ApiError> {
    let identity = require_user(viewer)?;
    let query: SubscribeQuery = parse_query(raw_query)?;
    let usecase = AddRelationUseCase {
        repo: state.relation_repo(),
    };
    usecase
        .execute(Relation::Subscription {
            subscriber_id: identity.user_id,
            author_id,
        })
        .await?;

    let author = GetSubscribedAuthorUseCase {
        users: state.user_repo(),
        recipes: state.recipe_repo(),
    }
    .execute(author_id, query.recipes_limit)
    .await?;
    Ok((StatusCode::CREATED, Json(author.into())))
}

pub async fn unsubscribe(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let identity = require_user(viewer)?;
    let usecase = RemoveRelationUseCase {
        repo: state.relation_repo(),
    };
    usecase
        .execute(Relation::Subscription {
            subscriber_id: identity.user_id,
            author_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
