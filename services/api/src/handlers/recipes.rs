use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::Viewer;
use foodgram_domain::pagination::Page;

use crate::domain::types::{IngredientAmount, Recipe, RecipeFilter};
use crate::error::ApiError;
use crate::handlers::tags::TagResponse;
use crate::handlers::users::{UserResponse, page_request};
use crate::handlers::{ApiJson, parse_flag, parse_query, require_user};
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase, RecipeDraft,
    UpdateRecipeUseCase,
};
use crate::usecase::visibility::VisibilityUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Attach per-viewer flags to loaded recipes.
async fn present(
    state: &AppState,
    viewer: Viewer,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>, ApiError> {
    let visibility = VisibilityUseCase {
        repo: state.relation_repo(),
    };
    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author.id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let marks = visibility
        .recipe_marks(viewer.user_id(), &recipe_ids)
        .await?;
    let followed = visibility.subscribed(viewer.user_id(), &author_ids).await?;

    Ok(recipes
        .into_iter()
        .map(|recipe| {
            let flags = marks.flags(recipe.id);
            let is_subscribed = followed.contains(&recipe.author.id);
            RecipeResponse {
                id: recipe.id,
                tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
                author: UserResponse::new(recipe.author, is_subscribed),
                ingredients: recipe
                    .ingredients
                    .into_iter()
                    .map(|item| RecipeIngredientResponse {
                        id: item.ingredient.id,
                        name: item.ingredient.name,
                        measurement_unit: item.ingredient.measurement_unit,
                        amount: item.amount,
                    })
                    .collect(),
                is_favorited: flags.is_favorited,
                is_in_shopping_cart: flags.is_in_shopping_cart,
                name: recipe.name,
                image: recipe.image,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
            }
        })
        .collect())
}

async fn present_one(
    state: &AppState,
    viewer: Viewer,
    recipe_id: i32,
) -> Result<RecipeResponse, ApiError> {
    let usecase = GetRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase.execute(recipe_id).await?;
    present(state, viewer, vec![recipe])
        .await?
        .pop()
        .ok_or(ApiError::RecipeNotFound)
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub author: Option<Uuid>,
    /// Tag slugs, any-of.
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

// ── GET /recipes ─────────────────────────────────────────────────────────────

pub async fn get_recipes(
    viewer: Viewer,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<RecipeResponse>>, ApiError> {
    let query: RecipeListQuery = parse_query(raw_query)?;
    let favorited = parse_flag(query.is_favorited.as_deref())?;
    let in_cart = parse_flag(query.is_in_shopping_cart.as_deref())?;

    // viewer-dependent filters are ignored for anonymous callers
    let filter = RecipeFilter {
        author: query.author,
        tag_slugs: query.tags,
        favorited_by: viewer.user_id().filter(|_| favorited),
        in_cart_of: viewer.user_id().filter(|_| in_cart),
    };
    let usecase = ListRecipesUseCase {
        repo: state.recipe_repo(),
    };
    let page = usecase
        .execute(&filter, page_request(query.page, query.limit))
        .await?;

    let results = present(&state, viewer, page.results).await?;
    Ok(Json(Page {
        count: page.count,
        next_page: page.next_page,
        results,
    }))
}

// ── GET /recipes/{id} ────────────────────────────────────────────────────────

pub async fn get_recipe(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    Ok(Json(present_one(&state, viewer, recipe_id).await?))
}

// ── POST /recipes, PATCH /recipes/{id} ───────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientAmountRequest {
    pub id: i32,
    pub amount: i32,
}

#[derive(Deserialize)]
pub struct RecipeRequest {
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<i32>,
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<RecipeRequest> for RecipeDraft {
    fn from(body: RecipeRequest) -> Self {
        Self {
            name: body.name,
            text: body.text,
            cooking_time: body.cooking_time,
            image: body.image,
            tags: body.tags,
            ingredients: body
                .ingredients
                .into_iter()
                .map(|i| IngredientAmount {
                    id: i.id,
                    amount: i.amount,
                })
                .collect(),
        }
    }
}

pub async fn create_recipe(
    viewer: Viewer,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let identity = require_user(viewer)?;
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        catalog: state.catalog_repo(),
        images: state.image_store(),
        limits: state.limits,
    };
    let recipe_id = usecase.execute(identity.user_id, body.into()).await?;
    let recipe = present_one(&state, viewer, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update_recipe(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let identity = require_user(viewer)?;
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        catalog: state.catalog_repo(),
        images: state.image_store(),
        limits: state.limits,
    };
    usecase.execute(identity, recipe_id, body.into()).await?;
    Ok(Json(present_one(&state, viewer, recipe_id).await?))
}

// ── DELETE /recipes/{id} ─────────────────────────────────────────────────────

pub async fn delete_recipe(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let identity = require_user(viewer)?;
    let usecase = DeleteRecipeUseCase {
        repo: state.recipe_repo(),
    };
    usecase.execute(identity, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
