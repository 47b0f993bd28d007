use std::collections::HashSet;

use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::image::{DecodedImage, decode_data_uri};
use crate::domain::repository::{CatalogRepository, ImageStore, RecipeRepository};
use crate::domain::types::{
    IngredientAmount, MAX_RECIPE_NAME_LEN, Recipe, RecipeFilter, RecipeLimits, RecipeSummary,
    RecipeWrite,
};
use crate::error::ApiError;

/// Recipe fields as submitted by a client, before validation.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    /// `data:image/<ext>;base64,...` payload.
    pub image: Option<String>,
    pub tags: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Check every field that can be checked without the database, in a fixed
/// order so the first failure is deterministic.
pub fn validate_draft(draft: &RecipeDraft, limits: RecipeLimits) -> Result<RecipeWrite, ApiError> {
    let mut seen = HashSet::new();
    if let Some(dup) = draft.ingredients.iter().find(|i| !seen.insert(i.id)) {
        return Err(ApiError::validation(
            "ingredients",
            format!("ingredient {} is listed more than once", dup.id),
        ));
    }
    if let Some(low) = draft
        .ingredients
        .iter()
        .find(|i| i.amount < limits.min_amount)
    {
        return Err(ApiError::validation(
            "ingredients",
            format!(
                "amount of ingredient {} must be at least {}",
                low.id, limits.min_amount
            ),
        ));
    }
    if draft.cooking_time < limits.min_cooking_time {
        return Err(ApiError::validation(
            "cooking_time",
            format!("cooking time must be at least {}", limits.min_cooking_time),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = draft.tags.iter().find(|id| !seen.insert(**id)) {
        return Err(ApiError::validation(
            "tags",
            format!("tag {dup} is listed more than once"),
        ));
    }
    if draft.tags.is_empty() {
        return Err(ApiError::validation("tags", "at least one tag is required"));
    }
    if draft.ingredients.is_empty() {
        return Err(ApiError::validation(
            "ingredients",
            "at least one ingredient is required",
        ));
    }

    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name", "name must not be empty"));
    }
    if name.chars().count() > MAX_RECIPE_NAME_LEN {
        return Err(ApiError::validation(
            "name",
            format!("name must be at most {MAX_RECIPE_NAME_LEN} characters"),
        ));
    }
    if draft.text.trim().is_empty() {
        return Err(ApiError::validation("text", "text must not be empty"));
    }

    Ok(RecipeWrite {
        name: name.to_owned(),
        text: draft.text.clone(),
        cooking_time: draft.cooking_time,
        tag_ids: draft.tags.clone(),
        ingredients: draft.ingredients.clone(),
    })
}

/// Reject references to tags or ingredients that do not exist.
async fn ensure_references_exist<C: CatalogRepository>(
    catalog: &C,
    recipe: &RecipeWrite,
) -> Result<(), ApiError> {
    let tags = catalog.existing_tag_ids(&recipe.tag_ids).await?;
    if let Some(missing) = recipe.tag_ids.iter().find(|id| !tags.contains(*id)) {
        return Err(ApiError::validation(
            "tags",
            format!("tag {missing} does not exist"),
        ));
    }

    let ingredient_ids: Vec<i32> = recipe.ingredients.iter().map(|i| i.id).collect();
    let found = catalog.existing_ingredient_ids(&ingredient_ids).await?;
    if let Some(missing) = ingredient_ids.iter().find(|id| !found.contains(*id)) {
        return Err(ApiError::validation(
            "ingredients",
            format!("ingredient {missing} does not exist"),
        ));
    }
    Ok(())
}

fn ensure_can_modify(identity: &IdentityHeaders, author_id: Uuid) -> Result<(), ApiError> {
    if identity.user_id == author_id || identity.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Drop an image whose recipe write failed. The write error is what the
/// caller sees, so a cleanup failure is only logged.
async fn discard_image<S: ImageStore>(images: &S, reference: &str) {
    if let Err(e) = images.delete(reference).await {
        tracing::warn!(error = %e, reference, "failed to remove orphaned image");
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R, C, S>
where
    R: RecipeRepository,
    C: CatalogRepository,
    S: ImageStore,
{
    pub recipes: R,
    pub catalog: C,
    pub images: S,
    pub limits: RecipeLimits,
}

impl<R, C, S> CreateRecipeUseCase<R, C, S>
where
    R: RecipeRepository,
    C: CatalogRepository,
    S: ImageStore,
{
    /// Returns the new recipe id.
    pub async fn execute(&self, author_id: Uuid, draft: RecipeDraft) -> Result<i32, ApiError> {
        let recipe = validate_draft(&draft, self.limits)?;
        let image: DecodedImage = match draft.image.as_deref() {
            Some(uri) => decode_data_uri(uri)?,
            None => return Err(ApiError::validation("image", "image is required")),
        };
        ensure_references_exist(&self.catalog, &recipe).await?;

        let reference = self.images.put(&image.bytes, &image.ext).await?;
        let id = match self.recipes.create(author_id, &recipe, &reference).await {
            Ok(id) => id,
            Err(e) => {
                discard_image(&self.images, &reference).await;
                return Err(e);
            }
        };
        tracing::info!(recipe_id = id, %author_id, "recipe created");
        Ok(id)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R, C, S>
where
    R: RecipeRepository,
    C: CatalogRepository,
    S: ImageStore,
{
    pub recipes: R,
    pub catalog: C,
    pub images: S,
    pub limits: RecipeLimits,
}

impl<R, C, S> UpdateRecipeUseCase<R, C, S>
where
    R: RecipeRepository,
    C: CatalogRepository,
    S: ImageStore,
{
    /// Replace every field and both association sets. An absent image keeps
    /// the stored one.
    pub async fn execute(
        &self,
        identity: IdentityHeaders,
        recipe_id: i32,
        draft: RecipeDraft,
    ) -> Result<(), ApiError> {
        let recipe = validate_draft(&draft, self.limits)?;
        let image = draft.image.as_deref().map(decode_data_uri).transpose()?;

        let author_id = self
            .recipes
            .author_of(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        ensure_can_modify(&identity, author_id)?;
        ensure_references_exist(&self.catalog, &recipe).await?;

        let reference = match image {
            Some(image) => Some(self.images.put(&image.bytes, &image.ext).await?),
            None => None,
        };
        if let Err(e) = self
            .recipes
            .update(recipe_id, &recipe, reference.as_deref())
            .await
        {
            if let Some(reference) = &reference {
                discard_image(&self.images, reference).await;
            }
            return Err(e);
        }
        tracing::info!(recipe_id, user_id = %identity.user_id, "recipe updated");
        Ok(())
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, identity: IdentityHeaders, recipe_id: i32) -> Result<(), ApiError> {
        let author_id = self
            .repo
            .author_of(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        ensure_can_modify(&identity, author_id)?;
        if !self.repo.delete(recipe_id).await? {
            return Err(ApiError::RecipeNotFound);
        }
        tracing::info!(recipe_id, user_id = %identity.user_id, "recipe deleted");
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, recipe_id: i32) -> Result<Recipe, ApiError> {
        self.repo
            .find(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

pub struct GetRecipeSummaryUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipeSummaryUseCase<R> {
    pub async fn execute(&self, recipe_id: i32) -> Result<RecipeSummary, ApiError> {
        self.repo
            .find_summary(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    pub async fn execute(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, ApiError> {
        let page = page.clamped();
        let (recipes, count) = self.repo.list(filter, page).await?;
        Ok(Page::new(recipes, count, page))
    }
}
