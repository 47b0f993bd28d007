#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::domain::relation::{Relation, RelationKind};
use crate::domain::shopping_list::CartIngredient;
use crate::domain::types::{
    Ingredient, NewIngredient, NewTag, Recipe, RecipeFilter, RecipeSummary, RecipeWrite, Tag,
    User,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    /// Insert a user. A taken email or username yields `UserAlreadyExists`.
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// One page of users ordered by username, plus the total count.
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError>;

    /// Authors `subscriber_id` follows, ordered by username, plus the total count.
    async fn list_subscribed_authors(
        &self,
        subscriber_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError>;
}

/// Read access to tag and ingredient reference data.
pub trait CatalogRepository: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;
    async fn find_tag(&self, id: i32) -> Result<Option<Tag>, ApiError>;

    /// Ingredients ordered by name, optionally narrowed to a case-insensitive
    /// name prefix.
    async fn list_ingredients(&self, name_prefix: Option<&str>)
    -> Result<Vec<Ingredient>, ApiError>;
    async fn find_ingredient(&self, id: i32) -> Result<Option<Ingredient>, ApiError>;

    /// The subset of `ids` that exist as tags.
    async fn existing_tag_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError>;

    /// The subset of `ids` that exist as ingredients.
    async fn existing_ingredient_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError>;
}

/// Write access used by the catalog loader.
pub trait CatalogImportRepository: Send + Sync {
    /// Insert a tag unless one with the same name or slug exists.
    /// Returns `true` if a row was inserted.
    async fn insert_tag(&self, tag: &NewTag) -> Result<bool, ApiError>;

    /// Insert an ingredient unless the (name, unit) pair exists.
    /// Returns `true` if a row was inserted.
    async fn insert_ingredient(&self, ingredient: &NewIngredient) -> Result<bool, ApiError>;
}

/// Repository for recipes and their tag / ingredient associations.
pub trait RecipeRepository: Send + Sync {
    async fn find(&self, id: i32) -> Result<Option<Recipe>, ApiError>;
    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, ApiError>;
    async fn author_of(&self, id: i32) -> Result<Option<Uuid>, ApiError>;

    /// One page of recipes, newest first, plus the total matching count.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), ApiError>;

    /// Insert the recipe row and its associations in one transaction.
    /// Returns the new recipe id.
    async fn create(
        &self,
        author_id: Uuid,
        recipe: &RecipeWrite,
        image: &str,
    ) -> Result<i32, ApiError>;

    /// Update the recipe row and replace both association sets in one
    /// transaction. `image: None` keeps the stored image.
    async fn update(
        &self,
        id: i32,
        recipe: &RecipeWrite,
        image: Option<&str>,
    ) -> Result<(), ApiError>;

    /// Delete a recipe. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;

    /// Newest recipes of one author, at most `limit` when given.
    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, ApiError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError>;
}

/// Store for favorite, shopping-cart and subscription pairs.
pub trait RelationRepository: Send + Sync {
    /// Whether the relation's target (recipe or author) exists.
    async fn target_exists(&self, relation: &Relation) -> Result<bool, ApiError>;

    /// Insert the pair. Returns `false` when it already existed.
    async fn insert(&self, relation: &Relation) -> Result<bool, ApiError>;

    /// Delete the pair. Returns `true` if a row was deleted.
    async fn delete(&self, relation: &Relation) -> Result<bool, ApiError>;

    /// The subset of `recipe_ids` the user has marked with a recipe relation
    /// of `kind`.
    async fn marked_recipes(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError>;

    /// The subset of `author_ids` the subscriber follows.
    async fn subscribed_authors(
        &self,
        subscriber_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, ApiError>;
}

/// Ingredient rows of every recipe in a user's shopping cart.
pub trait ShoppingListRepository: Send + Sync {
    async fn cart_ingredients(&self, user_id: Uuid) -> Result<Vec<CartIngredient>, ApiError>;
}

/// Port for persisting uploaded recipe images.
pub trait ImageStore: Send + Sync {
    /// Store the bytes and return the reference recorded on the recipe.
    async fn put(&self, bytes: &[u8], ext: &str) -> Result<String, ApiError>;
    /// Remove a stored image. A reference that no longer exists is not an error.
    async fn delete(&self, reference: &str) -> Result<(), ApiError>;
}
