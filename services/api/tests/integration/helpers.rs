use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use foodgram_api::domain::relation::{Relation, RelationKind};
use foodgram_api::domain::repository::{
    CatalogRepository, ImageStore, RecipeRepository, RelationRepository, ShoppingListRepository,
};
use foodgram_api::domain::shopping_list::CartIngredient;
use foodgram_api::domain::types::{
    Ingredient, IngredientAmount, Recipe, RecipeFilter, RecipeIngredient, RecipeSummary,
    RecipeWrite, Tag, User,
};
use foodgram_api::error::ApiError;
use foodgram_api::usecase::recipe::RecipeDraft;
use foodgram_domain::pagination::PageRequest;

/// PNG signature bytes as an inline image payload.
pub const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(username: &str) -> User {
    User {
        id: Uuid::now_v7(),
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        password_hash: "hash".to_owned(),
        role: 0,
        created_at: Utc::now(),
    }
}

pub fn tag(id: i32, slug: &str) -> Tag {
    Tag {
        id,
        name: slug.to_uppercase(),
        color: "#E26C2D".to_owned(),
        slug: slug.to_owned(),
    }
}

pub fn ingredient(id: i32, name: &str, unit: &str) -> Ingredient {
    Ingredient {
        id,
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

pub fn draft(tags: Vec<i32>, ingredients: Vec<(i32, i32)>) -> RecipeDraft {
    RecipeDraft {
        name: "Pancakes".to_owned(),
        text: "Mix and fry.".to_owned(),
        cooking_time: 15,
        image: Some(TINY_PNG.to_owned()),
        tags,
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
    }
}

fn duplicate_name() -> ApiError {
    ApiError::validation("name", "a recipe with this name already exists")
}

// ── MemoryStore ──────────────────────────────────────────────────────────────

struct StoredRecipe {
    id: i32,
    author_id: Uuid,
    write: RecipeWrite,
    image: String,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<StoredRecipe>,
    relations: HashSet<Relation>,
    images: Vec<String>,
    reject_recipe_writes: bool,
}

/// In-memory stand-in for every repository port. Clones share state, so one
/// store can back several use cases and be inspected afterwards.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    calls: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.inner.lock().unwrap().users.push(user);
        self
    }

    pub fn with_tag(self, tag: Tag) -> Self {
        self.inner.lock().unwrap().tags.push(tag);
        self
    }

    pub fn with_ingredient(self, ingredient: Ingredient) -> Self {
        self.inner.lock().unwrap().ingredients.push(ingredient);
        self
    }

    /// Make every recipe create or update fail the way a duplicate name does
    /// in the database.
    pub fn rejecting_recipe_writes(self) -> Self {
        self.inner.lock().unwrap().reject_recipe_writes = true;
        self
    }

    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stored_images(&self) -> Vec<String> {
        self.inner.lock().unwrap().images.clone()
    }

    pub fn has_relation(&self, relation: &Relation) -> bool {
        self.inner.lock().unwrap().relations.contains(relation)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn load(inner: &Inner, stored: &StoredRecipe) -> Recipe {
        let author = inner
            .users
            .iter()
            .find(|u| u.id == stored.author_id)
            .cloned()
            .unwrap_or_else(|| User {
                id: stored.author_id,
                ..test_user("unknown")
            });
        Recipe {
            id: stored.id,
            author,
            name: stored.write.name.clone(),
            image: stored.image.clone(),
            text: stored.write.text.clone(),
            cooking_time: stored.write.cooking_time,
            created_at: Utc::now(),
            tags: stored
                .write
                .tag_ids
                .iter()
                .filter_map(|id| inner.tags.iter().find(|t| t.id == *id).cloned())
                .collect(),
            ingredients: stored
                .write
                .ingredients
                .iter()
                .filter_map(|item| {
                    inner
                        .ingredients
                        .iter()
                        .find(|i| i.id == item.id)
                        .map(|i| RecipeIngredient {
                            ingredient: i.clone(),
                            amount: item.amount,
                        })
                })
                .collect(),
        }
    }
}

impl CatalogRepository for MemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.touch();
        Ok(self.inner.lock().unwrap().tags.clone())
    }

    async fn find_tag(&self, id: i32) -> Result<Option<Tag>, ApiError> {
        self.touch();
        Ok(self.inner.lock().unwrap().tags.iter().find(|t| t.id == id).cloned())
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, ApiError> {
        self.touch();
        let prefix = name_prefix.map(str::to_lowercase).unwrap_or_default();
        Ok(self
            .inner
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .filter(|i| i.name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn find_ingredient(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
        self.touch();
        Ok(self
            .inner
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn existing_tag_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| inner.tags.iter().any(|t| t.id == *id))
            .collect())
    }

    async fn existing_ingredient_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| inner.ingredients.iter().any(|i| i.id == *id))
            .collect())
    }
}

impl RecipeRepository for MemoryStore {
    async fn find(&self, id: i32) -> Result<Option<Recipe>, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .recipes
            .iter()
            .find(|r| r.id == id)
            .map(|r| Self::load(&inner, r)))
    }

    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, ApiError> {
        Ok(self.find(id).await?.map(|r| r.summary()))
    }

    async fn author_of(&self, id: i32) -> Result<Option<Uuid>, ApiError> {
        self.touch();
        Ok(self
            .inner
            .lock()
            .unwrap()
            .recipes
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.author_id))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        let mut matching: Vec<Recipe> = inner
            .recipes
            .iter()
            .filter(|r| filter.author.is_none_or(|a| a == r.author_id))
            .map(|r| Self::load(&inner, r))
            .filter(|r| {
                filter.tag_slugs.is_empty()
                    || r.tags.iter().any(|t| filter.tag_slugs.contains(&t.slug))
            })
            .collect();
        matching.reverse();
        let count = matching.len() as u64;
        let results = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.clamped().limit as usize)
            .collect();
        Ok((results, count))
    }

    async fn create(
        &self,
        author_id: Uuid,
        recipe: &RecipeWrite,
        image: &str,
    ) -> Result<i32, ApiError> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        if inner.reject_recipe_writes {
            return Err(duplicate_name());
        }
        let id = inner.recipes.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        inner.recipes.push(StoredRecipe {
            id,
            author_id,
            write: recipe.clone(),
            image: image.to_owned(),
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: i32,
        recipe: &RecipeWrite,
        image: Option<&str>,
    ) -> Result<(), ApiError> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        if inner.reject_recipe_writes {
            return Err(duplicate_name());
        }
        let stored = inner
            .recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ApiError::RecipeNotFound)?;
        stored.write = recipe.clone();
        if let Some(image) = image {
            stored.image = image.to_owned();
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        let before = inner.recipes.len();
        inner.recipes.retain(|r| r.id != id);
        let deleted = inner.recipes.len() < before;
        if deleted {
            inner.relations.retain(|rel| match rel {
                Relation::Favorite { recipe_id, .. } | Relation::ShoppingCart { recipe_id, .. } => {
                    *recipe_id != id
                }
                Relation::Subscription { .. } => true,
            });
        }
        Ok(deleted)
    }

    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        let mut summaries: Vec<RecipeSummary> = inner
            .recipes
            .iter()
            .filter(|r| r.author_id == author_id)
            .map(|r| Self::load(&inner, r).summary())
            .collect();
        summaries.reverse();
        if let Some(limit) = limit {
            summaries.truncate(limit as usize);
        }
        Ok(summaries)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(inner.recipes.iter().filter(|r| r.author_id == author_id).count() as u64)
    }
}

impl RelationRepository for MemoryStore {
    async fn target_exists(&self, relation: &Relation) -> Result<bool, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(match relation {
            Relation::Favorite { recipe_id, .. } | Relation::ShoppingCart { recipe_id, .. } => {
                inner.recipes.iter().any(|r| r.id == *recipe_id)
            }
            Relation::Subscription { author_id, .. } => {
                inner.users.iter().any(|u| u.id == *author_id)
            }
        })
    }

    async fn insert(&self, relation: &Relation) -> Result<bool, ApiError> {
        self.touch();
        Ok(self.inner.lock().unwrap().relations.insert(*relation))
    }

    async fn delete(&self, relation: &Relation) -> Result<bool, ApiError> {
        self.touch();
        Ok(self.inner.lock().unwrap().relations.remove(relation))
    }

    async fn marked_recipes(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(recipe_ids
            .iter()
            .copied()
            .filter(|id| {
                Relation::for_recipe(kind, user_id, *id)
                    .is_some_and(|rel| inner.relations.contains(&rel))
            })
            .collect())
    }

    async fn subscribed_authors(
        &self,
        subscriber_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(author_ids
            .iter()
            .copied()
            .filter(|author_id| {
                inner.relations.contains(&Relation::Subscription {
                    subscriber_id,
                    author_id: *author_id,
                })
            })
            .collect())
    }
}

impl ShoppingListRepository for MemoryStore {
    async fn cart_ingredients(&self, user_id: Uuid) -> Result<Vec<CartIngredient>, ApiError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        let ingredients: HashMap<i32, &Ingredient> =
            inner.ingredients.iter().map(|i| (i.id, i)).collect();
        let mut rows = Vec::new();
        for recipe in &inner.recipes {
            let carted = inner.relations.contains(&Relation::ShoppingCart {
                user_id,
                recipe_id: recipe.id,
            });
            if !carted {
                continue;
            }
            for item in &recipe.write.ingredients {
                if let Some(ingredient) = ingredients.get(&item.id) {
                    rows.push(CartIngredient {
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        amount: item.amount,
                    });
                }
            }
        }
        Ok(rows)
    }
}

impl ImageStore for MemoryStore {
    async fn put(&self, _bytes: &[u8], ext: &str) -> Result<String, ApiError> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        let reference = format!("recipes/images/{}.{ext}", inner.images.len() + 1);
        inner.images.push(reference.clone());
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> Result<(), ApiError> {
        self.touch();
        self.inner
            .lock()
            .unwrap()
            .images
            .retain(|stored| stored != reference);
        Ok(())
    }
}
