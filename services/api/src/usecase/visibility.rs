//! Per-viewer flags on recipe and user representations.

use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::relation::RelationKind;
use crate::domain::repository::RelationRepository;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeFlags {
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Which of a batch of recipes the viewer has favorited or carted.
#[derive(Debug, Clone, Default)]
pub struct RecipeMarks {
    favorited: HashSet<i32>,
    in_shopping_cart: HashSet<i32>,
}

impl RecipeMarks {
    pub fn flags(&self, recipe_id: i32) -> RecipeFlags {
        RecipeFlags {
            is_favorited: self.favorited.contains(&recipe_id),
            is_in_shopping_cart: self.in_shopping_cart.contains(&recipe_id),
        }
    }
}

/// Batched visibility lookups. Anonymous viewers never reach the repository
/// and see every flag as `false`.
pub struct VisibilityUseCase<R: RelationRepository> {
    pub repo: R,
}

impl<R: RelationRepository> VisibilityUseCase<R> {
    pub async fn recipe_marks(
        &self,
        viewer: Option<Uuid>,
        recipe_ids: &[i32],
    ) -> Result<RecipeMarks, ApiError> {
        let Some(user_id) = viewer else {
            return Ok(RecipeMarks::default());
        };
        if recipe_ids.is_empty() {
            return Ok(RecipeMarks::default());
        }
        let favorited = self
            .repo
            .marked_recipes(RelationKind::Favorite, user_id, recipe_ids)
            .await?;
        let in_shopping_cart = self
            .repo
            .marked_recipes(RelationKind::ShoppingCart, user_id, recipe_ids)
            .await?;
        Ok(RecipeMarks {
            favorited,
            in_shopping_cart,
        })
    }

    /// The subset of `author_ids` the viewer follows.
    pub async fn subscribed(
        &self,
        viewer: Option<Uuid>,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, ApiError> {
        match viewer {
            Some(subscriber_id) if !author_ids.is_empty() => {
                self.repo.subscribed_authors(subscriber_id, author_ids).await
            }
            _ => Ok(HashSet::new()),
        }
    }
}
