use uuid::Uuid;

use crate::domain::repository::ShoppingListRepository;
use crate::domain::shopping_list::{ShoppingListLine, aggregate, render};
use crate::error::ApiError;

// ── GetShoppingList ──────────────────────────────────────────────────────────

pub struct GetShoppingListUseCase<R: ShoppingListRepository> {
    pub repo: R,
}

impl<R: ShoppingListRepository> GetShoppingListUseCase<R> {
    /// Summed ingredient lines for every recipe in the user's cart, ordered
    /// by name. Read-only.
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<ShoppingListLine>, ApiError> {
        let rows = self.repo.cart_ingredients(user_id).await?;
        Ok(aggregate(rows))
    }

    /// The same lines rendered as the downloadable plain-text report.
    pub async fn report(&self, user_id: Uuid) -> Result<String, ApiError> {
        let lines = self.execute(user_id).await?;
        Ok(render(&lines))
    }
}
