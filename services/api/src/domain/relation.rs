use std::fmt;

use uuid::Uuid;

use crate::error::ApiError;

/// The three per-user relationships kept by the relation store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Favorite,
    ShoppingCart,
    Subscription,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping cart entry",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (actor, target) pair. Each pair exists at most once per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Favorite { user_id: Uuid, recipe_id: i32 },
    ShoppingCart { user_id: Uuid, recipe_id: i32 },
    Subscription { subscriber_id: Uuid, author_id: Uuid },
}

impl Relation {
    pub fn kind(&self) -> RelationKind {
        match self {
            Self::Favorite { .. } => RelationKind::Favorite,
            Self::ShoppingCart { .. } => RelationKind::ShoppingCart,
            Self::Subscription { .. } => RelationKind::Subscription,
        }
    }

    /// Build a recipe relation of the given kind. Returns `None` for
    /// [`RelationKind::Subscription`], whose target is a user.
    pub fn for_recipe(kind: RelationKind, user_id: Uuid, recipe_id: i32) -> Option<Self> {
        match kind {
            RelationKind::Favorite => Some(Self::Favorite { user_id, recipe_id }),
            RelationKind::ShoppingCart => Some(Self::ShoppingCart { user_id, recipe_id }),
            RelationKind::Subscription => None,
        }
    }

    /// Error for a relation whose recipe or author does not exist.
    pub fn missing_target_error(&self) -> ApiError {
        match self {
            Self::Favorite { .. } | Self::ShoppingCart { .. } => ApiError::RecipeNotFound,
            Self::Subscription { .. } => ApiError::UserNotFound,
        }
    }

    pub fn is_self_subscription(&self) -> bool {
        matches!(self, Self::Subscription { subscriber_id, author_id } if subscriber_id == author_id)
    }
}
