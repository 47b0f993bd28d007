use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use uuid::Uuid;

use foodgram_domain::pagination::{Page, PageRequest};
use foodgram_domain::user::UserRole;

use crate::domain::repository::{RecipeRepository, UserRepository};
use crate::domain::types::{
    MAX_USER_FIELD_LEN, SubscribedAuthor, User, validate_email, validate_username,
};
use crate::error::ApiError;

const MAX_PASSWORD_LEN: usize = 150;

/// Hash a password with argon2id and a fresh random salt (PHC string format).
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, ApiError> {
        let email = input.email.trim().to_lowercase();
        if !validate_email(&email) {
            return Err(ApiError::validation("email", "invalid email address"));
        }
        if !validate_username(&input.username) {
            return Err(ApiError::validation("username", "invalid username"));
        }
        for (field, value) in [
            ("first_name", &input.first_name),
            ("last_name", &input.last_name),
        ] {
            if value.trim().is_empty() || value.chars().count() > MAX_USER_FIELD_LEN {
                return Err(ApiError::validation(
                    field,
                    format!("must be 1-{MAX_USER_FIELD_LEN} characters"),
                ));
            }
        }
        if input.password.is_empty() || input.password.chars().count() > MAX_PASSWORD_LEN {
            return Err(ApiError::validation(
                "password",
                format!("must be 1-{MAX_PASSWORD_LEN} characters"),
            ));
        }

        let user = User {
            id: Uuid::now_v7(),
            email,
            username: input.username,
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            password_hash: hash_password(&input.password)?,
            role: UserRole::Normal.as_u8(),
            created_at: Utc::now(),
        };
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Page<User>, ApiError> {
        let page = page.clamped();
        let (users, count) = self.repo.list(page).await?;
        Ok(Page::new(users, count, page))
    }
}

// ── Subscriptions ────────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<U: UserRepository, R: RecipeRepository> {
    pub users: U,
    pub recipes: R,
}

impl<U: UserRepository, R: RecipeRepository> ListSubscriptionsUseCase<U, R> {
    /// Authors the subscriber follows, each with at most `recipes_limit`
    /// newest recipes and their total recipe count.
    pub async fn execute(
        &self,
        subscriber_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Page<SubscribedAuthor>, ApiError> {
        let page = page.clamped();
        let (authors, count) = self
            .users
            .list_subscribed_authors(subscriber_id, page)
            .await?;
        let mut results = Vec::with_capacity(authors.len());
        for author in authors {
            results.push(with_recipes(&self.recipes, author, recipes_limit).await?);
        }
        Ok(Page::new(results, count, page))
    }
}

pub struct GetSubscribedAuthorUseCase<U: UserRepository, R: RecipeRepository> {
    pub users: U,
    pub recipes: R,
}

impl<U: UserRepository, R: RecipeRepository> GetSubscribedAuthorUseCase<U, R> {
    pub async fn execute(
        &self,
        author_id: Uuid,
        recipes_limit: Option<u64>,
    ) -> Result<SubscribedAuthor, ApiError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        with_recipes(&self.recipes, author, recipes_limit).await
    }
}

async fn with_recipes<R: RecipeRepository>(
    recipes: &R,
    user: User,
    recipes_limit: Option<u64>,
) -> Result<SubscribedAuthor, ApiError> {
    let summaries = recipes.summaries_by_author(user.id, recipes_limit).await?;
    let recipes_count = recipes.count_by_author(user.id).await?;
    Ok(SubscribedAuthor {
        user,
        recipes: summaries,
        recipes_count,
    })
}
