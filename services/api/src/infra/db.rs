use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Statement, TransactionError, TransactionTrait,
    sea_query::{Expr, Func, OnConflict, Query},
};
use uuid::Uuid;

use foodgram_api_schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts,
    subscriptions, tags, users,
};
use foodgram_core::sea_ext::{is_foreign_key_violation, is_unique_violation};
use foodgram_domain::pagination::PageRequest;

use crate::domain::relation::{Relation, RelationKind};
use crate::domain::repository::{
    CatalogImportRepository, CatalogRepository, RecipeRepository, RelationRepository,
    ShoppingListRepository, UserRepository,
};
use crate::domain::shopping_list::CartIngredient;
use crate::domain::types::{
    Ingredient, NewIngredient, NewTag, Recipe, RecipeFilter, RecipeIngredient, RecipeSummary,
    RecipeWrite, Tag, User,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(i16::from(user.role)),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::UserAlreadyExists
            } else {
                anyhow::Error::new(e).context("create user").into()
            }
        })?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let page = page.clamped();
        let query = users::Entity::find().order_by_asc(users::Column::Username);
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count users")?;
        let models = query
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list users")?;
        Ok((models.into_iter().map(user_from_model).collect(), count))
    }

    async fn list_subscribed_authors(
        &self,
        subscriber_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError> {
        let page = page.clamped();
        let query = users::Entity::find()
            .filter(
                users::Column::Id.in_subquery(
                    Query::select()
                        .column(subscriptions::Column::AuthorId)
                        .from(subscriptions::Entity)
                        .and_where(Expr::col(subscriptions::Column::SubscriberId).eq(subscriber_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(users::Column::Username);
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count subscribed authors")?;
        let models = query
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list subscribed authors")?;
        Ok((models.into_iter().map(user_from_model).collect(), count))
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password_hash,
        role: u8::try_from(model.role).unwrap_or(0),
        created_at: model.created_at,
    }
}

// ── Catalog repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCatalogRepository {
    pub db: DatabaseConnection,
}

impl CatalogRepository for DbCatalogRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_tag(&self, id: i32) -> Result<Option<Tag>, ApiError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, ApiError> {
        let mut query = ingredients::Entity::find();
        if let Some(prefix) = name_prefix.filter(|p| !p.is_empty()) {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    ingredients::Entity,
                    ingredients::Column::Name,
                ))))
                .like(pattern),
            );
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::MeasurementUnit)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_ingredient(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn existing_tag_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        let found: Vec<i32> = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .context("find existing tag ids")?;
        Ok(found.into_iter().collect())
    }

    async fn existing_ingredient_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        let found: Vec<i32> = ingredients::Entity::find()
            .select_only()
            .column(ingredients::Column::Id)
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .context("find existing ingredient ids")?;
        Ok(found.into_iter().collect())
    }
}

impl CatalogImportRepository for DbCatalogRepository {
    async fn insert_tag(&self, tag: &NewTag) -> Result<bool, ApiError> {
        let inserted = tags::Entity::insert(tags::ActiveModel {
            name: Set(tag.name.clone()),
            color: Set(tag.color.clone()),
            slug: Set(tag.slug.clone()),
            ..Default::default()
        })
        // name and slug are both unique; either clash skips the row
        .on_conflict(OnConflict::new().do_nothing().to_owned())
        .exec_without_returning(&self.db)
        .await
        .context("insert tag")?;
        Ok(inserted > 0)
    }

    async fn insert_ingredient(&self, ingredient: &NewIngredient) -> Result<bool, ApiError> {
        let inserted = ingredients::Entity::insert(ingredients::ActiveModel {
            name: Set(ingredient.name.clone()),
            measurement_unit: Set(ingredient.measurement_unit.clone()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                ingredients::Column::Name,
                ingredients::Column::MeasurementUnit,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert ingredient")?;
        Ok(inserted > 0)
    }
}

/// Escape `LIKE` wildcards so a search prefix matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn find(&self, id: i32) -> Result<Option<Recipe>, ApiError> {
        let Some(model) = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?
        else {
            return Ok(None);
        };
        let mut recipes = hydrate(&self.db, vec![model]).await?;
        Ok(recipes.pop())
    }

    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, ApiError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe summary")?;
        Ok(model.map(summary_from_model))
    }

    async fn author_of(&self, id: i32) -> Result<Option<Uuid>, ApiError> {
        let author_id: Option<Uuid> = recipes::Entity::find_by_id(id)
            .select_only()
            .column(recipes::Column::AuthorId)
            .into_tuple()
            .one(&self.db)
            .await
            .context("find recipe author")?;
        Ok(author_id)
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), ApiError> {
        let page = page.clamped();
        let mut query = recipes::Entity::find();
        if let Some(author_id) = filter.author {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if !filter.tag_slugs.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                        .from(recipe_tags::Entity)
                        .inner_join(
                            tags::Entity,
                            Expr::col((tags::Entity, tags::Column::Id))
                                .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                        )
                        .and_where(
                            Expr::col((tags::Entity, tags::Column::Slug))
                                .is_in(filter.tag_slugs.iter().cloned()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.favorited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(favorites::Column::RecipeId)
                        .from(favorites::Entity)
                        .and_where(Expr::col(favorites::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.in_cart_of {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(shopping_carts::Column::RecipeId)
                        .from(shopping_carts::Entity)
                        .and_where(Expr::col(shopping_carts::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }

        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count recipes")?;
        let models = query
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok((hydrate(&self.db, models).await?, count))
    }

    async fn create(
        &self,
        author_id: Uuid,
        recipe: &RecipeWrite,
        image: &str,
    ) -> Result<i32, ApiError> {
        self.db
            .transaction::<_, i32, DbErr>(|txn| {
                let recipe = recipe.clone();
                let image = image.to_owned();
                Box::pin(async move {
                    let model = recipes::ActiveModel {
                        author_id: Set(author_id),
                        name: Set(recipe.name.clone()),
                        image: Set(image),
                        text: Set(recipe.text.clone()),
                        cooking_time: Set(recipe.cooking_time),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    replace_associations(txn, model.id, &recipe).await?;
                    Ok(model.id)
                })
            })
            .await
            .map_err(|e| recipe_write_error(e, "create recipe"))
    }

    async fn update(
        &self,
        id: i32,
        recipe: &RecipeWrite,
        image: Option<&str>,
    ) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let recipe = recipe.clone();
                let image = image.map(str::to_owned);
                Box::pin(async move {
                    let mut am = recipes::ActiveModel {
                        id: Set(id),
                        name: Set(recipe.name.clone()),
                        text: Set(recipe.text.clone()),
                        cooking_time: Set(recipe.cooking_time),
                        ..Default::default()
                    };
                    if let Some(image) = image {
                        am.image = Set(image);
                    }
                    am.update(txn).await?;
                    replace_associations(txn, id, &recipe).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| recipe_write_error(e, "update recipe"))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query
            .all(&self.db)
            .await
            .context("list recipes by author")?;
        Ok(models.into_iter().map(summary_from_model).collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }
}

/// Drop and re-insert every tag and ingredient row of a recipe.
async fn replace_associations(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    recipe: &RecipeWrite,
) -> Result<(), DbErr> {
    recipe_tags::Entity::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(txn)
        .await?;
    recipe_ingredients::Entity::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(txn)
        .await?;

    if !recipe.tag_ids.is_empty() {
        recipe_tags::Entity::insert_many(recipe.tag_ids.iter().map(|&tag_id| {
            recipe_tags::ActiveModel {
                recipe_id: Set(recipe_id),
                tag_id: Set(tag_id),
            }
        }))
        .exec_without_returning(txn)
        .await?;
    }
    if !recipe.ingredients.is_empty() {
        recipe_ingredients::Entity::insert_many(recipe.ingredients.iter().map(|item| {
            recipe_ingredients::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(item.id),
                amount: Set(item.amount),
            }
        }))
        .exec_without_returning(txn)
        .await?;
    }
    Ok(())
}

fn recipe_write_error(err: TransactionError<DbErr>, context: &'static str) -> ApiError {
    match err {
        TransactionError::Transaction(e) if is_unique_violation(&e) => {
            ApiError::validation("name", "a recipe with this name already exists")
        }
        TransactionError::Transaction(DbErr::RecordNotUpdated) => ApiError::RecipeNotFound,
        other => anyhow::Error::new(other).context(context).into(),
    }
}

/// Load authors, tags and ingredients for a batch of recipe rows, keeping
/// the input order.
async fn hydrate<C>(db: &C, models: Vec<recipes::Model>) -> Result<Vec<Recipe>, ApiError>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let author_ids: HashSet<Uuid> = models.iter().map(|m| m.author_id).collect();

    let authors: HashMap<Uuid, User> = users::Entity::find()
        .filter(users::Column::Id.is_in(author_ids))
        .all(db)
        .await
        .context("load recipe authors")?
        .into_iter()
        .map(|m| (m.id, user_from_model(m)))
        .collect();

    let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
    let tag_rows = recipe_tags::Entity::find()
        .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .find_also_related(tags::Entity)
        .all(db)
        .await
        .context("load recipe tags")?;
    for (link, tag) in tag_rows {
        if let Some(tag) = tag {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(tag_from_model(tag));
        }
    }

    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
    let ingredient_rows = recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .find_also_related(ingredients::Entity)
        .all(db)
        .await
        .context("load recipe ingredients")?;
    for (link, ingredient) in ingredient_rows {
        if let Some(ingredient) = ingredient {
            ingredients_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(RecipeIngredient {
                    ingredient: ingredient_from_model(ingredient),
                    amount: link.amount,
                });
        }
    }

    models
        .into_iter()
        .map(|model| -> Result<Recipe, ApiError> {
            let author = authors
                .get(&model.author_id)
                .cloned()
                .with_context(|| format!("recipe {} has no author row", model.id))?;
            let mut tags = tags_by_recipe.remove(&model.id).unwrap_or_default();
            tags.sort_by_key(|t| t.id);
            let mut ingredients = ingredients_by_recipe.remove(&model.id).unwrap_or_default();
            ingredients.sort_by(|a, b| a.ingredient.name.cmp(&b.ingredient.name));
            Ok(Recipe {
                id: model.id,
                author,
                name: model.name,
                image: model.image,
                text: model.text,
                cooking_time: model.cooking_time,
                created_at: model.created_at,
                tags,
                ingredients,
            })
        })
        .collect()
}

fn summary_from_model(model: recipes::Model) -> RecipeSummary {
    RecipeSummary {
        id: model.id,
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}

// ── Relation repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRelationRepository {
    pub db: DatabaseConnection,
}

impl RelationRepository for DbRelationRepository {
    async fn target_exists(&self, relation: &Relation) -> Result<bool, ApiError> {
        let found = match *relation {
            Relation::Favorite { recipe_id, .. } | Relation::ShoppingCart { recipe_id, .. } => {
                recipes::Entity::find_by_id(recipe_id).count(&self.db).await
            }
            Relation::Subscription { author_id, .. } => {
                users::Entity::find_by_id(author_id).count(&self.db).await
            }
        }
        .context("check relation target")?;
        Ok(found > 0)
    }

    async fn insert(&self, relation: &Relation) -> Result<bool, ApiError> {
        let now = Utc::now();
        let result = match *relation {
            Relation::Favorite { user_id, recipe_id } => {
                favorites::Entity::insert(favorites::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(now),
                })
                .on_conflict(
                    OnConflict::columns([favorites::Column::UserId, favorites::Column::RecipeId])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
            }
            Relation::ShoppingCart { user_id, recipe_id } => {
                shopping_carts::Entity::insert(shopping_carts::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(now),
                })
                .on_conflict(
                    OnConflict::columns([
                        shopping_carts::Column::UserId,
                        shopping_carts::Column::RecipeId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
            }
            Relation::Subscription {
                subscriber_id,
                author_id,
            } => {
                subscriptions::Entity::insert(subscriptions::ActiveModel {
                    subscriber_id: Set(subscriber_id),
                    author_id: Set(author_id),
                    created_at: Set(now),
                })
                .on_conflict(
                    OnConflict::columns([
                        subscriptions::Column::SubscriberId,
                        subscriptions::Column::AuthorId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
            }
        };

        match result {
            Ok(inserted) => Ok(inserted > 0),
            // target removed between the existence check and the insert
            Err(e) if is_foreign_key_violation(&e) => Err(relation.missing_target_error()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("insert {}", relation.kind()))
                .into()),
        }
    }

    async fn delete(&self, relation: &Relation) -> Result<bool, ApiError> {
        let result = match *relation {
            Relation::Favorite { user_id, recipe_id } => {
                favorites::Entity::delete_many()
                    .filter(favorites::Column::UserId.eq(user_id))
                    .filter(favorites::Column::RecipeId.eq(recipe_id))
                    .exec(&self.db)
                    .await
            }
            Relation::ShoppingCart { user_id, recipe_id } => {
                shopping_carts::Entity::delete_many()
                    .filter(shopping_carts::Column::UserId.eq(user_id))
                    .filter(shopping_carts::Column::RecipeId.eq(recipe_id))
                    .exec(&self.db)
                    .await
            }
            Relation::Subscription {
                subscriber_id,
                author_id,
            } => {
                subscriptions::Entity::delete_many()
                    .filter(subscriptions::Column::SubscriberId.eq(subscriber_id))
                    .filter(subscriptions::Column::AuthorId.eq(author_id))
                    .exec(&self.db)
                    .await
            }
        }
        .with_context(|| format!("delete {}", relation.kind()))?;
        Ok(result.rows_affected > 0)
    }

    async fn marked_recipes(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids = recipe_ids.iter().copied();
        let found: Vec<i32> = match kind {
            RelationKind::Favorite => {
                favorites::Entity::find()
                    .select_only()
                    .column(favorites::Column::RecipeId)
                    .filter(favorites::Column::UserId.eq(user_id))
                    .filter(favorites::Column::RecipeId.is_in(ids))
                    .into_tuple()
                    .all(&self.db)
                    .await
            }
            RelationKind::ShoppingCart => {
                shopping_carts::Entity::find()
                    .select_only()
                    .column(shopping_carts::Column::RecipeId)
                    .filter(shopping_carts::Column::UserId.eq(user_id))
                    .filter(shopping_carts::Column::RecipeId.is_in(ids))
                    .into_tuple()
                    .all(&self.db)
                    .await
            }
            RelationKind::Subscription => return Ok(HashSet::new()),
        }
        .with_context(|| format!("find marked recipes ({kind})"))?;
        Ok(found.into_iter().collect())
    }

    async fn subscribed_authors(
        &self,
        subscriber_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, ApiError> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<Uuid> = subscriptions::Entity::find()
            .select_only()
            .column(subscriptions::Column::AuthorId)
            .filter(subscriptions::Column::SubscriberId.eq(subscriber_id))
            .filter(subscriptions::Column::AuthorId.is_in(author_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .context("find subscribed authors")?;
        Ok(found.into_iter().collect())
    }
}

// ── Shopping list repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShoppingListRepository {
    pub db: DatabaseConnection,
}

impl ShoppingListRepository for DbShoppingListRepository {
    async fn cart_ingredients(&self, user_id: Uuid) -> Result<Vec<CartIngredient>, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct CartIngredientRow {
            name: String,
            measurement_unit: String,
            amount: i32,
        }

        let rows = CartIngredientRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT i.name, i.measurement_unit, ri.amount
                FROM shopping_carts sc
                JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
                JOIN ingredients i ON i.id = ri.ingredient_id
                WHERE sc.user_id = $1
            "#,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context("load shopping cart ingredients")?;

        Ok(rows
            .into_iter()
            .map(|row| CartIngredient {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            })
            .collect())
    }
}
