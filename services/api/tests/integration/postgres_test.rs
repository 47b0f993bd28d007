use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::OnceCell;
use uuid::Uuid;

use foodgram_api::domain::relation::{Relation, RelationKind};
use foodgram_api::domain::repository::{
    CatalogImportRepository, CatalogRepository, RecipeRepository, RelationRepository,
    UserRepository,
};
use foodgram_api::domain::types::{NewIngredient, NewTag, RecipeLimits, User};
use foodgram_api::error::ApiError;
use foodgram_api::infra::db::{
    DbCatalogRepository, DbRecipeRepository, DbRelationRepository, DbUserRepository,
};
use foodgram_api::usecase::recipe::validate_draft;
use foodgram_api::usecase::relation::AddRelationUseCase;
use foodgram_api_migration::Migrator;

use crate::helpers::draft;

const DATABASE_URL_VAR: &str = "FOODGRAM_TEST_DATABASE_URL";

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Migrated connection, or `None` when no test database is configured.
async fn connect(test: &str) -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var(DATABASE_URL_VAR) else {
        eprintln!("skipping {test}: {DATABASE_URL_VAR} not set");
        return None;
    };
    let db = Database::connect(&url).await.unwrap();
    MIGRATED
        .get_or_init(|| async { Migrator::up(&db, None).await.unwrap() })
        .await;
    Some(db)
}

/// Short per-run suffix so repeated runs against one database do not collide.
fn suffix() -> String {
    Uuid::now_v7().simple().to_string()[20..].to_owned()
}

async fn insert_user(db: &DatabaseConnection) -> User {
    let tail = suffix();
    let user = User {
        id: Uuid::now_v7(),
        email: format!("cook-{tail}@example.com"),
        username: format!("cook-{tail}"),
        first_name: "Test".to_owned(),
        last_name: "Cook".to_owned(),
        password_hash: "hash".to_owned(),
        role: 0,
        created_at: Utc::now(),
    };
    DbUserRepository { db: db.clone() }
        .create(&user)
        .await
        .unwrap();
    user
}

/// Import one tag and one ingredient per name, returning their ids.
async fn seed_catalog(
    db: &DatabaseConnection,
    tags: &[&str],
    ingredients: &[&str],
) -> (Vec<i32>, Vec<i32>) {
    let catalog = DbCatalogRepository { db: db.clone() };
    let tail = suffix();

    let mut tag_ids = Vec::new();
    for name in tags {
        let slug = format!("{name}-{tail}");
        catalog
            .insert_tag(&NewTag {
                name: slug.clone(),
                color: "#E26C2D".to_owned(),
                slug: slug.clone(),
            })
            .await
            .unwrap();
        let stored = catalog.list_tags().await.unwrap();
        tag_ids.push(stored.iter().find(|t| t.slug == slug).unwrap().id);
    }

    let mut ingredient_ids = Vec::new();
    for name in ingredients {
        let name = format!("{name}-{tail}");
        catalog
            .insert_ingredient(&NewIngredient {
                name: name.clone(),
                measurement_unit: "g".to_owned(),
            })
            .await
            .unwrap();
        let stored = catalog.list_ingredients(Some(name.as_str())).await.unwrap();
        ingredient_ids.push(stored.iter().find(|i| i.name == name).unwrap().id);
    }
    (tag_ids, ingredient_ids)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "requires FOODGRAM_TEST_DATABASE_URL pointing at PostgreSQL"]
async fn should_accept_exactly_one_of_two_concurrent_favorites() {
    let Some(db) = connect("should_accept_exactly_one_of_two_concurrent_favorites").await else {
        return;
    };
    let author = insert_user(&db).await;
    let (tags, ingredients) = seed_catalog(&db, &["lunch"], &["flour"]).await;
    let mut input = draft(tags, vec![(ingredients[0], 100)]);
    input.name = format!("Pancakes {}", suffix());
    let write = validate_draft(&input, RecipeLimits::default()).unwrap();
    let recipes = DbRecipeRepository { db: db.clone() };
    let recipe_id = recipes
        .create(author.id, &write, "recipes/images/test.png")
        .await
        .unwrap();

    let favorite = Relation::Favorite {
        user_id: author.id,
        recipe_id,
    };
    let first = AddRelationUseCase {
        repo: DbRelationRepository { db: db.clone() },
    };
    let second = AddRelationUseCase {
        repo: DbRelationRepository { db: db.clone() },
    };
    let (a, b) = tokio::join!(first.execute(favorite), second.execute(favorite));

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(ApiError::DuplicateRelation(RelationKind::Favorite))
    )));

    recipes.delete(recipe_id).await.unwrap();
    let marked = DbRelationRepository { db: db.clone() }
        .marked_recipes(RelationKind::Favorite, author.id, &[recipe_id])
        .await
        .unwrap();
    assert!(marked.is_empty());
}

#[tokio::test]
#[ignore = "requires FOODGRAM_TEST_DATABASE_URL pointing at PostgreSQL"]
async fn should_replace_associations_and_reject_duplicate_name() {
    let Some(db) = connect("should_replace_associations_and_reject_duplicate_name").await else {
        return;
    };
    let author = insert_user(&db).await;
    let (tags, ingredients) =
        seed_catalog(&db, &["breakfast", "dinner"], &["milk", "sugar"]).await;
    let recipes = DbRecipeRepository { db: db.clone() };

    let name = format!("Porridge {}", suffix());
    let mut input = draft(vec![tags[0]], vec![(ingredients[0], 200)]);
    input.name = name.clone();
    let write = validate_draft(&input, RecipeLimits::default()).unwrap();
    let recipe_id = recipes
        .create(author.id, &write, "recipes/images/porridge.png")
        .await
        .unwrap();

    let mut replacement = draft(vec![tags[1]], vec![(ingredients[1], 30)]);
    replacement.name = name.clone();
    let write = validate_draft(&replacement, RecipeLimits::default()).unwrap();
    recipes.update(recipe_id, &write, None).await.unwrap();

    let stored = recipes.find(recipe_id).await.unwrap().unwrap();
    let tag_ids: Vec<i32> = stored.tags.iter().map(|t| t.id).collect();
    assert_eq!(tag_ids, vec![tags[1]]);
    assert_eq!(stored.ingredients.len(), 1);
    assert_eq!(stored.ingredients[0].ingredient.id, ingredients[1]);
    assert_eq!(stored.ingredients[0].amount, 30);
    assert_eq!(stored.image, "recipes/images/porridge.png");

    let err = recipes
        .create(author.id, &write, "recipes/images/again.png")
        .await
        .unwrap_err();
    assert!(
        matches!(err, ApiError::Validation { field: "name", .. }),
        "expected name validation error, got {err:?}"
    );

    recipes.delete(recipe_id).await.unwrap();
}
