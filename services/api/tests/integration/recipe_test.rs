use uuid::Uuid;

use foodgram_api::domain::repository::RecipeRepository;
use foodgram_api::domain::types::{RecipeFilter, RecipeLimits, User};
use foodgram_api::error::ApiError;
use foodgram_api::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase,
    UpdateRecipeUseCase,
};
use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::pagination::PageRequest;

use crate::helpers::{MemoryStore, draft, ingredient, tag, test_user};

fn seeded_store(author: &User) -> MemoryStore {
    MemoryStore::new()
        .with_user(author.clone())
        .with_tag(tag(1, "breakfast"))
        .with_tag(tag(2, "lunch"))
        .with_tag(tag(3, "dinner"))
        .with_ingredient(ingredient(10, "flour", "g"))
        .with_ingredient(ingredient(11, "milk", "ml"))
        .with_ingredient(ingredient(12, "egg", "pcs"))
}

fn identity_of(user: &User) -> IdentityHeaders {
    IdentityHeaders {
        user_id: user.id,
        user_role: user.role,
    }
}

fn create_usecase(
    store: &MemoryStore,
) -> CreateRecipeUseCase<MemoryStore, MemoryStore, MemoryStore> {
    CreateRecipeUseCase {
        recipes: store.clone(),
        catalog: store.clone(),
        images: store.clone(),
        limits: RecipeLimits::default(),
    }
}

fn update_usecase(
    store: &MemoryStore,
) -> UpdateRecipeUseCase<MemoryStore, MemoryStore, MemoryStore> {
    UpdateRecipeUseCase {
        recipes: store.clone(),
        catalog: store.clone(),
        images: store.clone(),
        limits: RecipeLimits::default(),
    }
}

fn validation_field(err: ApiError) -> &'static str {
    match err {
        ApiError::Validation { field, .. } => field,
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ── CreateRecipeUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_recipe_with_associations_and_image() {
    let author = test_user("chef");
    let store = seeded_store(&author);

    let id = create_usecase(&store)
        .execute(author.id, draft(vec![1, 2], vec![(10, 200), (11, 300)]))
        .await
        .unwrap();

    let recipe = GetRecipeUseCase { repo: store.clone() }
        .execute(id)
        .await
        .unwrap();
    assert_eq!(recipe.author.id, author.id);
    let slugs: Vec<&str> = recipe.tags.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(slugs, vec!["breakfast", "lunch"]);
    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(recipe.ingredients[0].amount, 200);
    assert_eq!(store.stored_images(), vec![recipe.image.clone()]);
}

#[tokio::test]
async fn should_require_image_on_create() {
    let author = test_user("chef");
    let store = seeded_store(&author);
    let mut input = draft(vec![1], vec![(10, 1)]);
    input.image = None;

    let err = create_usecase(&store)
        .execute(author.id, input)
        .await
        .unwrap_err();
    assert_eq!(validation_field(err), "image");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn should_reject_duplicate_ingredient_before_any_storage_access() {
    let author = test_user("chef");
    let store = seeded_store(&author);

    let err = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 100), (10, 50)]))
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "ingredients");
    assert_eq!(store.calls(), 0);
    assert!(store.stored_images().is_empty());
}

#[tokio::test]
async fn should_reject_unknown_tag_without_storing_image() {
    let author = test_user("chef");
    let store = seeded_store(&author);

    let err = create_usecase(&store)
        .execute(author.id, draft(vec![1, 99], vec![(10, 100)]))
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "tags");
    assert!(store.stored_images().is_empty());
}

#[tokio::test]
async fn should_reject_unknown_ingredient() {
    let author = test_user("chef");
    let store = seeded_store(&author);

    let err = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 100), (404, 1)]))
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "ingredients");
}

// ── UpdateRecipeUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_replace_tags_and_ingredients_on_update() {
    let author = test_user("chef");
    let store = seeded_store(&author);
    let id = create_usecase(&store)
        .execute(author.id, draft(vec![1, 2], vec![(10, 5)]))
        .await
        .unwrap();

    update_usecase(&store)
        .execute(identity_of(&author), id, draft(vec![3], vec![(11, 10)]))
        .await
        .unwrap();

    let recipe = store.find(id).await.unwrap().unwrap();
    let tag_ids: Vec<i32> = recipe.tags.iter().map(|t| t.id).collect();
    assert_eq!(tag_ids, vec![3]);
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].ingredient.id, 11);
    assert_eq!(recipe.ingredients[0].amount, 10);
}

#[tokio::test]
async fn should_keep_stored_image_when_update_omits_it() {
    let author = test_user("chef");
    let store = seeded_store(&author);
    let id = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 5)]))
        .await
        .unwrap();
    let original = store.find(id).await.unwrap().unwrap().image;

    let mut input = draft(vec![2], vec![(12, 2)]);
    input.image = None;
    input.name = "Omelette".to_owned();
    update_usecase(&store)
        .execute(identity_of(&author), id, input)
        .await
        .unwrap();

    let recipe = store.find(id).await.unwrap().unwrap();
    assert_eq!(recipe.image, original);
    assert_eq!(recipe.name, "Omelette");
    assert_eq!(store.stored_images().len(), 1);
}

#[tokio::test]
async fn should_remove_image_when_create_fails() {
    let author = test_user("chef");
    let store = seeded_store(&author).rejecting_recipe_writes();

    let err = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 5)]))
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "name");
    assert!(store.stored_images().is_empty());
}

#[tokio::test]
async fn should_remove_new_image_when_update_fails() {
    let author = test_user("chef");
    let store = seeded_store(&author);
    let id = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 5)]))
        .await
        .unwrap();
    let original = store.find(id).await.unwrap().unwrap().image;
    let store = store.rejecting_recipe_writes();

    let err = update_usecase(&store)
        .execute(identity_of(&author), id, draft(vec![2], vec![(11, 1)]))
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "name");
    assert_eq!(store.stored_images(), vec![original]);
}

#[tokio::test]
async fn should_forbid_update_by_another_user() {
    let author = test_user("chef");
    let stranger = test_user("stranger");
    let store = seeded_store(&author);
    let id = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 5)]))
        .await
        .unwrap();

    let result = update_usecase(&store)
        .execute(identity_of(&stranger), id, draft(vec![2], vec![(11, 1)]))
        .await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );

    let recipe = store.find(id).await.unwrap().unwrap();
    assert_eq!(recipe.tags[0].id, 1);
}

#[tokio::test]
async fn should_let_admin_update_any_recipe() {
    let author = test_user("chef");
    let store = seeded_store(&author);
    let id = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 5)]))
        .await
        .unwrap();

    let admin = IdentityHeaders {
        user_id: Uuid::now_v7(),
        user_role: 1,
    };
    update_usecase(&store)
        .execute(admin, id, draft(vec![2], vec![(11, 1)]))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_return_not_found_when_updating_missing_recipe() {
    let author = test_user("chef");
    let store = seeded_store(&author);

    let result = update_usecase(&store)
        .execute(identity_of(&author), 42, draft(vec![1], vec![(10, 5)]))
        .await;
    assert!(
        matches!(result, Err(ApiError::RecipeNotFound)),
        "expected RecipeNotFound, got {result:?}"
    );
}

// ── DeleteRecipeUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_own_recipe_once() {
    let author = test_user("chef");
    let store = seeded_store(&author);
    let id = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 5)]))
        .await
        .unwrap();
    let usecase = DeleteRecipeUseCase { repo: store.clone() };

    usecase.execute(identity_of(&author), id).await.unwrap();
    let again = usecase.execute(identity_of(&author), id).await;

    assert!(matches!(again, Err(ApiError::RecipeNotFound)));
    assert!(store.find(id).await.unwrap().is_none());
}

#[tokio::test]
async fn should_forbid_delete_by_another_user() {
    let author = test_user("chef");
    let store = seeded_store(&author);
    let id = create_usecase(&store)
        .execute(author.id, draft(vec![1], vec![(10, 5)]))
        .await
        .unwrap();

    let result = DeleteRecipeUseCase { repo: store.clone() }
        .execute(identity_of(&test_user("stranger")), id)
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
    assert!(store.find(id).await.unwrap().is_some());
}

// ── ListRecipesUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_newest_first_with_next_page() {
    let author = test_user("chef");
    let store = seeded_store(&author);
    let create = create_usecase(&store);
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            create
                .execute(author.id, draft(vec![1], vec![(10, 5)]))
                .await
                .unwrap(),
        );
    }

    let page = ListRecipesUseCase { repo: store.clone() }
        .execute(&RecipeFilter::default(), PageRequest { limit: 2, page: 1 })
        .await
        .unwrap();

    assert_eq!(page.count, 3);
    assert_eq!(page.next_page, Some(2));
    let listed: Vec<i32> = page.results.iter().map(|r| r.id).collect();
    assert_eq!(listed, vec![ids[2], ids[1]]);
}
