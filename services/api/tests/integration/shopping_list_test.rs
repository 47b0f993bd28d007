use uuid::Uuid;

use foodgram_api::domain::relation::Relation;
use foodgram_api::domain::repository::{RecipeRepository, RelationRepository};
use foodgram_api::domain::shopping_list::{REPORT_HEADER, REPORT_TITLE, ShoppingListLine};
use foodgram_api::domain::types::RecipeLimits;
use foodgram_api::usecase::recipe::validate_draft;
use foodgram_api::usecase::shopping_list::GetShoppingListUseCase;

use crate::helpers::{MemoryStore, draft, ingredient, tag, test_user};

fn line(name: &str, total: i64, unit: &str) -> ShoppingListLine {
    ShoppingListLine {
        name: name.to_owned(),
        total,
        measurement_unit: unit.to_owned(),
    }
}

fn catalog() -> MemoryStore {
    MemoryStore::new()
        .with_tag(tag(1, "breakfast"))
        .with_ingredient(ingredient(10, "sugar", "g"))
        .with_ingredient(ingredient(11, "milk", "ml"))
        .with_ingredient(ingredient(12, "egg", "pcs"))
}

async fn add_recipe(store: &MemoryStore, ingredients: Vec<(i32, i32)>) -> i32 {
    let write = validate_draft(&draft(vec![1], ingredients), RecipeLimits::default()).unwrap();
    store
        .create(Uuid::now_v7(), &write, "recipes/images/x.png")
        .await
        .unwrap()
}

async fn put_in_cart(store: &MemoryStore, user_id: Uuid, recipe_id: i32) {
    assert!(
        store
            .insert(&Relation::ShoppingCart { user_id, recipe_id })
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn should_sum_amounts_across_carted_recipes() {
    let store = catalog();
    let user = test_user("shopper");
    let first = add_recipe(&store, vec![(10, 100), (11, 200)]).await;
    let second = add_recipe(&store, vec![(10, 50)]).await;
    put_in_cart(&store, user.id, first).await;
    put_in_cart(&store, user.id, second).await;

    let lines = GetShoppingListUseCase { repo: store }
        .execute(user.id)
        .await
        .unwrap();

    assert_eq!(
        lines,
        vec![line("milk", 200, "ml"), line("sugar", 150, "g")]
    );
}

#[tokio::test]
async fn should_ignore_recipes_outside_the_cart() {
    let store = catalog();
    let user = test_user("shopper");
    let carted = add_recipe(&store, vec![(12, 3)]).await;
    add_recipe(&store, vec![(12, 10), (10, 5)]).await;
    put_in_cart(&store, user.id, carted).await;

    let lines = GetShoppingListUseCase { repo: store }
        .execute(user.id)
        .await
        .unwrap();

    assert_eq!(lines, vec![line("egg", 3, "pcs")]);
}

#[tokio::test]
async fn should_render_header_only_for_empty_cart() {
    let store = catalog();

    let report = GetShoppingListUseCase { repo: store }
        .report(Uuid::now_v7())
        .await
        .unwrap();

    assert_eq!(report, format!("{REPORT_TITLE}\n{REPORT_HEADER}"));
}

#[tokio::test]
async fn should_produce_identical_report_on_repeated_download() {
    let store = catalog();
    let user = test_user("shopper");
    let recipe = add_recipe(&store, vec![(10, 100), (11, 200)]).await;
    put_in_cart(&store, user.id, recipe).await;
    let usecase = GetShoppingListUseCase { repo: store.clone() };

    let first = usecase.report(user.id).await.unwrap();
    let second = usecase.report(user.id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        format!("{REPORT_TITLE}\n{REPORT_HEADER}\nmilk | 200 | ml\nsugar | 100 | g")
    );
    assert!(store.has_relation(&Relation::ShoppingCart {
        user_id: user.id,
        recipe_id: recipe
    }));
}
