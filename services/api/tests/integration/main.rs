mod helpers;
mod postgres_test;
mod recipe_test;
mod shopping_list_test;
