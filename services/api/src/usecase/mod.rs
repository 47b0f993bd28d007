pub mod catalog;
pub mod recipe;
pub mod relation;
pub mod shopping_list;
pub mod user;
pub mod visibility;
