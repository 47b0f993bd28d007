pub mod db;
pub mod image_store;
