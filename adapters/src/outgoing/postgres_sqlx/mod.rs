pub mod ban_store_postgres;
pub mod content_store_postgres;
pub mod user_directory_postgres;
pub mod utils;
