pub mod ban_store;
pub mod content_store;
pub mod moderation_config;
pub mod plain_mail;
pub mod template_loader;
pub mod templated_message;
pub mod user_directory;
