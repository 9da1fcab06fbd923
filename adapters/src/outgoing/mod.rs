pub mod config_provider;
pub mod email_sender;
pub mod http_reqwest;
pub mod postgres_sqlx;
pub mod tera_templates;
