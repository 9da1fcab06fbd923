#[cfg(any(
    feature = "adapters",
    feature = "axum",
    feature = "sqlx",
    feature = "lettre",
    feature = "reqwest"
))]
compile_error!("application must not depend on adapters/framework crates");

pub mod config;
pub mod error;
pub mod escalation;
pub mod infrastructure_config;
pub mod ports;
pub mod purge;

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::new_without_default
)]
pub(crate) mod test_support;
