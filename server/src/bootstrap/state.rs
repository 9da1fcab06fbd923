use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use forummod_adapters::outgoing::config_provider::shared_config_provider::SharedConfigProvider;
use forummod_adapters::outgoing::email_sender::{
    console_mail_sender::ConsoleMailSender,
    smtp_mail_sender::{SmtpMailConfig, SmtpMailSender},
};
use forummod_adapters::outgoing::http_reqwest::templated_message_client::TemplatedMessageClient;
use forummod_adapters::outgoing::postgres_sqlx::{
    ban_store_postgres::PostgresBanStoreAdapter,
    content_store_postgres::PostgresContentStoreAdapter,
    user_directory_postgres::PostgresUserDirectoryAdapter,
};
use forummod_adapters::outgoing::tera_templates::tera_template_loader::TeraTemplateLoader;
use forummod_adapters::shared::app_state::AppState;
use forummod_application::error::{AppError, AppResult};
use forummod_application::escalation::service::EscalationService;
use forummod_application::infrastructure_config::{Config, EmailBackend};
use forummod_application::ports::outgoing::{
    ban_store::DynBanStorePort, content_store::DynContentStorePort,
    moderation_config::DynModerationConfigPort, plain_mail::DynPlainMailPort,
    template_loader::DynTemplateLoaderPort, templated_message::DynTemplatedMessagePort,
    user_directory::DynUserDirectoryPort,
};

pub async fn build_state(config: Arc<Config>) -> AppResult<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db.pool_size)
        .connect(config.db.database_url())
        .await
        .map_err(|e| AppError::DatabaseError {
            message: format!("Failed to connect to the database: {e}"),
        })?;

    let query_timeout = config.db.query_timeout_secs;

    let user_directory: DynUserDirectoryPort = Arc::new(PostgresUserDirectoryAdapter::new(
        pool.clone(),
        query_timeout,
    ));
    let content_store: DynContentStorePort = Arc::new(PostgresContentStoreAdapter::new(
        pool.clone(),
        query_timeout,
    ));
    let ban_store: DynBanStorePort = Arc::new(PostgresBanStoreAdapter::new(pool, query_timeout));

    let config_provider: DynModerationConfigPort =
        Arc::new(SharedConfigProvider::new(config.moderation.clone()));

    let template_loader: DynTemplateLoaderPort =
        Arc::new(TeraTemplateLoader::new(&config.moderation.templates_dir)?);

    let plain_mail: DynPlainMailPort = match config.moderation.email.email_backend {
        EmailBackend::Console => Arc::new(ConsoleMailSender::new()),
        EmailBackend::Smtp => {
            let smtp = &config.moderation.email.smtp;
            Arc::new(SmtpMailSender::new(SmtpMailConfig {
                smtp_host: smtp.host.clone(),
                smtp_port: smtp.port,
                username: smtp.username.clone(),
                password: smtp.password.clone(),
                from_name: smtp.from_name.clone(),
                use_tls: smtp.use_tls,
            })?)
        }
    };

    let templated: Option<DynTemplatedMessagePort> = match &config.moderation.message_service {
        Some(service_config) => {
            info!(base_url = %service_config.base_url, "Templated messaging service configured");
            Some(Arc::new(TemplatedMessageClient::new(service_config)?))
        }
        None => None,
    };

    let escalation_service = EscalationService::new(
        user_directory,
        content_store,
        ban_store,
        config_provider,
        templated,
        plain_mail,
        template_loader,
    );

    Ok(AppState::new(config, Arc::new(escalation_service)))
}
