use forummod_application::{
    error::{AppError, AppResult},
    ports::outgoing::template_loader::TemplateLoaderPort,
};
use tera::Tera;
use tracing::debug;

use domain::notification::{NotificationContext, TemplateLookup};

/// Loads escalation mail templates from a directory tree. Template names are
/// paths relative to the directory, e.g.
/// `discussion/ban_escalation_email.txt`.
pub struct TeraTemplateLoader {
    tera: Tera,
}

impl TeraTemplateLoader {
    pub fn new(templates_dir: &str) -> Result<Self, AppError> {
        let glob = format!("{}/**/*.txt", templates_dir.trim_end_matches('/'));
        let tera = Tera::new(&glob).map_err(|e| AppError::TemplateError {
            message: format!("Failed to scan templates under {templates_dir}: {e}"),
        })?;

        debug!(
            templates_dir = templates_dir,
            loaded = tera.get_template_names().count(),
            "Template loader initialized"
        );

        Ok(Self { tera })
    }
}

#[async_trait::async_trait]
impl TemplateLoaderPort for TeraTemplateLoader {
    async fn render(
        &self,
        template_name: &str,
        context: &NotificationContext,
    ) -> AppResult<TemplateLookup> {
        let tera_context =
            tera::Context::from_serialize(context).map_err(|e| AppError::TemplateError {
                message: format!("Failed to build template context: {}", e),
            })?;

        match self.tera.render(template_name, &tera_context) {
            Ok(body) => Ok(TemplateLookup::Rendered(body)),
            Err(e) => match e.kind {
                tera::ErrorKind::TemplateNotFound(_) => Ok(TemplateLookup::NotFound),
                _ => Err(AppError::TemplateError {
                    message: format!("Failed to render {template_name}: {e}"),
                }),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use domain::course::CourseId;
    use domain::moderation::{BanScope, PurgeOutcome};
    use domain::user::{UserId, UserProfile};

    fn context() -> NotificationContext {
        let banned = UserProfile {
            id: UserId::new(42),
            username: "spammer".to_string(),
            email: "spammer@example.com".to_string(),
        };
        let moderator = UserProfile {
            id: UserId::new(3),
            username: "mod1".to_string(),
            email: "mod@example.com".to_string(),
        };
        NotificationContext::new(
            &banned,
            &moderator,
            &CourseId::new("course-v1:TestX+CS101+2024"),
            BanScope::Course,
            None,
            &PurgeOutcome::default(),
        )
    }

    #[tokio::test]
    async fn missing_template_is_reported_as_not_found() {
        let loader = TeraTemplateLoader::new("nonexistent-templates-dir").unwrap();
        let lookup = loader
            .render("discussion/ban_escalation_email.txt", &context())
            .await
            .unwrap();
        assert_eq!(lookup, TemplateLookup::NotFound);
    }
}
