use std::sync::Arc;

use crate::error::AppResult;
use domain::notification::{NotificationContext, TemplateLookup};

/// Loads and renders a named text template. A missing template is reported
/// through [`TemplateLookup::NotFound`]; any other rendering failure is an
/// error and propagates.
#[async_trait::async_trait]
pub trait TemplateLoaderPort: Send + Sync {
    async fn render(
        &self,
        template_name: &str,
        context: &NotificationContext,
    ) -> AppResult<TemplateLookup>;
}

pub type DynTemplateLoaderPort = Arc<dyn TemplateLoaderPort>;
