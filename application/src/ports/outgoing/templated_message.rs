use std::sync::Arc;

use crate::error::AppResult;
use domain::notification::TemplatedMessage;

/// The preferred outbound channel: a messaging pipeline that renders a named
/// template from structured context on its own side.
#[async_trait::async_trait]
pub trait TemplatedMessagePort: Send + Sync {
    async fn send(&self, message: &TemplatedMessage) -> AppResult<()>;
}

pub type DynTemplatedMessagePort = Arc<dyn TemplatedMessagePort>;
