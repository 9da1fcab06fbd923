use std::sync::Arc;

use crate::error::AppResult;
use domain::notification::OutboundMail;

/// Fallback outbound channel accepting a pre-rendered subject and body.
#[async_trait::async_trait]
pub trait PlainMailPort: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> AppResult<()>;
}

pub type DynPlainMailPort = Arc<dyn PlainMailPort>;
