use crate::config::AppConfig;
use crate::errors::{NoteSystemError, Result};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 准备服务器启动的上下文：TLS 加密后端与存储（含迁移）
pub async fn prepare_server_startup() -> Result<StartupContext> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| {
            NoteSystemError::database_config("Failed to install rustls crypto provider")
        })?;

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let config = AppConfig::get();
    debug!(
        "Grading limits: max {} notes per batch",
        config.grading.max_batch_size
    );

    Ok(StartupContext { storage })
}
