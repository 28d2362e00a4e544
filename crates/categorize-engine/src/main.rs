//! 分类批处理入口
//!
//! 一次性批量任务：加载配置、连接数据库、对全量条目应用规则链后退出。
//! 规则的增删改由外部管理端通过库接口调用，此二进制只负责批量应用。

use std::sync::Arc;

use anyhow::Result;
use categorize_engine::{EntryCategorizer, PgEntryRepository, PgRuleRepository, RuleChainManager};
use categorizer_shared::config::AppConfig;
use categorizer_shared::database::Database;
use categorizer_shared::observability;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load("categorize-runner").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    observability::init(&config.observability)?;

    info!("Starting categorize-runner...");

    let db = Database::connect(&config.database).await?;

    let rules = Arc::new(PgRuleRepository::new(db.pool().clone()));
    let entries = Arc::new(PgEntryRepository::new(db.pool().clone()));

    let chain = RuleChainManager::new(rules);
    let categorizer = EntryCategorizer::new(chain, entries);

    let outcome = categorizer.apply_to_all().await?;

    info!(
        evaluated = outcome.evaluated,
        reassigned = outcome.reassigned,
        batches = outcome.batches,
        elapsed_ms = outcome.processing_time_ms,
        "Batch categorization complete"
    );

    db.close().await;
    Ok(())
}
