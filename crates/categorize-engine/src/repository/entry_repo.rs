//! 条目仓储
//!
//! ledger_entries 表的数据访问。改派分类使用 id = ANY($ids) 的多行更新，
//! 每个目标分类只发出一次写入。

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::traits::EntryRepository;
use crate::error::Result;
use crate::models::Entry;

/// PostgreSQL 条目仓储
pub struct PgEntryRepository {
    pool: PgPool,
}

impl PgEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn find_all(&self) -> Result<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, category_id, payload, created_at, updated_at
            FROM ledger_entries
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    #[instrument(skip(self, entry_ids), fields(entry_count = entry_ids.len()))]
    async fn reassign_category(&self, entry_ids: &[i64], category_id: i64) -> Result<u64> {
        if entry_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE ledger_entries
            SET category_id = $1, updated_at = NOW()
            WHERE id = ANY($2)
            "#,
        )
        .bind(category_id)
        .bind(entry_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
