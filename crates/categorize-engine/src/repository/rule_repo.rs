//! 规则仓储
//!
//! categorize_rules 表的数据访问。链指针修复依赖这里的单字段更新语义：
//! 每次写入只触碰目标指针字段和 updated_at。

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::traits::RuleRepository;
use crate::error::Result;
use crate::models::{NewRule, Rule, RuleUpdate};

/// 规则查询列（复用于各 SELECT）
const RULE_COLUMNS: &str =
    "id, category_id, property, operator, value, prev, next, created_at, updated_at, deleted_at";

/// PostgreSQL 规则仓储
pub struct PgRuleRepository {
    pool: PgPool,
}

impl PgRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleRepository for PgRuleRepository {
    async fn find_active(&self) -> Result<Vec<Rule>> {
        let sql = format!("SELECT {RULE_COLUMNS} FROM categorize_rules WHERE deleted_at IS NULL");

        let rules = sqlx::query_as::<_, Rule>(&sql).fetch_all(&self.pool).await?;

        Ok(rules)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Rule>> {
        let sql = format!(
            "SELECT {RULE_COLUMNS} FROM categorize_rules WHERE id = $1 AND deleted_at IS NULL"
        );

        let rule = sqlx::query_as::<_, Rule>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rule)
    }

    async fn find_head(&self) -> Result<Option<Rule>> {
        let sql = format!(
            "SELECT {RULE_COLUMNS} FROM categorize_rules WHERE prev IS NULL AND deleted_at IS NULL"
        );

        let head = sqlx::query_as::<_, Rule>(&sql)
            .fetch_optional(&self.pool)
            .await?;

        Ok(head)
    }

    #[instrument(skip(self, draft))]
    async fn insert(&self, draft: &NewRule, next: Option<i64>) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO categorize_rules (category_id, property, operator, value, prev, next, created_at)
            VALUES ($1, $2, $3, $4, NULL, $5, NOW())
            RETURNING id
            "#,
        )
        .bind(draft.category_id)
        .bind(&draft.property)
        .bind(draft.operator)
        .bind(&draft.value)
        .bind(next)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    #[instrument(skip(self, update))]
    async fn replace(&self, id: i64, update: &RuleUpdate) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE categorize_rules
            SET
                category_id = $2,
                property = $3,
                operator = $4,
                value = $5,
                prev = $6,
                next = $7,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.category_id)
        .bind(&update.property)
        .bind(update.operator)
        .bind(&update.value)
        .bind(update.prev)
        .bind(update.next)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_prev(&self, id: i64, prev: Option<i64>) -> Result<()> {
        sqlx::query("UPDATE categorize_rules SET prev = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(prev)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_next(&self, id: i64, next: Option<i64>) -> Result<()> {
        sqlx::query("UPDATE categorize_rules SET next = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(next)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_deleted(&self, id: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE categorize_rules
            SET deleted_at = NOW(), prev = NULL, next = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
