//! 仓储 Trait 定义
//!
//! 定义规则与条目集合的数据访问接口，便于服务层依赖抽象而非具体实现，
//! 支持 mock 测试。接口刻意贴近文档式存储的能力面：等值过滤查询、
//! 整体替换、单字段更新和按 id 集合的批量更新。

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Entry, NewRule, Rule, RuleUpdate};

/// 规则集合仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// 所有活跃规则（无序）
    async fn find_active(&self) -> Result<Vec<Rule>>;

    /// 按 id 查找活跃规则，软删除视同不存在
    async fn find_active_by_id(&self, id: i64) -> Result<Option<Rule>>;

    /// 当前链头（prev 为空的活跃规则）
    async fn find_head(&self) -> Result<Option<Rule>>;

    /// 插入新规则（prev 置空、next 指向给定规则），返回生成的 id
    async fn insert(&self, draft: &NewRule, next: Option<i64>) -> Result<i64>;

    /// 整体替换可变字段
    async fn replace(&self, id: i64, update: &RuleUpdate) -> Result<()>;

    /// 更新 prev 指针
    async fn set_prev(&self, id: i64, prev: Option<i64>) -> Result<()>;

    /// 更新 next 指针
    async fn set_next(&self, id: i64, next: Option<i64>) -> Result<()>;

    /// 软删除：写入 deleted_at 并清空自身指针
    async fn mark_deleted(&self, id: i64) -> Result<()>;
}

/// 条目集合仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// 全量条目
    async fn find_all(&self) -> Result<Vec<Entry>>;

    /// 将一组条目批量改派到目标分类，返回受影响行数
    async fn reassign_category(&self, entry_ids: &[i64], category_id: i64) -> Result<u64>;
}
