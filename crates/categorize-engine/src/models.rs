//! 分类规则与账本条目领域模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::operators::{Operator, RuleMatcher};

/// 分类规则
///
/// 活跃规则通过 prev/next 指针构成一条从头到尾的链，链序即优先级。
/// deleted_at 非空表示已软删除，规则脱离链外但记录保留，
/// 避免 id 复用破坏历史指针。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rule {
    pub id: i64,
    pub category_id: i64,
    pub property: String,
    pub operator: Operator,
    pub value: String,
    pub prev: Option<i64>,
    pub next: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Rule {
    /// 规则是否处于活跃状态（未被软删除）
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// 判断规则是否命中条目
    pub fn matches(&self, entry: &Entry) -> bool {
        RuleMatcher::matches(entry.field(&self.property), self.operator, &self.value)
    }
}

/// 新建规则请求
///
/// 位置不可指定：新规则总是成为链头。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRule {
    pub category_id: i64,
    #[validate(length(min = 1, max = 128))]
    pub property: String,
    pub operator: Operator,
    #[validate(length(max = 512))]
    pub value: String,
}

/// 规则更新请求
///
/// 对可变字段做整体替换，允许一次调用同时修改内容和链上位置。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RuleUpdate {
    pub category_id: i64,
    #[validate(length(min = 1, max = 128))]
    pub property: String,
    pub operator: Operator,
    #[validate(length(max = 512))]
    pub value: String,
    pub prev: Option<i64>,
    pub next: Option<i64>,
}

/// 账本条目
///
/// 条目由外部系统写入，本服务只读取 payload 字段并回写 category_id。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Entry {
    pub id: i64,
    pub category_id: Option<i64>,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// 获取 payload 字段值（支持点号分隔的路径，如 "meta.merchant"）
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut current = &self.payload;

        for part in path.split('.') {
            match current {
                Value::Object(map) => {
                    current = map.get(part)?;
                }
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    current = arr.get(index)?;
                }
                _ => return None,
            }
        }

        Some(current)
    }
}

/// 一次批量应用的汇总结果
#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    /// 参与求值的条目数
    pub evaluated: usize,
    /// 实际改派分类的条目数
    pub reassigned: usize,
    /// 批量写入次数（等于目标分类数）
    pub batches: usize,
    pub processing_time_ms: i64,
}
