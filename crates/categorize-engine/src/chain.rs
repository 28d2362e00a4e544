//! 规则链管理
//!
//! 活跃规则在存储中以双向链表记录排列，prev/next 指针决定全序：
//! 新规则插入链头；更新时先接入新邻居、再缝合让出的缺口；
//! 删除时软删除自身并把原邻居重新接起来。
//!
//! 所有写入按严格的依赖顺序串行执行，每步写入的目标取决于上一步读取的结果。
//! 相邻指针修复不使用事务或锁：并发修改同一批邻居可能互相覆盖，
//! 这是当前设计接受的限制（见 DESIGN.md）。

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use crate::error::{CategorizeError, Result};
use crate::models::{NewRule, Rule, RuleUpdate};
use crate::repository::RuleRepository;

/// 规则链管理器
#[derive(Clone)]
pub struct RuleChainManager {
    rules: Arc<dyn RuleRepository>,
}

impl RuleChainManager {
    pub fn new(rules: Arc<dyn RuleRepository>) -> Self {
        Self { rules }
    }

    /// 按链序返回所有活跃规则（从头到尾）
    ///
    /// 链结构损坏（无头、多头、指针悬空或成环）时返回 ChainCorrupted，
    /// 不返回部分或猜测的顺序。
    pub async fn list_active(&self) -> Result<Vec<Rule>> {
        let rules = self.rules.find_active().await?;
        order_chain(rules)
    }

    /// 创建规则并使其成为新的链头
    ///
    /// 两次写入：插入新规则（next 指向原链头），再把原链头的 prev 指回来。
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: NewRule) -> Result<Rule> {
        draft.validate()?;

        let old_head = self.rules.find_head().await?;
        let id = self
            .rules
            .insert(&draft, old_head.as_ref().map(|h| h.id))
            .await?;

        if let Some(head) = old_head {
            self.rules.set_prev(head.id, Some(id)).await?;
        }

        info!(rule_id = id, category_id = draft.category_id, "规则已创建并置于链头");

        self.rules
            .find_active_by_id(id)
            .await?
            .ok_or(CategorizeError::RuleNotFound(id))
    }

    /// 更新规则内容并（或）调整链上位置
    ///
    /// 修复顺序是正确性的关键：
    /// 1. 整体替换自身字段；
    /// 2. 新邻居的指针指向自己（已正确则跳过写入）；
    /// 3. 缝合原位置留下的缺口（同样跳过已正确的写入）。
    /// 缺失或已删除的邻居按"无邻居"处理，跳过该侧修复。
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: RuleUpdate) -> Result<Rule> {
        update.validate()?;

        let old = self
            .rules
            .find_active_by_id(id)
            .await?
            .ok_or(CategorizeError::RuleNotFound(id))?;

        // 目标邻居在替换前加载，后续写入依赖这些读取结果
        let new_next = match update.next {
            Some(next_id) => self.rules.find_active_by_id(next_id).await?,
            None => None,
        };
        let new_prev = match update.prev {
            Some(prev_id) => self.rules.find_active_by_id(prev_id).await?,
            None => None,
        };

        self.rules.replace(id, &update).await?;

        // 新邻居接入
        if let Some(neighbor) = new_next
            && neighbor.prev != Some(id)
        {
            self.rules.set_prev(neighbor.id, Some(id)).await?;
        }
        if let Some(neighbor) = new_prev
            && neighbor.next != Some(id)
        {
            self.rules.set_next(neighbor.id, Some(id)).await?;
        }

        // 缝合原缺口：原 next 的 prev 指回原 prev，原 prev 的 next 指向原 next。
        // 缺口只存在于规则实际离开的一侧，指针未变的一侧没有缺口可缝
        if update.next != old.next
            && let Some(old_next_id) = old.next
            && let Some(neighbor) = self.rules.find_active_by_id(old_next_id).await?
            && neighbor.prev != old.prev
        {
            self.rules.set_prev(neighbor.id, old.prev).await?;
        }
        if update.prev != old.prev
            && let Some(old_prev_id) = old.prev
            && let Some(neighbor) = self.rules.find_active_by_id(old_prev_id).await?
            && neighbor.next != old.next
        {
            self.rules.set_next(neighbor.id, old.next).await?;
        }

        info!(rule_id = id, "规则已更新");

        self.rules
            .find_active_by_id(id)
            .await?
            .ok_or(CategorizeError::RuleNotFound(id))
    }

    /// 软删除规则并缝合其邻居
    ///
    /// 被删规则写入 deleted_at 且自身指针清空，原邻居互相接起来；
    /// 缺失的一侧跳过修复。
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let rule = self
            .rules
            .find_active_by_id(id)
            .await?
            .ok_or(CategorizeError::RuleNotFound(id))?;

        self.rules.mark_deleted(id).await?;

        if let Some(next_id) = rule.next
            && let Some(neighbor) = self.rules.find_active_by_id(next_id).await?
        {
            self.rules.set_prev(neighbor.id, rule.prev).await?;
        }
        if let Some(prev_id) = rule.prev
            && let Some(neighbor) = self.rules.find_active_by_id(prev_id).await?
        {
            self.rules.set_next(neighbor.id, rule.next).await?;
        }

        info!(rule_id = id, "规则已软删除");
        Ok(())
    }
}

/// 将无序的活跃规则集按 prev/next 指针排成链序
///
/// 校验链的结构完整性：必须恰好存在一个头（prev 为空），
/// 且从头出发沿 next 恰好遍历每条规则一次。
fn order_chain(rules: Vec<Rule>) -> Result<Vec<Rule>> {
    if rules.is_empty() {
        return Ok(vec![]);
    }

    let total = rules.len();

    let mut heads = rules.iter().filter(|r| r.prev.is_none());
    let head_id = match (heads.next(), heads.next()) {
        (Some(head), None) => head.id,
        (None, _) => {
            return Err(CategorizeError::ChainCorrupted(
                "不存在链头（prev 为空的规则）".to_string(),
            ));
        }
        (Some(a), Some(b)) => {
            return Err(CategorizeError::ChainCorrupted(format!(
                "存在多个链头: {} 和 {}",
                a.id, b.id
            )));
        }
    };

    let mut by_id: HashMap<i64, Rule> = rules.into_iter().map(|r| (r.id, r)).collect();

    let mut ordered = Vec::with_capacity(total);
    let mut cursor = Some(head_id);
    while let Some(id) = cursor {
        // 已取出的规则再次出现说明 next 指针成环；不存在则为悬空指针
        let rule = by_id
            .remove(&id)
            .ok_or_else(|| CategorizeError::ChainCorrupted(format!("next 指针悬空或成环: {}", id)))?;
        cursor = rule.next;
        ordered.push(rule);
    }

    if ordered.len() != total {
        return Err(CategorizeError::ChainCorrupted(format!(
            "链长 {} 与活跃规则数 {} 不一致",
            ordered.len(),
            total
        )));
    }

    Ok(ordered)
}
