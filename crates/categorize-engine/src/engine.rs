//! 规则应用引擎
//!
//! 按链序对条目批量求值：每个条目取第一条命中的规则（短路求值），
//! 命中规则的目标分类与条目当前分类相同则不产生变更；
//! 暂存结果按目标分类分组，每组一次批量写入。

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::chain::RuleChainManager;
use crate::error::Result;
use crate::models::{ApplyOutcome, Entry, Rule};
use crate::repository::EntryRepository;

/// 条目分类引擎
pub struct EntryCategorizer {
    chain: RuleChainManager,
    entries: Arc<dyn EntryRepository>,
}

impl EntryCategorizer {
    pub fn new(chain: RuleChainManager, entries: Arc<dyn EntryRepository>) -> Self {
        Self { chain, entries }
    }

    /// 对给定条目批量应用规则链
    ///
    /// 提交阶段各分类批次相互独立且幂等；中途失败只影响尚未提交的批次。
    #[instrument(skip(self, entries), fields(entry_count = entries.len()))]
    pub async fn apply_rules(&self, entries: &[Entry]) -> Result<ApplyOutcome> {
        let start = Instant::now();

        let rules = self.chain.list_active().await?;
        let staged = stage(&rules, entries);

        let reassigned = staged.values().map(Vec::len).sum();
        let batches = staged.len();

        for (category_id, entry_ids) in &staged {
            let affected = self
                .entries
                .reassign_category(entry_ids, *category_id)
                .await?;
            debug!(
                category_id,
                staged = entry_ids.len(),
                affected,
                "分类批量改派完成"
            );
        }

        let outcome = ApplyOutcome {
            evaluated: entries.len(),
            reassigned,
            batches,
            processing_time_ms: start.elapsed().as_millis() as i64,
        };

        info!(
            evaluated = outcome.evaluated,
            reassigned = outcome.reassigned,
            batches = outcome.batches,
            "规则应用完成"
        );

        Ok(outcome)
    }

    /// 对存储中的全量条目应用规则链
    pub async fn apply_to_all(&self) -> Result<ApplyOutcome> {
        let entries = self.entries.find_all().await?;
        self.apply_rules(&entries).await
    }
}

/// 计算暂存变更：条目 id 按命中规则的目标分类分组
///
/// 每个条目只取链序中第一条命中的规则；命中规则的目标分类
/// 与条目当前分类一致时视为无变更，未命中任何规则的条目保持原样。
pub fn stage(rules: &[Rule], entries: &[Entry]) -> BTreeMap<i64, Vec<i64>> {
    let mut staged: BTreeMap<i64, Vec<i64>> = BTreeMap::new();

    for entry in entries {
        let Some(winner) = rules.iter().find(|rule| rule.matches(entry)) else {
            continue;
        };

        if entry.category_id == Some(winner.category_id) {
            continue;
        }

        staged.entry(winner.category_id).or_default().push(entry.id);
    }

    staged
}
