//! 数据访问层
//!
//! 规则与条目两个集合的仓储接口及 PostgreSQL 实现。

mod entry_repo;
mod rule_repo;
mod traits;

pub use entry_repo::PgEntryRepository;
pub use rule_repo::PgRuleRepository;
pub use traits::{EntryRepository, RuleRepository};

#[cfg(test)]
pub use traits::{MockEntryRepository, MockRuleRepository};
