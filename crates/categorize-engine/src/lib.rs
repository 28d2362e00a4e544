//! 条目分类规则引擎
//!
//! 维护一条有序的分类规则链并将其批量应用到账本条目：
//! - 规则以双向链表记录存储在规则集合中，链序即优先级
//! - 创建/更新/删除操作负责在每次变更后恢复链的完整性
//! - 应用时每个条目取首条命中规则，变更按目标分类分组批量落库

pub mod chain;
pub mod engine;
pub mod error;
pub mod models;
pub mod operators;
pub mod repository;

pub use chain::RuleChainManager;
pub use engine::{EntryCategorizer, stage};
pub use error::{CategorizeError, Result};
pub use models::{ApplyOutcome, Entry, NewRule, Rule, RuleUpdate};
pub use operators::{Operator, RuleMatcher};
pub use repository::{EntryRepository, PgEntryRepository, PgRuleRepository, RuleRepository};
