//! 分类引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategorizeError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("规则未找到: rule_id={0}")]
    RuleNotFound(i64),

    #[error("规则链损坏: {0}")]
    ChainCorrupted(String),

    #[error("参数验证失败: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for CategorizeError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CategorizeError>;
