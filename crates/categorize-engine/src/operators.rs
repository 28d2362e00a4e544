//! 规则操作符与谓词匹配
//!
//! 固定的操作符集合和对应的纯比较函数。匹配永不失败：
//! 字段缺失、类型不符或数值解析失败一律视为不命中。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 条件操作符
///
/// 序列化为 camelCase 线上名称，未知操作符在反序列化阶段即被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "camelCase")]
#[sqlx(type_name = "varchar", rename_all = "camelCase")]
pub enum Operator {
    // 字符串匹配
    Is,
    StartsWith,
    EndsWith,
    Contains,

    // 数值比较（两侧均按浮点数解析）
    Equals,
    GreaterThan,
    LessThan,
}

impl Operator {
    /// 是否为数值比较操作符
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Equals | Self::GreaterThan | Self::LessThan)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Is => "is",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
        };
        write!(f, "{}", s)
    }
}

/// 谓词匹配器
pub struct RuleMatcher;

impl RuleMatcher {
    /// 判断条目字段值是否命中操作符与操作数
    ///
    /// # Arguments
    /// * `field` - 从条目 payload 中取出的字段值
    /// * `operator` - 操作符
    /// * `operand` - 规则中定义的比较操作数
    pub fn matches(field: Option<&Value>, operator: Operator, operand: &str) -> bool {
        let Some(field) = field else {
            return false;
        };

        match operator {
            Operator::Is => field.as_str() == Some(operand),
            Operator::StartsWith => field.as_str().is_some_and(|s| s.starts_with(operand)),
            Operator::EndsWith => field.as_str().is_some_and(|s| s.ends_with(operand)),
            Operator::Contains => field.as_str().is_some_and(|s| s.contains(operand)),
            Operator::Equals | Operator::GreaterThan | Operator::LessThan => {
                Self::compare_numeric(field, operator, operand)
            }
        }
    }

    /// 数值比较：任一侧解析失败即不命中
    fn compare_numeric(field: &Value, operator: Operator, operand: &str) -> bool {
        let (Some(actual), Some(expected)) = (Self::as_f64(field), Self::parse_f64(operand)) else {
            return false;
        };

        match operator {
            Operator::Equals => (actual - expected).abs() < f64::EPSILON,
            Operator::GreaterThan => actual > expected,
            Operator::LessThan => actual < expected,
            _ => unreachable!(),
        }
    }

    /// 尝试将字段值转换为 f64
    fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => Self::parse_f64(s),
            _ => None,
        }
    }

    fn parse_f64(s: &str) -> Option<f64> {
        s.trim().parse().ok()
    }
}
