//! 错误定义模块

use std::fmt;

use thiserror::Error;

use crate::schema::FieldType;

/// 医院系统统一错误类型
#[derive(Error, Debug)]
pub enum HospitalError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("唯一性冲突: {0}")]
    Conflict(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("引用错误: {0}")]
    Reference(String),

    #[error("未知枚举值: {kind} = {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("无效状态转换: 从 {from} 到 {event}")]
    InvalidStateTransition { from: String, event: String },
}

/// 医院系统统一结果类型
pub type Result<T> = std::result::Result<T, HospitalError>;

/// 结构校验失败：缺少必填字段或基本类型不匹配
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("验证错误 ({entity}): {}", DisplayIssues(.issues))]
pub struct ValidationError {
    pub entity: &'static str,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(entity: &'static str, issues: Vec<FieldIssue>) -> Self {
        Self { entity, issues }
    }

    /// 某字段是否出现在问题列表中
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

/// 单个字段的校验问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: Problem,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, problem: Problem) -> Self {
        Self {
            field: field.into(),
            problem,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// 必填字段缺失
    Missing,
    /// 非空字段收到 null
    Null,
    /// 基本类型不匹配
    WrongType {
        expected: FieldType,
        found: &'static str,
    },
    /// 输入不是 JSON 对象
    NotAnObject,
    /// 结构正确但无法解码为目标类型
    Malformed(String),
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::Missing => write!(f, "{}: 缺少必填字段", self.field),
            Problem::Null => write!(f, "{}: 不允许为 null", self.field),
            Problem::WrongType { expected, found } => {
                write!(f, "{}: 期望 {}, 实际为 {}", self.field, expected, found)
            }
            Problem::NotAnObject => write!(f, "输入必须是 JSON 对象"),
            Problem::Malformed(reason) => write!(f, "{}: {}", self.field, reason),
        }
    }
}

struct DisplayIssues<'a>(&'a [FieldIssue]);

impl fmt::Display for DisplayIssues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}
