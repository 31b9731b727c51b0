//! 审计领域统一错误定义
//!
//! 聚焦载荷序列化/解码、类型解析、元数据求值与存储边界等最小必要集合，
//! 便于在各实现层统一转换为 `AuditError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AuditError {
    // --- 序列化/载荷 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("parse error: {reason}")]
    Parse { reason: String },
    #[error("corrupted payload: {reason}")]
    CorruptedPayload { reason: String },

    // --- 重建（reify） ---
    #[error("type resolution failed: {type_name}")]
    TypeResolution { type_name: String },

    // --- 元数据 ---
    #[error("metadata provider failed: key={key}, reason={reason}")]
    Metadata { key: String, reason: String },

    // --- 存储边界 ---
    #[error("version store error: {reason}")]
    Store { reason: String },
}

/// 统一 Result 类型别名
pub type AuditResult<T> = Result<T, AuditError>;

/// 重建时写回未知属性的错误
///
/// 软失败：reifier 对单个属性降级为警告并继续，调用方单独使用时自行决定。
#[derive(Debug, Error)]
#[error("unknown attribute: {name}")]
pub struct UnknownAttribute {
    pub name: String,
}

impl UnknownAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<chrono::ParseError> for AuditError {
    fn from(err: chrono::ParseError) -> Self {
        AuditError::Parse {
            reason: err.to_string(),
        }
    }
}
