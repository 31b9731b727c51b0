//! 审计装配配置
//!
//! 进程内显式装配的编解码器与差异适配器。不使用全局可变单例，
//! 由调用方构造后随记录器/重建调用传入。
//!
use crate::diff_adapter::DiffAdapter;
use crate::serializer::{JsonCodec, ObjectCodec};
use std::fmt;
use std::sync::Arc;

/// 审计核心的装配配置
#[derive(Clone)]
pub struct AuditConfig {
    codec: Arc<dyn ObjectCodec>,
    diff_adapter: Option<Arc<dyn DiffAdapter>>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            codec: Arc::new(JsonCodec),
            diff_adapter: None,
        }
    }
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 替换对象编解码器
    pub fn with_codec(mut self, codec: Arc<dyn ObjectCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// 配置差异适配器
    pub fn with_diff_adapter(mut self, adapter: Arc<dyn DiffAdapter>) -> Self {
        self.diff_adapter = Some(adapter);
        self
    }

    pub fn codec(&self) -> &dyn ObjectCodec {
        self.codec.as_ref()
    }

    pub fn diff_adapter(&self) -> Option<&dyn DiffAdapter> {
        self.diff_adapter.as_deref()
    }
}

impl fmt::Debug for AuditConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditConfig")
            .field("diff_adapter", &self.diff_adapter.is_some())
            .finish()
    }
}
