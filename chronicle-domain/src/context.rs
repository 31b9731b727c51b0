//! 记录上下文
//!
//! 由调用方按逻辑操作显式传入的环境信息（操作者与请求侧元数据）。
//! 核心只读，不持有任何进程级可变状态；作用域由调用方界定。
//!
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 单次记录操作的上下文信息
#[derive(Builder, Default, Debug, Clone, Serialize, Deserialize)]
pub struct RecordingContext {
    /// 操作者标识
    whodunnit: Option<String>,

    /// 请求侧元数据；最后合并，键冲突时覆盖模型元数据
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Map<String, Value>>,
}

impl RecordingContext {
    pub fn whodunnit(&self) -> Option<&str> {
        self.whodunnit.as_deref()
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()
    }
}
