//! 版本存储协议
//!
//! 外部持久化层需实现的最小契约：列内省（决定槽位是否写入及其形态）
//! 与插入。插入是异步边界；事件分类与序列化保持同步纯计算。
//!
use crate::error::AuditResult;
use crate::persist::VersionRecord;
use crate::serializer::SlotFormat;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// `object` 槽位列名
pub const OBJECT_COLUMN: &str = "object";
/// `object_changes` 槽位列名
pub const OBJECT_CHANGES_COLUMN: &str = "object_changes";

#[async_trait]
pub trait VersionStore: Send + Sync {
    /// 存储层是否存在指定列
    fn has_column(&self, name: &str) -> bool;

    /// `object` 槽位是否为结构化列
    fn object_slot_is_structured(&self) -> bool;

    /// `object_changes` 槽位是否为结构化列
    fn object_changes_slot_is_structured(&self) -> bool;

    /// 插入一条版本记录
    async fn insert(&self, record: VersionRecord) -> AuditResult<()>;

    /// 过滤出存在的列集合
    fn existing_columns(&self, names: &[&str]) -> HashSet<String> {
        names
            .iter()
            .copied()
            .filter(|name| self.has_column(name))
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl<T> VersionStore for Arc<T>
where
    T: VersionStore + ?Sized,
{
    fn has_column(&self, name: &str) -> bool {
        (**self).has_column(name)
    }

    fn object_slot_is_structured(&self) -> bool {
        (**self).object_slot_is_structured()
    }

    fn object_changes_slot_is_structured(&self) -> bool {
        (**self).object_changes_slot_is_structured()
    }

    async fn insert(&self, record: VersionRecord) -> AuditResult<()> {
        (**self).insert(record).await
    }
}

/// 槽位画像：每实体类型一次内省得到，进程生命周期内由调用方缓存复用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotProfile {
    object: Option<SlotFormat>,
    object_changes: Option<SlotFormat>,
}

impl SlotProfile {
    pub fn new(object: Option<SlotFormat>, object_changes: Option<SlotFormat>) -> Self {
        Self {
            object,
            object_changes,
        }
    }

    /// 两个槽位均为结构化列的画像
    pub fn structured() -> Self {
        Self::new(Some(SlotFormat::Structured), Some(SlotFormat::Structured))
    }

    /// 从存储内省构建
    pub fn from_store(store: &dyn VersionStore) -> Self {
        let object = store.has_column(OBJECT_COLUMN).then(|| {
            if store.object_slot_is_structured() {
                SlotFormat::Structured
            } else {
                SlotFormat::Text
            }
        });
        let object_changes = store.has_column(OBJECT_CHANGES_COLUMN).then(|| {
            if store.object_changes_slot_is_structured() {
                SlotFormat::Structured
            } else {
                SlotFormat::Text
            }
        });
        Self {
            object,
            object_changes,
        }
    }

    pub fn object(&self) -> Option<SlotFormat> {
        self.object
    }

    pub fn object_changes(&self) -> Option<SlotFormat> {
        self.object_changes
    }
}
