//! 差异适配器（可选扩展点）
//!
//! 在差异序列化前对前后值映射做重写（如丢弃冗余精度、转换差异表示）。
//! 纯函数；仅作用于 `object_changes`，从不作用于 `object` 快照。
//!
use crate::change_set::ChangeSet;
use std::sync::Arc;

/// 差异重写扩展点
pub trait DiffAdapter: Send + Sync {
    fn transform(&self, changes: ChangeSet) -> ChangeSet;
}

impl<T> DiffAdapter for Arc<T>
where
    T: DiffAdapter + ?Sized,
{
    fn transform(&self, changes: ChangeSet) -> ChangeSet {
        (**self).transform(changes)
    }
}
