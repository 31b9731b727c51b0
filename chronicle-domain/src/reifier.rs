//! 重建（Reify）
//!
//! 从已存储的版本快照重建脱管实体实例：
//! - 解码 `object` 载荷（文本槽位经编解码器）；
//! - 判别属性优先于行类型解析具体类型（多态/子类型场景下行类型
//!   可能只记了基类名）；
//! - 逐属性写回，未知属性降级为警告（容忍记录后发生的模式漂移）；
//! - 实体仍存活时，按当前值复制其单数关联（快照本身不含关联；
//!   实体已销毁时这些关联无从恢复）。
//!
//! 产物是全新的脱管实例，不持久化，也不回链到快照。
//!
use crate::attribute::AttributeValue;
use crate::config::AuditConfig;
use crate::error::{AuditResult, UnknownAttribute};
use crate::persist::VersionRecord;
use crate::registry::TypeRegistry;
use crate::serializer::deserialize_attributes;
use std::any::Any;

/// 可从版本快照重建的实体能力
pub trait Reifiable: Send + Sync {
    /// 按名写回一个属性；未知属性返回错误，由调用方决定降级
    fn set_attribute(&mut self, name: &str, value: AttributeValue)
    -> Result<(), UnknownAttribute>;

    /// 从仍存活的实体复制当前单数关联
    fn adopt_relations(&mut self, _live: &dyn Any) {}

    /// 向下转型入口，供调用方还原具体类型
    fn as_any(&self) -> &dyn Any;
}

/// 从存储快照重建脱管实例；快照缺失 `object` 时返回 `None`
pub fn reify(
    record: &VersionRecord,
    registry: &TypeRegistry,
    config: &AuditConfig,
    live: Option<&dyn Any>,
) -> AuditResult<Option<Box<dyn Reifiable>>> {
    let Some(object) = record.object() else {
        return Ok(None);
    };

    let attributes = deserialize_attributes(object, config.codec())?;

    // 判别属性（子类型标记）优先于行上记录的基类名
    let type_name = attributes
        .get(registry.discriminator_key())
        .and_then(AttributeValue::as_text)
        .filter(|name| !name.is_empty())
        .unwrap_or(record.item_type());

    let mut instance = registry.instantiate(type_name)?;

    for (name, value) in attributes {
        if let Err(missing) = instance.set_attribute(&name, value) {
            tracing::warn!(
                item_type = record.item_type(),
                attribute = %missing.name,
                "skipping attribute with no settable field on the resolved type"
            );
        }
    }

    if let Some(live) = live {
        instance.adopt_relations(live);
    }

    Ok(Some(instance))
}
