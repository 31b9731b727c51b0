//! 属性序列化
//!
//! 属性快照与差异在写入存储槽位前的序列化策略：
//! - 结构化槽位（原生 map/JSON 列）：逐字段规范化后按对象树写入；
//! - 文本槽位：整体经 `ObjectCodec` 编码为文本（默认 JSON，可插拔）。
//!
//! 槽位形态需要一次存储层内省才能确定，由调用方按实体类型缓存
//! （见 application 层的记录器）。
//!
use crate::attribute::{AttributeMap, AttributeValue};
use crate::change_set::ChangeSet;
use crate::error::{AuditError, AuditResult};
use serde_json::{Map, Value};
use std::sync::Arc;

/// 存储槽位形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFormat {
    /// 结构化（原生 map/JSON）槽位
    Structured,
    /// 文本槽位，需显式编解码
    Text,
}

/// 对象编解码器，文本槽位写入与文本载荷回读使用
pub trait ObjectCodec: Send + Sync {
    fn encode(&self, value: &Value) -> AuditResult<String>;

    fn decode(&self, raw: &str) -> AuditResult<Value>;
}

impl<T> ObjectCodec for Arc<T>
where
    T: ObjectCodec + ?Sized,
{
    fn encode(&self, value: &Value) -> AuditResult<String> {
        (**self).encode(value)
    }

    fn decode(&self, raw: &str) -> AuditResult<Value> {
        (**self).decode(raw)
    }
}

/// 默认编解码器：人类可读的 JSON 文本
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl ObjectCodec for JsonCodec {
    fn encode(&self, value: &Value) -> AuditResult<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, raw: &str) -> AuditResult<Value> {
        Ok(serde_json::from_str(raw)?)
    }
}

fn attributes_to_value(attributes: &AttributeMap) -> Value {
    let entries: Map<String, Value> = attributes
        .iter()
        .map(|(name, value)| (name.clone(), value.to_storable()))
        .collect();
    Value::Object(entries)
}

fn changes_to_value(changes: &ChangeSet) -> Value {
    let entries: Map<String, Value> = changes
        .iter()
        .map(|(name, change)| (name.clone(), change.to_storable()))
        .collect();
    Value::Object(entries)
}

/// 序列化属性快照到目标槽位形态
pub fn serialize_attributes(
    attributes: &AttributeMap,
    format: SlotFormat,
    codec: &dyn ObjectCodec,
) -> AuditResult<Value> {
    let value = attributes_to_value(attributes);
    match format {
        SlotFormat::Structured => Ok(value),
        SlotFormat::Text => Ok(Value::String(codec.encode(&value)?)),
    }
}

/// 序列化差异到目标槽位形态
pub fn serialize_changes(
    changes: &ChangeSet,
    format: SlotFormat,
    codec: &dyn ObjectCodec,
) -> AuditResult<Value> {
    let value = changes_to_value(changes);
    match format {
        SlotFormat::Structured => Ok(value),
        SlotFormat::Text => Ok(Value::String(codec.encode(&value)?)),
    }
}

/// 从存储载荷还原属性快照
///
/// 载荷损坏视为数据损坏错误，不返回部分解码结果。
pub fn deserialize_attributes(
    stored: &Value,
    codec: &dyn ObjectCodec,
) -> AuditResult<AttributeMap> {
    let decoded;
    let object = match stored {
        Value::String(raw) => {
            decoded = codec.decode(raw)?;
            &decoded
        }
        other => other,
    };

    match object {
        Value::Object(entries) => Ok(entries
            .iter()
            .map(|(name, value)| (name.clone(), AttributeValue::from_storable(value)))
            .collect()),
        _ => Err(AuditError::CorruptedPayload {
            reason: "object payload is not a map".into(),
        }),
    }
}
