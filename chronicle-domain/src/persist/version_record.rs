//! 版本记录（VersionRecord）
//!
//! 事件分类产出的标准载荷，同时是存储层的行形态。`object` 与
//! `object_changes` 槽位缺失或被禁用时整键省略（而非置空）。
//! 构造后不可变，随即交由外部存储层持久化。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct VersionRecord {
    /// 实体类型（单表继承下为基类名）
    item_type: String,
    /// 实体标识
    item_id: String,
    /// 事件标签（create/update/destroy 或自定义）
    event: String,
    /// 操作者标识
    whodunnit: Option<String>,
    /// 记录时间
    created_at: Option<DateTime<Utc>>,
    /// 事件前完整属性快照（创建事件不存）
    #[serde(skip_serializing_if = "Option::is_none")]
    object: Option<Value>,
    /// 可记录差异（销毁事件不存）
    #[serde(skip_serializing_if = "Option::is_none")]
    object_changes: Option<Value>,
    /// 附加元数据列
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    metadata: Map<String, Value>,
}

impl VersionRecord {
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn whodunnit(&self) -> Option<&str> {
        self.whodunnit.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn object(&self) -> Option<&Value> {
        self.object.as_ref()
    }

    pub fn object_changes(&self) -> Option<&Value> {
        self.object_changes.as_ref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slots_are_omitted_from_the_serialized_row() {
        let record = VersionRecord::builder()
            .item_type("Widget".to_string())
            .item_id("w-1".to_string())
            .event("create".to_string())
            .maybe_whodunnit(Some("u-1".into()))
            .maybe_created_at(None)
            .maybe_object(None)
            .object_changes(serde_json::json!({"name": [null, "flugel"]}))
            .build();

        let row = serde_json::to_value(&record).unwrap();
        let row = row.as_object().unwrap();
        assert!(!row.contains_key("object"));
        assert!(row.contains_key("object_changes"));
        assert_eq!(row["whodunnit"], serde_json::json!("u-1"));
    }
}
