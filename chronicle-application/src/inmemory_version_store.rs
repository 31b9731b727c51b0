//! 基于内存的 VersionStore 实现
//!
//! - 以 (item_type, item_id) 分组按插入顺序存放版本行；
//! - 列集合与槽位形态可配置，便于验证槽位缺失与文本编码路径。
//!
use async_trait::async_trait;
use chronicle_domain::{
    error::AuditResult,
    persist::{OBJECT_CHANGES_COLUMN, OBJECT_COLUMN, VersionRecord, VersionStore},
};
use dashmap::DashMap;

pub struct InMemoryVersionStore {
    columns: Vec<String>,
    structured_object: bool,
    structured_object_changes: bool,
    rows: DashMap<(String, String), Vec<VersionRecord>>,
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::with_schema(
            [
                "item_type",
                "item_id",
                "event",
                "whodunnit",
                "created_at",
                OBJECT_COLUMN,
                OBJECT_CHANGES_COLUMN,
            ],
            true,
            true,
        )
    }
}

impl InMemoryVersionStore {
    /// 全列、结构化槽位的默认模式
    pub fn new() -> Self {
        Self::default()
    }

    /// 自定义列集合与槽位形态
    pub fn with_schema<I, C>(
        columns: I,
        structured_object: bool,
        structured_object_changes: bool,
    ) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            structured_object,
            structured_object_changes,
            rows: DashMap::new(),
        }
    }

    /// 某实体的全部版本，按插入顺序
    pub fn versions_for(&self, item_type: &str, item_id: &str) -> Vec<VersionRecord> {
        self.rows
            .get(&(item_type.to_string(), item_id.to_string()))
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    /// 全部行数
    pub fn len(&self) -> usize {
        self.rows.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VersionStore for InMemoryVersionStore {
    fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    fn object_slot_is_structured(&self) -> bool {
        self.structured_object
    }

    fn object_changes_slot_is_structured(&self) -> bool {
        self.structured_object_changes
    }

    async fn insert(&self, record: VersionRecord) -> AuditResult<()> {
        let key = (record.item_type().to_string(), record.item_id().to_string());
        self.rows.entry(key).or_default().push(record);
        Ok(())
    }
}
