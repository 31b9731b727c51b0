//! 字段变更与变更集
//!
//! `FieldChanged` 封装单个属性的前后值；`ChangeSet` 是一次事件内由外部
//! 脏值跟踪子系统提供的「属性名 → 前后值」映射，仅存活于单次事件处理
//! 期间。
//!
use crate::attribute::AttributeValue;
use serde_json::Value;
use std::collections::BTreeMap;

/// 字段变更封装，包含变更前后值
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChanged {
    pub before: AttributeValue,
    pub after: AttributeValue,
}

impl FieldChanged {
    pub fn new(before: AttributeValue, after: AttributeValue) -> Self {
        Self { before, after }
    }

    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }

    /// 存储形态：`[before, after]` 二元组
    pub fn to_storable(&self) -> Value {
        Value::Array(vec![self.before.to_storable(), self.after.to_storable()])
    }
}

/// 一次事件的变更集（属性名 → 前后值），按名称有序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    changes: BTreeMap<String, FieldChanged>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个属性的前后值
    pub fn record(
        &mut self,
        name: impl Into<String>,
        before: impl Into<AttributeValue>,
        after: impl Into<AttributeValue>,
    ) {
        self.changes
            .insert(name.into(), FieldChanged::new(before.into(), after.into()));
    }

    pub fn get(&self, name: &str) -> Option<&FieldChanged> {
        self.changes.get(name)
    }

    /// 属性的变更前值
    pub fn before(&self, name: &str) -> Option<&AttributeValue> {
        self.changes.get(name).map(|change| &change.before)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.changes.contains_key(name)
    }

    /// 本次事件内发生变更的属性名
    pub fn changed_names(&self) -> Vec<&str> {
        self.changes.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldChanged)> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// 过滤出指定属性名集合的子集
    pub fn select(&self, names: &[String]) -> ChangeSet {
        self.changes
            .iter()
            .filter(|(name, _)| names.iter().any(|wanted| wanted == *name))
            .map(|(name, change)| (name.clone(), change.clone()))
            .collect()
    }
}

impl FromIterator<(String, FieldChanged)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (String, FieldChanged)>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, FieldChanged);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldChanged>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
