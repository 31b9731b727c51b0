//! 事件基类：三类事件共享的判定与装配逻辑
//!
//! - 可记录性：`changed_and_not_ignored` → `notably_changed` →
//!   `changed_notably`；
//! - 差异：可记录变更 →（可选）差异适配器 → 序列化；
//! - 快照：事件「之前」属性集剔除 `skip` 后序列化；
//! - 元数据：模型 `meta` 按声明序求值，请求侧元数据最后合并，
//!   键冲突时覆盖。
//!
use crate::attribute::AttributeMap;
use crate::change_set::ChangeSet;
use crate::config::AuditConfig;
use crate::context::RecordingContext;
use crate::entity::Trackable;
use crate::error::{AuditError, AuditResult};
use crate::options::{MetaValue, VersionOptions};
use crate::persist::{SlotProfile, VersionRecord};
use crate::serializer::{SlotFormat, serialize_attributes, serialize_changes};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// 事件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Create,
    Update,
    Destroy,
}

impl EventKind {
    /// 默认事件标签
    pub fn default_label(&self) -> &'static str {
        match self {
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::Destroy => "destroy",
        }
    }
}

/// 三类事件共享的状态与逻辑
pub struct EventBase<'a> {
    kind: EventKind,
    entity: &'a dyn Trackable,
    changes: ChangeSet,
    options: &'a VersionOptions,
    config: &'a AuditConfig,
    context: &'a RecordingContext,
    slots: SlotProfile,
    occurred_at: DateTime<Utc>,
}

impl<'a> EventBase<'a> {
    pub fn new(
        kind: EventKind,
        entity: &'a dyn Trackable,
        changes: ChangeSet,
        options: &'a VersionOptions,
        config: &'a AuditConfig,
        context: &'a RecordingContext,
        slots: SlotProfile,
    ) -> Self {
        Self {
            kind,
            entity,
            changes,
            options,
            config,
            context,
            slots,
            occurred_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub(crate) fn entity(&self) -> &dyn Trackable {
        self.entity
    }

    pub(crate) fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// 事件标签：实体自定义优先
    pub fn event_label(&self) -> String {
        self.entity
            .custom_event_label()
            .unwrap_or_else(|| self.kind.default_label().to_string())
    }

    /// 对当前实体生效的忽略属性名（含 skip）
    fn ignored_names(&self) -> HashSet<&str> {
        let mut names: HashSet<&str> = self
            .options
            .ignore()
            .iter()
            .filter(|rule| rule.applies(self.entity))
            .map(|rule| rule.attribute())
            .collect();
        names.extend(self.options.skip().iter().map(String::as_str));
        names
    }

    /// 发生变更且未被忽略/跳过的属性
    fn changed_and_not_ignored(&self) -> Vec<String> {
        let ignored = self.ignored_names();
        self.changes
            .changed_names()
            .into_iter()
            .filter(|name| !ignored.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// 可记录变更（`only` 白名单非空时取交集）
    pub fn notably_changed(&self) -> Vec<String> {
        let changed = self.changed_and_not_ignored();
        if self.options.only().is_empty() {
            changed
        } else {
            changed
                .into_iter()
                .filter(|name| self.options.only().iter().any(|wanted| wanted == name))
                .collect()
        }
    }

    /// 是否有被忽略/跳过的属性发生了变更
    fn ignored_attr_changed(&self) -> bool {
        let ignored = self.ignored_names();
        self.changes
            .changed_names()
            .into_iter()
            .any(|name| ignored.contains(name))
    }

    /// 本次变更是否值得记录
    ///
    /// 仅忽略属性变化的更新不触发版本；忽略属性变化伴随其他可记录变更
    /// 时，还需可记录变更不全是实体自身的时间戳维护属性。
    pub fn changed_notably(&self) -> bool {
        if self.ignored_attr_changed() {
            let timestamps = self.entity.timestamp_attributes();
            self.notably_changed()
                .iter()
                .any(|name| !timestamps.contains(&name.as_str()))
        } else {
            !self.notably_changed().is_empty()
        }
    }

    /// 可记录差异：过滤 → 适配 → 序列化；槽位缺失或禁用时整键省略
    pub(crate) fn recordable_changes(&self) -> AuditResult<Option<Value>> {
        let Some(format) = self.slots.object_changes() else {
            return Ok(None);
        };
        if !self.options.save_changes() {
            return Ok(None);
        }
        let notable = self.changes.select(&self.notably_changed());
        self.serialize_diff(notable, format).map(Some)
    }

    /// 调用方已整理好的差异（强制差异路径），跳过可记录性过滤
    pub(crate) fn recordable_forced_changes(
        &self,
        forced: &ChangeSet,
    ) -> AuditResult<Option<Value>> {
        let Some(format) = self.slots.object_changes() else {
            return Ok(None);
        };
        if !self.options.save_changes() {
            return Ok(None);
        }
        self.serialize_diff(forced.clone(), format).map(Some)
    }

    fn serialize_diff(&self, changes: ChangeSet, format: SlotFormat) -> AuditResult<Value> {
        let changes = match self.config.diff_adapter() {
            Some(adapter) => adapter.transform(changes),
            None => changes,
        };
        serialize_changes(&changes, format, self.config.codec())
    }

    /// 对象快照：给定「之前」属性集，剔除 skip 后序列化；槽位缺失时省略
    pub(crate) fn recordable_object(
        &self,
        mut attributes: AttributeMap,
    ) -> AuditResult<Option<Value>> {
        let Some(format) = self.slots.object() else {
            return Ok(None);
        };
        for skipped in self.options.skip() {
            attributes.remove(skipped);
        }
        serialize_attributes(&attributes, format, self.config.codec()).map(Some)
    }

    /// 合并元数据：模型 meta 按声明序，再叠加请求侧元数据
    pub(crate) fn merged_metadata(&self) -> AuditResult<Map<String, Value>> {
        let mut merged = Map::new();
        for (key, value) in self.options.meta() {
            merged.insert(key.clone(), self.resolve_meta(key, value)?);
        }
        if let Some(extra) = self.context.metadata() {
            for (key, value) in extra {
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(merged)
    }

    fn resolve_meta(&self, key: &str, value: &MetaValue) -> AuditResult<Value> {
        match value {
            MetaValue::Literal(value) => Ok(value.clone()),
            MetaValue::Computed(provider) => provider(self.entity),
            MetaValue::Attribute(name) => {
                // 属性在本事件内变更且事件非创建时取变更前值，
                // 使元数据反映被关闭的那个版本
                if self.kind != EventKind::Create {
                    if let Some(change) = self.changes.get(name) {
                        return Ok(change.before.to_storable());
                    }
                }
                self.entity
                    .current_attributes()
                    .remove(name)
                    .map(|value| value.to_storable())
                    .ok_or_else(|| AuditError::Metadata {
                        key: key.to_string(),
                        reason: format!("no attribute named `{name}`"),
                    })
            }
        }
    }

    /// 装配版本记录；`object` / `object_changes` 由各事件类别决定
    pub(crate) fn build_record(
        &self,
        object: Option<Value>,
        object_changes: Option<Value>,
    ) -> AuditResult<VersionRecord> {
        let metadata = self.merged_metadata()?;
        Ok(VersionRecord::builder()
            .item_type(self.entity.audit_type().to_string())
            .item_id(self.entity.audit_id())
            .event(self.event_label())
            .maybe_whodunnit(self.context.whodunnit().map(str::to_string))
            .created_at(self.occurred_at)
            .maybe_object(object)
            .maybe_object_changes(object_changes)
            .metadata(metadata)
            .build())
    }
}
