//! 更新事件
//!
//! 在基类之外的额外输入：
//! - `is_touch`：仅时间戳刷新的更新；
//! - `in_after_callback`：事件在变更生效后触发，可用细粒度前值；
//! - `force_changes`：调用方绕过脏值跟踪（如批量列更新）时显式提供
//!   的差异，整体替换计算差异并跳过可记录性过滤。
//!
use crate::attribute::AttributeMap;
use crate::change_set::ChangeSet;
use crate::config::AuditConfig;
use crate::context::RecordingContext;
use crate::entity::Trackable;
use crate::error::AuditResult;
use crate::options::VersionOptions;
use crate::persist::{SlotProfile, VersionRecord};

use super::base::{EventBase, EventKind};

pub struct UpdateEvent<'a> {
    base: EventBase<'a>,
    is_touch: bool,
    in_after_callback: bool,
    force_changes: Option<ChangeSet>,
}

impl<'a> UpdateEvent<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity: &'a dyn Trackable,
        changes: ChangeSet,
        options: &'a VersionOptions,
        config: &'a AuditConfig,
        context: &'a RecordingContext,
        slots: SlotProfile,
        is_touch: bool,
        in_after_callback: bool,
        force_changes: Option<ChangeSet>,
    ) -> Self {
        Self {
            base: EventBase::new(
                EventKind::Update,
                entity,
                changes,
                options,
                config,
                context,
                slots,
            ),
            is_touch,
            in_after_callback,
            force_changes,
        }
    }

    /// 更新是否值得记录
    ///
    /// 强制差异总是记录；纯时间戳刷新不记录；其余走基类判定。
    pub fn notable(&self) -> bool {
        if self.force_changes.is_some() {
            return true;
        }
        if self.is_touch && self.timestamps_only_refresh() {
            return false;
        }
        self.base.changed_notably()
    }

    /// 产出可持久化载荷
    pub fn data(&self) -> AuditResult<VersionRecord> {
        let object = self
            .base
            .recordable_object(self.attributes_before_change())?;
        let object_changes = match &self.force_changes {
            Some(forced) => self.base.recordable_forced_changes(forced)?,
            None => self.base.recordable_changes()?,
        };
        self.base.build_record(object, object_changes)
    }

    /// 本次刷新是否只动了实体自身的时间戳维护属性
    fn timestamps_only_refresh(&self) -> bool {
        let timestamps = self.base.entity().timestamp_attributes();
        !self.base.changes().is_empty()
            && self
                .base
                .changes()
                .changed_names()
                .into_iter()
                .all(|name| timestamps.contains(&name))
    }

    /// 事件「之前」属性快照
    ///
    /// 变更已生效且非 touch 时，可用变更集里的细粒度前值；否则回退为
    /// 存储中已提交的值（销毁式时机或 touch 没有更细的「之前」可用）。
    fn attributes_before_change(&self) -> AttributeMap {
        let fine_grained = self.in_after_callback && !self.is_touch;
        self.base
            .entity()
            .current_attributes()
            .into_iter()
            .map(|(name, current)| {
                let before = if fine_grained {
                    self.base.changes().before(&name).cloned()
                } else {
                    self.base.entity().attribute_in_storage(&name)
                };
                (name, before.unwrap_or(current))
            })
            .collect()
    }
}
