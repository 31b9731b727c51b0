//! 创建事件
//!
//! 创建没有「之前」可存：只记录完整初始可记录差异（每个属性的前值
//! 视为缺省），不写对象快照。可记录性基于创建后变更集判定。
//!
use crate::change_set::ChangeSet;
use crate::config::AuditConfig;
use crate::context::RecordingContext;
use crate::entity::Trackable;
use crate::error::AuditResult;
use crate::options::VersionOptions;
use crate::persist::{SlotProfile, VersionRecord};

use super::base::{EventBase, EventKind};

pub struct CreateEvent<'a> {
    base: EventBase<'a>,
}

impl<'a> CreateEvent<'a> {
    pub fn new(
        entity: &'a dyn Trackable,
        changes: ChangeSet,
        options: &'a VersionOptions,
        config: &'a AuditConfig,
        context: &'a RecordingContext,
        slots: SlotProfile,
    ) -> Self {
        Self {
            base: EventBase::new(
                EventKind::Create,
                entity,
                changes,
                options,
                config,
                context,
                slots,
            ),
        }
    }

    /// 创建是否值得记录
    pub fn notable(&self) -> bool {
        self.base.changed_notably()
    }

    /// 产出可持久化载荷
    pub fn data(&self) -> AuditResult<VersionRecord> {
        let object_changes = self.base.recordable_changes()?;
        self.base.build_record(None, object_changes)
    }
}
