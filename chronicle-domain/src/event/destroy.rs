//! 销毁事件
//!
//! 销毁没有「之后」：只存移除前的完整属性快照（取已提交值），
//! 不计算差异。销毁总是值得记录。
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

pub struct DestroyEvent<'a> {
    base: EventBase<'a>,
}

impl<'a> DestroyEvent<'a> {
    pub fn new(
        entity: &'a dyn Trackable,
        options: &'a VersionOptions,
        config: &'a AuditConfig,
        context: &'a RecordingContext,
        slots: SlotProfile,
    ) -> Self {
        Self {
            base: EventBase::new(
                EventKind::Destroy,
                entity,
                ChangeSet::new(),
                options,
                config,
                context,
                slots,
            ),
        }
    }

    /// 销毁总是值得记录
    pub fn notable(&self) -> bool {
        true
    }

    /// 产出可持久化载荷
    pub fn data(&self) -> AuditResult<VersionRecord> {
        let object = self.base.recordable_object(self.committed_attributes())?;
        self.base.build_record(object, None)
    }

    /// 移除前的已提交属性值
    fn committed_attributes(&self) -> AttributeMap {
        self.base
            .entity()
            .current_attributes()
            .into_iter()
            .map(|(name, current)| {
                let committed = self.base.entity().attribute_in_storage(&name);
                (name, committed.unwrap_or(current))
            })
            .collect()
    }
}
