//! 版本记录器（Version Recorder）
//!
//! 编排一次实体变更的完整记录流程：构建事件分类器 → 判定可记录性 →
//! 装配版本记录 → 交存储层插入。不值得记录时直接返回 `None`。
//!
//! 槽位画像需要存储层内省，按实体类型只做一次并缓存于进程生命周期。
//! 任一环节失败都发生在插入之前：被放弃的载荷不会部分落库。
//!
use crate::error::AppError;
use chronicle_domain::{
    change_set::ChangeSet,
    config::AuditConfig,
    context::RecordingContext,
    entity::Trackable,
    event::{CreateEvent, DestroyEvent, UpdateEvent},
    options::VersionOptions,
    persist::{SlotProfile, VersionRecord, VersionStore},
};
use dashmap::DashMap;
use std::sync::Arc;

/// 版本记录编排服务
pub struct VersionRecorder<S> {
    store: Arc<S>,
    config: AuditConfig,
    slot_profiles: DashMap<String, SlotProfile>,
}

impl<S> VersionRecorder<S>
where
    S: VersionStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, AuditConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: AuditConfig) -> Self {
        Self {
            store,
            config,
            slot_profiles: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// 槽位画像：每实体类型一次内省，之后复用缓存
    fn slots_for(&self, item_type: &str) -> SlotProfile {
        *self
            .slot_profiles
            .entry(item_type.to_string())
            .or_insert_with(|| SlotProfile::from_store(self.store.as_ref()))
    }

    /// 记录创建事件；不值得记录时返回 `None`
    pub async fn record_create(
        &self,
        entity: &dyn Trackable,
        changes: ChangeSet,
        options: &VersionOptions,
        context: &RecordingContext,
    ) -> Result<Option<VersionRecord>, AppError> {
        let slots = self.slots_for(entity.audit_type());
        let event = CreateEvent::new(entity, changes, options, &self.config, context, slots);
        if !event.notable() {
            return Ok(None);
        }
        let record = event.data()?;
        self.store.insert(record.clone()).await?;
        Ok(Some(record))
    }

    /// 记录更新事件
    ///
    /// 纯时间戳刷新或仅忽略属性变更不产生版本；`force_changes` 整体
    /// 替换计算差异并跳过可记录性过滤。
    pub async fn record_update(
        &self,
        entity: &dyn Trackable,
        changes: ChangeSet,
        is_touch: bool,
        in_after_callback: bool,
        force_changes: Option<ChangeSet>,
        options: &VersionOptions,
        context: &RecordingContext,
    ) -> Result<Option<VersionRecord>, AppError> {
        let slots = self.slots_for(entity.audit_type());
        let event = UpdateEvent::new(
            entity,
            changes,
            options,
            &self.config,
            context,
            slots,
            is_touch,
            in_after_callback,
            force_changes,
        );
        if !event.notable() {
            return Ok(None);
        }
        let record = event.data()?;
        self.store.insert(record.clone()).await?;
        Ok(Some(record))
    }

    /// 记录销毁事件（总是记录）
    pub async fn record_destroy(
        &self,
        entity: &dyn Trackable,
        options: &VersionOptions,
        context: &RecordingContext,
    ) -> Result<Option<VersionRecord>, AppError> {
        let slots = self.slots_for(entity.audit_type());
        let event = DestroyEvent::new(entity, options, &self.config, context, slots);
        let record = event.data()?;
        self.store.insert(record.clone()).await?;
        Ok(Some(record))
    }
}
