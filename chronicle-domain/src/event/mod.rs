//! 事件分类器（Event Classifier）
//!
//! 针对一次实体变更决定「是否值得记录」、计算可记录差异与对象快照、
//! 合并元数据，并产出可持久化的版本记录：
//! - `base`：三类事件共享的判定与装配逻辑；
//! - `create` / `update` / `destroy`：各事件类别的载荷差异。

mod base;
mod create;
mod destroy;
mod update;

pub use base::{EventBase, EventKind};
pub use create::CreateEvent;
pub use destroy::DestroyEvent;
pub use update::UpdateEvent;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeMap, AttributeValue};
    use crate::change_set::ChangeSet;
    use crate::config::AuditConfig;
    use crate::context::RecordingContext;
    use crate::entity::Trackable;
    use crate::error::{AuditError, AuditResult};
    use crate::options::{IgnoreRule, MetaValue, VersionOptions};
    use crate::persist::SlotProfile;

    struct Gadget {
        id: String,
        name: Option<String>,
        color: Option<String>,
        committed: AttributeMap,
    }

    impl Gadget {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                name: None,
                color: None,
                committed: AttributeMap::new(),
            }
        }

        fn attrs(&self) -> AttributeMap {
            let mut attributes = AttributeMap::new();
            attributes.insert("id".into(), self.id.clone().into());
            attributes.insert("name".into(), self.name.clone().into());
            attributes.insert("color".into(), self.color.clone().into());
            attributes
        }

        /// 模拟一次落库：当前值成为已提交值
        fn mark_saved(&mut self) {
            self.committed = self.attrs();
        }
    }

    impl Trackable for Gadget {
        fn audit_type(&self) -> &str {
            "Gadget"
        }
        fn audit_id(&self) -> String {
            self.id.clone()
        }
        fn current_attributes(&self) -> AttributeMap {
            self.attrs()
        }
        fn attribute_in_storage(&self, name: &str) -> Option<AttributeValue> {
            self.committed.get(name).cloned()
        }
    }

    fn update_event<'a>(
        entity: &'a Gadget,
        changes: ChangeSet,
        options: &'a VersionOptions,
        config: &'a AuditConfig,
        context: &'a RecordingContext,
    ) -> UpdateEvent<'a> {
        UpdateEvent::new(
            entity,
            changes,
            options,
            config,
            context,
            SlotProfile::structured(),
            false,
            true,
            None,
        )
    }

    #[test]
    fn ignored_only_update_is_not_notable() {
        let mut gadget = Gadget::new("g-1");
        gadget.color = Some("red".into());
        gadget.mark_saved();

        let mut changes = ChangeSet::new();
        changes.record("color", "red", "blue");

        let options = VersionOptions::builder()
            .ignore(vec![IgnoreRule::name("color")])
            .build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        assert!(!event.notable());
    }

    #[test]
    fn ignored_plus_notable_update_records_without_the_ignored_key() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());
        gadget.color = Some("blue".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");
        changes.record("color", "red", "blue");

        let options = VersionOptions::builder()
            .ignore(vec![IgnoreRule::name("color")])
            .build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        assert!(event.notable());

        let record = event.data().unwrap();
        let diff = record.object_changes().unwrap().as_object().unwrap();
        assert!(diff.contains_key("name"));
        assert!(!diff.contains_key("color"));
    }

    #[test]
    fn conditional_ignore_only_applies_when_predicate_holds() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.color = Some("blue".into());

        let mut changes = ChangeSet::new();
        changes.record("color", "red", "blue");

        // 谓词不成立：规则不生效，颜色变更可记录
        let options = VersionOptions::builder()
            .ignore(vec![IgnoreRule::when("color", |entity| {
                entity.current_attributes().get("name") != Some(&AttributeValue::Null)
            })])
            .build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        assert!(event.notable());
    }

    #[test]
    fn only_allowlist_restricts_the_diff() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());
        gadget.color = Some("blue".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");
        changes.record("color", "red", "blue");

        let options = VersionOptions::builder().only(vec!["name".into()]).build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        assert!(event.notable());

        let record = event.data().unwrap();
        let diff = record.object_changes().unwrap().as_object().unwrap();
        assert_eq!(diff.keys().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn skipped_attributes_leave_both_slots() {
        let mut gadget = Gadget::new("g-1");
        gadget.color = Some("red".into());
        gadget.mark_saved();
        gadget.name = Some("bugle".into());
        gadget.color = Some("blue".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");
        changes.record("color", "red", "blue");

        let options = VersionOptions::builder().skip(vec!["color".into()]).build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        let record = event.data().unwrap();

        let diff = record.object_changes().unwrap().as_object().unwrap();
        assert!(!diff.contains_key("color"));

        let object = record.object().unwrap().as_object().unwrap();
        assert!(!object.contains_key("color"));
        assert!(object.contains_key("name"));
    }

    #[test]
    fn pure_timestamp_touch_is_not_notable() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();

        let mut changes = ChangeSet::new();
        changes.record(
            "updated_at",
            "2024-05-01T00:00:00.000000Z",
            "2024-05-02T00:00:00.000000Z",
        );

        let options = VersionOptions::default();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = UpdateEvent::new(
            &gadget,
            changes,
            &options,
            &config,
            &context,
            SlotProfile::structured(),
            true,
            true,
            None,
        );
        assert!(!event.notable());
    }

    #[test]
    fn touch_with_other_changes_still_records() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");
        changes.record(
            "updated_at",
            "2024-05-01T00:00:00.000000Z",
            "2024-05-02T00:00:00.000000Z",
        );

        let options = VersionOptions::default();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = UpdateEvent::new(
            &gadget,
            changes,
            &options,
            &config,
            &context,
            SlotProfile::structured(),
            true,
            true,
            None,
        );
        assert!(event.notable());
    }

    #[test]
    fn create_stores_only_the_diff() {
        let mut gadget = Gadget::new("g-1");
        gadget.name = Some("flugel".into());

        let mut changes = ChangeSet::new();
        changes.record("id", AttributeValue::Null, "g-1");
        changes.record("name", AttributeValue::Null, "flugel");

        let options = VersionOptions::default();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = CreateEvent::new(
            &gadget,
            changes,
            &options,
            &config,
            &context,
            SlotProfile::structured(),
        );
        assert!(event.notable());

        let record = event.data().unwrap();
        assert_eq!(record.event(), "create");
        assert!(record.object().is_none());
        assert_eq!(
            record.object_changes().unwrap(),
            &serde_json::json!({"id": [null, "g-1"], "name": [null, "flugel"]})
        );
    }

    #[test]
    fn destroy_stores_only_the_committed_snapshot() {
        let mut gadget = Gadget::new("g-1");
        gadget.name = Some("flugel".into());
        gadget.mark_saved();

        let options = VersionOptions::default();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = DestroyEvent::new(
            &gadget,
            &options,
            &config,
            &context,
            SlotProfile::structured(),
        );
        assert!(event.notable());

        let record = event.data().unwrap();
        assert_eq!(record.event(), "destroy");
        assert!(record.object_changes().is_none());
        assert_eq!(
            record.object().unwrap(),
            &serde_json::json!({"id": "g-1", "name": "flugel", "color": null})
        );
    }

    #[test]
    fn forced_changes_replace_the_computed_diff() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();

        let mut forced = ChangeSet::new();
        forced.record("counter", 1i64, 2i64);

        let options = VersionOptions::builder().only(vec!["name".into()]).build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = UpdateEvent::new(
            &gadget,
            ChangeSet::new(),
            &options,
            &config,
            &context,
            SlotProfile::structured(),
            false,
            false,
            Some(forced),
        );
        // 调用方已整理差异：即便不匹配 only 白名单也记录
        assert!(event.notable());

        let record = event.data().unwrap();
        assert_eq!(
            record.object_changes().unwrap(),
            &serde_json::json!({"counter": [1, 2]})
        );
    }

    #[test]
    fn save_changes_disabled_omits_the_diff_slot() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");

        let options = VersionOptions::builder().save_changes(false).build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        let record = event.data().unwrap();
        assert!(record.object_changes().is_none());
        assert!(record.object().is_some());
    }

    #[test]
    fn metadata_attribute_reference_resolves_to_the_before_value() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");

        let options = VersionOptions::builder()
            .meta(vec![
                ("answer".into(), MetaValue::Literal(serde_json::json!(42))),
                ("label".into(), MetaValue::Attribute("name".into())),
            ])
            .build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        let record = event.data().unwrap();
        assert_eq!(record.metadata_value("answer"), Some(&serde_json::json!(42)));
        // 更新事件里属性引用解析为变更前值
        assert_eq!(
            record.metadata_value("label"),
            Some(&serde_json::json!("flugel"))
        );
    }

    #[test]
    fn context_metadata_overrides_model_metadata() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");

        let options = VersionOptions::builder()
            .meta(vec![(
                "source".into(),
                MetaValue::Literal(serde_json::json!("model")),
            )])
            .build();
        let config = AuditConfig::default();

        let mut extra = serde_json::Map::new();
        extra.insert("source".into(), serde_json::json!("request"));
        let context = RecordingContext::builder()
            .maybe_whodunnit(Some("u-1".into()))
            .metadata(extra)
            .build();

        let event = update_event(&gadget, changes, &options, &config, &context);
        let record = event.data().unwrap();
        assert_eq!(record.whodunnit(), Some("u-1"));
        assert_eq!(
            record.metadata_value("source"),
            Some(&serde_json::json!("request"))
        );
    }

    #[test]
    fn failing_meta_provider_aborts_the_event() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");

        fn boom(_entity: &dyn Trackable) -> AuditResult<serde_json::Value> {
            Err(AuditError::Metadata {
                key: "broken".into(),
                reason: "boom".into(),
            })
        }

        let options = VersionOptions::builder()
            .meta(vec![("broken".into(), MetaValue::computed(boom))])
            .build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        let err = event.data().unwrap_err();
        match err {
            AuditError::Metadata { key, .. } => assert_eq!(key, "broken"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_metadata_attribute_is_fail_closed() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");

        let options = VersionOptions::builder()
            .meta(vec![("ghost".into(), MetaValue::Attribute("ghost".into()))])
            .build();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        assert!(matches!(
            event.data().unwrap_err(),
            AuditError::Metadata { .. }
        ));
    }

    #[test]
    fn diff_adapter_rewrites_changes_but_never_the_object() {
        use crate::diff_adapter::DiffAdapter;
        use std::sync::Arc;

        struct DropColor;
        impl DiffAdapter for DropColor {
            fn transform(&self, changes: ChangeSet) -> ChangeSet {
                changes
                    .into_iter()
                    .filter(|(name, _)| name != "color")
                    .collect()
            }
        }

        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());
        gadget.color = Some("blue".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");
        changes.record("color", "red", "blue");

        let options = VersionOptions::default();
        let config = AuditConfig::default().with_diff_adapter(Arc::new(DropColor));
        let context = RecordingContext::default();

        let event = update_event(&gadget, changes, &options, &config, &context);
        let record = event.data().unwrap();

        let diff = record.object_changes().unwrap().as_object().unwrap();
        assert!(!diff.contains_key("color"));
        assert!(diff.contains_key("name"));

        // 适配器只作用于差异，对象快照不受影响
        let object = record.object().unwrap().as_object().unwrap();
        assert!(object.contains_key("color"));
    }

    #[test]
    fn absent_slots_omit_payload_keys_entirely() {
        let mut gadget = Gadget::new("g-1");
        gadget.mark_saved();
        gadget.name = Some("bugle".into());

        let mut changes = ChangeSet::new();
        changes.record("name", "flugel", "bugle");

        let options = VersionOptions::default();
        let config = AuditConfig::default();
        let context = RecordingContext::default();

        let event = UpdateEvent::new(
            &gadget,
            changes,
            &options,
            &config,
            &context,
            SlotProfile::new(None, None),
            false,
            true,
            None,
        );
        let record = event.data().unwrap();
        assert!(record.object().is_none());
        assert!(record.object_changes().is_none());
    }
}
