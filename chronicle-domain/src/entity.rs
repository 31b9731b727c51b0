//! 可审计实体能力接口
//!
//! 审计核心不拥有实体，仅在事件发生时观察。类型名、标识、属性快照、
//! 已提交值与子类型判别属性等均通过该接口显式提供，不做运行期反射。
//!
use crate::attribute::{AttributeMap, AttributeValue};

/// 可审计实体在事件处理期间暴露的最小能力
pub trait Trackable: Send + Sync {
    /// 存储层类型名（单表继承场景下为基类名）
    fn audit_type(&self) -> &str;

    /// 实体标识，以文本承载
    fn audit_id(&self) -> String;

    /// 当前全部持久化属性
    fn current_attributes(&self) -> AttributeMap;

    /// 属性在存储中的已提交值；尚未持久化的实体可能没有
    fn attribute_in_storage(&self, name: &str) -> Option<AttributeValue>;

    /// 子类型判别属性名（无子类型时为 None）
    fn discriminator_attribute(&self) -> Option<&str> {
        None
    }

    /// 实体自身的时间戳维护属性
    fn timestamp_attributes(&self) -> &[&str] {
        &["created_at", "updated_at"]
    }

    /// 自定义事件标签，覆盖 create/update/destroy 默认值
    fn custom_event_label(&self) -> Option<String> {
        None
    }
}
