//! 版本化配置（Version Options）
//!
//! 按实体类型提供、核心只读的配置：
//! - `ignore`：不触发版本的属性（可带条件谓词）；若为唯一变更，仍参与
//!   判定以确认这是一次纯忽略更新；
//! - `skip`：既不触发版本、也不写入对象快照的属性；
//! - `only`：非空时将可记录变更限定在白名单内；
//! - `meta`：附加元数据列（字面量 / 属性引用 / 计算提供者）；
//! - `save_changes`：是否持久化差异列。
//!
use crate::entity::Trackable;
use crate::error::AuditResult;
use bon::Builder;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 条件忽略谓词：针对当前实体求值，仅在为真时规则生效
pub type AttributePredicate = Arc<dyn Fn(&dyn Trackable) -> bool + Send + Sync>;

/// 元数据计算提供者；失败将中止本次版本记录（fail-closed）
pub type MetaProvider = Arc<dyn Fn(&dyn Trackable) -> AuditResult<Value> + Send + Sync>;

/// 元数据取值方式
///
/// 在装配期就确定取值形态，运行期不做值类型嗅探。
#[derive(Clone)]
pub enum MetaValue {
    /// 常量
    Literal(Value),
    /// 属性引用：属性在本事件内变更且事件非创建时，解析为变更前值
    Attribute(String),
    /// 计算值
    Computed(MetaProvider),
}

impl MetaValue {
    pub fn computed<F>(provider: F) -> Self
    where
        F: Fn(&dyn Trackable) -> AuditResult<Value> + Send + Sync + 'static,
    {
        MetaValue::Computed(Arc::new(provider))
    }
}

impl fmt::Debug for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            MetaValue::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            MetaValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// 忽略规则：属性名加可选条件
#[derive(Clone)]
pub struct IgnoreRule {
    attribute: String,
    condition: Option<AttributePredicate>,
}

impl IgnoreRule {
    /// 无条件忽略
    pub fn name(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            condition: None,
        }
    }

    /// 条件忽略：谓词为真时才忽略
    pub fn when<F>(attribute: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&dyn Trackable) -> bool + Send + Sync + 'static,
    {
        Self {
            attribute: attribute.into(),
            condition: Some(Arc::new(condition)),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// 规则对当前实体是否生效
    pub fn applies(&self, entity: &dyn Trackable) -> bool {
        match &self.condition {
            None => true,
            Some(condition) => condition(entity),
        }
    }
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRule")
            .field("attribute", &self.attribute)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

/// 按实体类型的版本化配置
#[derive(Debug, Clone, Builder)]
pub struct VersionOptions {
    #[builder(default)]
    ignore: Vec<IgnoreRule>,
    #[builder(default)]
    skip: Vec<String>,
    #[builder(default)]
    only: Vec<String>,
    #[builder(default)]
    meta: Vec<(String, MetaValue)>,
    #[builder(default = true)]
    save_changes: bool,
}

impl Default for VersionOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl VersionOptions {
    pub fn ignore(&self) -> &[IgnoreRule] {
        &self.ignore
    }

    pub fn skip(&self) -> &[String] {
        &self.skip
    }

    pub fn only(&self) -> &[String] {
        &self.only
    }

    pub fn meta(&self) -> &[(String, MetaValue)] {
        &self.meta
    }

    pub fn save_changes(&self) -> bool {
        self.save_changes
    }
}
