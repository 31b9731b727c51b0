//! 类型注册表
//!
//! 将类型名映射到工厂函数，在进程启动时装配。从存储行的类型名或判别
//! 属性解析具体类型时不做开放式动态查找，未注册的类型名返回类型化
//! 错误。
//!
use crate::error::{AuditError, AuditResult};
use crate::reifier::Reifiable;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 类型工厂：构造一个空白可重建实例
pub type TypeFactory = Arc<dyn Fn() -> Box<dyn Reifiable> + Send + Sync>;

/// 类型名 → 工厂 的注册表
pub struct TypeRegistry {
    factories: HashMap<String, TypeFactory>,
    discriminator_key: String,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
            discriminator_key: "type".to_string(),
        }
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 自定义判别属性键名（默认 `type`）
    pub fn with_discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator_key = key.into();
        self
    }

    /// 注册类型工厂
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Reifiable> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn discriminator_key(&self) -> &str {
        &self.discriminator_key
    }

    /// 构造指定类型的空白实例；未注册的类型名为类型化错误
    pub fn instantiate(&self, name: &str) -> AuditResult<Box<dyn Reifiable>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| AuditError::TypeResolution {
                type_name: name.to_string(),
            })?;
        Ok(factory())
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("types", &names)
            .field("discriminator_key", &self.discriminator_key)
            .finish()
    }
}

impl FromIterator<(String, TypeFactory)> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = (String, TypeFactory)>>(iter: I) -> Self {
        Self {
            factories: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Extend<(String, TypeFactory)> for TypeRegistry {
    fn extend<I: IntoIterator<Item = (String, TypeFactory)>>(&mut self, iter: I) {
        self.factories.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeValue;
    use crate::error::UnknownAttribute;
    use std::any::Any;

    #[derive(Default)]
    struct Blank;

    impl Reifiable for Blank {
        fn set_attribute(
            &mut self,
            name: &str,
            _value: AttributeValue,
        ) -> Result<(), UnknownAttribute> {
            Err(UnknownAttribute::new(name))
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn instantiate_unknown_type_is_a_typed_error() {
        let registry = TypeRegistry::new();
        let err = registry.instantiate("Ghost").err().unwrap();
        match err {
            AuditError::TypeResolution { type_name } => assert_eq!(type_name, "Ghost"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn registered_factories_resolve() {
        let mut registry = TypeRegistry::new();
        registry.register("Blank", || Box::new(Blank));
        assert!(registry.contains("Blank"));
        assert!(registry.instantiate("Blank").is_ok());
    }

    #[test]
    fn discriminator_key_is_configurable() {
        let registry = TypeRegistry::new().with_discriminator_key("species");
        assert_eq!(registry.discriminator_key(), "species");
    }
}
