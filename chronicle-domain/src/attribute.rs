//! 属性值模型
//!
//! 审计核心观察实体属性时使用的标量模型，并定义属性值与可存储表示
//! （`serde_json::Value`）之间的规范化转换：
//! - 时间类型 → RFC 3339 文本（微秒精度）；
//! - 高精度小数 → 文本；
//! - 其余类型按原生 JSON 表示存储。
//!
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// 实体属性快照（属性名 → 属性值），按名称有序以保证载荷稳定
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// 属性值
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// 高精度小数，以文本承载避免浮点精度损失
    Decimal(String),
    Text(String),
    Timestamp(DateTime<Utc>),
    /// 嵌套结构（数组/对象）
    Json(Value),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// 转换为可存储表示；仅需要规范化的类型做转换
    pub fn to_storable(&self) -> Value {
        match self {
            AttributeValue::Null => Value::Null,
            AttributeValue::Bool(flag) => Value::Bool(*flag),
            AttributeValue::Integer(number) => Value::from(*number),
            AttributeValue::Float(number) => serde_json::Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttributeValue::Decimal(decimal) => Value::String(decimal.clone()),
            AttributeValue::Text(text) => Value::String(text.clone()),
            AttributeValue::Timestamp(at) => {
                Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            AttributeValue::Json(value) => value.clone(),
        }
    }

    /// 从存储表示结构化还原
    ///
    /// 时间戳与小数以文本回读（存储表示无法区分），最终类型转换由实体侧
    /// 的 `set_attribute` 完成。
    pub fn from_storable(value: &Value) -> Self {
        match value {
            Value::Null => AttributeValue::Null,
            Value::Bool(flag) => AttributeValue::Bool(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => AttributeValue::Integer(int),
                None => AttributeValue::Float(number.as_f64().unwrap_or_default()),
            },
            Value::String(text) => AttributeValue::Text(text.clone()),
            other => AttributeValue::Json(other.clone()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(value as i64)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::Timestamp(value)
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        AttributeValue::Json(value)
    }
}

impl<T> From<Option<T>> for AttributeValue
where
    T: Into<AttributeValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}
