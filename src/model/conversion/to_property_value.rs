//! ToPropertyValue trait 与基础类型实现
//!
//! 支持直接转换为 PropertyValue，避免 JSON 序列化的性能开销

use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

use crate::model::traits::PropertyValue;
use crate::types::DataValue;

/// 支持直接转换为 PropertyValue 的 trait
pub trait ToPropertyValue {
    fn to_property_value(&self) -> PropertyValue;
}

/// 为基础类型实现 ToPropertyValue
impl ToPropertyValue for String {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::String(self.clone()))
    }
}

impl ToPropertyValue for &str {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::String(self.to_string()))
    }
}

impl ToPropertyValue for bool {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::Bool(*self))
    }
}

impl ToPropertyValue for i8 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::Int(*self as i64))
    }
}

impl ToPropertyValue for i16 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::Int(*self as i64))
    }
}

impl ToPropertyValue for i32 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::Int(*self as i64))
    }
}

impl ToPropertyValue for i64 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::Int(*self))
    }
}

impl ToPropertyValue for u8 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::UInt(*self as u64))
    }
}

impl ToPropertyValue for u16 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::UInt(*self as u64))
    }
}

impl ToPropertyValue for u32 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::UInt(*self as u64))
    }
}

impl ToPropertyValue for u64 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::UInt(*self))
    }
}

impl ToPropertyValue for f32 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::Float(*self as f64))
    }
}

impl ToPropertyValue for f64 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::Float(*self))
    }
}

// 字节数组承载为文档的Bytes叶子
impl ToPropertyValue for Vec<u8> {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::Bytes(self.clone()))
    }
}

impl ToPropertyValue for DateTime<FixedOffset> {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::DateTime(*self))
    }
}

impl ToPropertyValue for DateTime<Utc> {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::DateTime(self.fixed_offset()))
    }
}

// UUID以字符串形式进入文档叶子集
impl ToPropertyValue for Uuid {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(DataValue::String(self.to_string()))
    }
}

// 已经是文档值的字段原样承载，分解时成为不动点
impl ToPropertyValue for DataValue {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Value(self.clone())
    }
}

impl<T> ToPropertyValue for Option<T>
where
    T: ToPropertyValue,
{
    fn to_property_value(&self) -> PropertyValue {
        match self {
            Some(v) => v.to_property_value(),
            None => PropertyValue::Value(DataValue::Null),
        }
    }
}

impl<T> ToPropertyValue for Box<T>
where
    T: ToPropertyValue,
{
    fn to_property_value(&self) -> PropertyValue {
        (**self).to_property_value()
    }
}
