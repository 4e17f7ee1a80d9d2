//! 集合类型的 ToPropertyValue 实现
//!
//! 注意：不能同时有泛型Vec<T>和特定类型的实现（Vec<u8>已承载为Bytes），
//! 所以这里为常用元素类型提供特定实现。
//! 如果需要支持其他Vec类型，请添加特定的实现

use std::collections::{HashMap, HashSet};

use crate::model::traits::PropertyValue;
use crate::types::DataValue;
use super::to_property_value::ToPropertyValue;

// 为Vec<String>提供特定的实现
impl ToPropertyValue for Vec<String> {
    fn to_property_value(&self) -> PropertyValue {
        let items = self
            .iter()
            .map(|s| PropertyValue::Value(DataValue::String(s.clone())))
            .collect();
        PropertyValue::Array(items)
    }
}

// 为Vec<i32>提供特定的实现
impl ToPropertyValue for Vec<i32> {
    fn to_property_value(&self) -> PropertyValue {
        let items = self
            .iter()
            .map(|&i| PropertyValue::Value(DataValue::Int(i as i64)))
            .collect();
        PropertyValue::Array(items)
    }
}

// 为Vec<i64>提供特定的实现
impl ToPropertyValue for Vec<i64> {
    fn to_property_value(&self) -> PropertyValue {
        let items = self
            .iter()
            .map(|&i| PropertyValue::Value(DataValue::Int(i)))
            .collect();
        PropertyValue::Array(items)
    }
}

// 为Vec<f64>提供特定的实现
impl ToPropertyValue for Vec<f64> {
    fn to_property_value(&self) -> PropertyValue {
        let items = self
            .iter()
            .map(|&v| PropertyValue::Value(DataValue::Float(v)))
            .collect();
        PropertyValue::Array(items)
    }
}

// 为Vec<bool>提供特定的实现
impl ToPropertyValue for Vec<bool> {
    fn to_property_value(&self) -> PropertyValue {
        let items = self
            .iter()
            .map(|&b| PropertyValue::Value(DataValue::Bool(b)))
            .collect();
        PropertyValue::Array(items)
    }
}

// 为Vec<DataValue>提供特定的实现
impl ToPropertyValue for Vec<DataValue> {
    fn to_property_value(&self) -> PropertyValue {
        let items = self
            .iter()
            .map(|v| PropertyValue::Value(v.clone()))
            .collect();
        PropertyValue::Array(items)
    }
}

// 无序集合承载为Set类别
impl ToPropertyValue for HashSet<String> {
    fn to_property_value(&self) -> PropertyValue {
        let items = self
            .iter()
            .map(|s| PropertyValue::Value(DataValue::String(s.clone())))
            .collect();
        PropertyValue::Set(items)
    }
}

impl ToPropertyValue for HashSet<i64> {
    fn to_property_value(&self) -> PropertyValue {
        let items = self
            .iter()
            .map(|&i| PropertyValue::Value(DataValue::Int(i)))
            .collect();
        PropertyValue::Set(items)
    }
}

// 字符串键映射
impl<T> ToPropertyValue for HashMap<String, T>
where
    T: ToPropertyValue,
{
    fn to_property_value(&self) -> PropertyValue {
        let pairs = self
            .iter()
            .map(|(k, v)| (DataValue::String(k.clone()), v.to_property_value()))
            .collect();
        PropertyValue::Map(pairs)
    }
}

// 整数键映射：键在输出阶段按输出模式决定丢弃或字符串化
impl<T> ToPropertyValue for HashMap<i64, T>
where
    T: ToPropertyValue,
{
    fn to_property_value(&self) -> PropertyValue {
        let pairs = self
            .iter()
            .map(|(&k, v)| (DataValue::Int(k), v.to_property_value()))
            .collect();
        PropertyValue::Map(pairs)
    }
}
