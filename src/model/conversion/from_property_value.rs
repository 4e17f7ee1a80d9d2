//! FromPropertyValue trait 与实现
//!
//! 组合（文档 -> 模型）阶段把经过强制转换的属性值写回类型化字段。
//! 转换失败返回错误，调用方按"字段保持未设置"策略降级

use std::collections::{HashMap, HashSet};
use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

use crate::error::PropConvResult;
use crate::model::traits::PropertyValue;
use crate::types::DataValue;

/// 从 PropertyValue 构造类型化字段值的 trait
pub trait FromPropertyValue: Sized {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self>;
}

fn mismatch(expected: &str, actual: &str) -> crate::error::PropConvError {
    crate::quick_error!(
        conversion,
        crate::i18n::tf("error.type_mismatch", &[("expected", expected), ("actual", actual)])
    )
}

impl FromPropertyValue for bool {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(DataValue::Bool(b)) => Ok(b),
            // 布尔按1位整数类别处理，0/1可互换
            PropertyValue::Value(DataValue::Int(0)) | PropertyValue::Value(DataValue::UInt(0)) => Ok(false),
            PropertyValue::Value(DataValue::Int(1)) | PropertyValue::Value(DataValue::UInt(1)) => Ok(true),
            other => Err(mismatch("boolean", other.type_label())),
        }
    }
}

impl FromPropertyValue for i64 {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(DataValue::Int(i)) => Ok(i),
            PropertyValue::Value(DataValue::UInt(u)) => i64::try_from(u).map_err(|_| {
                crate::quick_error!(
                    conversion,
                    crate::i18n::tf("error.numeric_range", &[("value", &u.to_string()), ("target", "i64")])
                )
            }),
            other => Err(mismatch("integer", other.type_label())),
        }
    }
}

macro_rules! signed_from_property_value {
    ($($ty:ty),*) => {
        $(
            impl FromPropertyValue for $ty {
                fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
                    let wide = i64::from_property_value(value)?;
                    <$ty>::try_from(wide).map_err(|_| {
                        crate::quick_error!(
                            conversion,
                            crate::i18n::tf(
                                "error.numeric_range",
                                &[("value", &wide.to_string()), ("target", stringify!($ty))]
                            )
                        )
                    })
                }
            }
        )*
    };
}

signed_from_property_value!(i8, i16, i32);

impl FromPropertyValue for u64 {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(DataValue::UInt(u)) => Ok(u),
            PropertyValue::Value(DataValue::Int(i)) => u64::try_from(i).map_err(|_| {
                crate::quick_error!(
                    conversion,
                    crate::i18n::tf("error.numeric_range", &[("value", &i.to_string()), ("target", "u64")])
                )
            }),
            other => Err(mismatch("unsigned integer", other.type_label())),
        }
    }
}

macro_rules! unsigned_from_property_value {
    ($($ty:ty),*) => {
        $(
            impl FromPropertyValue for $ty {
                fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
                    let wide = u64::from_property_value(value)?;
                    <$ty>::try_from(wide).map_err(|_| {
                        crate::quick_error!(
                            conversion,
                            crate::i18n::tf(
                                "error.numeric_range",
                                &[("value", &wide.to_string()), ("target", stringify!($ty))]
                            )
                        )
                    })
                }
            }
        )*
    };
}

unsigned_from_property_value!(u8, u16, u32);

impl FromPropertyValue for f64 {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(DataValue::Float(f)) => Ok(f),
            PropertyValue::Value(DataValue::Int(i)) => Ok(i as f64),
            PropertyValue::Value(DataValue::UInt(u)) => Ok(u as f64),
            other => Err(mismatch("float", other.type_label())),
        }
    }
}

impl FromPropertyValue for f32 {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        Ok(f64::from_property_value(value)? as f32)
    }
}

impl FromPropertyValue for String {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(DataValue::String(s)) => Ok(s),
            other => Err(mismatch("string", other.type_label())),
        }
    }
}

impl FromPropertyValue for Vec<u8> {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(DataValue::Bytes(b)) => Ok(b),
            other => Err(mismatch("bytes", other.type_label())),
        }
    }
}

impl FromPropertyValue for DateTime<FixedOffset> {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(DataValue::DateTime(dt)) => Ok(dt),
            other => Err(mismatch("datetime", other.type_label())),
        }
    }
}

impl FromPropertyValue for DateTime<Utc> {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        let dt = DateTime::<FixedOffset>::from_property_value(value)?;
        Ok(dt.with_timezone(&Utc))
    }
}

impl FromPropertyValue for Uuid {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(DataValue::String(s)) => Uuid::parse_str(&s).map_err(|e| {
                crate::quick_error!(conversion, format!("无效的UUID格式 '{}': {}", s, e))
            }),
            other => Err(mismatch("uuid", other.type_label())),
        }
    }
}

// 文档值字段原样接收，嵌套结构尽力还原为文档形式
impl FromPropertyValue for DataValue {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Value(v) => Ok(v),
            PropertyValue::Array(items) | PropertyValue::Set(items) => {
                let mut arr = Vec::with_capacity(items.len());
                for item in items {
                    arr.push(DataValue::from_property_value(item)?);
                }
                Ok(DataValue::Array(arr))
            }
            PropertyValue::Map(pairs) => {
                let mut obj = HashMap::with_capacity(pairs.len());
                for (k, v) in pairs {
                    let key = match k {
                        DataValue::String(s) => s,
                        other => other.to_string(),
                    };
                    obj.insert(key, DataValue::from_property_value(v)?);
                }
                Ok(DataValue::Object(obj))
            }
            other => Err(mismatch("document value", other.type_label())),
        }
    }
}

fn collection_items(value: PropertyValue, expected: &str) -> PropConvResult<Vec<PropertyValue>> {
    match value {
        PropertyValue::Array(items) | PropertyValue::Set(items) => Ok(items),
        PropertyValue::Value(DataValue::Array(arr)) => {
            Ok(arr.into_iter().map(PropertyValue::Value).collect())
        }
        other => Err(mismatch(expected, other.type_label())),
    }
}

// 与ToPropertyValue对称：为常用元素类型提供特定的Vec实现
macro_rules! vec_from_property_value {
    ($($elem:ty),*) => {
        $(
            impl FromPropertyValue for Vec<$elem> {
                fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
                    let items = collection_items(value, "array")?;
                    let mut result = Vec::with_capacity(items.len());
                    for item in items {
                        result.push(<$elem>::from_property_value(item)?);
                    }
                    Ok(result)
                }
            }
        )*
    };
}

vec_from_property_value!(String, i32, i64, f64, bool, DataValue);

impl FromPropertyValue for HashSet<String> {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        let items = collection_items(value, "set")?;
        let mut result = HashSet::with_capacity(items.len());
        for item in items {
            result.insert(String::from_property_value(item)?);
        }
        Ok(result)
    }
}

impl FromPropertyValue for HashSet<i64> {
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        let items = collection_items(value, "set")?;
        let mut result = HashSet::with_capacity(items.len());
        for item in items {
            result.insert(i64::from_property_value(item)?);
        }
        Ok(result)
    }
}

impl<T> FromPropertyValue for HashMap<String, T>
where
    T: FromPropertyValue,
{
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        match value {
            PropertyValue::Map(pairs) => {
                let mut result = HashMap::with_capacity(pairs.len());
                for (k, v) in pairs {
                    let key = match k {
                        DataValue::String(s) => s,
                        other => other.to_string(),
                    };
                    result.insert(key, T::from_property_value(v)?);
                }
                Ok(result)
            }
            PropertyValue::Value(DataValue::Object(obj)) => {
                let mut result = HashMap::with_capacity(obj.len());
                for (k, v) in obj {
                    result.insert(k, T::from_property_value(PropertyValue::Value(v))?);
                }
                Ok(result)
            }
            other => Err(mismatch("map", other.type_label())),
        }
    }
}

// 整数键映射：字符串化的键解析回整数（分解阶段的逆操作）
impl<T> FromPropertyValue for HashMap<i64, T>
where
    T: FromPropertyValue,
{
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        let pairs = match value {
            PropertyValue::Map(pairs) => pairs,
            PropertyValue::Value(DataValue::Object(obj)) => obj
                .into_iter()
                .map(|(k, v)| (DataValue::String(k), PropertyValue::Value(v)))
                .collect(),
            other => return Err(mismatch("map", other.type_label())),
        };

        let mut result = HashMap::with_capacity(pairs.len());
        for (k, v) in pairs {
            let key = match &k {
                DataValue::Int(i) => *i,
                DataValue::UInt(u) => i64::try_from(*u)
                    .map_err(|_| mismatch("integer key", "unsigned_integer"))?,
                DataValue::String(s) => s
                    .parse::<i64>()
                    .map_err(|_| mismatch("integer key", "string"))?,
                other => return Err(mismatch("integer key", other.type_name())),
            };
            result.insert(key, T::from_property_value(v)?);
        }
        Ok(result)
    }
}

impl<T> FromPropertyValue for Option<T>
where
    T: FromPropertyValue,
{
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::from_property_value(value)?))
        }
    }
}

impl<T> FromPropertyValue for Box<T>
where
    T: FromPropertyValue,
{
    fn from_property_value(value: PropertyValue) -> PropConvResult<Self> {
        Ok(Box::new(T::from_property_value(value)?))
    }
}
