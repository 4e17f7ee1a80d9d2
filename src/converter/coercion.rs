//! 值强制转换子例程
//!
//! 把组合得到的属性值按目标字段的声明类别做最终转换：
//! 数值按目标位宽与符号收窄/放宽，字符串仅在配置了数值解析器时
//! 解析为数字，日期目标应用convert_to_date挂钩。
//! 任何转换失败返回错误，调用方让字段保持未设置

use uuid::Uuid;
use base64::Engine;

use crate::error::PropConvResult;
use crate::model::field_types::{FieldType, PropertyDescriptor};
use crate::model::traits::PropertyValue;
use crate::types::DataValue;

use super::Converter;

fn mismatch(expected: &str, actual: &str) -> crate::error::PropConvError {
    crate::quick_error!(
        conversion,
        crate::i18n::tf("error.type_mismatch", &[("expected", expected), ("actual", actual)])
    )
}

fn out_of_range(value: &str, target: &str) -> crate::error::PropConvError {
    crate::quick_error!(
        conversion,
        crate::i18n::tf("error.numeric_range", &[("value", value), ("target", target)])
    )
}

/// 有符号整数是否落在目标位宽范围内
fn signed_in_width(value: i64, width: u8) -> bool {
    match width {
        8 => i8::try_from(value).is_ok(),
        16 => i16::try_from(value).is_ok(),
        32 => i32::try_from(value).is_ok(),
        _ => true,
    }
}

/// 无符号整数是否落在目标位宽范围内
fn unsigned_in_width(value: u64, width: u8) -> bool {
    match width {
        8 => u8::try_from(value).is_ok(),
        16 => u16::try_from(value).is_ok(),
        32 => u32::try_from(value).is_ok(),
        _ => true,
    }
}

impl Converter {
    /// 把属性值强制转换为描述符声明的字段类别
    pub(crate) fn coerce_to_field(
        &self,
        value: PropertyValue,
        descriptor: &PropertyDescriptor,
    ) -> PropConvResult<PropertyValue> {
        match &descriptor.field_type {
            FieldType::Boolean => self.coerce_boolean(value),
            FieldType::Integer { width, signed } => self.coerce_integer(value, *width, *signed),
            FieldType::Float { .. } => self.coerce_float(value),
            FieldType::String => match value {
                v @ PropertyValue::Value(DataValue::String(_)) => Ok(v),
                other => Err(mismatch("string", other.type_label())),
            },
            FieldType::Bytes => self.coerce_bytes(value),
            FieldType::DateTime => self.coerce_datetime(value),
            FieldType::Uuid => self.coerce_uuid(value),
            FieldType::Model { target } => self.coerce_model(value, target.as_deref()),
            FieldType::Array => match value {
                v @ PropertyValue::Array(_) => Ok(v),
                PropertyValue::Set(items) => Ok(PropertyValue::Array(items)),
                PropertyValue::Value(DataValue::Array(arr)) => Ok(PropertyValue::Array(
                    arr.into_iter().map(PropertyValue::Value).collect(),
                )),
                other => Err(mismatch("array", other.type_label())),
            },
            FieldType::Set => match value {
                v @ PropertyValue::Set(_) => Ok(v),
                PropertyValue::Array(items) => Ok(PropertyValue::Set(items)),
                PropertyValue::Value(DataValue::Array(arr)) => Ok(PropertyValue::Set(
                    arr.into_iter().map(PropertyValue::Value).collect(),
                )),
                other => Err(mismatch("set", other.type_label())),
            },
            FieldType::Map => match value {
                v @ PropertyValue::Map(_) => Ok(v),
                PropertyValue::Value(DataValue::Object(obj)) => Ok(PropertyValue::Map(
                    obj.into_iter()
                        .map(|(k, v)| (DataValue::String(k), PropertyValue::Value(v)))
                        .collect(),
                )),
                other => Err(mismatch("map", other.type_label())),
            },
            FieldType::Opaque { encoding } => Err(crate::quick_error!(
                conversion,
                crate::i18n::tf("error.unsupported_field", &[("encoding", encoding)])
            )),
        }
    }

    fn coerce_boolean(&self, value: PropertyValue) -> PropConvResult<PropertyValue> {
        match value {
            v @ PropertyValue::Value(DataValue::Bool(_)) => Ok(v),
            // 布尔按1位整数类别处理：0/1整数可接受
            PropertyValue::Value(DataValue::Int(i)) if i == 0 || i == 1 => {
                Ok(PropertyValue::Value(DataValue::Bool(i == 1)))
            }
            PropertyValue::Value(DataValue::UInt(u)) if u <= 1 => {
                Ok(PropertyValue::Value(DataValue::Bool(u == 1)))
            }
            other => Err(mismatch("boolean", other.type_label())),
        }
    }

    fn coerce_integer(
        &self,
        value: PropertyValue,
        width: u8,
        signed: bool,
    ) -> PropConvResult<PropertyValue> {
        match value {
            PropertyValue::Value(DataValue::Int(i)) => {
                let in_range = if signed {
                    signed_in_width(i, width)
                } else {
                    i >= 0 && unsigned_in_width(i as u64, width)
                };
                if in_range {
                    Ok(PropertyValue::Value(DataValue::Int(i)))
                } else {
                    Err(out_of_range(&i.to_string(), "integer"))
                }
            }
            PropertyValue::Value(DataValue::UInt(u)) => {
                let in_range = if signed {
                    i64::try_from(u).is_ok_and(|i| signed_in_width(i, width))
                } else {
                    unsigned_in_width(u, width)
                };
                if in_range {
                    Ok(PropertyValue::Value(DataValue::UInt(u)))
                } else {
                    Err(out_of_range(&u.to_string(), "integer"))
                }
            }
            // 浮点数仅在无小数部分时收窄为整数
            PropertyValue::Value(DataValue::Float(f)) => {
                if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64
                {
                    self.coerce_integer(PropertyValue::Value(DataValue::Int(f as i64)), width, signed)
                } else {
                    Err(out_of_range(&f.to_string(), "integer"))
                }
            }
            PropertyValue::Value(DataValue::Bool(b)) => {
                Ok(PropertyValue::Value(DataValue::Int(b as i64)))
            }
            PropertyValue::Value(DataValue::String(s)) => {
                let parsed = self.parse_numeric_string(&s)?;
                self.coerce_integer(PropertyValue::Value(parsed), width, signed)
            }
            other => Err(mismatch("integer", other.type_label())),
        }
    }

    fn coerce_float(&self, value: PropertyValue) -> PropConvResult<PropertyValue> {
        match value {
            v @ PropertyValue::Value(DataValue::Float(_)) => Ok(v),
            PropertyValue::Value(DataValue::Int(i)) => {
                Ok(PropertyValue::Value(DataValue::Float(i as f64)))
            }
            PropertyValue::Value(DataValue::UInt(u)) => {
                Ok(PropertyValue::Value(DataValue::Float(u as f64)))
            }
            PropertyValue::Value(DataValue::String(s)) => {
                let parsed = self.parse_numeric_string(&s)?;
                self.coerce_float(PropertyValue::Value(parsed))
            }
            other => Err(mismatch("float", other.type_label())),
        }
    }

    fn coerce_bytes(&self, value: PropertyValue) -> PropConvResult<PropertyValue> {
        match value {
            v @ PropertyValue::Value(DataValue::Bytes(_)) => Ok(v),
            // 字符串来源按base64解码
            PropertyValue::Value(DataValue::String(s)) => {
                base64::engine::general_purpose::STANDARD
                    .decode(s.as_bytes())
                    .map(|bytes| PropertyValue::Value(DataValue::Bytes(bytes)))
                    .map_err(|e| crate::quick_error!(conversion, format!("base64解码失败: {}", e)))
            }
            other => Err(mismatch("bytes", other.type_label())),
        }
    }

    fn coerce_datetime(&self, value: PropertyValue) -> PropConvResult<PropertyValue> {
        match value {
            v @ PropertyValue::Value(DataValue::DateTime(_)) => Ok(v),
            PropertyValue::Value(scalar) => {
                // 非日期来源必须经convert_to_date转换；
                // 缺少转换函数时不猜测格式，字段保持未设置
                match &self.convert_to_date {
                    Some(convert) => match convert(&scalar) {
                        Some(dt) => Ok(PropertyValue::Value(DataValue::DateTime(dt))),
                        None => Err(crate::quick_error!(
                            conversion,
                            format!("日期转换挂钩无法处理值: {:?}", scalar)
                        )),
                    },
                    None => Err(crate::quick_error!(
                        conversion,
                        "未配置convert_to_date，无法从非日期值转换"
                    )),
                }
            }
            other => Err(mismatch("datetime", other.type_label())),
        }
    }

    fn coerce_uuid(&self, value: PropertyValue) -> PropConvResult<PropertyValue> {
        match value {
            PropertyValue::Value(DataValue::String(s)) => match Uuid::parse_str(&s) {
                Ok(_) => Ok(PropertyValue::Value(DataValue::String(s))),
                Err(e) => Err(crate::quick_error!(
                    conversion,
                    format!("无效的UUID格式 '{}': {}", s, e)
                )),
            },
            other => Err(mismatch("uuid", other.type_label())),
        }
    }

    fn coerce_model(
        &self,
        value: PropertyValue,
        target: Option<&str>,
    ) -> PropConvResult<PropertyValue> {
        match value {
            PropertyValue::Model(m) => {
                if let Some(target) = target {
                    if m.type_name() != target {
                        return Err(mismatch(target, m.type_name()));
                    }
                }
                Ok(PropertyValue::Model(m))
            }
            other => Err(mismatch("model", other.type_label())),
        }
    }

    /// 数值字符串解析：仅在配置了解析器时启用
    fn parse_numeric_string(&self, s: &str) -> PropConvResult<DataValue> {
        match &self.parse_numeric_strings {
            Some(parser) => parser(s).ok_or_else(|| {
                crate::quick_error!(conversion, format!("无法解析数值字符串: '{}'", s))
            }),
            None => Err(crate::quick_error!(
                conversion,
                "未启用数值字符串解析，字符串不能写入数值字段"
            )),
        }
    }

    /// 把单个标量尽力转换为编码指定的类型化标量
    ///
    /// 独立于字段描述符的便捷入口，失败时返回None
    pub fn coerce_scalar(&self, value: &DataValue, encoding: &str) -> Option<DataValue> {
        let field_type = FieldType::from_encoding(encoding);
        let descriptor = PropertyDescriptor {
            name: String::new(),
            field_type,
            storage_name: None,
            custom_getter: None,
            custom_setter: None,
            read_only: false,
            weak: false,
            dynamic: false,
            store_semantics: Default::default(),
        };
        match self.coerce_to_field(PropertyValue::Value(value.clone()), &descriptor) {
            Ok(PropertyValue::Value(v)) => Some(v),
            _ => None,
        }
    }
}
