//! Model trait 定义模块
//!
//! 定义模型的核心接口：类型名、按访问器名读写属性、枚举转换挂钩。
//! 这是宿主内省能力的对象安全边界，通常由 define_model! 宏实现

use std::any::Any;
use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::PropConvResult;
use crate::model::field_types::RawPropertySpec;
use crate::model::mapping::PropertyMappingPolicy;
use crate::types::DataValue;

/// 模型元数据
///
/// 描述一个模型类型直接声明的属性（不含继承）、父类型链接和映射策略。
/// 完整属性集由 PropertyFinder 沿父链组装
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMeta {
    /// 模型类型名，注册表内唯一
    pub type_name: String,
    /// 父模型类型名
    pub parent: Option<String>,
    /// 直接声明的属性规格（保持声明顺序）
    pub properties: Vec<RawPropertySpec>,
    /// 映射策略
    pub mapping: PropertyMappingPolicy,
    /// 模型描述
    pub description: Option<String>,
}

/// 模型特征
///
/// 所有参与转换的模型都必须实现这个特征（通常通过 define_model! 宏）。
/// 属性的读写以访问器名为入口，与描述符中的 getter/setter 名对应
pub trait Model: Send + Sync {
    /// 模型类型名
    fn type_name(&self) -> &'static str;

    /// 按取值器名读取属性值
    ///
    /// 未知的取值器名返回None（包括沿继承链查找失败的情况）
    fn get_property(&self, getter: &str) -> Option<PropertyValue>;

    /// 按设值器名写入属性值
    ///
    /// 返回Ok(true)表示写入成功，Ok(false)表示没有匹配的设值器；
    /// 值与字段类型不兼容时返回错误，调用方按省略策略降级处理
    fn set_property(&mut self, setter: &str, value: PropertyValue) -> PropConvResult<bool>;

    /// 克隆为装箱的模型对象
    fn clone_model(&self) -> Box<dyn Model>;

    /// 向下转型支持
    fn as_any(&self) -> &dyn Any;

    /// 可变向下转型支持
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 消耗自身的向下转型支持
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// 枚举字段转换挂钩：枚举值 -> 文档值
    ///
    /// 默认实现返回None；声明了枚举字段的模型类型应当提供转换
    fn enum_to_document(&self, property_name: &str) -> Option<DataValue> {
        let _ = property_name;
        None
    }

    /// 枚举字段转换挂钩：文档值 -> 枚举值
    ///
    /// 返回true表示转换已处理；默认实现不处理任何字段
    fn enum_from_document(&mut self, property_name: &str, value: &DataValue) -> bool {
        let _ = (property_name, value);
        false
    }
}

impl Clone for Box<dyn Model> {
    fn clone(&self) -> Self {
        self.clone_model()
    }
}

/// 属性值 - 转换引擎的工作表示
///
/// 介于类型化模型字段与基础文档值之间：基础值直接承载为 DataValue，
/// 嵌套模型、集合与映射保留结构供引擎递归处理。
/// 映射的键允许是任意文档值（非字符串键由输出模式决定去留）
pub enum PropertyValue {
    /// 基础文档值
    Value(DataValue),
    /// 嵌套模型实例
    Model(Box<dyn Model>),
    /// 有序集合
    Array(Vec<PropertyValue>),
    /// 无序集合
    Set(Vec<PropertyValue>),
    /// 映射集合（键可以是任意文档值）
    Map(Vec<(DataValue, PropertyValue)>),
}

impl Clone for PropertyValue {
    fn clone(&self) -> Self {
        match self {
            PropertyValue::Value(v) => PropertyValue::Value(v.clone()),
            PropertyValue::Model(m) => PropertyValue::Model(m.clone_model()),
            PropertyValue::Array(items) => PropertyValue::Array(items.clone()),
            PropertyValue::Set(items) => PropertyValue::Set(items.clone()),
            PropertyValue::Map(pairs) => PropertyValue::Map(pairs.clone()),
        }
    }
}

impl std::fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Value(v) => write!(f, "{:?}", v),
            PropertyValue::Model(m) => write!(f, "<model {}>", m.type_name()),
            PropertyValue::Array(items) => f.debug_list().entries(items).finish(),
            PropertyValue::Set(items) => {
                write!(f, "set")?;
                f.debug_list().entries(items).finish()
            }
            PropertyValue::Map(pairs) => {
                f.debug_map().entries(pairs.iter().map(|(k, v)| (k, v))).finish()
            }
        }
    }
}

impl PropertyValue {
    /// 是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Value(DataValue::Null))
    }

    /// 类型标签，用于错误消息
    pub fn type_label(&self) -> &'static str {
        match self {
            PropertyValue::Value(v) => v.type_name(),
            PropertyValue::Model(_) => "model",
            PropertyValue::Array(_) => "array",
            PropertyValue::Set(_) => "set",
            PropertyValue::Map(_) => "map",
        }
    }

    /// 从字符串键映射构造Map值
    pub fn from_string_map(map: HashMap<String, PropertyValue>) -> Self {
        PropertyValue::Map(
            map.into_iter()
                .map(|(k, v)| (DataValue::String(k), v))
                .collect(),
        )
    }
}
