//! 分解路径：模型 -> 文档
//!
//! decompose_value 对输入形态多态：基础值按输出模式合规处理，
//! 集合与映射递归分解，模型实例经 should_convert 判定后走
//! 逐字段的原语转换路径

use std::collections::HashMap;
use rat_logger::debug;

use crate::error::PropConvResult;
use crate::manager;
use crate::model::finder::PropertyFinder;
use crate::model::traits::{Model, PropertyValue};
use crate::types::DataValue;
use crate::utils::case::camel_to_snake;

use super::{Converter, OutputMode};

impl Converter {
    /// 把任意属性值分解为文档值
    ///
    /// 返回None表示该值在当前输出模式下不可表示、被丢弃
    /// （包含它的映射条目或集合元素随之省略）
    pub fn decompose_value(&self, value: &PropertyValue) -> Option<DataValue> {
        match value {
            PropertyValue::Value(v) => self.comply_value(v),
            PropertyValue::Array(items) | PropertyValue::Set(items) => {
                // 被丢弃的元素省略，有序集合保持剩余元素的顺序
                let decomposed: Vec<DataValue> = items
                    .iter()
                    .filter_map(|item| self.decompose_value(item))
                    .collect();
                Some(DataValue::Array(decomposed))
            }
            PropertyValue::Map(pairs) => {
                let mut object = HashMap::with_capacity(pairs.len());
                for (key, item) in pairs {
                    let key = match key {
                        DataValue::String(s) => s.clone(),
                        other => {
                            if self.output_mode == OutputMode::Json {
                                // JSON模式下非字符串键的条目整体丢弃
                                debug!("丢弃非字符串键的映射条目: {:?}", other);
                                continue;
                            }
                            other.to_string()
                        }
                    };
                    if let Some(decomposed) = self.decompose_value(item) {
                        object.insert(key, decomposed);
                    }
                }
                Some(DataValue::Object(object))
            }
            PropertyValue::Model(model) => {
                if self.should_convert_model(model.type_name()) {
                    match self.decompose(model.as_ref()) {
                        Ok(document) => Some(DataValue::Object(document)),
                        Err(e) => {
                            debug!("嵌套模型 {} 分解失败: {}", model.type_name(), e);
                            None
                        }
                    }
                } else {
                    // 不可转换的模型无法嵌入文档值，按丢弃处理
                    debug!("模型 {} 未被判定为可转换，已丢弃", model.type_name());
                    None
                }
            }
        }
    }

    /// 把单个模型实例分解为文档（原语转换路径）
    pub fn decompose(&self, model: &dyn Model) -> PropConvResult<HashMap<String, DataValue>> {
        let type_name = model.type_name();
        let merged = manager::merged_mapping(type_name)?;
        let descriptors = PropertyFinder::properties_of(type_name)?;

        let mut document = HashMap::with_capacity(descriptors.len());

        for descriptor in &descriptors {
            if merged.is_ignored_to_document(&descriptor.name) {
                continue;
            }
            // 弱引用默认跳过：弱边通常标记循环对象图，
            // 不遍历即从构造上打破循环
            if descriptor.weak && !self.convert_weak_properties {
                debug!("跳过弱引用属性: {}.{}", type_name, descriptor.name);
                continue;
            }
            if descriptor.is_opaque() {
                debug!("跳过不支持类型的属性: {}.{}", type_name, descriptor.name);
                continue;
            }

            let Some(value) = model.get_property(descriptor.getter()) else {
                debug!("属性 {}.{} 的取值器无响应，已跳过", type_name, descriptor.name);
                continue;
            };

            // 解析外部键：自定义映射优先（最派生者胜出），
            // snake_case支持在映射之后应用
            let mut external_key = merged
                .external_key_for(&descriptor.name)
                .unwrap_or(&descriptor.name)
                .to_string();
            if self.enable_snake_case {
                external_key = camel_to_snake(&external_key);
            }

            let decomposed = if merged.is_enum_field(&descriptor.name) {
                model.enum_to_document(&descriptor.name)
            } else {
                self.decompose_value(&value)
            };

            match decomposed {
                Some(v) if !v.is_null() => {
                    document.insert(external_key, v);
                }
                _ => {
                    // 缺失/空值默认省略键；空值选入字段写入显式空标记
                    if merged.is_null_opt_in(&descriptor.name) {
                        document.insert(external_key, DataValue::Null);
                    }
                }
            }
        }

        Ok(document)
    }

    /// 按输出模式对基础文档值做合规处理
    ///
    /// Full模式原样通过；受限模式下不可表示的值返回None（丢弃），
    /// 日期在JSON模式下先尝试convert_from_date转换
    fn comply_value(&self, value: &DataValue) -> Option<DataValue> {
        if self.output_mode == OutputMode::Full {
            return Some(value.clone());
        }

        match value {
            DataValue::Null => match self.output_mode {
                // 属性列表没有空值表示
                OutputMode::PropertyList => None,
                _ => Some(DataValue::Null),
            },
            DataValue::Float(f) if !f.is_finite() => None,
            DataValue::DateTime(dt) => {
                if self.output_mode == OutputMode::PropertyList {
                    return Some(value.clone());
                }
                // JSON模式：应用日期转换挂钩，仍不合规则丢弃
                match &self.convert_from_date {
                    Some(convert) => {
                        let converted = convert(dt);
                        match converted {
                            DataValue::DateTime(_) => None,
                            other => self.comply_value(&other),
                        }
                    }
                    None => None,
                }
            }
            DataValue::Array(items) => {
                let complied: Vec<DataValue> = items
                    .iter()
                    .filter_map(|item| self.comply_value(item))
                    .collect();
                Some(DataValue::Array(complied))
            }
            DataValue::Object(obj) => {
                let mut complied = HashMap::with_capacity(obj.len());
                for (k, v) in obj {
                    if let Some(value) = self.comply_value(v) {
                        complied.insert(k.clone(), value);
                    }
                }
                Some(DataValue::Object(complied))
            }
            other => Some(other.clone()),
        }
    }
}
