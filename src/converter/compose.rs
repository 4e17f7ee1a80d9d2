//! 组合路径：文档 -> 模型
//!
//! compose_value 镜像分解的多态；对映射值咨询类型识别策略，
//! 识别成功则默认构造实例并按 populate 规则逐键填充，
//! 未识别的映射保持文档形式递归组合

use std::collections::HashMap;
use rat_logger::debug;

use crate::error::PropConvResult;
use crate::manager;
use crate::model::field_types::{FieldType, PropertyDescriptor};
use crate::model::finder::PropertyFinder;
use crate::model::mapping::MergedMappingPolicy;
use crate::model::traits::{Model, PropertyValue};
use crate::types::DataValue;
use crate::utils::case::{camel_to_snake, snake_to_camel};

use super::Converter;

/// 键解析结果
#[derive(Debug, Clone)]
pub enum FindResult {
    /// 键被忽略集显式排除
    Ignored,
    /// 没有匹配的属性（条目将被忽略，保持前后向兼容）
    NotFound,
    /// 命中属性
    Found {
        /// 目标属性描述符
        descriptor: PropertyDescriptor,
        /// 键路径解析时剩余的路径（已消费首段）
        remaining_path: Option<String>,
    },
}

impl Converter {
    /// 把任意文档值组合为属性值
    pub fn compose_value(&self, value: &DataValue) -> PropConvResult<PropertyValue> {
        match value {
            DataValue::Object(map) => self.compose_document(map),
            DataValue::Array(items) => {
                let mut composed = Vec::with_capacity(items.len());
                for item in items {
                    composed.push(self.compose_value(item)?);
                }
                Ok(PropertyValue::Array(composed))
            }
            scalar => Ok(PropertyValue::Value(scalar.clone())),
        }
    }

    /// 组合一个映射文档
    ///
    /// 类型识别策略给出模型类型时，默认构造该类型的实例并填充；
    /// 否则"组合"就是对每个值递归组合、映射形态不变
    pub fn compose_document(
        &self,
        document: &HashMap<String, DataValue>,
    ) -> PropConvResult<PropertyValue> {
        if let Some(identify) = &self.identify_document {
            if let Some(type_name) = identify(document) {
                let mut instance = manager::create_instance(&type_name)?;
                self.populate(instance.as_mut(), document)?;
                return Ok(PropertyValue::Model(instance));
            }
        }

        let mut pairs = Vec::with_capacity(document.len());
        for (key, value) in document {
            pairs.push((DataValue::String(key.clone()), self.compose_value(value)?));
        }
        Ok(PropertyValue::Map(pairs))
    }

    /// 用文档条目填充模型实例
    ///
    /// 文档中缺失的字段保持当前值不变——组合永远不清空未见到的字段。
    /// 无法解析的键、只读目标、类型不兼容的值一律按省略策略降级，
    /// 不会中断整个转换
    pub fn populate(
        &self,
        model: &mut dyn Model,
        document: &HashMap<String, DataValue>,
    ) -> PropConvResult<()> {
        let type_name = model.type_name();
        let merged = manager::merged_mapping(type_name)?;

        for (external_key, value) in document {
            match self.find_property(type_name, external_key)? {
                FindResult::Ignored => continue,
                FindResult::NotFound => {
                    debug!("文档键 {} 在 {} 中没有匹配属性，已忽略", external_key, type_name);
                    continue;
                }
                FindResult::Found { descriptor, remaining_path } => {
                    if let Some(rest) = remaining_path {
                        self.populate_key_path(model, &descriptor, &rest, value)?;
                        continue;
                    }
                    self.populate_field(model, &descriptor, value, &merged)?;
                }
            }
        }

        Ok(())
    }

    /// 写入单个字段
    fn populate_field(
        &self,
        model: &mut dyn Model,
        descriptor: &PropertyDescriptor,
        value: &DataValue,
        merged: &MergedMappingPolicy,
    ) -> PropConvResult<()> {
        // 自定义映射解析出的字段名同样受忽略集约束
        if merged.is_ignored_from_document(&descriptor.name) {
            return Ok(());
        }

        if merged.is_enum_field(&descriptor.name) {
            if !model.enum_from_document(&descriptor.name, value) {
                debug!("枚举字段 {} 的转换挂钩未处理值: {:?}", descriptor.name, value);
            }
            return Ok(());
        }

        // 不支持类型的字段拒绝写入
        if descriptor.is_opaque() {
            debug!("拒绝写入不支持类型的字段: {}", descriptor.name);
            return Ok(());
        }

        let Some(setter) = descriptor.setter() else {
            // 只读字段的值由模型自身控制，静默跳过
            debug!("跳过只读字段: {}", descriptor.name);
            return Ok(());
        };

        if value.is_null() {
            // 空值默认忽略；空值选入字段清空为显式空
            if merged.is_null_opt_in(&descriptor.name) {
                if let Err(e) =
                    model.set_property(&setter, PropertyValue::Value(DataValue::Null))
                {
                    debug!("字段 {} 清空失败: {}", descriptor.name, e);
                }
            }
            return Ok(());
        }

        let composed = self.compose_for_field(value, descriptor)?;
        let coerced = match self.coerce_to_field(composed, descriptor) {
            Ok(v) => v,
            Err(e) => {
                debug!("字段 {} 强制转换失败，保持未设置: {}", descriptor.name, e);
                return Ok(());
            }
        };

        match model.set_property(&setter, coerced) {
            Ok(true) => {}
            Ok(false) => debug!("设值器 {} 无响应", setter),
            Err(e) => debug!("字段 {} 写入失败: {}", descriptor.name, e),
        }

        Ok(())
    }

    /// 面向目标字段的组合
    ///
    /// 描述符解析出了具体的嵌套模型类型、而类型识别策略未认领该映射时，
    /// 直接实例化目标类型填充，使嵌套模型字段无需识别策略也能组合
    fn compose_for_field(
        &self,
        value: &DataValue,
        descriptor: &PropertyDescriptor,
    ) -> PropConvResult<PropertyValue> {
        if let (FieldType::Model { target: Some(target) }, DataValue::Object(map)) =
            (&descriptor.field_type, value)
        {
            let composed = self.compose_document(map)?;
            if matches!(composed, PropertyValue::Model(_)) {
                return Ok(composed);
            }
            let mut instance = manager::create_instance(target)?;
            self.populate(instance.as_mut(), map)?;
            return Ok(PropertyValue::Model(instance));
        }
        self.compose_value(value)
    }

    /// 键路径填充：首段字段已解析，剩余路径交给嵌套值
    fn populate_key_path(
        &self,
        model: &mut dyn Model,
        descriptor: &PropertyDescriptor,
        remaining_path: &str,
        value: &DataValue,
    ) -> PropConvResult<()> {
        let Some(current) = model.get_property(descriptor.getter()) else {
            return Ok(());
        };

        match current {
            PropertyValue::Model(mut nested) => {
                // 剩余路径作为新的单层键递归组合，多级路径逐层消费
                let mut nested_document = HashMap::with_capacity(1);
                nested_document.insert(remaining_path.to_string(), value.clone());
                self.populate(nested.as_mut(), &nested_document)?;

                if let Some(setter) = descriptor.setter() {
                    if let Err(e) = model.set_property(&setter, PropertyValue::Model(nested)) {
                        debug!("键路径目标 {} 回写失败: {}", descriptor.name, e);
                    }
                }
            }
            PropertyValue::Map(mut pairs) => {
                let composed = self.compose_value(value)?;
                set_map_path(&mut pairs, remaining_path, composed);
                if let Some(setter) = descriptor.setter() {
                    if let Err(e) = model.set_property(&setter, PropertyValue::Map(pairs)) {
                        debug!("键路径目标 {} 回写失败: {}", descriptor.name, e);
                    }
                }
            }
            PropertyValue::Value(DataValue::Object(mut obj)) => {
                set_object_path(&mut obj, remaining_path, value.clone());
                if let Some(setter) = descriptor.setter() {
                    if let Err(e) = model.set_property(
                        &setter,
                        PropertyValue::Value(DataValue::Object(obj)),
                    ) {
                        debug!("键路径目标 {} 回写失败: {}", descriptor.name, e);
                    }
                }
            }
            _ => {
                debug!(
                    "键路径剩余段 {} 的目标字段 {} 不是嵌套模型或映射，已忽略",
                    remaining_path, descriptor.name
                );
            }
        }

        Ok(())
    }

    /// 按序解析外部键到属性描述符（首个命中胜出）
    ///
    /// 顺序是刻意的决胜规则：显式定制（忽略集、自定义映射）永远
    /// 优先于自动的大小写折叠，折叠优先于键路径回退，最后才是
    /// 裸的直接查找——启发式不会覆盖作者的显式意图
    pub(crate) fn find_property(
        &self,
        type_name: &str,
        external_key: &str,
    ) -> PropConvResult<FindResult> {
        let merged = manager::merged_mapping(type_name)?;

        // 1. 忽略集显式命中
        if merged.is_ignored_from_document(external_key) {
            return Ok(FindResult::Ignored);
        }

        // 2. 自定义映射反查
        if let Some(field) = merged.field_for_external_key(external_key) {
            if let Some(descriptor) = PropertyFinder::property_named(field, type_name) {
                return Ok(FindResult::Found { descriptor, remaining_path: None });
            }
        }

        // 3/4. 命名风格折叠后重试直接查找与映射反查。
        // 两个折叠方向都尝试：snake外部键对camel字段名，以及
        // camel外部键对snake字段名（Rust模型的原生命名）
        if self.enable_snake_case {
            let candidates = [snake_to_camel(external_key), camel_to_snake(external_key)];
            for folded in candidates.iter().filter(|c| c.as_str() != external_key) {
                if merged.is_ignored_from_document(folded) {
                    return Ok(FindResult::Ignored);
                }
                if let Some(descriptor) = PropertyFinder::property_named(folded, type_name) {
                    return Ok(FindResult::Found { descriptor, remaining_path: None });
                }
                if let Some(field) = merged.field_for_external_key(folded) {
                    if let Some(descriptor) = PropertyFinder::property_named(field, type_name) {
                        return Ok(FindResult::Found { descriptor, remaining_path: None });
                    }
                }
            }
        }

        // 5. 键路径：首段单独按上述规则解析，报告剩余路径
        if let Some(dot) = external_key.find('.') {
            let head = &external_key[..dot];
            let rest = &external_key[dot + 1..];
            if !head.is_empty() && !rest.is_empty() {
                match self.find_property(type_name, head)? {
                    FindResult::Found { descriptor, remaining_path: None } => {
                        return Ok(FindResult::Found {
                            descriptor,
                            remaining_path: Some(rest.to_string()),
                        });
                    }
                    FindResult::Ignored => return Ok(FindResult::Ignored),
                    _ => {}
                }
            }
        }

        // 6. 直接查找（包含祖先链）
        if let Some(descriptor) = PropertyFinder::property_named(external_key, type_name) {
            return Ok(FindResult::Found { descriptor, remaining_path: None });
        }

        Ok(FindResult::NotFound)
    }
}

/// 在映射对序列中按路径写入值，路径中的嵌套映射逐层下钻
fn set_map_path(pairs: &mut Vec<(DataValue, PropertyValue)>, path: &str, value: PropertyValue) {
    match path.find('.') {
        None => {
            let key = DataValue::String(path.to_string());
            if let Some(entry) = pairs.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = value;
            } else {
                pairs.push((key, value));
            }
        }
        Some(dot) => {
            let head = DataValue::String(path[..dot].to_string());
            let rest = &path[dot + 1..];
            if let Some(entry) = pairs.iter_mut().find(|(k, _)| *k == head) {
                if let PropertyValue::Map(nested) = &mut entry.1 {
                    set_map_path(nested, rest, value);
                }
            }
            // 首段不存在时不创建层级，条目按未匹配忽略
        }
    }
}

/// 在文档对象中按路径写入值
fn set_object_path(object: &mut HashMap<String, DataValue>, path: &str, value: DataValue) {
    match path.find('.') {
        None => {
            object.insert(path.to_string(), value);
        }
        Some(dot) => {
            let head = &path[..dot];
            let rest = &path[dot + 1..];
            if let Some(DataValue::Object(nested)) = object.get_mut(head) {
                set_object_path(nested, rest, value);
            }
        }
    }
}
