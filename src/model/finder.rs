//! 属性查找器模块
//!
//! 枚举模型类型的属性描述符，处理继承链的遮蔽与去重规则。
//! 描述符在首次请求时从注册表的原始规格惰性构建，按类型缓存，
//! 发布后不再变更；并发的首次构建竞争可以容忍（后写胜出）

use std::sync::Arc;
use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::{PropConvError, PropConvResult};
use crate::manager;
use crate::model::field_types::PropertyDescriptor;

/// 进程级描述符缓存：类型名 -> 直接声明的描述符序列
static DESCRIPTOR_CACHE: Lazy<DashMap<String, Arc<Vec<PropertyDescriptor>>>> =
    Lazy::new(DashMap::new);

/// 失效指定类型的描述符缓存（模型重新注册时调用）
pub(crate) fn invalidate_descriptor_cache(type_name: &str) {
    DESCRIPTOR_CACHE.remove(type_name);
}

/// 属性查找器
///
/// 所有方法按类型名工作，类型必须已在注册表中
pub struct PropertyFinder;

impl PropertyFinder {
    /// 类型直接声明的属性描述符（不含继承），保持声明顺序
    pub fn properties_declared_by(type_name: &str) -> PropConvResult<Arc<Vec<PropertyDescriptor>>> {
        if let Some(cached) = DESCRIPTOR_CACHE.get(type_name) {
            return Ok(cached.value().clone());
        }

        let registration = manager::get_registration(type_name).ok_or_else(|| {
            PropConvError::ModelNotRegistered {
                type_name: type_name.to_string(),
            }
        })?;

        let responds = registration.responds;
        let descriptors: Vec<PropertyDescriptor> = registration
            .meta
            .properties
            .iter()
            .map(|spec| PropertyDescriptor::from_raw(spec, &responds))
            .collect();

        let descriptors = Arc::new(descriptors);
        DESCRIPTOR_CACHE.insert(type_name.to_string(), descriptors.clone());
        Ok(descriptors)
    }

    /// 类型的全部属性描述符，沿祖先链向上收集
    ///
    /// 更派生类型的描述符排在前面；与祖先同名的描述符只保留
    /// 最派生的那个。链的尽头没有通用基类型需要排除（Rust模型
    /// 的父链在声明处终止）
    pub fn properties_of(type_name: &str) -> PropConvResult<Vec<PropertyDescriptor>> {
        let mut result: Vec<PropertyDescriptor> = Vec::new();
        let mut current = Some(type_name.to_string());

        while let Some(name) = current {
            let declared = Self::properties_declared_by(&name)?;
            for descriptor in declared.iter() {
                if !result.iter().any(|d| d.name == descriptor.name) {
                    result.push(descriptor.clone());
                }
            }
            current = manager::get_model_meta(&name)
                .ok_or_else(|| PropConvError::ModelNotRegistered { type_name: name.clone() })?
                .parent;
        }

        Ok(result)
    }

    /// 按名称查找属性描述符，搜索完整的祖先链
    pub fn property_named(name: &str, type_name: &str) -> Option<PropertyDescriptor> {
        let mut current = Some(type_name.to_string());

        while let Some(current_name) = current {
            if let Ok(declared) = Self::properties_declared_by(&current_name) {
                if let Some(descriptor) = declared.iter().find(|d| d.name == name) {
                    return Some(descriptor.clone());
                }
            }
            current = manager::get_model_meta(&current_name).and_then(|meta| meta.parent);
        }

        None
    }

    /// 类型的全部属性名，排序与继承规则同 properties_of
    pub fn property_names(type_name: &str) -> PropConvResult<Vec<String>> {
        Ok(Self::properties_of(type_name)?
            .into_iter()
            .map(|d| d.name)
            .collect())
    }
}
