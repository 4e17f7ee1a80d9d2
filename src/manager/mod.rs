//! 模型注册表模块
//!
//! 提供进程级的模型元数据注册与实例工厂，以及沿祖先链合并的映射策略缓存。
//! 注册表使用无锁读取的并发映射，首次访问的竞争构建可以容忍（元数据是
//! 类型的纯函数，重复构建浪费但不出错）

use std::sync::Arc;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use rat_logger::debug;

use crate::error::{PropConvError, PropConvResult};
use crate::model::mapping::MergedMappingPolicy;
use crate::model::traits::{Model, ModelMeta};

/// 实例工厂：默认构造一个装箱的模型实例
pub type ModelFactory = fn() -> Box<dyn Model>;

/// 访问器存在性检查：类型是否响应给定的访问器/存储名
pub type RespondsFn = fn(&str) -> bool;

/// 一条模型注册信息
pub struct ModelRegistration {
    /// 模型元数据
    pub meta: ModelMeta,
    /// 实例工厂
    pub factory: ModelFactory,
    /// 访问器存在性检查
    pub responds: RespondsFn,
}

/// 全局模型注册表
static MODEL_REGISTRY: Lazy<DashMap<String, Arc<ModelRegistration>>> = Lazy::new(DashMap::new);

/// 合并映射策略缓存（按类型名，只缓存成功结果）
static MERGED_MAPPING_CACHE: Lazy<DashMap<String, Arc<MergedMappingPolicy>>> =
    Lazy::new(DashMap::new);

/// 注册模型元数据
///
/// 注册前验证映射策略的可逆性；重复注册会更新元数据并失效相关缓存
pub fn register_model(
    meta: ModelMeta,
    factory: ModelFactory,
    responds: RespondsFn,
) -> PropConvResult<()> {
    meta.mapping.validate()?;

    let type_name = meta.type_name.clone();
    if MODEL_REGISTRY.contains_key(&type_name) {
        debug!("模型已存在，将更新元数据: {}", type_name);
    }

    MODEL_REGISTRY.insert(
        type_name.clone(),
        Arc::new(ModelRegistration { meta, factory, responds }),
    );

    // 失效依赖该类型的缓存（合并策略可能跨多个类型，整体清空）
    crate::model::finder::invalidate_descriptor_cache(&type_name);
    MERGED_MAPPING_CACHE.clear();

    debug!("注册模型元数据: 类型={}", type_name);
    Ok(())
}

/// 获取模型注册信息
pub fn get_registration(type_name: &str) -> Option<Arc<ModelRegistration>> {
    MODEL_REGISTRY.get(type_name).map(|entry| entry.value().clone())
}

/// 获取模型元数据
pub fn get_model_meta(type_name: &str) -> Option<ModelMeta> {
    MODEL_REGISTRY.get(type_name).map(|entry| entry.meta.clone())
}

/// 检查模型是否已注册
pub fn has_model(type_name: &str) -> bool {
    MODEL_REGISTRY.contains_key(type_name)
}

/// 获取所有已注册的模型类型名
pub fn registered_models() -> Vec<String> {
    MODEL_REGISTRY.iter().map(|entry| entry.key().clone()).collect()
}

/// 默认构造一个已注册模型的实例
pub fn create_instance(type_name: &str) -> PropConvResult<Box<dyn Model>> {
    let registration = get_registration(type_name).ok_or_else(|| {
        PropConvError::ModelNotRegistered {
            type_name: type_name.to_string(),
        }
    })?;
    Ok((registration.factory)())
}

/// 获取沿祖先链合并后的映射策略（最派生优先）
///
/// 合并结果按类型缓存；跨层的名称映射歧义在这里作为显式错误浮出
pub fn merged_mapping(type_name: &str) -> PropConvResult<Arc<MergedMappingPolicy>> {
    if let Some(cached) = MERGED_MAPPING_CACHE.get(type_name) {
        return Ok(cached.value().clone());
    }

    let mut layers = Vec::new();
    let mut current = Some(type_name.to_string());
    while let Some(name) = current {
        let registration = get_registration(&name).ok_or_else(|| {
            PropConvError::ModelNotRegistered { type_name: name.clone() }
        })?;
        layers.push(registration.meta.mapping.clone());
        current = registration.meta.parent.clone();
    }

    let merged = Arc::new(MergedMappingPolicy::from_layers(layers)?);
    MERGED_MAPPING_CACHE.insert(type_name.to_string(), merged.clone());
    Ok(merged)
}
