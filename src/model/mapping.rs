//! 属性映射策略模块
//!
//! 模型类型可选的转换配置：自定义名称映射、枚举字段、忽略列表和空值选入。
//! 未配置任何内容等价于空策略，转换引擎不要求模型类型提供此能力

use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use crate::error::{PropConvError, PropConvResult};

/// 单个模型类型的属性映射策略
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyMappingPolicy {
    /// 名称映射：字段名 -> 外部文档键（必须可逆）
    pub name_overrides: HashMap<String, String>,
    /// 需要枚举转换的字段名集合（转换挂钩由模型类型提供）
    pub enum_fields: HashSet<String>,
    /// 分解（模型 -> 文档）时忽略的字段名
    pub ignore_to_document: HashSet<String>,
    /// 组合（文档 -> 模型）时忽略的字段名
    pub ignore_from_document: HashSet<String>,
    /// 空值选入：值缺失时仍然输出显式空值/清空字段的字段名
    pub null_opt_in: HashSet<String>,
}

impl PropertyMappingPolicy {
    /// 创建空策略
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加名称映射
    pub fn map_name(mut self, field: &str, external_key: &str) -> Self {
        self.name_overrides.insert(field.to_string(), external_key.to_string());
        self
    }

    /// 标记枚举字段
    pub fn enum_field(mut self, field: &str) -> Self {
        self.enum_fields.insert(field.to_string());
        self
    }

    /// 分解时忽略字段
    pub fn ignore_to_document(mut self, field: &str) -> Self {
        self.ignore_to_document.insert(field.to_string());
        self
    }

    /// 组合时忽略字段
    pub fn ignore_from_document(mut self, field: &str) -> Self {
        self.ignore_from_document.insert(field.to_string());
        self
    }

    /// 空值选入字段
    pub fn null_opt_in(mut self, field: &str) -> Self {
        self.null_opt_in.insert(field.to_string());
        self
    }

    /// 验证名称映射的可逆性
    ///
    /// 两个不同字段映射到同一个外部键是配置错误，
    /// 必须报告冲突的字段而不是静默选择其一
    pub fn validate(&self) -> PropConvResult<()> {
        let mut by_key: HashMap<&str, Vec<&str>> = HashMap::new();
        for (field, key) in &self.name_overrides {
            by_key.entry(key.as_str()).or_default().push(field.as_str());
        }

        for (key, mut fields) in by_key {
            if fields.len() > 1 {
                fields.sort_unstable();
                return Err(PropConvError::AmbiguousMapping {
                    external_key: key.to_string(),
                    fields: fields.into_iter().map(|f| f.to_string()).collect(),
                });
            }
        }

        Ok(())
    }
}

/// 沿祖先链合并后的映射策略
///
/// 层级按最派生优先排列；名称映射采用首个命中（最派生者胜出），
/// 各忽略集与枚举集取并集。合并结果按类型缓存（见 manager 模块）
#[derive(Debug, Clone, Default)]
pub struct MergedMappingPolicy {
    layers: Vec<PropertyMappingPolicy>,
    /// 已验证无歧义的反向映射：外部键 -> 字段名
    inverse: HashMap<String, String>,
}

impl MergedMappingPolicy {
    /// 从最派生优先的策略层构建合并策略
    ///
    /// 同名字段的映射被更派生层遮蔽；不同字段映射到同一外部键时
    /// 报告歧义错误而不是静默取舍
    pub fn from_layers(layers: Vec<PropertyMappingPolicy>) -> PropConvResult<Self> {
        let mut inverse: HashMap<String, String> = HashMap::new();
        let mut resolved_fields: HashSet<String> = HashSet::new();

        for layer in &layers {
            layer.validate()?;
            for (field, key) in &layer.name_overrides {
                if resolved_fields.contains(field) {
                    // 更派生层已决定该字段的映射
                    continue;
                }
                if let Some(existing_field) = inverse.get(key) {
                    if existing_field != field {
                        let mut fields = vec![existing_field.clone(), field.clone()];
                        fields.sort_unstable();
                        return Err(PropConvError::AmbiguousMapping {
                            external_key: key.clone(),
                            fields,
                        });
                    }
                } else {
                    inverse.insert(key.clone(), field.clone());
                }
                resolved_fields.insert(field.clone());
            }
        }

        Ok(Self { layers, inverse })
    }

    /// 字段的外部键：首个声明了映射的层胜出，未映射时返回None
    pub fn external_key_for(&self, field: &str) -> Option<&str> {
        self.layers
            .iter()
            .find_map(|layer| layer.name_overrides.get(field))
            .map(|s| s.as_str())
    }

    /// 外部键的反向查找
    pub fn field_for_external_key(&self, external_key: &str) -> Option<&str> {
        self.inverse.get(external_key).map(|s| s.as_str())
    }

    /// 是否为枚举字段
    pub fn is_enum_field(&self, field: &str) -> bool {
        self.layers.iter().any(|layer| layer.enum_fields.contains(field))
    }

    /// 分解时是否忽略该字段
    pub fn is_ignored_to_document(&self, field: &str) -> bool {
        self.layers.iter().any(|layer| layer.ignore_to_document.contains(field))
    }

    /// 组合时是否忽略该名称（外部键或解析后的字段名）
    pub fn is_ignored_from_document(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.ignore_from_document.contains(name))
    }

    /// 是否为空值选入字段
    pub fn is_null_opt_in(&self, field: &str) -> bool {
        self.layers.iter().any(|layer| layer.null_opt_in.contains(field))
    }
}
