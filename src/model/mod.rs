//! 模型定义系统模块
//!
//! 提供属性描述符、属性查找器、映射策略和模型特征，
//! 以及声明式的 define_model! 宏

pub mod conversion;
pub mod field_types;
pub mod finder;
pub mod macros;
pub mod mapping;
pub mod traits;

// 重新导出核心类型
pub use conversion::{FromPropertyValue, ToPropertyValue};
pub use field_types::{FieldType, PropertyDescriptor, RawPropertySpec, StoreSemantics};
pub use finder::PropertyFinder;
pub use mapping::{MergedMappingPolicy, PropertyMappingPolicy};
pub use traits::{Model, ModelMeta, PropertyValue};
