//! rat_propconv - 模型与文档的双向转换库
//!
//! 在类型化模型记录与松散类型的文档表示之间做通用转换：
//! 分解（decompose）把任意模型实例递归拆解为字段名到基础值的映射，
//! 组合（compose）把动态文档按内省得到的属性元数据重建为模型实例。
//! 字段集合不需要预先静态可知——属性查找器在运行时枚举模型类型的
//! 属性描述符（名称、类型类别、访问器、读写语义），转换引擎据此
//! 在开放的模型类型集合上泛化工作，类型不兼容时按省略策略降级而不崩溃

// 导出所有公共模块
pub mod converter;
pub mod error;
pub mod i18n;
pub mod manager;
pub mod model;
pub mod types;
pub mod utils;

// 重新导出常用类型和函数
pub use converter::{Converter, ConverterBuilder, FindResult, OutputMode};
pub use error::{PropConvError, PropConvResult};
pub use manager::{create_instance, has_model, merged_mapping, register_model, registered_models};
pub use model::{
    FieldType, FromPropertyValue, MergedMappingPolicy, Model, ModelMeta, PropertyDescriptor,
    PropertyFinder, PropertyMappingPolicy, PropertyValue, RawPropertySpec, StoreSemantics,
    ToPropertyValue,
};
pub use types::{DataValue, json_value_to_data_value};

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_propconv库
///
/// 这个函数会初始化多语言错误消息系统
///
/// 注意：日志系统由调用者自行初始化，本库不再自动初始化日志
pub fn init() {
    // 初始化多语言错误消息系统
    i18n::ErrorMessageI18n::init();

    // 库的基本初始化逻辑
    // 日志系统由调用者负责初始化
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
