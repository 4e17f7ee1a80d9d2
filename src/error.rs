//! 错误类型定义模块
//!
//! 提供统一的错误类型和结果别名，错误消息支持多语言（见 i18n 模块）

use thiserror::Error;

/// rat_propconv 统一错误类型
#[derive(Error, Debug)]
pub enum PropConvError {
    /// 配置错误（构建转换器或注册模型时的结构性问题）
    #[error("配置错误: {message}")]
    ConfigError {
        /// 错误消息
        message: String,
    },

    /// 验证错误（字段级别的数据问题）
    #[error("验证错误 [{field}]: {message}")]
    ValidationError {
        /// 出错的字段名
        field: String,
        /// 错误消息
        message: String,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    SerializationError {
        /// 错误消息
        message: String,
    },

    /// 转换错误（单个值无法转换为目标类型）
    #[error("转换错误: {message}")]
    ConversionError {
        /// 错误消息
        message: String,
    },

    /// 模型未注册
    #[error("模型未注册: {type_name}")]
    ModelNotRegistered {
        /// 模型类型名
        type_name: String,
    },

    /// 名称映射冲突：多个字段映射到同一个外部键
    #[error("名称映射冲突: 字段 {fields:?} 都映射到外部键 '{external_key}'")]
    AmbiguousMapping {
        /// 冲突的外部键
        external_key: String,
        /// 冲突的字段名列表
        fields: Vec<String>,
    },
}

/// rat_propconv 统一结果类型
pub type PropConvResult<T> = Result<T, PropConvError>;

/// 便捷宏：快速构造错误
///
/// 用法：
/// - `quick_error!(config, message)`
/// - `quick_error!(validation, field, message)`
/// - `quick_error!(serialization, message)`
/// - `quick_error!(conversion, message)`
/// - `quick_error!(not_registered, type_name)`
#[macro_export]
macro_rules! quick_error {
    (config, $msg:expr) => {
        $crate::error::PropConvError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (validation, $field:expr, $msg:expr) => {
        $crate::error::PropConvError::ValidationError {
            field: $field.to_string(),
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::PropConvError::SerializationError {
            message: $msg.to_string(),
        }
    };
    (conversion, $msg:expr) => {
        $crate::error::PropConvError::ConversionError {
            message: $msg.to_string(),
        }
    };
    (not_registered, $type_name:expr) => {
        $crate::error::PropConvError::ModelNotRegistered {
            type_name: $type_name.to_string(),
        }
    };
}

impl From<serde_json::Error> for PropConvError {
    fn from(e: serde_json::Error) -> Self {
        PropConvError::SerializationError {
            message: crate::i18n::tf("error.json_serialize", &[("message", &e.to_string())]),
        }
    }
}
