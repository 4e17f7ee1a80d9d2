//! 转换引擎模块
//!
//! Converter 是核心编排者：对外提供 decompose（模型 -> 文档）与
//! compose（文档 -> 模型）入口，持有输出模式、类型识别策略和
//! 各类转换挂钩。实例一旦配置完成即无调用间可变状态，
//! 可以安全地跨线程复用于相互独立的转换调用

pub mod coercion;
pub mod compose;
pub mod decompose;

use std::collections::{HashMap, HashSet};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::types::DataValue;

pub use compose::FindResult;

/// 输出模式 - 决定分解产物的合规目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// 不受限输出：所有可表示的值原样通过
    Full,
    /// 属性列表安全输出：空值被丢弃，日期与字节合法
    PropertyList,
    /// JSON安全输出：非有限浮点数被丢弃，日期经convert_from_date转换，
    /// 非字符串映射键被丢弃
    Json,
}

/// 类型识别策略：嵌套文档 -> 已注册的模型类型名（None表示保持文档形式）
pub type IdentifyDocumentFn = dyn Fn(&HashMap<String, DataValue>) -> Option<String> + Send + Sync;

/// 模型可转换性判定
pub type ShouldConvertFn = dyn Fn(&str) -> bool + Send + Sync;

/// 文档值 -> 日期的转换挂钩
pub type ConvertToDateFn = dyn Fn(&DataValue) -> Option<DateTime<FixedOffset>> + Send + Sync;

/// 日期 -> 文档值的转换挂钩
pub type ConvertFromDateFn = dyn Fn(&DateTime<FixedOffset>) -> DataValue + Send + Sync;

/// 数值字符串解析器：解析失败返回None（目标字段保持未设置）
pub type ParseNumberFn = dyn Fn(&str) -> Option<DataValue> + Send + Sync;

/// 模型与文档的双向转换器
pub struct Converter {
    pub(crate) output_mode: OutputMode,
    pub(crate) identify_document: Option<Box<IdentifyDocumentFn>>,
    pub(crate) classes_to_convert: HashSet<String>,
    pub(crate) should_convert: Option<Box<ShouldConvertFn>>,
    pub(crate) convert_to_date: Option<Box<ConvertToDateFn>>,
    pub(crate) convert_from_date: Option<Box<ConvertFromDateFn>>,
    pub(crate) convert_weak_properties: bool,
    pub(crate) enable_snake_case: bool,
    pub(crate) parse_numeric_strings: Option<Box<ParseNumberFn>>,
}

impl Converter {
    /// 以指定输出模式创建转换器，其余配置取默认值
    pub fn with_output_mode(output_mode: OutputMode) -> Self {
        Self {
            output_mode,
            identify_document: None,
            classes_to_convert: HashSet::new(),
            should_convert: None,
            convert_to_date: None,
            convert_from_date: None,
            convert_weak_properties: false,
            enable_snake_case: false,
            parse_numeric_strings: None,
        }
    }

    /// 创建转换器构建器
    pub fn builder(output_mode: OutputMode) -> ConverterBuilder {
        ConverterBuilder::new(output_mode)
    }

    /// 当前输出模式
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// 判定模型类型是否参与分解
    ///
    /// 每次调用即时求值（判定可能依赖动态配置），不做缓存
    pub(crate) fn should_convert_model(&self, type_name: &str) -> bool {
        if self.classes_to_convert.contains(type_name) {
            return true;
        }
        match &self.should_convert {
            Some(predicate) => predicate(type_name),
            None => false,
        }
    }

    /// 标准数值字符串解析器：先尝试整数，再尝试有限浮点数
    pub fn standard_number_parser() -> Box<ParseNumberFn> {
        Box::new(|s: &str| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Some(DataValue::Int(i));
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Some(DataValue::Float(f)),
                _ => None,
            }
        })
    }
}

/// 转换器构建器
///
/// 链式配置各可选项，所有挂钩彼此独立、均可缺省
pub struct ConverterBuilder {
    converter: Converter,
}

impl ConverterBuilder {
    /// 以指定输出模式创建构建器
    pub fn new(output_mode: OutputMode) -> Self {
        Self {
            converter: Converter::with_output_mode(output_mode),
        }
    }

    /// 设置类型识别策略
    pub fn identify_document<F>(mut self, f: F) -> Self
    where
        F: Fn(&HashMap<String, DataValue>) -> Option<String> + Send + Sync + 'static,
    {
        self.converter.identify_document = Some(Box::new(f));
        self
    }

    /// 添加参与转换的模型类型名
    pub fn convert_class(mut self, type_name: &str) -> Self {
        self.converter.classes_to_convert.insert(type_name.to_string());
        self
    }

    /// 设置模型可转换性判定函数
    pub fn should_convert<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.converter.should_convert = Some(Box::new(f));
        self
    }

    /// 设置文档值 -> 日期的转换挂钩
    pub fn convert_to_date<F>(mut self, f: F) -> Self
    where
        F: Fn(&DataValue) -> Option<DateTime<FixedOffset>> + Send + Sync + 'static,
    {
        self.converter.convert_to_date = Some(Box::new(f));
        self
    }

    /// 设置日期 -> 文档值的转换挂钩
    pub fn convert_from_date<F>(mut self, f: F) -> Self
    where
        F: Fn(&DateTime<FixedOffset>) -> DataValue + Send + Sync + 'static,
    {
        self.converter.convert_from_date = Some(Box::new(f));
        self
    }

    /// 是否转换弱引用属性（默认false，作为循环图的断路器）
    pub fn convert_weak_properties(mut self, enabled: bool) -> Self {
        self.converter.convert_weak_properties = enabled;
        self
    }

    /// 启用snake_case支持：组合时折叠外部键，分解时输出snake_case键
    pub fn enable_snake_case(mut self, enabled: bool) -> Self {
        self.converter.enable_snake_case = enabled;
        self
    }

    /// 设置数值字符串解析器
    pub fn parse_numeric_strings<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Option<DataValue> + Send + Sync + 'static,
    {
        self.converter.parse_numeric_strings = Some(Box::new(f));
        self
    }

    /// 使用标准数值字符串解析器
    pub fn with_standard_number_parser(mut self) -> Self {
        self.converter.parse_numeric_strings = Some(Converter::standard_number_parser());
        self
    }

    /// 完成构建
    pub fn build(self) -> Converter {
        self.converter
    }
}
