//! 字段类型与属性描述符定义模块
//!
//! 从原始内省数据（类型编码字符串 + 属性特征字符串）构建不可变的属性描述符，
//! 提供转换引擎所需的全部字段元数据

use serde::{Deserialize, Serialize};
use rat_logger::warn;

/// 字段类型枚举
///
/// 由原始类型编码解析得到。编码表：
/// - `bool` - 布尔
/// - `i8`/`i16`/`i32`/`i64` - 有符号整数
/// - `u8`/`u16`/`u32`/`u64` - 无符号整数
/// - `f32`/`f64` - 浮点数
/// - `string` - 字符串
/// - `bytes` - 字节数组
/// - `datetime` - 日期时间
/// - `uuid` - UUID
/// - `record:<类型名>` - 嵌套模型（具体类型）
/// - `record:dynamic` - 嵌套模型（动态类型）
/// - `array` - 有序集合
/// - `set` - 无序集合
/// - `map` - 映射集合
///
/// 其余编码（函数指针、原始结构体等）一律归入 `Opaque`，
/// 分解时跳过、组合时拒绝写入，不做猜测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    /// 布尔类型（按1位整数类别处理）
    Boolean,
    /// 整数类型
    Integer {
        /// 位宽：8/16/32/64
        width: u8,
        /// 是否有符号
        signed: bool,
    },
    /// 浮点数类型
    Float {
        /// 是否为双精度
        double: bool,
    },
    /// 字符串类型
    String,
    /// 二进制类型
    Bytes,
    /// 日期时间类型
    DateTime,
    /// UUID类型
    Uuid,
    /// 嵌套模型类型
    Model {
        /// 目标模型类型名，None表示动态类型
        target: Option<String>,
    },
    /// 有序集合类型
    Array,
    /// 无序集合类型
    Set,
    /// 映射集合类型
    Map,
    /// 不支持的类型（原样保留编码，仅用于诊断）
    Opaque {
        /// 原始编码
        encoding: String,
    },
}

impl FieldType {
    /// 从原始类型编码解析字段类型
    pub fn from_encoding(encoding: &str) -> Self {
        match encoding {
            "bool" => FieldType::Boolean,
            "i8" => FieldType::Integer { width: 8, signed: true },
            "i16" => FieldType::Integer { width: 16, signed: true },
            "i32" => FieldType::Integer { width: 32, signed: true },
            "i64" => FieldType::Integer { width: 64, signed: true },
            "u8" => FieldType::Integer { width: 8, signed: false },
            "u16" => FieldType::Integer { width: 16, signed: false },
            "u32" => FieldType::Integer { width: 32, signed: false },
            "u64" => FieldType::Integer { width: 64, signed: false },
            "f32" => FieldType::Float { double: false },
            "f64" => FieldType::Float { double: true },
            "string" => FieldType::String,
            "bytes" => FieldType::Bytes,
            "datetime" => FieldType::DateTime,
            "uuid" => FieldType::Uuid,
            "array" => FieldType::Array,
            "set" => FieldType::Set,
            "map" => FieldType::Map,
            other => {
                if let Some(target) = other.strip_prefix("record:") {
                    if target == "dynamic" {
                        FieldType::Model { target: None }
                    } else {
                        FieldType::Model { target: Some(target.to_string()) }
                    }
                } else {
                    FieldType::Opaque { encoding: other.to_string() }
                }
            }
        }
    }

    /// 是否为数值类别（整数、浮点、布尔）
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Boolean | FieldType::Integer { .. } | FieldType::Float { .. }
        )
    }

    /// 是否为集合类别
    pub fn is_collection(&self) -> bool {
        matches!(self, FieldType::Array | FieldType::Set | FieldType::Map)
    }

    /// 类型标签，用于错误消息
    pub fn type_label(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Integer { .. } => "integer",
            FieldType::Float { .. } => "float",
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
            FieldType::DateTime => "datetime",
            FieldType::Uuid => "uuid",
            FieldType::Model { .. } => "model",
            FieldType::Array => "array",
            FieldType::Set => "set",
            FieldType::Map => "map",
            FieldType::Opaque { .. } => "opaque",
        }
    }
}

/// 属性写入语义
///
/// 来自属性特征字符串：`C` = 复制，`&` = 共享引用，默认 = 按值赋值。
/// 在Rust侧体现为元数据，描述原始声明的所有权意图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreSemantics {
    /// 按值赋值
    Assign,
    /// 共享引用
    Retain,
    /// 写时复制
    Copy,
}

impl Default for StoreSemantics {
    fn default() -> Self {
        StoreSemantics::Assign
    }
}

/// 原始属性规格
///
/// 由宿主内省能力（define_model! 宏）产出，是描述符的构建输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPropertySpec {
    /// 字段名
    pub name: String,
    /// 原始类型编码
    pub encoding: String,
    /// 属性特征字符串（逗号分隔）
    pub attributes: String,
}

impl RawPropertySpec {
    /// 创建新的原始属性规格
    pub fn new(name: &str, encoding: &str, attributes: &str) -> Self {
        Self {
            name: name.to_string(),
            encoding: encoding.to_string(),
            attributes: attributes.to_string(),
        }
    }
}

/// 属性描述符
///
/// 描述一个模型字段的全部转换元数据。构建后不可变，
/// 按（类型名，字段名）缓存并在进程内共享
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// 字段名，在一个类型的描述符集合内唯一
    pub name: String,
    /// 字段类型类别
    pub field_type: FieldType,
    /// 后备存储名，动态字段为None
    pub storage_name: Option<String>,
    /// 自定义取值器名
    pub custom_getter: Option<String>,
    /// 自定义设值器名
    pub custom_setter: Option<String>,
    /// 是否只读（只读字段没有设值器）
    pub read_only: bool,
    /// 是否为弱引用（默认不参与转换，用于打破循环图）
    pub weak: bool,
    /// 是否为动态字段（无后备存储）
    pub dynamic: bool,
    /// 写入语义
    pub store_semantics: StoreSemantics,
}

impl PropertyDescriptor {
    /// 从原始内省数据构建描述符
    ///
    /// 属性特征字符串按逗号分隔解析，可识别的记号：
    /// - `R` 只读
    /// - `C` 写时复制
    /// - `&` 共享引用
    /// - `N` 非原子（容忍但不保留）
    /// - `W` 弱引用
    /// - `D` 动态（无后备存储）
    /// - `G=<名称>` 自定义取值器
    /// - `S=<名称>` 自定义设值器
    /// - `V=<名称>` 后备存储名
    ///
    /// 未知记号容忍并忽略，不会导致失败。
    /// `responds` 回调由宿主内省能力提供，回答类型是否响应给定的访问器名
    pub fn from_raw(spec: &RawPropertySpec, responds: &dyn Fn(&str) -> bool) -> Self {
        let mut read_only = false;
        let mut weak = false;
        let mut dynamic = false;
        let mut store_semantics = StoreSemantics::Assign;
        let mut custom_getter = None;
        let mut custom_setter = None;
        let mut storage_token = None;

        for token in spec.attributes.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token {
                "R" => read_only = true,
                "C" => store_semantics = StoreSemantics::Copy,
                "&" => store_semantics = StoreSemantics::Retain,
                "N" => {}
                "W" => weak = true,
                "D" => dynamic = true,
                _ => {
                    if let Some(getter) = token.strip_prefix("G=") {
                        custom_getter = Some(getter.to_string());
                    } else if let Some(setter) = token.strip_prefix("S=") {
                        custom_setter = Some(setter.to_string());
                    } else if let Some(storage) = token.strip_prefix("V=") {
                        storage_token = Some(storage.to_string());
                    }
                    // 未知记号：容忍未来扩展，静默忽略
                }
            }
        }

        // 后备存储名推导：动态字段没有存储；
        // 默认 `_<name>`，该存储不存在时回退为裸字段名
        let storage_name = if dynamic {
            None
        } else if let Some(storage) = storage_token {
            Some(storage)
        } else {
            let underscored = format!("_{}", spec.name);
            if responds(&underscored) {
                Some(underscored)
            } else {
                Some(spec.name.clone())
            }
        };

        let descriptor = Self {
            name: spec.name.clone(),
            field_type: FieldType::from_encoding(&spec.encoding),
            storage_name,
            custom_getter,
            custom_setter,
            read_only,
            weak,
            dynamic,
            store_semantics,
        };

        // 不变量：每个描述符都必须有可解析的取值器
        if !responds(descriptor.getter()) {
            warn!(
                "属性 {} 的取值器 {} 不可解析，转换时将跳过该字段",
                descriptor.name,
                descriptor.getter()
            );
        }

        descriptor
    }

    /// 取值器名：自定义名优先，默认与字段同名
    pub fn getter(&self) -> &str {
        self.custom_getter.as_deref().unwrap_or(&self.name)
    }

    /// 设值器名：只读字段返回None，自定义名优先，默认为 `set_<name>`
    pub fn setter(&self) -> Option<String> {
        if self.read_only {
            return None;
        }
        match &self.custom_setter {
            Some(setter) => Some(setter.clone()),
            None => Some(format!("set_{}", self.name)),
        }
    }

    /// 是否为不支持的类型
    pub fn is_opaque(&self) -> bool {
        matches!(self.field_type, FieldType::Opaque { .. })
    }
}

/// 从属性特征字符串中提取自定义取值器名
///
/// 供宏生成的访问器分发代码在运行时使用
pub fn custom_getter_in_attributes(attributes: &str) -> Option<&str> {
    attributes
        .split(',')
        .map(str::trim)
        .find_map(|token| token.strip_prefix("G="))
}

/// 从属性特征字符串中提取自定义设值器名
pub fn custom_setter_in_attributes(attributes: &str) -> Option<&str> {
    attributes
        .split(',')
        .map(str::trim)
        .find_map(|token| token.strip_prefix("S="))
}
