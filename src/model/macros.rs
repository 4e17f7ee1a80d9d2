//! 模型相关的宏定义
//!
//! define_model! 是宿主内省能力的声明入口：为结构体生成 Model 实现、
//! 访问器分发、属性规格和注册逻辑。字段列表与 fields 块必须一一对应，
//! fields 块中每个字段给出（类型编码，属性特征字符串）

/// 便捷宏：定义模型
///
/// ```ignore
/// define_model! {
///     /// 用户模型
///     struct User {
///         first_name: String,
///         age: i64,
///     }
///     type_name = "User",
///     fields = {
///         first_name: ("string", "C"),
///         age: ("i64", ""),
///     }
/// }
/// ```
///
/// 可选段（按顺序）：
/// - `extends = ParentType,` 继承父模型的属性（父实例作为隐藏字段嵌入，
///   枚举挂钩沿链委托；extends 与 enum_to/enum_from 不可同时使用）
/// - `mapping = <PropertyMappingPolicy表达式>,` 映射策略
/// - `enum_to = <fn路径>,` 枚举 -> 文档转换挂钩
/// - `enum_from = <fn路径>,` 文档 -> 枚举转换挂钩
#[macro_export]
macro_rules! define_model {
    (
        $(#[$meta:meta])*
        struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident: $field_type:ty,
            )*
        }

        type_name = $type_name:expr,
        $(
            extends = $parent:ty,
        )?
        fields = {
            $(
                $field_name:ident: ($encoding:expr, $attrs:expr),
            )*
        }
        $(
            mapping = $mapping:expr,
        )?
        $(
            enum_to = $enum_to:path,
        )?
        $(
            enum_from = $enum_from:path,
        )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $field_type,
            )*
            $(
                /// 父模型实例（继承属性的存储）
                pub __super: $parent,
            )?
        }

        impl $crate::model::Model for $name {
            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn get_property(&self, getter: &str) -> Option<$crate::model::PropertyValue> {
                $(
                    if getter == stringify!($field_name)
                        || $crate::model::field_types::custom_getter_in_attributes($attrs)
                            == Some(getter)
                    {
                        return Some($crate::model::conversion::ToPropertyValue::to_property_value(
                            &self.$field_name,
                        ));
                    }
                )*
                #[allow(unused_variables)]
                let fallback: Option<$crate::model::PropertyValue> = None;
                $(
                    let fallback: Option<$crate::model::PropertyValue> =
                        <$parent as $crate::model::Model>::get_property(&self.__super, getter);
                )?
                fallback
            }

            fn set_property(
                &mut self,
                setter: &str,
                value: $crate::model::PropertyValue,
            ) -> $crate::error::PropConvResult<bool> {
                $(
                    if setter == concat!("set_", stringify!($field_name))
                        || $crate::model::field_types::custom_setter_in_attributes($attrs)
                            == Some(setter)
                    {
                        self.$field_name =
                            $crate::model::conversion::FromPropertyValue::from_property_value(
                                value,
                            )?;
                        return Ok(true);
                    }
                )*
                #[allow(unused_variables)]
                let fallback: $crate::error::PropConvResult<bool> = Ok(false);
                $(
                    let fallback: $crate::error::PropConvResult<bool> =
                        <$parent as $crate::model::Model>::set_property(
                            &mut self.__super,
                            setter,
                            value,
                        );
                )?
                fallback
            }

            fn clone_model(&self) -> Box<dyn $crate::model::Model> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
                self
            }

            // 派生模型沿链委托枚举挂钩（父级枚举字段存储在父实例中）
            $(
                fn enum_to_document(&self, property_name: &str) -> Option<$crate::types::DataValue> {
                    <$parent as $crate::model::Model>::enum_to_document(&self.__super, property_name)
                }

                fn enum_from_document(
                    &mut self,
                    property_name: &str,
                    value: &$crate::types::DataValue,
                ) -> bool {
                    <$parent as $crate::model::Model>::enum_from_document(
                        &mut self.__super,
                        property_name,
                        value,
                    )
                }
            )?

            $(
                fn enum_to_document(&self, property_name: &str) -> Option<$crate::types::DataValue> {
                    $enum_to(self, property_name)
                }
            )?

            $(
                fn enum_from_document(
                    &mut self,
                    property_name: &str,
                    value: &$crate::types::DataValue,
                ) -> bool {
                    $enum_from(self, property_name, value)
                }
            )?
        }

        impl $name {
            /// 获取模型元数据（首次调用时自动注册到全局注册表）
            pub fn meta() -> $crate::model::ModelMeta {
                let mut properties = Vec::new();
                $(
                    properties.push($crate::model::RawPropertySpec::new(
                        stringify!($field_name),
                        $encoding,
                        $attrs,
                    ));
                )*

                #[allow(unused_mut, unused_assignments)]
                let mut mapping = $crate::model::PropertyMappingPolicy::new();
                $(
                    mapping = $mapping;
                )?

                let parent: Option<String> = None $(.or(Some(<$parent>::meta().type_name)))?;

                let model_meta = $crate::model::ModelMeta {
                    type_name: $type_name.to_string(),
                    parent,
                    properties,
                    mapping,
                    description: None,
                };

                // 自动注册模型元数据（仅在首次调用时注册）
                static ONCE: std::sync::Once = std::sync::Once::new();
                ONCE.call_once(|| {
                    if let Err(e) = $crate::manager::register_model(
                        model_meta.clone(),
                        || Box::new(<$name as Default>::default()),
                        Self::__responds,
                    ) {
                        eprintln!("⚠️  模型注册失败: {}", e);
                    }
                });

                model_meta
            }

            /// 访问器存在性检查（宿主内省能力的一部分）
            #[doc(hidden)]
            pub fn __responds(name: &str) -> bool {
                $(
                    if name == stringify!($field_name)
                        || name == concat!("set_", stringify!($field_name))
                        || $crate::model::field_types::custom_getter_in_attributes($attrs)
                            == Some(name)
                        || $crate::model::field_types::custom_setter_in_attributes($attrs)
                            == Some(name)
                    {
                        return true;
                    }
                )*
                #[allow(unused_variables)]
                let fallback = false;
                $(
                    let fallback = <$parent>::__responds(name);
                )?
                fallback
            }
        }

        impl $crate::model::conversion::ToPropertyValue for $name {
            fn to_property_value(&self) -> $crate::model::PropertyValue {
                $crate::model::PropertyValue::Model(Box::new(self.clone()))
            }
        }

        impl $crate::model::conversion::ToPropertyValue for Vec<$name> {
            fn to_property_value(&self) -> $crate::model::PropertyValue {
                $crate::model::PropertyValue::Array(
                    self.iter()
                        .map(|m| $crate::model::conversion::ToPropertyValue::to_property_value(m))
                        .collect(),
                )
            }
        }

        impl $crate::model::conversion::FromPropertyValue for $name {
            fn from_property_value(
                value: $crate::model::PropertyValue,
            ) -> $crate::error::PropConvResult<Self> {
                match value {
                    $crate::model::PropertyValue::Model(m) => {
                        let actual = $crate::model::Model::type_name(m.as_ref()).to_string();
                        $crate::model::Model::into_any(m)
                            .downcast::<$name>()
                            .map(|boxed| *boxed)
                            .map_err(|_| {
                                $crate::quick_error!(
                                    conversion,
                                    format!("模型类型不匹配，期望 {}，实际 {}", $type_name, actual)
                                )
                            })
                    }
                    other => Err($crate::quick_error!(
                        conversion,
                        format!("期望模型 {}，实际收到: {}", $type_name, other.type_label())
                    )),
                }
            }
        }

        impl $crate::model::conversion::FromPropertyValue for Vec<$name> {
            fn from_property_value(
                value: $crate::model::PropertyValue,
            ) -> $crate::error::PropConvResult<Self> {
                match value {
                    $crate::model::PropertyValue::Array(items)
                    | $crate::model::PropertyValue::Set(items) => items
                        .into_iter()
                        .map(<$name as $crate::model::conversion::FromPropertyValue>::from_property_value)
                        .collect(),
                    other => Err($crate::quick_error!(
                        conversion,
                        format!("期望 {} 的数组，实际收到: {}", $type_name, other.type_label())
                    )),
                }
            }
        }
    };
}
