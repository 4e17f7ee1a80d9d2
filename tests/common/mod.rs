//! 测试共享的模型定义与转换器构造
//!
//! 模型通过 define_model! 声明，覆盖基础类型、嵌套模型、集合、
//! 自定义访问器、弱引用、只读与不支持类型等字段形态

#![allow(dead_code)]

use std::collections::HashMap;

use rat_propconv::{
    define_model, Converter, DataValue, OutputMode, PropertyMappingPolicy,
};

define_model! {
    /// 地址模型
    struct Address {
        street: String,
        city: String,
        country: String,
    }
    type_name = "Address",
    fields = {
        street: ("string", "C"),
        city: ("string", "C"),
        country: ("string", "C"),
    }
}

define_model! {
    /// 用户模型
    struct User {
        first_name: String,
        last_name: String,
        age: i64,
        address_information: Option<Address>,
        dob: Option<chrono::DateTime<chrono::FixedOffset>>,
        favorites: Vec<String>,
        information: HashMap<String, DataValue>,
        encoded_information: Vec<u8>,
        user_id: uuid::Uuid,
    }
    type_name = "User",
    fields = {
        first_name: ("string", "C"),
        last_name: ("string", "C"),
        age: ("i64", ""),
        address_information: ("record:Address", "&"),
        dob: ("datetime", "&"),
        favorites: ("array", "&"),
        information: ("map", "&"),
        encoded_information: ("bytes", "&"),
        user_id: ("uuid", ""),
    }
}

/// TestModel 的枚举字段转换：整数存储 <-> 文档字符串
pub fn test_model_enum_to(model: &TestModel, property_name: &str) -> Option<DataValue> {
    if property_name != "enum_property" {
        return None;
    }
    let label = match model.enum_property {
        0 => "type_a",
        1 => "type_b",
        _ => return None,
    };
    Some(DataValue::String(label.to_string()))
}

pub fn test_model_enum_from(model: &mut TestModel, property_name: &str, value: &DataValue) -> bool {
    if property_name != "enum_property" {
        return false;
    }
    if let DataValue::String(s) = value {
        match s.as_str() {
            "type_a" => model.enum_property = 0,
            "type_b" => model.enum_property = 1,
            _ => return false,
        }
        return true;
    }
    false
}

define_model! {
    /// 覆盖各字段形态的综合测试模型
    struct TestModel {
        test_model_id: String,
        int_property: i64,
        string_property: String,
        model_property: Option<Box<TestModel>>,
        array_property: Vec<String>,
        dictionary_property: HashMap<String, DataValue>,
        int_keyed_map: HashMap<i64, String>,
        date_property: Option<chrono::DateTime<chrono::FixedOffset>>,
        bytes_property: Vec<u8>,
        bool_property: bool,
        read_only_property: String,
        active: bool,
        weak_property: Option<Box<TestModel>>,
        block_property: Option<String>,
        different_name_property: String,
        enum_property: i64,
        ignore_property: String,
    }
    type_name = "TestModel",
    fields = {
        test_model_id: ("string", "C"),
        int_property: ("i64", ""),
        string_property: ("string", "N,C"),
        model_property: ("record:TestModel", "&"),
        array_property: ("array", "&"),
        dictionary_property: ("map", "&"),
        int_keyed_map: ("map", "&"),
        date_property: ("datetime", "&"),
        bytes_property: ("bytes", "&"),
        bool_property: ("bool", ""),
        read_only_property: ("string", "R,C"),
        active: ("bool", "G=is_active,S=make_active"),
        weak_property: ("record:TestModel", "W,&"),
        block_property: ("fn(id)", "C"),
        different_name_property: ("string", "C"),
        enum_property: ("i64", "N"),
        ignore_property: ("string", "N,C"),
    }
    mapping = PropertyMappingPolicy::new()
        .map_name("different_name_property", "differentName")
        .enum_field("enum_property")
        .ignore_to_document("ignore_property")
        .ignore_from_document("ignore_property"),
    enum_to = test_model_enum_to,
    enum_from = test_model_enum_from,
}

define_model! {
    /// TestModel 的派生模型
    struct TestModelSubclass {
        subclass_string_property: String,
    }
    type_name = "TestModelSubclass",
    extends = TestModel,
    fields = {
        subclass_string_property: ("string", "C"),
    }
}

define_model! {
    /// 空值选入行为的测试模型
    struct OptInNullModel {
        int_property: i64,
        string_property: Option<String>,
        number_property: Option<i64>,
        array_property: Option<Vec<String>>,
    }
    type_name = "OptInNullModel",
    fields = {
        int_property: ("i64", ""),
        string_property: ("string", "C"),
        number_property: ("i64", "&"),
        array_property: ("array", "&"),
    }
    mapping = PropertyMappingPolicy::new()
        .map_name("string_property", "strProperty")
        .null_opt_in("string_property")
        .null_opt_in("array_property"),
}

define_model! {
    /// 数值强制转换的测试模型
    struct NumberModel {
        bool_property: bool,
        int_property: i32,
        float_property: f32,
        double_property: f64,
        long_long_property: i64,
        string_property: String,
        number_property: Option<f64>,
        bool_number_property: Option<bool>,
    }
    type_name = "NumberModel",
    fields = {
        bool_property: ("bool", ""),
        int_property: ("i32", ""),
        float_property: ("f32", ""),
        double_property: ("f64", ""),
        long_long_property: ("i64", ""),
        string_property: ("string", "C"),
        number_property: ("f64", "&"),
        bool_number_property: ("bool", "&"),
    }
}

/// 注册所有测试模型
pub fn register_all_models() {
    let _ = Address::meta();
    let _ = User::meta();
    let _ = TestModel::meta();
    let _ = TestModelSubclass::meta();
    let _ = OptInNullModel::meta();
    let _ = NumberModel::meta();
}

/// 按嵌套文档的标志键识别模型类型
pub fn identify_test_document(document: &HashMap<String, DataValue>) -> Option<String> {
    if document.contains_key("street") {
        return Some("Address".to_string());
    }
    if document.contains_key("first_name") || document.contains_key("firstName") {
        return Some("User".to_string());
    }
    if document.contains_key("subclass_string_property") {
        return Some("TestModelSubclass".to_string());
    }
    if document.contains_key("int_property") && document.contains_key("string_property") {
        return Some("TestModel".to_string());
    }
    None
}

/// 构造测试用转换器：注册全部模型类型并配置识别策略
pub fn test_converter(output_mode: OutputMode) -> Converter {
    register_all_models();
    Converter::builder(output_mode)
        .identify_document(identify_test_document)
        .convert_class("Address")
        .convert_class("User")
        .convert_class("TestModel")
        .convert_class("TestModelSubclass")
        .convert_class("OptInNullModel")
        .convert_class("NumberModel")
        .build()
}

/// 构造一个填充了数据的 TestModel
pub fn populated_test_model() -> TestModel {
    let mut dictionary = HashMap::new();
    dictionary.insert("key1".to_string(), DataValue::String("value1".to_string()));
    dictionary.insert("count".to_string(), DataValue::Int(7));

    let mut int_keyed = HashMap::new();
    int_keyed.insert(1_i64, "one".to_string());

    TestModel {
        test_model_id: "m-001".to_string(),
        int_property: 42,
        string_property: "hello".to_string(),
        model_property: None,
        array_property: vec!["a".to_string(), "b".to_string()],
        dictionary_property: dictionary,
        int_keyed_map: int_keyed,
        date_property: Some(
            chrono::DateTime::parse_from_rfc3339("2024-05-01T12:00:00+00:00").unwrap(),
        ),
        bytes_property: vec![1, 2, 3],
        bool_property: true,
        read_only_property: String::new(),
        active: true,
        weak_property: None,
        block_property: None,
        different_name_property: "mapped".to_string(),
        enum_property: 1,
        ignore_property: "secret".to_string(),
    }
}
