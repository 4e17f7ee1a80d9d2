//! 分解路径（模型 -> 文档）的集成测试

mod common;

use common::*;
use rat_propconv::{Converter, DataValue, OutputMode, PropertyValue};
use std::collections::HashMap;

/// 不受限模式下的基础分解
#[test]
fn test_decompose_basic_full() {
    let converter = test_converter(OutputMode::Full);
    let model = populated_test_model();

    let document = converter.decompose(&model).expect("分解失败");
    println!("🔍 分解结果: {:?}", document);

    assert_eq!(document.get("int_property"), Some(&DataValue::Int(42)));
    assert_eq!(
        document.get("string_property"),
        Some(&DataValue::String("hello".to_string()))
    );
    assert_eq!(document.get("bool_property"), Some(&DataValue::Bool(true)));
    assert_eq!(
        document.get("array_property"),
        Some(&DataValue::Array(vec![
            DataValue::String("a".to_string()),
            DataValue::String("b".to_string()),
        ]))
    );
    // 自定义取值器的字段照常读取
    assert_eq!(document.get("active"), Some(&DataValue::Bool(true)));
    // 日期在不受限模式下原样保留
    assert!(matches!(document.get("date_property"), Some(DataValue::DateTime(_))));
    // 字节字段保留为字节叶子
    assert_eq!(
        document.get("bytes_property"),
        Some(&DataValue::Bytes(vec![1, 2, 3]))
    );

    // 名称映射：字段名被外部键替换
    assert_eq!(
        document.get("differentName"),
        Some(&DataValue::String("mapped".to_string()))
    );
    assert!(!document.contains_key("different_name_property"));

    // 枚举字段经转换挂钩输出
    assert_eq!(
        document.get("enum_property"),
        Some(&DataValue::String("type_b".to_string()))
    );

    // 忽略列表与弱引用、不支持类型的字段不出现
    assert!(!document.contains_key("ignore_property"));
    assert!(!document.contains_key("weak_property"));
    assert!(!document.contains_key("block_property"));
}

/// 不受限模式保留非字符串键的映射条目（键字符串化）
#[test]
fn test_decompose_full_keeps_non_string_keys() {
    let converter = test_converter(OutputMode::Full);
    let model = populated_test_model();

    let document = converter.decompose(&model).expect("分解失败");

    let DataValue::Object(map) = document.get("int_keyed_map").expect("缺少int_keyed_map") else {
        panic!("int_keyed_map 应当是对象");
    };
    assert_eq!(map.get("1"), Some(&DataValue::String("one".to_string())));
}

/// JSON模式丢弃非字符串键的映射条目
#[test]
fn test_decompose_json_drops_non_string_keys() {
    let converter = test_converter(OutputMode::Json);
    let model = populated_test_model();

    let document = converter.decompose(&model).expect("分解失败");

    let DataValue::Object(map) = document.get("int_keyed_map").expect("缺少int_keyed_map") else {
        panic!("int_keyed_map 应当是对象");
    };
    assert!(map.is_empty(), "非字符串键的条目应当被丢弃");
}

/// JSON模式下日期经convert_from_date转换，缺少挂钩时丢弃
#[test]
fn test_decompose_json_date_conversion() {
    register_all_models();

    // 无日期挂钩：日期字段被丢弃
    let bare = Converter::builder(OutputMode::Json)
        .convert_class("TestModel")
        .build();
    let model = populated_test_model();
    let document = bare.decompose(&model).expect("分解失败");
    assert!(!document.contains_key("date_property"));

    // 配置纪元秒挂钩：日期变为整数
    let with_hook = Converter::builder(OutputMode::Json)
        .convert_class("TestModel")
        .convert_from_date(|dt| DataValue::Int(dt.timestamp()))
        .build();
    let document = with_hook.decompose(&model).expect("分解失败");
    assert_eq!(
        document.get("date_property"),
        Some(&DataValue::Int(1714564800))
    );
}

/// 弱引用默认跳过，显式开启后参与转换
#[test]
fn test_decompose_weak_properties_opt_in() {
    register_all_models();
    let mut model = populated_test_model();
    model.weak_property = Some(Box::new(populated_test_model()));

    let default_converter = test_converter(OutputMode::Full);
    let document = default_converter.decompose(&model).expect("分解失败");
    assert!(!document.contains_key("weak_property"), "弱引用默认不转换");

    let opt_in = Converter::builder(OutputMode::Full)
        .convert_class("TestModel")
        .convert_weak_properties(true)
        .build();
    let document = opt_in.decompose(&model).expect("分解失败");
    assert!(matches!(document.get("weak_property"), Some(DataValue::Object(_))));
}

/// 未被判定为可转换的嵌套模型被丢弃
#[test]
fn test_decompose_unconverted_model_dropped() {
    register_all_models();
    let converter = Converter::builder(OutputMode::Full)
        .convert_class("User")
        // 故意不注册 Address
        .build();

    let mut user = User::default();
    user.first_name = "Ann".to_string();
    user.address_information = Some(Address {
        street: "Elm St".to_string(),
        city: "Springfield".to_string(),
        country: "US".to_string(),
    });

    let document = converter.decompose(&user).expect("分解失败");
    assert!(!document.contains_key("address_information"));
}

/// 嵌套模型递归分解为嵌套文档
#[test]
fn test_decompose_nested_model() {
    let converter = test_converter(OutputMode::Full);

    let mut user = User::default();
    user.first_name = "Ann".to_string();
    user.address_information = Some(Address {
        street: "Elm St".to_string(),
        city: "Springfield".to_string(),
        country: "US".to_string(),
    });

    let document = converter.decompose(&user).expect("分解失败");
    let DataValue::Object(address) = document.get("address_information").expect("缺少嵌套模型")
    else {
        panic!("address_information 应当是对象");
    };
    assert_eq!(address.get("street"), Some(&DataValue::String("Elm St".to_string())));
    assert_eq!(address.get("city"), Some(&DataValue::String("Springfield".to_string())));
}

/// 规格场景：User{first_name, age, dob}，日期转纪元秒
#[test]
fn test_decompose_user_date_epoch_scenario() {
    register_all_models();
    let converter = Converter::builder(OutputMode::Json)
        .convert_class("User")
        .convert_class("Address")
        .convert_from_date(|dt| DataValue::Int(dt.timestamp()))
        .build();

    let mut user = User::default();
    user.first_name = "Ann".to_string();
    user.age = 30;
    user.dob = Some(chrono::DateTime::parse_from_rfc3339("1994-05-01T00:00:00+00:00").unwrap());

    let document = converter.decompose(&user).expect("分解失败");
    assert_eq!(document.get("first_name"), Some(&DataValue::String("Ann".to_string())));
    assert_eq!(document.get("age"), Some(&DataValue::Int(30)));
    assert_eq!(document.get("dob"), Some(&DataValue::Int(767750400)));
}

/// 空值选入：缺失值默认省略键，选入字段写显式空（蛇形命名输出）
#[test]
fn test_decompose_null_opt_in() {
    register_all_models();
    let converter = Converter::builder(OutputMode::Json)
        .convert_class("OptInNullModel")
        .enable_snake_case(true)
        .build();

    let model = OptInNullModel {
        int_property: 42,
        string_property: None,
        number_property: None,
        array_property: None,
    };

    let document = converter.decompose(&model).expect("分解失败");
    assert_eq!(document.get("int_property"), Some(&DataValue::Int(42)));
    // 自定义映射先应用，再做蛇形折叠
    assert_eq!(document.get("str_property"), Some(&DataValue::Null));
    assert_eq!(document.get("array_property"), Some(&DataValue::Null));
    // 未选入的空字段省略
    assert!(!document.contains_key("number_property"));
    assert_eq!(document.len(), 3);
}

/// 属性列表模式：空值与非有限浮点数不可表示
#[test]
fn test_decompose_property_list_mode() {
    register_all_models();
    let converter = Converter::builder(OutputMode::PropertyList)
        .convert_class("NumberModel")
        .build();

    let mut model = NumberModel::default();
    model.double_property = f64::NAN;
    model.int_property = 5;

    let document = converter.decompose(&model).expect("分解失败");
    assert!(!document.contains_key("double_property"), "NaN应当被丢弃");
    assert_eq!(document.get("int_property"), Some(&DataValue::Int(5)));
    // Option为None的字段默认省略
    assert!(!document.contains_key("number_property"));
}

/// 文档是分解的不动点：对已经是基础值的输入再次分解保持不变
#[test]
fn test_decompose_idempotent_on_documents() {
    let converter = test_converter(OutputMode::Full);
    let model = populated_test_model();

    let document = converter.decompose(&model).expect("分解失败");
    let as_value = PropertyValue::Value(DataValue::Object(document.clone()));

    let again = converter.decompose_value(&as_value).expect("二次分解不应丢弃");
    assert_eq!(again, DataValue::Object(document));
}

/// 集合元素递归分解，被丢弃的元素省略且保持顺序
#[test]
fn test_decompose_collection_elements() {
    let converter = test_converter(OutputMode::Full);

    let value = PropertyValue::Array(vec![
        PropertyValue::Value(DataValue::Int(1)),
        PropertyValue::Model(Box::new(Address {
            street: "Elm".to_string(),
            city: "X".to_string(),
            country: "US".to_string(),
        })),
        PropertyValue::Value(DataValue::String("tail".to_string())),
    ]);

    let decomposed = converter.decompose_value(&value).expect("分解失败");
    let DataValue::Array(items) = decomposed else { panic!("应当是数组") };
    assert_eq!(items.len(), 3);
    assert_eq!(items[0], DataValue::Int(1));
    assert!(matches!(items[1], DataValue::Object(_)));
    assert_eq!(items[2], DataValue::String("tail".to_string()));
}

/// 派生模型分解时包含祖先字段，且祖先的映射策略生效
#[test]
fn test_decompose_subclass() {
    let converter = test_converter(OutputMode::Full);

    let mut model = TestModelSubclass::default();
    model.subclass_string_property = "sub".to_string();
    model.__super = populated_test_model();

    let document = converter.decompose(&model).expect("分解失败");
    assert_eq!(
        document.get("subclass_string_property"),
        Some(&DataValue::String("sub".to_string()))
    );
    assert_eq!(document.get("int_property"), Some(&DataValue::Int(42)));
    // 父模型的忽略列表与名称映射沿链生效
    assert!(!document.contains_key("ignore_property"));
    assert_eq!(
        document.get("differentName"),
        Some(&DataValue::String("mapped".to_string()))
    );
    // 枚举挂钩沿链委托到父模型
    assert_eq!(
        document.get("enum_property"),
        Some(&DataValue::String("type_b".to_string()))
    );
}

/// 分解结果可直接序列化为JSON传输
#[test]
fn test_decomposed_document_to_json() {
    let converter = test_converter(OutputMode::Json);
    let mut user = User::default();
    user.first_name = "Ann".to_string();
    user.age = 30;

    let document = converter.decompose(&user).expect("分解失败");
    let json = DataValue::Object(document).to_json_string().expect("JSON序列化失败");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("JSON解析失败");
    assert_eq!(parsed["first_name"], serde_json::json!("Ann"));
    assert_eq!(parsed["age"], serde_json::json!(30));
}

/// 非字符串键在不受限模式下通过decompose_value直接分解映射
#[test]
fn test_decompose_value_map_polymorphism() {
    let converter = test_converter(OutputMode::Full);

    let mut inner = HashMap::new();
    inner.insert("k".to_string(), DataValue::Int(9));
    let value = PropertyValue::Map(vec![
        (DataValue::String("nested".to_string()), PropertyValue::Value(DataValue::Object(inner))),
        (DataValue::Int(3), PropertyValue::Value(DataValue::Bool(true))),
    ]);

    let decomposed = converter.decompose_value(&value).expect("分解失败");
    let DataValue::Object(map) = decomposed else { panic!("应当是对象") };
    assert!(matches!(map.get("nested"), Some(DataValue::Object(_))));
    assert_eq!(map.get("3"), Some(&DataValue::Bool(true)));
}
