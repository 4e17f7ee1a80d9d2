//! 多语言错误消息模块
//!
//! 使用rat_embed_lang框架提供统一的错误消息多语言支持

use std::collections::HashMap;
use rat_embed_lang::register_translations;

/// 错误消息翻译注册器
pub struct ErrorMessageI18n;

impl ErrorMessageI18n {
    /// 注册所有错误消息翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();

        // 配置错误
        let mut config_errors = HashMap::new();
        config_errors.insert("zh-CN".to_string(), "配置错误: {message}".to_string());
        config_errors.insert("en-US".to_string(), "Configuration error: {message}".to_string());
        config_errors.insert("ja-JP".to_string(), "設定エラー: {message}".to_string());
        translations.insert("error.config".to_string(), config_errors);

        // 模型验证错误
        let mut validation_errors = HashMap::new();
        validation_errors.insert("zh-CN".to_string(), "模型验证失败: {field} - {message}".to_string());
        validation_errors.insert("en-US".to_string(), "Model validation failed: {field} - {message}".to_string());
        validation_errors.insert("ja-JP".to_string(), "モデル検証が失敗しました: {field} - {message}".to_string());
        translations.insert("error.validation".to_string(), validation_errors);

        // 序列化错误
        let mut serialization_errors = HashMap::new();
        serialization_errors.insert("zh-CN".to_string(), "数据序列化失败: {message}".to_string());
        serialization_errors.insert("en-US".to_string(), "Data serialization failed: {message}".to_string());
        serialization_errors.insert("ja-JP".to_string(), "データシリアライズが失敗しました: {message}".to_string());
        translations.insert("error.serialization".to_string(), serialization_errors);

        // JSON序列化相关错误
        let mut json_serialize_failed = HashMap::new();
        json_serialize_failed.insert("zh-CN".to_string(), "序列化为JSON字符串失败: {message}".to_string());
        json_serialize_failed.insert("en-US".to_string(), "Failed to serialize to JSON string: {message}".to_string());
        json_serialize_failed.insert("ja-JP".to_string(), "JSON文字列へのシリアライズ失敗: {message}".to_string());
        translations.insert("error.json_serialize".to_string(), json_serialize_failed);

        let mut json_parse_failed = HashMap::new();
        json_parse_failed.insert("zh-CN".to_string(), "解析JSON字符串失败: {message}".to_string());
        json_parse_failed.insert("en-US".to_string(), "Failed to parse JSON string: {message}".to_string());
        json_parse_failed.insert("ja-JP".to_string(), "JSON文字列の解析失敗: {message}".to_string());
        translations.insert("error.json_parse".to_string(), json_parse_failed);

        // 模型未注册
        let mut model_not_registered = HashMap::new();
        model_not_registered.insert("zh-CN".to_string(), "模型 '{type_name}' 未注册，请先调用其 meta()".to_string());
        model_not_registered.insert("en-US".to_string(), "Model '{type_name}' is not registered, call its meta() first".to_string());
        model_not_registered.insert("ja-JP".to_string(), "モデル '{type_name}' が登録されていません。先に meta() を呼び出してください".to_string());
        translations.insert("error.model_not_registered".to_string(), model_not_registered);

        // 名称映射冲突
        let mut ambiguous_mapping = HashMap::new();
        ambiguous_mapping.insert("zh-CN".to_string(), "字段 {fields} 都映射到外部键 '{key}'，反向查找存在歧义".to_string());
        ambiguous_mapping.insert("en-US".to_string(), "Fields {fields} all map to external key '{key}', inverse lookup is ambiguous".to_string());
        ambiguous_mapping.insert("ja-JP".to_string(), "フィールド {fields} が外部キー '{key}' に重複マッピングされ、逆引きが曖昧です".to_string());
        translations.insert("error.ambiguous_mapping".to_string(), ambiguous_mapping);

        // 字段类型不匹配
        let mut type_mismatch = HashMap::new();
        type_mismatch.insert("zh-CN".to_string(), "字段类型不匹配，期望{expected}，实际收到: {actual}".to_string());
        type_mismatch.insert("en-US".to_string(), "Field type mismatch, expected {expected}, got: {actual}".to_string());
        type_mismatch.insert("ja-JP".to_string(), "フィールドタイプが一致しません。期待値 {expected}、実際: {actual}".to_string());
        translations.insert("error.type_mismatch".to_string(), type_mismatch);

        // 不支持的字段类型编码
        let mut unsupported_field = HashMap::new();
        unsupported_field.insert("zh-CN".to_string(), "不支持的字段类型编码: {encoding}".to_string());
        unsupported_field.insert("en-US".to_string(), "Unsupported field type encoding: {encoding}".to_string());
        unsupported_field.insert("ja-JP".to_string(), "サポートされていないフィールドタイプエンコーディング: {encoding}".to_string());
        translations.insert("error.unsupported_field".to_string(), unsupported_field);

        // 数值超出范围
        let mut numeric_range = HashMap::new();
        numeric_range.insert("zh-CN".to_string(), "数值 {value} 超出目标类型范围 ({target})".to_string());
        numeric_range.insert("en-US".to_string(), "Numeric value {value} is out of range for target type ({target})".to_string());
        numeric_range.insert("ja-JP".to_string(), "数値 {value} がターゲットタイプ ({target}) の範囲外です".to_string());
        translations.insert("error.numeric_range".to_string(), numeric_range);

        // 注册所有翻译
        register_translations(translations);
    }

    /// 初始化错误消息多语言支持
    pub fn init() {
        Self::register_all_translations();

        // 从环境变量获取语言设置，默认为zh-CN
        let lang = std::env::var("RAT_LANG")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "zh-CN".to_string());

        // 标准化语言代码
        use rat_embed_lang::normalize_language_code;
        let normalized_lang = normalize_language_code(&lang);
        set_language(&normalized_lang);
    }
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{t, tf, set_language, current_language};
