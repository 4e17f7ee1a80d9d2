//! 命名风格转换工具
//!
//! 提供snake_case与camelCase之间的双向转换，用于外部文档键与模型字段名的折叠匹配

/// 将snake_case字符串转换为camelCase
///
/// 前导下划线会被保留（例如 `_private_field` -> `_privateField`）
pub fn snake_to_camel(input: &str) -> String {
    let leading = input.len() - input.trim_start_matches('_').len();
    let mut result = String::with_capacity(input.len());
    result.push_str(&input[..leading]);

    let mut uppercase_next = false;
    for c in input[leading..].chars() {
        if c == '_' {
            uppercase_next = true;
        } else if uppercase_next {
            result.extend(c.to_uppercase());
            uppercase_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// 将camelCase字符串转换为snake_case
pub fn camel_to_snake(input: &str) -> String {
    let mut result = String::with_capacity(input.len() + 4);

    for c in input.chars() {
        if c.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("first_name"), "firstName");
        assert_eq!(snake_to_camel("snake_case_enum_property"), "snakeCaseEnumProperty");
        assert_eq!(snake_to_camel("already"), "already");
        assert_eq!(snake_to_camel(""), "");
    }

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("firstName"), "first_name");
        assert_eq!(camel_to_snake("intProperty"), "int_property");
        assert_eq!(camel_to_snake("simple"), "simple");
    }

    #[test]
    fn test_round_trip() {
        assert_eq!(snake_to_camel(&camel_to_snake("arrayProperty")), "arrayProperty");
    }
}
