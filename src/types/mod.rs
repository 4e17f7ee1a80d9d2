//! 公共类型模块

pub mod data_value;

pub use data_value::{DataValue, json_value_to_data_value};
