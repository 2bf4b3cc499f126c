//! 工具函数模块
//!
//! 此模块包含了项目中使用的各种工具函数：
//! - 对象键生成工具（基于时间戳的文件名）

pub mod object_key;
