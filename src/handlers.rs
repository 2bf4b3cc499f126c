//! HTTP请求处理模块
//!
//! 此模块包含了处理HTTP请求的处理器：
//! - 上传预签名URL生成处理器

pub mod constants;
pub mod upload_url;

// 重新导出主要的公共接口
pub use upload_url::handle_generate_upload_url;
