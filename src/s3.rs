//! S3模块
//!
//! 该模块负责处理与S3存储桶的交互，包括客户端配置和上传用预签名URL的生成。

// 声明子模块
pub mod config;
pub mod presign;

// 重新导出常用的类型
pub use config::create_s3_client;
pub use presign::{S3UploadUrlSigner, UploadUrlSigner};
