//! 错误类型模块
//!
//! - `ConfigError`：启动时加载配置失败
//! - `PresignError`：向 S3 申请预签名 URL 失败
//! - `AppError`：返回给 HTTP 客户端的错误

use crate::handlers::constants::GENERATE_URL_FAILED;
use aws_sdk_s3::presigning::PresigningConfigError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("必须设置环境变量 {0}")]
    Missing(&'static str),

    #[error("环境变量 {name} 的值无效: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("{0} 与 {1} 必须同时设置")]
    PartialCredentials(&'static str, &'static str),
}

/// 预签名 URL 生成错误
#[derive(Debug, Error)]
pub enum PresignError {
    #[error("预签名配置无效: {0}")]
    Config(#[from] PresigningConfigError),

    #[error("S3 预签名请求失败: {0}")]
    Sdk(String),
}

/// 错误响应体
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// HTTP 层错误
///
/// 所有上传 URL 生成失败都折叠为同一个不透明的 500 响应，
/// 具体原因只写入日志。
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Presign(#[from] PresignError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Presign(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: GENERATE_URL_FAILED,
                }),
            )
                .into_response(),
        }
    }
}
