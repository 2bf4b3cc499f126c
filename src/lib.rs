//! CSV 上传 URL 服务库
//!
//! 这是一个基于Axum的小型服务，主要功能包括：
//! - 为 S3 存储桶生成短时有效的预签名上传（PUT）URL
//! - 客户端拿到 URL 后直接上传 CSV 文件，文件内容不经过本服务
//! - 支持CORS跨域请求

pub mod config;
pub mod error;
pub mod handlers;
pub mod s3;
pub mod utils;

use crate::config::UploadPolicy;
use crate::handlers::constants::GENERATE_UPLOAD_URL_PATH;
use crate::s3::UploadUrlSigner;
use axum::routing::get;
use http::Method;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<dyn UploadUrlSigner>,
    pub policy: Arc<UploadPolicy>,
}

impl AppState {
    pub fn new(signer: Arc<dyn UploadUrlSigner>, policy: UploadPolicy) -> Self {
        Self {
            signer,
            policy: Arc::new(policy),
        }
    }
}

/// 创建并配置Axum应用程序
///
/// - CORS配置，允许GET、HEAD和OPTIONS请求
/// - 请求追踪中间件
/// - 上传 URL 路由
///
/// # Returns
///
/// 返回配置好的Axum Router实例
pub fn app(state: AppState) -> axum::Router {
    // 配置 CORS
    let cors = CorsLayer::permissive()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(AllowHeaders::any());

    axum::Router::new()
        .route(
            GENERATE_UPLOAD_URL_PATH,
            get(handlers::handle_generate_upload_url),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
