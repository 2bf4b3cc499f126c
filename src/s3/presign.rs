//! S3预签名URL模块
//!
//! 该模块负责生成上传用（PUT）的预签名URL。签名完全在本地由 SDK 完成，
//! 不会访问网络。

use crate::error::PresignError;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use std::sync::Arc;
use std::time::Duration;

/// 上传 URL 签名器
///
/// 处理函数只依赖该 trait，测试时可以替换为模拟实现。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadUrlSigner: Send + Sync {
    /// 为指定对象键生成预签名的 PUT URL。
    ///
    /// # 参数
    ///
    /// * `bucket` - 目标存储桶。
    /// * `key` - 目标对象键。
    /// * `content_type` - 上传时必须携带的 `Content-Type`，会被纳入签名。
    /// * `expires_in` - URL 有效期。
    ///
    /// # Errors
    ///
    /// 有效期超出允许范围或 SDK 无法完成签名时返回错误。
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError>;
}

/// 基于 `aws-sdk-s3` 的签名器
///
/// 只持有客户端，存储桶由调用方的上传策略决定。
#[derive(Clone)]
pub struct S3UploadUrlSigner {
    client: Arc<Client>,
}

impl S3UploadUrlSigner {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UploadUrlSigner for S3UploadUrlSigner {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError> {
        let presigning_config = PresigningConfig::expires_in(expires_in)?;

        let presigned_request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning_config)
            .await
            .map_err(|e| PresignError::Sdk(DisplayErrorContext(&e).to_string()))?;

        Ok(presigned_request.uri().to_string())
    }
}
