//! S3配置模块
//!
//! 该模块负责S3客户端的配置和初始化。

use crate::config::S3Config;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;

/// 凭据来源名称，出现在 SDK 的调试输出中
const CREDENTIALS_PROVIDER_NAME: &str = "upload-url-server-env";

/// 根据服务配置创建 S3 客户端。
///
/// - 同时配置了访问密钥 ID 与秘密访问密钥时使用静态凭据；
///   否则交给 AWS 默认凭据链（环境变量、配置文件、实例角色等）。
/// - 配置了 `endpoint` 时用于 S3 兼容服务或本地模拟服务。
///
/// # 参数
///
/// * `config` - S3 连接配置。
///
/// # 返回值
///
/// 配置好的 `aws_sdk_s3::Client`。
pub async fn create_s3_client(config: &S3Config) -> Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    if let Some(credentials) = &config.credentials {
        loader = loader.credentials_provider(Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        ));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.force_path_style)
        .build();

    Client::from_conf(s3_config)
}
