//! 上传 URL 服务的配置模块。
//!
//! 该模块负责从环境变量加载和管理配置。所有凭据与存储桶名称都来自环境，
//! 不在源码中硬编码。

use crate::error::ConfigError;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// 默认监听地址
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// 默认区域
pub const DEFAULT_REGION: &str = "ap-south-1";

/// 默认对象键前缀
pub const DEFAULT_KEY_PREFIX: &str = "complaints";

/// 默认对象键扩展名
pub const DEFAULT_KEY_EXTENSION: &str = "csv";

/// 默认签名内容类型
pub const DEFAULT_CONTENT_TYPE: &str = "text/csv";

/// 默认 URL 有效期（秒）
pub const DEFAULT_EXPIRES_SECS: u64 = 60;

/// S3 允许的最长预签名有效期（7 天）
pub const MAX_EXPIRES_SECS: u64 = 7 * 24 * 60 * 60;

/// 完整的服务配置
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub s3: S3Config,
    pub upload: UploadPolicy,
}

/// S3 连接配置
///
/// 不含存储桶名称，存储桶只由 `UploadPolicy` 决定。
#[derive(Clone)]
pub struct S3Config {
    pub region: String,
    pub credentials: Option<StaticCredentials>,
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

/// 静态访问凭据
#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

// 不把密钥写进日志
impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("credentials", &self.credentials.as_ref().map(|_| "<static>"))
            .field("endpoint", &self.endpoint)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

/// 上传策略：预签名 URL 针对的存储桶、键名格式、内容类型和有效期
///
/// 扩展名与内容类型应成对修改，例如 `txt` 与 `text/plain`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub bucket: String,
    pub key_prefix: String,
    pub key_extension: String,
    pub content_type: String,
    pub expires_in: Duration,
}

impl UploadPolicy {
    /// 使用默认键前缀、内容类型和有效期创建上传策略。
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            key_extension: DEFAULT_KEY_EXTENSION.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            expires_in: Duration::from_secs(DEFAULT_EXPIRES_SECS),
        }
    }
}

impl Config {
    /// 从进程环境变量加载配置。
    ///
    /// 调用方应先执行 `dotenvy::dotenv()` 以读取 `.env` 文件。
    ///
    /// # Errors
    ///
    /// 缺少必需变量或变量值无法解析时返回 `ConfigError`。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 通过任意查找函数加载配置。
    ///
    /// # 参数
    ///
    /// * `lookup` - 根据变量名返回变量值，未设置或为空时返回 `None`。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bucket = get("S3_BUCKET").ok_or(ConfigError::Missing("S3_BUCKET"))?;

        let credentials = match (get("S3_ACCESS_KEY_ID"), get("S3_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::PartialCredentials(
                    "S3_ACCESS_KEY_ID",
                    "S3_SECRET_ACCESS_KEY",
                ));
            }
        };

        let force_path_style = match get("S3_FORCE_PATH_STYLE") {
            None => false,
            Some(value) => parse_bool("S3_FORCE_PATH_STYLE", &value)?,
        };

        let expires_secs = match get("UPLOAD_URL_EXPIRES_SECS") {
            None => DEFAULT_EXPIRES_SECS,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if (1..=MAX_EXPIRES_SECS).contains(&secs) => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "UPLOAD_URL_EXPIRES_SECS",
                        value,
                    });
                }
            },
        };

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: bind_addr.clone(),
            })?;

        let key_extension = get("UPLOAD_KEY_EXTENSION")
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .unwrap_or_else(|| DEFAULT_KEY_EXTENSION.to_string());
        if key_extension.is_empty() || key_extension.contains('/') {
            return Err(ConfigError::Invalid {
                name: "UPLOAD_KEY_EXTENSION",
                value: key_extension,
            });
        }

        let upload = UploadPolicy {
            bucket,
            key_prefix: get("UPLOAD_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
            key_extension,
            content_type: get("UPLOAD_CONTENT_TYPE")
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            expires_in: Duration::from_secs(expires_secs),
        };

        Ok(Self {
            bind_addr,
            s3: S3Config {
                region: get("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                credentials,
                endpoint: get("S3_ENDPOINT"),
                force_path_style,
            },
            upload,
        })
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}
