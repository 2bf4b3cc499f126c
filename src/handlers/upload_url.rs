use crate::AppState;
use crate::error::AppError;
use crate::utils::object_key::new_object_key;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// 上传 URL 响应体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// 预签名的 PUT URL
    pub upload_url: String,
    /// 对象键，即上传后的文件名
    pub file_name: String,
}

/// 处理上传 URL 生成请求
///
/// 以当前毫秒时间戳生成对象键，按上传策略中的存储桶向签名器申请一个短时有效的 PUT URL，
/// 客户端随后直接把 CSV 文件上传到存储桶，文件内容不经过本服务。
///
/// # 请求方法
///
/// GET /generate-upload-url
///
/// # 返回值
///
/// * `Ok(Json)` - `{ "uploadUrl": "...", "fileName": "complaints-<毫秒>.csv" }`
/// * `Err(AppError)` - 签名失败，响应 500 `{ "error": "Could not generate URL" }`
#[instrument(skip(state))]
pub async fn handle_generate_upload_url(
    State(state): State<AppState>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let policy = &state.policy;
    let file_name = new_object_key(policy);

    let upload_url = state
        .signer
        .presign_put(
            &policy.bucket,
            &file_name,
            &policy.content_type,
            policy.expires_in,
        )
        .await
        .map_err(|e| {
            error!(error = %e, bucket = %policy.bucket, key = %file_name, "S3 pre-sign URL error");
            e
        })?;

    info!(bucket = %policy.bucket, key = %file_name, "已生成上传 URL");

    Ok(Json(UploadUrlResponse {
        upload_url,
        file_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app;
    use crate::config::UploadPolicy;
    use crate::error::PresignError;
    use crate::handlers::constants::GENERATE_UPLOAD_URL_PATH;
    use crate::s3::presign::MockUploadUrlSigner;
    use crate::utils::object_key::{parse_key_millis, unix_millis};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use mockall::predicate::{eq, function};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing_subscriber::fmt::MakeWriter;

    /// 把日志输出收集到内存中
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn server_with(signer: MockUploadUrlSigner, policy: UploadPolicy) -> TestServer {
        let state = AppState::new(Arc::new(signer), policy);
        TestServer::new(app(state)).unwrap()
    }

    #[tokio::test]
    /// 测试成功生成上传 URL
    ///
    /// 签名器应收到 text/csv 与 60 秒的有效期，响应体包含签名器返回的 URL
    /// 以及与之对应的文件名。
    async fn test_generate_upload_url_success() {
        let mut signer = MockUploadUrlSigner::new();
        signer
            .expect_presign_put()
            .with(
                eq("cc-s3-bucket"),
                function(|key: &str| key.starts_with("complaints-") && key.ends_with(".csv")),
                eq("text/csv"),
                eq(Duration::from_secs(60)),
            )
            .times(1)
            .returning(|_, key, _, _| Ok(format!("https://bucket.example.com/{key}?X-Amz-Signature=abc")));

        let server = server_with(signer, UploadPolicy::for_bucket("cc-s3-bucket"));

        let start = unix_millis();
        let response = server.get(GENERATE_UPLOAD_URL_PATH).await;

        response.assert_status_ok();
        let body = response.json::<UploadUrlResponse>();

        let millis = parse_key_millis(&body.file_name, "complaints", "csv").unwrap();
        assert!(millis >= start);
        assert_eq!(
            body.upload_url,
            format!("https://bucket.example.com/{}?X-Amz-Signature=abc", body.file_name)
        );
    }

    #[tokio::test]
    /// 测试响应字段使用驼峰命名
    async fn test_generate_upload_url_field_names() {
        let mut signer = MockUploadUrlSigner::new();
        signer
            .expect_presign_put()
            .returning(|_, _, _, _| Ok("https://signed.example.com/".to_string()));

        let server = server_with(signer, UploadPolicy::for_bucket("cc-s3-bucket"));
        let body = server.get(GENERATE_UPLOAD_URL_PATH).await.json::<Value>();

        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["uploadUrl"], "https://signed.example.com/");
        assert!(object["fileName"].as_str().unwrap().starts_with("complaints-"));
    }

    #[tokio::test]
    /// 测试签名失败
    ///
    /// 任何签名错误都返回 500 和固定的错误信息，不包含 uploadUrl 字段。
    async fn test_generate_upload_url_failure() {
        let mut signer = MockUploadUrlSigner::new();
        signer
            .expect_presign_put()
            .times(1)
            .returning(|_, _, _, _| Err(PresignError::Sdk("InvalidAccessKeyId".to_string())));

        let server = server_with(signer, UploadPolicy::for_bucket("cc-s3-bucket"));
        let response = server.get(GENERATE_UPLOAD_URL_PATH).expect_failure().await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert_eq!(body, json!({ "error": "Could not generate URL" }));
        assert!(body.get("uploadUrl").is_none());
    }

    #[tokio::test]
    /// 测试自定义上传策略
    ///
    /// 存储桶、前缀、扩展名、内容类型和有效期都来自配置。
    async fn test_generate_upload_url_uses_policy() {
        let policy = UploadPolicy {
            bucket: "other-bucket".to_string(),
            key_prefix: "reports".to_string(),
            key_extension: "txt".to_string(),
            content_type: "text/plain".to_string(),
            expires_in: Duration::from_secs(300),
        };

        let mut signer = MockUploadUrlSigner::new();
        signer
            .expect_presign_put()
            .with(
                eq("other-bucket"),
                function(|key: &str| key.starts_with("reports-") && key.ends_with(".txt")),
                eq("text/plain"),
                eq(Duration::from_secs(300)),
            )
            .times(1)
            .returning(|bucket, key, _, _| Ok(format!("https://{bucket}.example.com/{key}")));

        let server = server_with(signer, policy);
        let body = server
            .get(GENERATE_UPLOAD_URL_PATH)
            .await
            .json::<UploadUrlResponse>();

        assert!(parse_key_millis(&body.file_name, "reports", "txt").is_some());
        assert_eq!(
            body.upload_url,
            format!("https://other-bucket.example.com/{}", body.file_name)
        );
    }

    #[tokio::test]
    /// 测试签名失败时的日志
    ///
    /// 错误日志应包含存储桶、对象键和底层错误，而响应体只有固定信息。
    async fn test_generate_upload_url_failure_is_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let signed_key = Arc::new(Mutex::new(None::<String>));
        let seen = signed_key.clone();

        let mut signer = MockUploadUrlSigner::new();
        signer
            .expect_presign_put()
            .times(1)
            .returning(move |_, key, _, _| {
                *seen.lock().unwrap() = Some(key.to_string());
                Err(PresignError::Sdk("InvalidAccessKeyId".to_string()))
            });

        let server = server_with(signer, UploadPolicy::for_bucket("cc-s3-bucket"));
        let response = server.get(GENERATE_UPLOAD_URL_PATH).expect_failure().await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let key = signed_key.lock().unwrap().clone().unwrap();
        let output = logs.contents();
        assert!(output.contains("S3 pre-sign URL error"), "{output}");
        assert!(output.contains("InvalidAccessKeyId"), "{output}");
        assert!(output.contains(&format!("key={key}")), "{output}");
        assert!(output.contains("bucket=cc-s3-bucket"), "{output}");
        assert!(!response.text().contains("InvalidAccessKeyId"));
    }
}
