/// 上传 URL 生成接口路径
pub const GENERATE_UPLOAD_URL_PATH: &str = "/generate-upload-url";

/// 生成失败时返回给客户端的固定错误信息
pub const GENERATE_URL_FAILED: &str = "Could not generate URL";
