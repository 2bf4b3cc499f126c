use crate::config::UploadPolicy;
use std::time::{SystemTime, UNIX_EPOCH};

/// 按 `<前缀>-<毫秒时间戳>.<扩展名>` 的格式拼接对象键
///
/// # 示例
///
/// ```
/// use upload_url_server::utils::object_key::object_key_at;
///
/// assert_eq!(object_key_at("complaints", "csv", 1700000000000), "complaints-1700000000000.csv");
/// ```
pub fn object_key_at(prefix: &str, extension: &str, millis: u128) -> String {
    format!("{prefix}-{millis}.{extension}")
}

/// 当前时间距 Unix 纪元的毫秒数
///
/// 系统时钟早于纪元时返回 0。
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// 按上传策略生成新的对象键
///
/// 同一毫秒内的两次调用会得到相同的键。
pub fn new_object_key(policy: &UploadPolicy) -> String {
    object_key_at(&policy.key_prefix, &policy.key_extension, unix_millis())
}

/// 从对象键中解析出毫秒时间戳，格式不符时返回 `None`
pub fn parse_key_millis(key: &str, prefix: &str, extension: &str) -> Option<u128> {
    let digits = key
        .strip_prefix(prefix)?
        .strip_prefix('-')?
        .strip_suffix(extension)?
        .strip_suffix('.')?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
