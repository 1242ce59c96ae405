//! 根据文件扩展名推断图片 MIME 类型

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const DEFAULT_MIME: &str = "application/octet-stream";

static IMAGE_MIME_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("jpeg", "image/jpeg"),
        ("jpg", "image/jpg"),
        ("png", "image/png"),
        ("webp", "image/webp"),
    ])
});

/// 取最后一个 `.` 之后的部分（区分大小写）查表，未知一律按二进制流处理
pub fn resolve_mime(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .unwrap_or("");

    IMAGE_MIME_TYPES
        .get(extension)
        .copied()
        .unwrap_or(DEFAULT_MIME)
}
