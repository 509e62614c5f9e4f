use crate::model::VlessEntry;
use std::collections::HashSet;
use tracing::Level;

/// 按原文精确去重，保留每条首次出现的位置。
///
/// 不做任何规范化，参数顺序不同的两条描述仍视为不同条目。
pub fn dedup_entries(entries: Vec<VlessEntry>) -> Vec<VlessEntry> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for entry in entries.into_iter() {
        if seen.insert(entry.clone()) {
            result.push(entry);
        }
    }
    result
}

/// 解析配置中的日志级别名，忽略大小写与首尾空白，额外接受 `warning`
pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "warning" => Some(Level::WARN),
        other => other.parse().ok(),
    }
}
