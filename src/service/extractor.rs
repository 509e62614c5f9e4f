//! 从原始文本中提取 vless 候选条目。
//!
//! 两种扫描互补：整段文本的正则匹配，加上逐行扫描。
//! 逐行扫描得到的条目若未出现在正则结果中则追加。多收集没有关系，
//! 后续的校验与去重会再次筛选。

use crate::model::{VlessEntry, SCHEME_PREFIX};
use once_cell::sync::Lazy;
use regex::Regex;

static VLESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"vless://[A-Za-z0-9\-@.:?=&%/_]+(?:#[A-Za-z0-9\-@.:?=&%#/_]*)?")
        .expect("vless pattern is valid")
});

/// 逐行扫描时需要剔除的包裹字符
const WRAPPING_CHARS: [char; 10] = ['`', '<', '>', '"', '\'', '{', '}', '|', '\\', '^'];

pub fn extract_entries(text: &str) -> Vec<VlessEntry> {
    let mut found: Vec<String> = VLESS_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with(SCHEME_PREFIX) {
            continue;
        }
        let clean: String = line.chars().filter(|c| !WRAPPING_CHARS.contains(c)).collect();
        if !found.contains(&clean) {
            found.push(clean);
        }
    }

    found.into_iter().map(VlessEntry::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::utils::dedup_entries;

    #[test]
    fn test_line_and_inline_match_dedup_to_one() {
        let text = "header\nvless://abc@host:1/?x=1#tag\nsome text vless://abc@host:1/?x=1#tag and more\n";
        let entries = extract_entries(text);
        assert!(entries.len() >= 2);
        assert!(entries.iter().all(|e| e.as_str() == "vless://abc@host:1/?x=1#tag"));

        let unique = dedup_entries(entries);
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn test_wrapped_line_is_cleaned() {
        let text = "  `vless://id@host:443?security=tls#node`  \n";
        let entries = extract_entries(text);
        assert!(entries.iter().any(|e| e.as_str() == "vless://id@host:443?security=tls#node"));
    }

    #[test]
    fn test_inline_label_stops_at_prose_punctuation() {
        let entry = "vless://00000000-0000-0000-0000-000000000001@host:443?security=tls#node";
        let text = format!("Try this one ({}), or this: {}, thanks; {}", entry, entry, entry);

        let entries = extract_entries(&text);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.as_str() == entry));
        assert_eq!(dedup_entries(entries).len(), 1);
    }

    #[test]
    fn test_line_scan_keeps_chars_outside_pattern() {
        // 标签含空格，正则会截断，逐行扫描保留整行
        let text = "vless://id@host:443?type=ws#My Node\n";
        let entries: Vec<_> = extract_entries(text).into_iter().map(|e| e.as_str().to_string()).collect();
        assert!(entries.contains(&"vless://id@host:443?type=ws#My".to_string()));
        assert!(entries.contains(&"vless://id@host:443?type=ws#My Node".to_string()));
    }

    #[test]
    fn test_every_entry_has_scheme_prefix() {
        let text = "vmess://abc\n<vless://a@b:1>\nfoo vless://q@w:2?k=v bar\n\"vless://z@y:3\"\ntrojan://x vless://";
        let entries = extract_entries(text);
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| e.as_str().starts_with(SCHEME_PREFIX)));
    }

    #[test]
    fn test_no_entries() {
        assert!(extract_entries("nothing to see\nhere").is_empty());
        assert!(extract_entries("").is_empty());
    }
}
