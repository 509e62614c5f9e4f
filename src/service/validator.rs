use crate::model::{VlessEntry, SCHEME_PREFIX};

/// uuid 段的最小长度，仅做长度判断，不校验 uuid 格式
pub const MIN_UUID_LEN: usize = 30;

/// 结构校验，任一规则失败立即返回 false。
///
/// 1. 以 `vless://` 开头；
/// 2. 含 `@`；
/// 3. 去掉前缀后按 `@` 至少能分成两段；
/// 4. `@` 前的 uuid 段长度不少于 30；
/// 5. `require_secure` 为 true 时，还要求 `security=reality` 或 `security=tls`。
pub fn is_valid_entry(entry: &VlessEntry, require_secure: bool) -> bool {
    let text = entry.as_str();
    let Some(rest) = text.strip_prefix(SCHEME_PREFIX) else {
        return false;
    };
    if !text.contains('@') {
        return false;
    }

    let parts: Vec<&str> = rest.split('@').collect();
    if parts.len() < 2 {
        return false;
    }
    if parts[0].chars().count() < MIN_UUID_LEN {
        return false;
    }

    if require_secure && !entry.has_secure_transport() {
        return false;
    }
    true
}
