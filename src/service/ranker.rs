use crate::model::VlessEntry;

/// 稳定的两桶划分：`reality` / `tls` 条目排在前面，其余在后，桶内保持原顺序。
///
/// 返回排序后的列表以及前段（安全条目）的数量。
pub fn rank_by_security(entries: Vec<VlessEntry>) -> (Vec<VlessEntry>, usize) {
    let (mut secure, rest): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.has_secure_transport());
    let priority = secure.len();
    secure.extend(rest);
    (secure, priority)
}
