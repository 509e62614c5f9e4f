//! # selector 模块
//!
//! 从存活集合中抽取不超过 `cap` 条的样本，样本内无重复，且全部来自输入集合。
//!
//! ## 抽样策略
//!
//! - [`SelectionPolicy::Random`]：无放回均匀随机抽样；
//! - [`SelectionPolicy::PriorityFirst`]：输入为已排序列表，前 `priority` 条为优先条目。
//!   优先条目不少于 `min_priority` 时直接取列表前 `cap` 条；
//!   否则先取全部优先条目，再从剩余条目中随机补齐。
//!
//! 随机源由调用方注入，测试中可使用固定种子。

use crate::model::{SelectConfig, SelectionPolicy, VlessEntry};
use rand::seq::SliceRandom;
use rand::Rng;

/// 所有订阅源都不可用时写入的内置样例
pub const FALLBACK_ENTRIES: [&str; 5] = [
    "vless://df0680ca-e43c-498d-ed86-8e196eedd012@185.153.183.211:8880/?type=grpc&encryption=none&flow=#Test-Config-1",
    "vless://e105e56a-5f81-41a2-ab44-bfffc9b00674@45.12.143.191:20329?security=reality&encryption=none&pbk=Lj3MXlg16CTFHtU88acSS-ACfGnwJ_xkU6dC6k8OeDo&fp=chrome&type=tcp&sni=yahoo.com&sid=4602ee9f9f36#Test-Config-2",
    "vless://bfc78cd8-5951-4803-8d6c-4cedef8cd420@95.164.85.109:59374/?type=tcp&encryption=none&flow=&sni=yahoo.com&fp=chrome&security=reality&pbk=ZsswZuBV8bEGQWFrpShCilSytnDUj0kwHFhTSLXzOwc&sid=d21e7c#Test-Config-3",
    "vless://8672bdcd-e331-464d-9ed8-93a242ca7d2e@89.44.197.77:15946?path=%2F&security=none&encryption=none&type=ws#Test-Config-4",
    "vless://e4824193-4f54-453b-d037-88368e85ef0e@45.82.251.80:8880?encryption=none&security=none&type=grpc#Test-Config-5",
];

pub fn fallback_entries() -> Vec<VlessEntry> {
    FALLBACK_ENTRIES.iter().map(|s| VlessEntry::from(*s)).collect()
}

/// 按策略抽样，返回条数恒为 `min(cap, entries.len())`。
///
/// `priority` 仅在 [`SelectionPolicy::PriorityFirst`] 下使用，表示列表前段优先条目的数量。
pub fn select_entries<R: Rng + ?Sized>(
    entries: &[VlessEntry],
    priority: usize,
    config: &SelectConfig,
    rng: &mut R,
) -> Vec<VlessEntry> {
    let count = config.cap.min(entries.len());

    match config.policy {
        SelectionPolicy::Random => sample(entries, count, rng),
        SelectionPolicy::PriorityFirst => {
            let priority = priority.min(entries.len());
            if priority >= config.min_priority {
                return entries[..count].to_vec();
            }

            let taken = priority.min(count);
            let mut selected = entries[..taken].to_vec();
            selected.extend(sample(&entries[taken..], count - taken, rng));
            selected
        }
    }
}

fn sample<R: Rng + ?Sized>(entries: &[VlessEntry], count: usize, rng: &mut R) -> Vec<VlessEntry> {
    let mut pool = entries.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
