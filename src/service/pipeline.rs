//! # pipeline 模块
//!
//! 单次运行的完整流程：
//! 抓取 → 提取 → 校验 → 去重 → （排序 / 测活）→ 抽样 → 写入。
//!
//! 排序与测活是否启用由配置决定。存活集合为空时改用内置样例，
//! 保证输出文件始终非空。

use anyhow::Result;
use rand::Rng;
use tracing::{info, warn};

use crate::common::utils::dedup_entries;
use crate::fetcher::{fetch_all_sources, HttpFetcher, SourceFetcher};
use crate::launcher::{ProxyLauncher, XrayLauncher};
use crate::model::{AppConfig, SelectionPolicy, VlessEntry};
use crate::service::extractor::extract_entries;
use crate::service::ranker::rank_by_security;
use crate::service::selector::{fallback_entries, select_entries};
use crate::service::storage::write_output;
use crate::service::validator::is_valid_entry;
use crate::service::verifier::verify_all;

/// 一次运行的统计结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// 写入头部的可用总数（使用内置样例时为样例数量）
    pub total_available: usize,
    pub selected: usize,
    pub used_fallback: bool,
}

pub struct Pipeline {
    config: AppConfig,
    fetcher: Box<dyn SourceFetcher>,
    launcher: Box<dyn ProxyLauncher>,
}

impl Pipeline {
    /// 使用 reqwest 抓取器与 xray 启动器构建流水线
    pub fn new(config: AppConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let launcher = XrayLauncher::new(&config.probe);
        Ok(Self::with_parts(config, Box::new(fetcher), Box::new(launcher)))
    }

    pub fn with_parts(
        config: AppConfig,
        fetcher: Box<dyn SourceFetcher>,
        launcher: Box<dyn ProxyLauncher>,
    ) -> Self {
        Self {
            config,
            fetcher,
            launcher,
        }
    }

    pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunSummary> {
        let collected = self.collect().await;

        info!("========== [去重阶段] ==========");
        let unique = dedup_entries(collected);
        info!("去重后共 {} 条 vless 配置", unique.len());

        let ranked = self.config.rank.enabled
            || self.config.select.policy == SelectionPolicy::PriorityFirst;
        let candidates = if ranked {
            let (list, priority) = rank_by_security(unique);
            info!("排序完成：{} 条 reality/tls 配置排在前面", priority);
            list
        } else {
            unique
        };

        let surviving = if self.config.probe.enabled {
            verify_all(candidates, self.launcher.as_ref(), &self.config.probe).await?
        } else {
            candidates
        };

        info!("========== [抽样阶段] ==========");
        let (total, selection, used_fallback) = if surviving.is_empty() {
            warn!("⚠️ 没有可用配置，改用内置样例");
            let fallback = fallback_entries();
            (fallback.len(), fallback, true)
        } else {
            let priority = if ranked {
                surviving.iter().take_while(|e| e.has_secure_transport()).count()
            } else {
                0
            };
            let selection = select_entries(&surviving, priority, &self.config.select, rng);
            (surviving.len(), selection, false)
        };
        info!("从 {} 条中选出 {} 条", total, selection.len());

        write_output(&self.config.output.path, total, &selection).await?;

        Ok(RunSummary {
            total_available: total,
            selected: selection.len(),
            used_fallback,
        })
    }

    /// 抓取全部订阅源，按源提取并校验，返回未去重的有效条目
    async fn collect(&self) -> Vec<VlessEntry> {
        info!("========== [配置采集阶段] ==========");
        let documents = fetch_all_sources(self.fetcher.as_ref(), &self.config.fetch).await;
        let require_secure = self.config.filter.require_secure_transport;

        let mut all = Vec::new();
        for doc in documents {
            let Some(body) = doc.body else {
                continue;
            };
            let valid: Vec<VlessEntry> = extract_entries(&body)
                .into_iter()
                .filter(|e| is_valid_entry(e, require_secure))
                .collect();
            info!("从 {} 找到 {} 条有效 vless 配置", doc.url, valid.len());
            all.extend(valid);
        }

        info!("抓取到总共 {} 条 vless 配置", all.len());
        all
    }
}
