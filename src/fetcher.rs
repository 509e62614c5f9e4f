//! # fetcher 模块
//!
//! 从订阅源逐个抓取原始文本。单个源失败（超时、网络错误、非 200）只记录日志，
//! 不会中断整次运行。

mod http;
pub mod sources;

pub use http::HttpFetcher;

use crate::common::error::HydraError;
use crate::model::FetchConfig;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{info, warn};

/// 抓取单个订阅源的接口，流水线只依赖此 trait。
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, HydraError>;
}

/// 一个订阅源的抓取结果，失败时 `body` 为 `None`
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub body: Option<String>,
}

/// 按配置顺序抓取所有订阅源。
///
/// `concurrency <= 1` 时逐个抓取，相邻请求之间等待 `delay_ms`；
/// 否则以有限并发抓取，返回结果仍保持源顺序。
pub async fn fetch_all_sources(fetcher: &dyn SourceFetcher, config: &FetchConfig) -> Vec<RawDocument> {
    if config.concurrency > 1 {
        return futures::stream::iter(config.sources.iter())
            .map(|url| fetch_one(fetcher, url))
            .buffered(config.concurrency)
            .collect()
            .await;
    }

    let mut documents = Vec::with_capacity(config.sources.len());
    for (i, url) in config.sources.iter().enumerate() {
        if i > 0 && !config.delay().is_zero() {
            tokio::time::sleep(config.delay()).await;
        }
        documents.push(fetch_one(fetcher, url).await);
    }
    documents
}

async fn fetch_one(fetcher: &dyn SourceFetcher, url: &str) -> RawDocument {
    info!("📥 正在抓取：{}", url);
    let body = match fetcher.fetch(url).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("⚠️ 订阅源不可用，已跳过：{} - {}", url, e);
            None
        }
    };
    RawDocument {
        url: url.to_string(),
        body,
    }
}
