//! # verifier 模块
//!
//! 对 vless 条目做真实连通性测试。
//!
//! ## 功能简介
//!
//! - 为每条配置在本机启动一个转发端点（见 [`crate::launcher`]）；
//! - 经由该端点向 IP 回显服务发起一次请求；
//! - 状态码为 200 且响应体可解析为 JSON 时判定为可用；
//! - 无论测试成功与否都会释放端点；
//! - 逐条顺序测试，相邻两次之间固定等待，避免触发目标服务限流。
//!
//! 任一步骤失败只会让该条目判为不可用，不会中断整批测试。

use std::time::{Duration, Instant};

use anyhow::Result;
use reqwest::StatusCode;
use tracing::{error, info, warn};

use crate::common::error::HydraError;
use crate::launcher::ProxyLauncher;
use crate::model::{ProbeConfig, VlessConfig, VlessEntry};

/// 依次测试所有条目，返回可用的条目（保持输入顺序）。
///
/// `max_probes` 大于 0 时只测试前 `max_probes` 条。
pub async fn verify_all(
    entries: Vec<VlessEntry>,
    launcher: &dyn ProxyLauncher,
    config: &ProbeConfig,
) -> Result<Vec<VlessEntry>> {
    let limit = if config.max_probes > 0 {
        config.max_probes.min(entries.len())
    } else {
        entries.len()
    };

    info!("========== [代理测活阶段] ==========");
    info!("🚀 开始测活，共 {} 条待测，测速节点：{}", limit, config.test_url);

    let mut working = Vec::new();
    for (i, entry) in entries.into_iter().take(limit).enumerate() {
        if i > 0 && !config.delay().is_zero() {
            tokio::time::sleep(config.delay()).await;
        }

        let start = Instant::now();
        let label = format!("[#{}/{}]", i + 1, limit);
        match verify_single(&entry, launcher, config).await {
            Ok(true) => {
                info!("🟢 {} 可用，耗时 {}ms", label, start.elapsed().as_millis());
                working.push(entry);
            }
            Ok(false) => {
                warn!("🔴 {} 不可用，耗时 {}ms", label, start.elapsed().as_millis());
            }
            Err(e) => {
                error!("❌ {} 测活出错，耗时 {}ms，错误：{}", label, start.elapsed().as_millis(), e);
            }
        }
    }

    info!("✅ 测活完成：总计 {} 条，可用 {} 条", limit, working.len());
    Ok(working)
}

/// 启动端点 → 发起请求 → 释放端点。
///
/// 释放在任何情况下都会执行；释放失败时该条目同样视为不可用。
async fn verify_single(
    entry: &VlessEntry,
    launcher: &dyn ProxyLauncher,
    config: &ProbeConfig,
) -> Result<bool, HydraError> {
    let vless = VlessConfig::parse(entry)?;
    let endpoint = launcher.launch(&vless).await?;

    let outcome = probe_through(&endpoint.proxy_url, &config.test_url, config.timeout()).await;
    launcher.teardown(endpoint).await?;

    outcome
}

async fn probe_through(proxy_url: &str, test_url: &str, timeout: Duration) -> Result<bool, HydraError> {
    let client = reqwest::Client::builder()
        .proxy(reqwest::Proxy::all(proxy_url)?)
        .timeout(timeout)
        .build()?;

    let response = client.get(test_url).send().await?;
    if response.status() != StatusCode::OK {
        return Ok(false);
    }

    let body = response.text().await?;
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(_) => Ok(true),
        Err(e) => Err(HydraError::Probe(format!("响应体无法解析：{}", e))),
    }
}
