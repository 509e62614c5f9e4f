//! # launcher 模块
//!
//! 为一条 vless 配置在本机拉起一个转发端点（如 xray-core 的 SOCKS 入站），
//! 测活请求经由该端点发出。端点必须通过 [`ProxyLauncher::teardown`] 释放；
//! 若调用方提前退出，[`LocalEndpoint`] 在析构时也会结束子进程并删除临时文件。

mod xray;

pub use xray::XrayLauncher;

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Child;

use crate::common::error::HydraError;
use crate::model::VlessConfig;

#[async_trait]
pub trait ProxyLauncher: Send + Sync {
    /// 根据配置启动本地转发端点
    async fn launch(&self, config: &VlessConfig) -> Result<LocalEndpoint, HydraError>;

    /// 释放端点持有的全部资源
    async fn teardown(&self, endpoint: LocalEndpoint) -> Result<(), HydraError>;
}

/// 一个已启动的本地转发端点。
#[derive(Debug)]
pub struct LocalEndpoint {
    /// 可直接传给 `reqwest::Proxy::all` 的代理地址
    pub proxy_url: String,
    process: Option<Child>,
    config_path: Option<PathBuf>,
}

impl LocalEndpoint {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            process: None,
            config_path: None,
        }
    }

    fn with_process(proxy_url: String, process: Child, config_path: PathBuf) -> Self {
        let mut endpoint = Self::new(proxy_url);
        endpoint.process = Some(process);
        endpoint.config_path = Some(config_path);
        endpoint
    }

    fn take_process(&mut self) -> Option<Child> {
        self.process.take()
    }

    fn take_config_path(&mut self) -> Option<PathBuf> {
        self.config_path.take()
    }
}

impl Drop for LocalEndpoint {
    fn drop(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.start_kill();
        }
        if let Some(path) = self.config_path.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
