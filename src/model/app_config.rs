use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::error::HydraError;
use crate::fetcher::sources;

/// 程序运行配置，从工作目录下可选的 `Config.toml` 加载。
///
/// 所有字段都有默认值，缺少配置文件时等价于最基础的流水线：
/// 不排序、不测活、纯随机抽样、不过滤传输安全类型。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub filter: FilterConfig,
    pub rank: RankConfig,
    pub probe: ProbeConfig,
    pub select: SelectConfig,
    pub output: OutputConfig,
    pub log: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    pub sources: Vec<String>,
    pub timeout_secs: u64,
    /// 相邻两次抓取之间的等待时间（毫秒）
    pub delay_ms: u64,
    pub user_agent: String,
    /// 大于 1 时按该并发数抓取，结果仍按源顺序汇总
    pub concurrency: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 仅保留 `security=reality` / `security=tls` 的条目
    pub require_secure_transport: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RankConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub enabled: bool,
    pub xray_bin: String,
    pub test_url: String,
    pub timeout_secs: u64,
    pub delay_ms: u64,
    pub startup_timeout_ms: u64,
    /// 单次运行最多测活的条目数，0 表示不限制
    pub max_probes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// 无放回均匀随机抽样
    #[default]
    Random,
    /// 优先取排序靠前的安全条目，不足阈值时随机补齐
    PriorityFirst,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectConfig {
    pub cap: usize,
    pub policy: SelectionPolicy,
    pub min_priority: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub console_levels: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            sources: sources::DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            timeout_secs: 20,
            delay_ms: 1000,
            user_agent: sources::USER_AGENT.to_string(),
            concurrency: 1,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            xray_bin: "xray".to_string(),
            test_url: "https://api.ipify.org?format=json".to_string(),
            timeout_secs: 10,
            delay_ms: 2000,
            startup_timeout_ms: 3000,
            max_probes: 0,
        }
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            cap: 30,
            policy: SelectionPolicy::Random,
            min_priority: 10,
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("configs/working-configs.txt"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            console_levels: vec!["ERROR".into(), "WARN".into(), "INFO".into()],
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

impl AppConfig {
    /// 读取工作目录下的 `Config.toml`，文件不存在时全部使用默认值。
    pub fn load() -> Result<Self, HydraError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Config").required(false))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    #[cfg(test)]
    pub fn from_toml(text: &str) -> Result<Self, HydraError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
