use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydraError {
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
    #[error("{url} 返回非成功状态码 {status}")]
    BadStatus { url: String, status: u16 },
    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error("无效的 vless 配置 {entry}: {reason}")]
    MalformedEntry { entry: String, reason: String },
    #[error("本地代理启动失败: {0}")]
    Launch(String),
    #[error("测活失败: {0}")]
    Probe(String),
}
