use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use crate::common::error::HydraError;

/// 目标协议前缀
pub const SCHEME_PREFIX: &str = "vless://";

/// 被视为安全传输的 `security` 取值
pub const SECURE_MODES: [&str; 2] = ["reality", "tls"];

/// 一条 vless 连接描述。
///
/// 只是原始文本的包装：相等与哈希都按字符串逐字节比较，
/// 格式不同但语义相同的两条描述视为不同条目。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VlessEntry(String);

impl VlessEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 解析 `?` 与 `#` 之间的查询参数（已做百分号解码）。
    pub fn query_params(&self) -> Vec<(String, String)> {
        let Some((_, rest)) = self.0.split_once('?') else {
            return Vec::new();
        };
        let query = rest.split('#').next().unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn security(&self) -> Option<String> {
        self.query_params()
            .into_iter()
            .find(|(k, _)| k == "security")
            .map(|(_, v)| v)
    }

    /// `security` 为 `reality` 或 `tls` 时返回 true
    pub fn has_secure_transport(&self) -> bool {
        self.security()
            .is_some_and(|mode| SECURE_MODES.contains(&mode.as_str()))
    }
}

impl fmt::Display for VlessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VlessEntry {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// 测活时使用的结构化视图，由 [`VlessEntry`] 解析而来。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlessConfig {
    pub uuid: String,
    pub host: String,
    pub port: u16,
    pub params: BTreeMap<String, String>,
    pub label: Option<String>,
}

impl VlessConfig {
    pub fn parse(entry: &VlessEntry) -> Result<Self, HydraError> {
        let malformed = |reason: &str| HydraError::MalformedEntry {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(entry.as_str()).map_err(|e| malformed(&e.to_string()))?;
        if url.scheme() != "vless" {
            return Err(malformed("scheme is not vless"));
        }

        let uuid = url.username();
        if uuid.is_empty() {
            return Err(malformed("missing uuid"));
        }
        let host = url
            .host_str()
            .ok_or_else(|| malformed("missing host"))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = url.port().ok_or_else(|| malformed("missing port"))?;

        let params = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let label = url.fragment().map(percent_decode);

        Ok(Self {
            uuid: uuid.to_string(),
            host,
            port,
            params,
            label,
        })
    }

    /// 取参数值，空字符串视为未设置
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// 传输层类型，缺省为 `tcp`
    pub fn network(&self) -> &str {
        self.param("type").unwrap_or("tcp")
    }

    pub fn security(&self) -> &str {
        self.param("security").unwrap_or("none")
    }
}

fn percent_decode(text: &str) -> String {
    url::form_urlencoded::parse(format!("l={}", text.replace('+', "%2B")).as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| text.to_string())
}
