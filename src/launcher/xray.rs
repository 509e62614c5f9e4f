use std::net::TcpListener as StdTcpListener;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::debug;

use crate::common::error::HydraError;
use crate::launcher::{LocalEndpoint, ProxyLauncher};
use crate::model::{ProbeConfig, VlessConfig};

/// 通过外部 xray-core 进程提供本地 SOCKS 入站。
pub struct XrayLauncher {
    bin: String,
    startup_timeout: Duration,
}

impl XrayLauncher {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            bin: config.xray_bin.clone(),
            startup_timeout: config.startup_timeout(),
        }
    }

    async fn wait_ready(&self, endpoint: &mut LocalEndpoint, port: u16) -> Result<(), HydraError> {
        let deadline = Instant::now() + self.startup_timeout;
        loop {
            if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                return Ok(());
            }
            if let Some(child) = endpoint.process.as_mut() {
                if let Some(status) = child.try_wait()? {
                    return Err(HydraError::Launch(format!("xray 提前退出：{}", status)));
                }
            }
            if Instant::now() >= deadline {
                return Err(HydraError::Launch(format!(
                    "等待端口 {} 就绪超时（{}ms）",
                    port,
                    self.startup_timeout.as_millis()
                )));
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

#[async_trait]
impl ProxyLauncher for XrayLauncher {
    async fn launch(&self, config: &VlessConfig) -> Result<LocalEndpoint, HydraError> {
        let port = free_port()?;
        let xray_config = build_xray_config(config, port);

        let path = config_path(port);
        tokio::fs::write(&path, serde_json::to_vec_pretty(&xray_config)?).await?;

        let child = match Command::new(&self.bin)
            .arg("run")
            .arg("-c")
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let _ = tokio::fs::remove_file(&path).await;
                return Err(HydraError::Launch(format!("无法启动 {}：{}", self.bin, e)));
            }
        };

        let mut endpoint =
            LocalEndpoint::with_process(format!("socks5h://127.0.0.1:{}", port), child, path);
        if let Err(e) = self.wait_ready(&mut endpoint, port).await {
            if let Err(te) = self.teardown(endpoint).await {
                debug!("清理未就绪的 xray 失败：{}", te);
            }
            return Err(e);
        }

        debug!(
            "xray 已在 127.0.0.1:{} 就绪 -> {}:{} ({})",
            port,
            config.host,
            config.port,
            config.label.as_deref().unwrap_or("-")
        );
        Ok(endpoint)
    }

    async fn teardown(&self, mut endpoint: LocalEndpoint) -> Result<(), HydraError> {
        if let Some(mut child) = endpoint.take_process() {
            if child.try_wait()?.is_none() {
                child.kill().await?;
            }
        }
        if let Some(path) = endpoint.take_config_path() {
            match tokio::fs::remove_file(&path).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            }
        }
        Ok(())
    }
}

fn free_port() -> Result<u16, HydraError> {
    let listener = StdTcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

fn config_path(port: u16) -> PathBuf {
    std::env::temp_dir().join(format!("vless-hydra-{}-{}.json", std::process::id(), port))
}

/// 生成只含一个 SOCKS 入站、一个 vless 出站的 xray 配置
pub fn build_xray_config(config: &VlessConfig, local_port: u16) -> Value {
    let mut user = Map::new();
    user.insert("id".into(), json!(config.uuid));
    user.insert(
        "encryption".into(),
        json!(config.param("encryption").unwrap_or("none")),
    );
    if let Some(flow) = config.param("flow") {
        user.insert("flow".into(), json!(flow));
    }

    json!({
        "log": { "loglevel": "warning" },
        "inbounds": [{
            "listen": "127.0.0.1",
            "port": local_port,
            "protocol": "socks",
            "settings": { "udp": false }
        }],
        "outbounds": [{
            "protocol": "vless",
            "settings": {
                "vnext": [{
                    "address": config.host,
                    "port": config.port,
                    "users": [Value::Object(user)]
                }]
            },
            "streamSettings": stream_settings(config)
        }]
    })
}

fn stream_settings(config: &VlessConfig) -> Value {
    let mut stream = Map::new();
    let network = config.network();
    let security = config.security();
    stream.insert("network".into(), json!(network));
    stream.insert("security".into(), json!(security));

    let server_name = config.param("sni").unwrap_or(config.host.as_str());
    match security {
        "tls" => {
            let mut tls = Map::new();
            tls.insert("serverName".into(), json!(server_name));
            if let Some(fp) = config.param("fp") {
                tls.insert("fingerprint".into(), json!(fp));
            }
            if let Some(alpn) = config.param("alpn") {
                let list: Vec<&str> = alpn.split(',').filter(|s| !s.is_empty()).collect();
                tls.insert("alpn".into(), json!(list));
            }
            stream.insert("tlsSettings".into(), Value::Object(tls));
        }
        "reality" => {
            stream.insert(
                "realitySettings".into(),
                json!({
                    "serverName": server_name,
                    "fingerprint": config.param("fp").unwrap_or("chrome"),
                    "publicKey": config.param("pbk").unwrap_or_default(),
                    "shortId": config.param("sid").unwrap_or_default(),
                    "spiderX": config.param("spx").unwrap_or_default(),
                }),
            );
        }
        _ => {}
    }

    match network {
        "ws" => {
            let mut ws = Map::new();
            ws.insert("path".into(), json!(config.param("path").unwrap_or("/")));
            if let Some(host) = config.param("host") {
                ws.insert("headers".into(), json!({ "Host": host }));
            }
            stream.insert("wsSettings".into(), Value::Object(ws));
        }
        "grpc" => {
            stream.insert(
                "grpcSettings".into(),
                json!({ "serviceName": config.param("serviceName").unwrap_or_default() }),
            );
        }
        "httpupgrade" => {
            stream.insert(
                "httpupgradeSettings".into(),
                json!({
                    "path": config.param("path").unwrap_or("/"),
                    "host": config.param("host").unwrap_or_default(),
                }),
            );
        }
        _ => {}
    }

    Value::Object(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VlessEntry;

    fn parse(text: &str) -> VlessConfig {
        VlessConfig::parse(&VlessEntry::from(text)).unwrap()
    }

    #[test]
    fn test_reality_config() {
        let config = parse(
            "vless://bfc78cd8-5951-4803-8d6c-4cedef8cd420@95.164.85.109:59374/?type=tcp&encryption=none&flow=&sni=yahoo.com&fp=chrome&security=reality&pbk=ZsswZuBV8bEGQWFrpShCilSytnDUj0kwHFhTSLXzOwc&sid=d21e7c#Test-Config-3",
        );
        let value = build_xray_config(&config, 10808);

        assert_eq!(value["inbounds"][0]["port"], 10808);
        assert_eq!(value["inbounds"][0]["protocol"], "socks");

        let outbound = &value["outbounds"][0];
        assert_eq!(outbound["protocol"], "vless");
        let server = &outbound["settings"]["vnext"][0];
        assert_eq!(server["address"], "95.164.85.109");
        assert_eq!(server["port"], 59374);
        assert_eq!(server["users"][0]["id"], "bfc78cd8-5951-4803-8d6c-4cedef8cd420");
        // 空 flow 不写入
        assert!(server["users"][0].get("flow").is_none());

        let stream = &outbound["streamSettings"];
        assert_eq!(stream["network"], "tcp");
        assert_eq!(stream["security"], "reality");
        assert_eq!(stream["realitySettings"]["serverName"], "yahoo.com");
        assert_eq!(stream["realitySettings"]["shortId"], "d21e7c");
        assert_eq!(
            stream["realitySettings"]["publicKey"],
            "ZsswZuBV8bEGQWFrpShCilSytnDUj0kwHFhTSLXzOwc"
        );
    }

    #[test]
    fn test_tls_ws_config() {
        let config = parse(
            "vless://8672bdcd-e331-464d-9ed8-93a242ca7d2e@cdn.example.com:443?path=%2Fray&security=tls&encryption=none&type=ws&host=edge.example.com&alpn=h2,http/1.1#ws",
        );
        let stream = &build_xray_config(&config, 1)["outbounds"][0]["streamSettings"];

        assert_eq!(stream["network"], "ws");
        assert_eq!(stream["wsSettings"]["path"], "/ray");
        assert_eq!(stream["wsSettings"]["headers"]["Host"], "edge.example.com");
        assert_eq!(stream["tlsSettings"]["serverName"], "cdn.example.com");
        assert_eq!(stream["tlsSettings"]["alpn"][1], "http/1.1");
    }

    #[tokio::test]
    async fn test_missing_binary_fails_and_cleans_up() {
        let launcher = XrayLauncher {
            bin: "/nonexistent/xray-binary".to_string(),
            startup_timeout: Duration::from_millis(200),
        };
        let config = parse("vless://e4824193-4f54-453b-d037-88368e85ef0e@45.82.251.80:8880?encryption=none&security=none&type=grpc#T5");

        let result = launcher.launch(&config).await;
        assert!(matches!(result, Err(HydraError::Launch(_))));

        let prefix = format!("vless-hydra-{}-", std::process::id());
        let leftovers: Vec<_> = std::fs::read_dir(std::env::temp_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
            .collect();
        assert!(leftovers.is_empty(), "temp config left behind: {:?}", leftovers);
    }
}
