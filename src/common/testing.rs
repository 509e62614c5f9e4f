//! 测试用的本地 HTTP 桩服务，只监听回环地址，不访问外网。

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use crate::common::error::HydraError;
use crate::launcher::{LocalEndpoint, ProxyLauncher};
use crate::model::VlessConfig;

/// 启动一个对任意请求都返回固定状态码与响应体的 HTTP 服务。
///
/// 同样可以充当 HTTP 代理：代理请求的绝对路径不影响响应内容。
pub async fn spawn_http_stub(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(respond(stream, status, body));
        }
    });

    addr
}

/// 启动一个接受连接但永不响应的服务，用于超时场景。
pub async fn spawn_silent_stub() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _held = stream;
                tokio::time::sleep(Duration::from_secs(300)).await;
            });
        }
    });

    addr
}

async fn respond(mut stream: TcpStream, status: u16, body: &'static str) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// 把所有条目都转发到同一个本地 HTTP 桩，并统计启动与释放次数。
///
/// `proxy` 为 `None` 时每次启动都失败；`failing_teardown` 构造的实例释放时返回错误。
pub struct StubLauncher {
    proxy: Option<SocketAddr>,
    teardown_fails: bool,
    pub launched: AtomicUsize,
    pub released: AtomicUsize,
}

impl StubLauncher {
    pub fn new(proxy: Option<SocketAddr>) -> Self {
        Self {
            proxy,
            teardown_fails: false,
            launched: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    pub fn failing_teardown(proxy: SocketAddr) -> Self {
        Self {
            teardown_fails: true,
            ..Self::new(Some(proxy))
        }
    }
}

#[async_trait]
impl ProxyLauncher for StubLauncher {
    async fn launch(&self, _config: &VlessConfig) -> Result<LocalEndpoint, HydraError> {
        let addr = self
            .proxy
            .ok_or_else(|| HydraError::Launch("stub launcher disabled".into()))?;
        self.launched.fetch_add(1, Ordering::SeqCst);
        Ok(LocalEndpoint::new(format!("http://{}", addr)))
    }

    async fn teardown(&self, _endpoint: LocalEndpoint) -> Result<(), HydraError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        if self.teardown_fails {
            return Err(HydraError::Launch("stub teardown failed".into()));
        }
        Ok(())
    }
}
