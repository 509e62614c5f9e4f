//! 输出文件的渲染与写入。每次运行完整覆盖，不追加。

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::info;

use crate::model::VlessEntry;

/// 渲染输出文件内容：头部注释块，随后每条带编号的配置，各配置之间空一行。
pub fn render_output(total: usize, selected: &[VlessEntry], generated_at: &DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str("# Auto-generated vless configs\n");
    let _ = writeln!(out, "# Last update: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "# Total available: {}", total);
    let _ = writeln!(out, "# Randomly selected: {}\n", selected.len());

    for (i, entry) in selected.iter().enumerate() {
        let _ = writeln!(out, "# Config {}", i + 1);
        let _ = writeln!(out, "{}\n", entry);
    }
    out
}

/// 覆盖写入输出文件，父目录不存在时自动创建。
pub async fn write_output(path: &Path, total: usize, selected: &[VlessEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = render_output(total, selected, &Local::now());
    tokio::fs::write(path, content).await?;

    info!("💾 已写入 {} 条配置到 {}", selected.len(), path.display());
    Ok(())
}
