mod common;
mod fetcher;
mod launcher;
mod model;
mod service;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use crate::common::log::init_logging;
use crate::model::AppConfig;
use crate::service::pipeline::Pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    // 必须在其它调用之前初始化日志
    init_logging(&config.log)?;

    let mut rng = match config.select.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let summary = Pipeline::new(config)?.run(&mut rng).await?;

    info!("========== [运行完成 ✅] ==========");
    info!(
        "可用 {} 条，写入 {} 条{}",
        summary.total_available,
        summary.selected,
        if summary.used_fallback { "（内置样例）" } else { "" }
    );
    Ok(())
}
