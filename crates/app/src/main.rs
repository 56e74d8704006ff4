use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use sipreel_feed::yahoo::YahooProvider;
use std::time::Duration;
use tracing::{debug, info};

mod cli;
mod commands;
mod logging;
mod settings;

/// # Summary
/// 应用启动入口，负责组装具体实现并分派子命令。
///
/// # Logic
/// 1. 解析命令行，按 默认值 → 配置文件 → 环境变量 → 命令行 的顺序得到最终配置。
/// 2. 初始化全局日志（守卫持有到进程结束）。
/// 3. 安装 TLS 加密提供者并实例化行情数据源。
/// 4. 执行子命令。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载配置
    let cli = Cli::parse();
    let mut config = settings::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);

    // 2. 初始化日志
    let _guard = logging::init_logging(&config.log)?;
    info!("sipreel {} starting", env!("CARGO_PKG_VERSION"));
    debug!("Effective configuration: {:?}", config);

    // 3. 实例化基础设施层
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("TLS crypto provider already installed");
    }
    let feed = YahooProvider::new(Duration::from_secs(config.feed.timeout_secs))?;

    // 4. 分派子命令
    match cli.command {
        Command::Simulate { .. } => commands::simulate(&feed, &config).await?,
        Command::Reel { .. } => commands::reel(&feed, &config).await?,
        Command::Compare { reel, .. } => commands::compare(&feed, &config, reel).await?,
        Command::Pick { count, .. } => commands::pick(&config, count).await?,
    }

    info!("Done");
    Ok(())
}
