use anyhow::{Context, Result};
use sipreel_core::common::{Frequency, Ticker};
use sipreel_core::config::AppConfig;
use sipreel_core::market::entity::TickerProfile;
use sipreel_core::market::port::MarketDataProvider;
use sipreel_core::render::entity::{ChartMeta, EncodeSettings};
use sipreel_core::simulation::entity::{ComparisonRow, SimulationResult, SummaryStatistics};
use sipreel_engine::comparison::LumpSumComparison;
use sipreel_engine::reel::ReelDriver;
use sipreel_engine::report::SummaryReport;
use sipreel_engine::selection::{TickerSelector, load_exclusions};
use sipreel_engine::simulator::SipSimulator;
use sipreel_engine::summary::{describe, summarize};
use sipreel_feed::adapter::{load_price_series, load_profile};
use sipreel_render::ffmpeg::FfmpegEncoder;
use sipreel_render::svg::{SvgChartRenderer, SvgComparisonRenderer, render_comparison_svg};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 一次模拟的全部中间产物
struct SimulationRun {
    ticker: Ticker,
    profile: TickerProfile,
    result: SimulationResult,
    stats: SummaryStatistics,
}

impl SimulationRun {
    /// 数据源的货币优先，缺失时使用配置
    fn currency<'a>(&'a self, config: &'a AppConfig) -> &'a str {
        self.profile
            .currency
            .as_deref()
            .unwrap_or(&config.simulation.currency)
    }
}

/// # Summary
/// 抓取价格、运行模拟并计算汇总统计。
async fn run_simulation(
    provider: &dyn MarketDataProvider,
    config: &AppConfig,
) -> Result<SimulationRun> {
    let sim = &config.simulation;
    let ticker = Ticker::new(&sim.ticker);
    let simulator = SipSimulator::new(sim.contribution)?;

    let series = load_price_series(provider, &ticker, sim.start_year, None)
        .await
        .with_context(|| format!("failed to load prices for {ticker}"))?;
    let profile = load_profile(provider, &ticker).await;

    let result = simulator.simulate(&series)?;
    let stats = summarize(&result)?;

    Ok(SimulationRun {
        ticker,
        profile,
        result,
        stats,
    })
}

/// # Summary
/// 把摘要写入文本文件并打印到终端。
async fn write_summary(run: &SimulationRun, config: &AppConfig) -> Result<()> {
    let description = describe(&run.result, &run.profile, config.simulation.start_year)?;
    let report = SummaryReport {
        stats: &run.stats,
        description: &description,
        currency: run.currency(config),
    };

    let path = Path::new(&config.reel.summary_path);
    report
        .write(path)
        .await
        .with_context(|| format!("failed to write summary to {}", path.display()))?;
    info!("Summary saved to {}", path.display());

    print!("{}", report.render());
    Ok(())
}

/// `sipreel simulate`
pub async fn simulate(provider: &dyn MarketDataProvider, config: &AppConfig) -> Result<()> {
    let run = run_simulation(provider, config).await?;
    write_summary(&run, config).await
}

/// # Summary
/// `sipreel reel`：模拟、逐帧渲染并编码为视频，最后写出摘要。
pub async fn reel(provider: &dyn MarketDataProvider, config: &AppConfig) -> Result<()> {
    let run = run_simulation(provider, config).await?;
    let reel = &config.reel;

    let meta = ChartMeta {
        ticker: run.ticker.symbol.clone(),
        name: run.profile.display_name().to_string(),
        start_year: config.simulation.start_year,
        contribution: config.simulation.contribution,
        currency: run.currency(config).to_string(),
        width: reel.width,
        height: reel.height,
    };
    let settings = EncodeSettings {
        fps: reel.fps,
        ..EncodeSettings::default()
    };

    let driver: ReelDriver = ReelDriver::new(
        Arc::new(SvgChartRenderer::new(meta)),
        Arc::new(FfmpegEncoder::new()),
        reel.workers,
    );
    let output = driver
        .run(
            Arc::from(run.result.rows()),
            reel.num_frames,
            Path::new(&reel.frames_dir),
            Path::new(&reel.output),
            &settings,
        )
        .await
        .context("failed to produce reel")?;
    info!(
        "Reel for {} written to {} ({} frames)",
        run.ticker,
        output.video.display(),
        output.frames.len()
    );

    write_summary(&run, config).await
}

/// # Summary
/// `sipreel compare`：按周期降采样后对比一次性投入与定投，输出 SVG 图表。
///
/// # Logic
/// `with_reel` 为真时额外把对比表逐前缀渲染为帧并编码为视频。
pub async fn compare(
    provider: &dyn MarketDataProvider,
    config: &AppConfig,
    with_reel: bool,
) -> Result<()> {
    let sim = &config.simulation;
    let cmp = &config.comparison;
    let frequency: Frequency = cmp
        .frequency
        .parse()
        .map_err(anyhow::Error::msg)
        .context("invalid comparison frequency")?;
    let comparison = LumpSumComparison::new(cmp.lump_sum, cmp.sip)?;

    let ticker = Ticker::new(&sim.ticker);
    let series = load_price_series(provider, &ticker, sim.start_year, None)
        .await
        .with_context(|| format!("failed to load prices for {ticker}"))?;
    let profile = load_profile(provider, &ticker).await;

    let points = series.resample(frequency);
    let rows = comparison.compare(&points)?;

    let meta = ChartMeta {
        ticker: ticker.symbol.clone(),
        name: profile.display_name().to_string(),
        start_year: sim.start_year,
        contribution: cmp.sip,
        currency: profile
            .currency
            .clone()
            .unwrap_or_else(|| sim.currency.clone()),
        width: config.reel.width,
        height: config.reel.height,
    };
    let svg = render_comparison_svg(&rows, &meta)?;

    let output = Path::new(&cmp.output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, svg)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    if let Some(last) = rows.last() {
        info!(
            "{} {} periods: SIP {:.2} (invested {:.2}) vs lump sum {:.2}",
            ticker,
            rows.len(),
            last.sip_value,
            last.sip_invested,
            last.lump_value
        );
    }
    info!("Comparison chart saved to {}", output.display());

    if with_reel {
        comparison_reel(rows, meta, config).await?;
    }
    Ok(())
}

/// 对比动画：复用成片驱动器，每帧渲染对比表的一个前缀
async fn comparison_reel(
    rows: Vec<ComparisonRow>,
    meta: ChartMeta,
    config: &AppConfig,
) -> Result<()> {
    let cmp = &config.comparison;
    let settings = EncodeSettings {
        fps: config.reel.fps,
        ..EncodeSettings::default()
    };

    let driver: ReelDriver<ComparisonRow> = ReelDriver::new(
        Arc::new(SvgComparisonRenderer::new(meta)),
        Arc::new(FfmpegEncoder::new()),
        config.reel.workers,
    );
    let output = driver
        .run(
            Arc::from(rows),
            config.reel.num_frames,
            Path::new(&cmp.frames_dir),
            Path::new(&cmp.reel_output),
            &settings,
        )
        .await
        .context("failed to produce comparison reel")?;
    info!(
        "Comparison reel written to {} ({} frames)",
        output.video.display(),
        output.frames.len()
    );
    Ok(())
}

/// `sipreel pick`
pub async fn pick(config: &AppConfig, count: usize) -> Result<()> {
    let selection = &config.selection;
    let excluded = load_exclusions(Path::new(&selection.exclude_file))
        .await
        .with_context(|| format!("failed to read {}", selection.exclude_file))?;

    let selector = TickerSelector::from_config(selection, excluded)?;
    let picked = selector.pick(count)?;
    for ticker in &picked {
        println!("{ticker}");
    }
    Ok(())
}
