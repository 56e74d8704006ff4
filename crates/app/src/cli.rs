use clap::{Args, Parser, Subcommand};
use sipreel_core::config::AppConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sipreel")]
#[command(about = "Daily SIP growth simulator and video reel generator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 日志级别，覆盖配置文件 (RUST_LOG 优先)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// 各子命令共用的模拟参数
#[derive(Args, Debug, Default, Clone)]
pub struct SimulationArgs {
    /// 交易代码 (例如 ITC.NS, AAPL)
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// 起始年份
    #[arg(short = 'y', long)]
    pub start_year: Option<i32>,

    /// 每日定投金额
    #[arg(short = 'a', long)]
    pub contribution: Option<f64>,

    /// 数据源未提供货币时使用的货币代码
    #[arg(long)]
    pub currency: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 运行定投模拟并输出摘要
    Simulate {
        #[command(flatten)]
        sim: SimulationArgs,

        /// 摘要文本输出路径
        #[arg(long)]
        summary: Option<String>,
    },

    /// 渲染定投增长动画并编码为视频
    Reel {
        #[command(flatten)]
        sim: SimulationArgs,

        /// 帧数
        #[arg(short = 'n', long)]
        frames: Option<usize>,

        /// 帧率
        #[arg(long)]
        fps: Option<u32>,

        /// 并发渲染线程数
        #[arg(short, long)]
        workers: Option<usize>,

        /// 帧输出目录（每次运行前清空）
        #[arg(long)]
        frames_dir: Option<String>,

        /// 视频输出路径
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 对比一次性投入与定投，输出 SVG 图表
    Compare {
        #[command(flatten)]
        sim: SimulationArgs,

        /// 一次性投入金额
        #[arg(long)]
        lump_sum: Option<f64>,

        /// 每期定投金额
        #[arg(long)]
        sip: Option<f64>,

        /// 定投周期 (1d / 1w / 1mo)
        #[arg(short, long)]
        frequency: Option<String>,

        /// 图表输出路径
        #[arg(short, long)]
        output: Option<String>,

        /// 同时逐帧渲染对比动画并编码为视频
        #[arg(long)]
        reel: bool,

        /// 对比动画帧数
        #[arg(short = 'n', long)]
        frames: Option<usize>,

        /// 对比动画视频输出路径
        #[arg(long)]
        video: Option<String>,
    },

    /// 从候选列表中随机挑选交易代码
    Pick {
        /// 挑选数量
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 候选代码，逗号分隔（优先于地区列表）
        #[arg(long, value_delimiter = ',')]
        candidates: Vec<String>,

        /// 地区 (us / india / uk / europe)
        #[arg(short, long)]
        region: Option<String>,

        /// 排除列表文件
        #[arg(long)]
        exclude_file: Option<String>,
    },
}

impl SimulationArgs {
    fn apply(&self, config: &mut AppConfig) {
        let sim = &mut config.simulation;
        if let Some(ticker) = &self.ticker {
            sim.ticker.clone_from(ticker);
        }
        if let Some(year) = self.start_year {
            sim.start_year = year;
        }
        if let Some(amount) = self.contribution {
            sim.contribution = amount;
        }
        if let Some(currency) = &self.currency {
            sim.currency.clone_from(currency);
        }
    }
}

impl Cli {
    /// # Summary
    /// 把命令行参数覆盖到已分层加载的配置上（最高优先级）。
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.log.level.clone_from(level);
        }

        match &self.command {
            Command::Simulate { sim, summary } => {
                sim.apply(config);
                if let Some(path) = summary {
                    config.reel.summary_path.clone_from(path);
                }
            }
            Command::Reel {
                sim,
                frames,
                fps,
                workers,
                frames_dir,
                output,
            } => {
                sim.apply(config);
                let reel = &mut config.reel;
                if let Some(n) = frames {
                    reel.num_frames = *n;
                }
                if let Some(fps) = fps {
                    reel.fps = *fps;
                }
                if let Some(workers) = workers {
                    reel.workers = *workers;
                }
                if let Some(dir) = frames_dir {
                    reel.frames_dir.clone_from(dir);
                }
                if let Some(output) = output {
                    reel.output.clone_from(output);
                }
            }
            Command::Compare {
                sim,
                lump_sum,
                sip,
                frequency,
                output,
                frames,
                video,
                ..
            } => {
                sim.apply(config);
                if let Some(n) = frames {
                    config.reel.num_frames = *n;
                }
                let cmp = &mut config.comparison;
                if let Some(amount) = lump_sum {
                    cmp.lump_sum = *amount;
                }
                if let Some(amount) = sip {
                    cmp.sip = *amount;
                }
                if let Some(freq) = frequency {
                    cmp.frequency.clone_from(freq);
                }
                if let Some(output) = output {
                    cmp.output.clone_from(output);
                }
                if let Some(video) = video {
                    cmp.reel_output.clone_from(video);
                }
            }
            Command::Pick {
                seed,
                candidates,
                region,
                exclude_file,
                ..
            } => {
                let selection = &mut config.selection;
                if let Some(seed) = seed {
                    selection.seed = *seed;
                }
                if !candidates.is_empty() {
                    selection.candidates.clone_from(candidates);
                }
                if let Some(region) = region {
                    selection.region.clone_from(region);
                }
                if let Some(path) = exclude_file {
                    selection.exclude_file.clone_from(path);
                }
            }
        }
    }
}
