use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 全局应用配置
///
/// 所有原本隐式的环境状态（日志级别、随机种子等）都通过此结构显式传入各组件。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub reel: ReelConfig,
    pub comparison: ComparisonConfig,
    pub selection: SelectionConfig,
    pub feed: FeedConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub ticker: String,
    pub start_year: i32,
    // 每日定投金额
    pub contribution: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    // 帧输出目录，每次渲染前会被清空重建
    pub frames_dir: String,
    pub output: String,
    pub summary_path: String,
    pub num_frames: usize,
    pub fps: u32,
    // 渲染工作线程上限
    pub workers: usize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub lump_sum: f64,
    pub sip: f64,
    // 1d / 1w / 1mo
    pub frequency: String,
    pub output: String,
    // 对比动画的帧目录与视频路径（`compare --reel`）
    pub frames_dir: String,
    pub reel_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    // 显式候选列表，非空时优先于地区列表
    pub candidates: Vec<String>,
    // 地区名（小写）到候选代码的映射
    pub regions: BTreeMap<String, Vec<String>>,
    pub region: String,
    pub exclude_file: String,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    // 日志文件目录，None 时只输出到终端
    pub dir: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticker: "ITC.NS".to_string(),
            start_year: 2005,
            contribution: 100.0,
            currency: "INR".to_string(),
        }
    }
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            frames_dir: "frames".to_string(),
            output: "investment_growth_reel.mp4".to_string(),
            summary_path: "summary.txt".to_string(),
            num_frames: 200,
            fps: 10,
            workers: 4,
            width: 1080,
            height: 1920,
        }
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            lump_sum: 10_000.0,
            sip: 500.0,
            frequency: "1w".to_string(),
            output: "lump_sum_vs_sip.svg".to_string(),
            frames_dir: "comparison_frames".to_string(),
            reel_output: "lump_sum_vs_sip.mp4".to_string(),
        }
    }
}

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for SelectionConfig {
    fn default() -> Self {
        let regions = BTreeMap::from([
            (
                "us".to_string(),
                symbols(&["AAPL", "MSFT", "AMZN", "GOOGL", "JPM", "JNJ", "PG", "KO", "XOM", "WMT"]),
            ),
            (
                "india".to_string(),
                symbols(&[
                    "RELIANCE.NS",
                    "TCS.NS",
                    "HDFCBANK.NS",
                    "INFY.NS",
                    "ITC.NS",
                    "AXISBANK.NS",
                    "HINDUNILVR.NS",
                    "LT.NS",
                    "SBIN.NS",
                    "TITAN.NS",
                ]),
            ),
            (
                "uk".to_string(),
                symbols(&["AZN.L", "SHEL.L", "HSBA.L", "ULVR.L", "BP.L", "GSK.L", "RIO.L", "DGE.L"]),
            ),
            (
                "europe".to_string(),
                symbols(&["ASML.AS", "MC.PA", "SAP.DE", "SIE.DE", "OR.PA", "SAN.PA", "ALV.DE", "ITX.MC"]),
            ),
        ]);
        Self {
            candidates: Vec::new(),
            regions,
            region: "us".to_string(),
            exclude_file: "exclude.txt".to_string(),
            seed: 0,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.simulation.ticker, "ITC.NS");
        assert_eq!(config.simulation.start_year, 2005);
        assert_eq!(config.reel.num_frames, 200);
        assert_eq!(config.reel.fps, 10);
        assert_eq!((config.reel.width, config.reel.height), (1080, 1920));
        assert_eq!(config.log.level, "info");
        assert!(config.log.dir.is_none());
        assert_eq!(config.selection.region, "us");
        assert_eq!(
            config.selection.regions.keys().collect::<Vec<_>>(),
            vec!["europe", "india", "uk", "us"]
        );
    }

    #[test]
    fn test_partial_section_falls_back_to_defaults() {
        let json = r#"{"simulation": {"ticker": "AAPL", "currency": "USD"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.simulation.ticker, "AAPL");
        assert_eq!(config.simulation.start_year, 2005);
        assert_eq!(config.reel.workers, 4);
    }
}
