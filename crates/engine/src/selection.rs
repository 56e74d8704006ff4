use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sipreel_core::common::Ticker;
use sipreel_core::config::SelectionConfig;
use sipreel_core::simulation::error::SimulationError;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// # Summary
/// 随机选股器：从候选列表中剔除排除项后按种子抽样。
///
/// # Invariants
/// - 随机源只由显式传入的 `seed` 决定，相同输入必得相同结果。
/// - 排除规则比较的是去掉交易所后缀的大写基础代码（`AXISBANK.NS` -> `AXISBANK`）。
#[derive(Debug, Clone)]
pub struct TickerSelector {
    candidates: Vec<String>,
    excluded: HashSet<String>,
    seed: u64,
}

impl TickerSelector {
    pub fn new(candidates: Vec<String>, excluded: Vec<String>, seed: u64) -> Self {
        Self {
            candidates,
            excluded: excluded
                .into_iter()
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect(),
            seed,
        }
    }

    /// # Summary
    /// 按配置确定候选列表后创建选股器。
    ///
    /// # Logic
    /// 1. 显式 `candidates` 非空时直接使用。
    /// 2. 否则按 `region`（不区分大小写）在 `regions` 中查找候选列表。
    ///
    /// # Returns
    /// 地区未配置时返回 `InvalidInput`。
    pub fn from_config(
        config: &SelectionConfig,
        excluded: Vec<String>,
    ) -> Result<Self, SimulationError> {
        if !config.candidates.is_empty() {
            info!("Selecting from {} explicit candidates", config.candidates.len());
            return Ok(Self::new(config.candidates.clone(), excluded, config.seed));
        }

        let region = config.region.trim().to_lowercase();
        let candidates = config
            .regions
            .get(&region)
            .ok_or_else(|| SimulationError::InvalidInput(format!("Unknown region: {region}")))?;
        info!("Selecting from {} candidates in region {}", candidates.len(), region);
        Ok(Self::new(candidates.clone(), excluded, config.seed))
    }

    /// # Summary
    /// 剔除排除项后的可选代码，保持候选列表原有顺序。
    pub fn available(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(String::as_str)
            .filter(|c| !self.excluded.contains(Ticker::new(c).base_symbol()))
            .collect()
    }

    /// # Summary
    /// 不放回地随机抽取 `n` 个代码。
    ///
    /// # Returns
    /// 可选代码不足 `n` 个时返回 `InvalidInput`。
    pub fn pick(&self, n: usize) -> Result<Vec<Ticker>, SimulationError> {
        let available = self.available();
        if available.len() < n {
            return Err(SimulationError::InvalidInput(format!(
                "Not enough tickers to choose from after exclusions. Only {} available.",
                available.len()
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok(available
            .choose_multiple(&mut rng, n)
            .map(|symbol| Ticker::new(symbol))
            .collect())
    }
}

/// # Summary
/// 读取排除列表文件，每行一个代码，空行忽略。
///
/// # Returns
/// 文件不存在时返回空列表（不视为错误），其余 IO 错误向上传播。
pub async fn load_exclusions(path: &Path) -> Result<Vec<String>, std::io::Error> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content
            .lines()
            .map(|line| line.trim().to_uppercase())
            .filter(|line| !line.is_empty())
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(
                "No exclusion file at {}. Proceeding with no exclusions.",
                path.display()
            );
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
