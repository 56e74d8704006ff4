use sipreel_core::series::entity::PriceSeries;
use sipreel_core::simulation::entity::{SimulationResult, SimulationRow};
use sipreel_core::simulation::error::SimulationError;
use tracing::debug;

/// # Summary
/// 定投（SIP）模拟器：每个自然日投入固定金额，按当日价格买入份额。
///
/// # Invariants
/// - `contribution` 为有限正数。
/// - 纯函数：相同输入必然得到逐位相同的输出，无任何副作用。
#[derive(Debug, Clone, Copy)]
pub struct SipSimulator {
    contribution: f64,
}

impl SipSimulator {
    /// # Summary
    /// 创建模拟器。
    ///
    /// # Arguments
    /// * `contribution`: 每期定投金额。
    ///
    /// # Returns
    /// 金额非正或非有限时返回 `InvalidInput`。
    pub fn new(contribution: f64) -> Result<Self, SimulationError> {
        if !contribution.is_finite() || contribution <= 0.0 {
            return Err(SimulationError::InvalidInput(format!(
                "contribution must be positive, got {contribution}"
            )));
        }
        Ok(Self { contribution })
    }

    pub fn contribution(&self) -> f64 {
        self.contribution
    }

    /// # Summary
    /// 在逐日价格序列上运行定投模拟。
    ///
    /// # Logic
    /// 1. 逐日计算当日买入份额 `contribution / price` 并累加为累计份额。
    /// 2. 持仓市值 = 累计份额 × 当日价格。
    /// 3. 累计投入 = contribution × 已投入期数（避免浮点累加误差，保证末行恰为 `c * n`）。
    ///
    /// # Arguments
    /// * `series`: 已校验并向前填充的日频价格序列。
    ///
    /// # Returns
    /// 覆盖相同日期范围的 SimulationResult；序列为空或出现非正价格时返回 `InvalidInput`。
    pub fn simulate(&self, series: &PriceSeries) -> Result<SimulationResult, SimulationError> {
        if series.is_empty() {
            return Err(SimulationError::InvalidInput(
                "cannot simulate an empty price series".to_string(),
            ));
        }

        let mut rows = Vec::with_capacity(series.len());
        let mut cumulative_shares = 0.0_f64;
        let mut periods = 0.0_f64;

        for point in series.points() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(SimulationError::InvalidInput(format!(
                    "non-positive price {} on {}",
                    point.price, point.date
                )));
            }

            let shares_acquired = self.contribution / point.price;
            cumulative_shares += shares_acquired;
            periods += 1.0;

            rows.push(SimulationRow {
                date: point.date,
                price: point.price,
                investment: self.contribution,
                shares_acquired,
                cumulative_shares,
                portfolio_value: cumulative_shares * point.price,
                total_invested: self.contribution * periods,
            });
        }

        debug!(
            "Simulated {} rows with contribution {}",
            rows.len(),
            self.contribution
        );
        Ok(SimulationResult::new(rows, self.contribution))
    }
}
