use sipreel_core::series::entity::PricePoint;
use sipreel_core::simulation::entity::ComparisonRow;
use sipreel_core::simulation::error::SimulationError;

/// # Summary
/// 一次性投入 vs 定投对比。
///
/// # Invariants
/// - 两个金额均为有限正数。
/// - 一次性投入在首行按首行价格全部买入，之后份额不变。
#[derive(Debug, Clone, Copy)]
pub struct LumpSumComparison {
    lump_amount: f64,
    sip_amount: f64,
}

impl LumpSumComparison {
    pub fn new(lump_amount: f64, sip_amount: f64) -> Result<Self, SimulationError> {
        for (label, amount) in [("lump sum", lump_amount), ("sip", sip_amount)] {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(SimulationError::InvalidInput(format!(
                    "{label} amount must be positive, got {amount}"
                )));
            }
        }
        Ok(Self {
            lump_amount,
            sip_amount,
        })
    }

    /// # Summary
    /// 在（可能已降采样的）价格点上计算两种策略的逐行市值。
    ///
    /// # Logic
    /// 1. 一次性份额 = lump_amount / price[0]。
    /// 2. 定投每行买入 sip_amount / price[t] 并累加。
    /// 3. 市值 = 份额 × 当行价格。
    pub fn compare(&self, points: &[PricePoint]) -> Result<Vec<ComparisonRow>, SimulationError> {
        let Some(first) = points.first() else {
            return Err(SimulationError::InvalidInput(
                "cannot compare on an empty price series".to_string(),
            ));
        };
        if let Some(bad) = points.iter().find(|p| !p.price.is_finite() || p.price <= 0.0) {
            return Err(SimulationError::InvalidInput(format!(
                "non-positive price {} on {}",
                bad.price, bad.date
            )));
        }

        let lump_shares = self.lump_amount / first.price;
        let mut sip_shares = 0.0_f64;
        let mut periods = 0.0_f64;

        Ok(points
            .iter()
            .map(|p| {
                sip_shares += self.sip_amount / p.price;
                periods += 1.0;
                ComparisonRow {
                    date: p.date,
                    price: p.price,
                    lump_shares,
                    lump_value: lump_shares * p.price,
                    sip_shares,
                    sip_value: sip_shares * p.price,
                    sip_invested: self.sip_amount * periods,
                }
            })
            .collect())
    }
}
