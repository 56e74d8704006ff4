use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// # Summary
/// 定投模拟结果中的单日记录。
///
/// # Invariants
/// - `portfolio_value == cumulative_shares * price`（恒等式，不是近似）。
/// - `total_invested` 单调不减。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRow {
    pub date: NaiveDate,
    // 当日价格
    pub price: f64,
    // 当日投入金额
    pub investment: f64,
    // 当日买入份额 = investment / price
    pub shares_acquired: f64,
    // 累计份额
    pub cumulative_shares: f64,
    // 持仓市值
    pub portfolio_value: f64,
    // 累计投入
    pub total_invested: f64,
}

/// # Summary
/// 定投（SIP）模拟结果表，独占其派生列。
///
/// # Invariants
/// - 覆盖与输入价格序列完全相同的日期范围，非空。
/// - 构建完成后不可变；渲染任务只读访问其前缀。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    rows: Vec<SimulationRow>,
    contribution: f64,
}

impl SimulationResult {
    /// # Summary
    /// 由已计算好的行构建结果，仅供模拟器使用。
    pub fn new(rows: Vec<SimulationRow>, contribution: f64) -> Self {
        Self { rows, contribution }
    }

    pub fn rows(&self) -> &[SimulationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 每期定投金额
    pub fn contribution(&self) -> f64 {
        self.contribution
    }

    pub fn last(&self) -> Option<&SimulationRow> {
        self.rows.last()
    }

    /// # Summary
    /// 返回前 `k` 行的只读切片，`k` 超出长度时截断到全表。
    pub fn prefix(&self, k: usize) -> &[SimulationRow] {
        &self.rows[..k.min(self.rows.len())]
    }
}

/// # Summary
/// 由结果表最后一行计算得到的汇总统计，值对象，不可变。
///
/// # Invariants
/// - `years = days / 365.4`，为约定的近似年数，并非日历精确年数。
/// - `cagr = (final_value / total_invested)^(1/years) - 1`，以小数表示。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub final_value: f64,
    pub total_invested: f64,
    // final_value - total_invested
    pub total_return: f64,
    // total_return / total_invested * 100
    pub return_pct: f64,
    // 行数（自然日数）
    pub days: usize,
    pub years: f64,
    pub cagr: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// # Summary
/// 一次模拟的描述性元数据，用于摘要文本与日志。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationDescription {
    pub ticker: String,
    // 公司名称，数据源未提供时为空字符串
    pub name: String,
    pub start_year: i32,
    pub contribution: f64,
    pub data_length: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub final_value: f64,
    pub total_invested: f64,
    // 近似年数
    pub duration_years: f64,
    // 百分比形式的 CAGR
    pub cagr_pct: f64,
}

/// # Summary
/// 一次性投入与定投对比表中的单行。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub date: NaiveDate,
    pub price: f64,
    // 一次性投入持有份额（全程不变）
    pub lump_shares: f64,
    pub lump_value: f64,
    // 定投累计份额
    pub sip_shares: f64,
    pub sip_value: f64,
    // 定投累计投入
    pub sip_invested: f64,
}
