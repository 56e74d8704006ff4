use sipreel_core::market::entity::TickerProfile;
use sipreel_core::simulation::entity::{SimulationDescription, SimulationResult, SummaryStatistics};
use sipreel_core::simulation::error::SimulationError;
use tracing::info;

/// 年数换算基准：`years = 行数 / DAYS_PER_YEAR`。
///
/// 约定的近似值，不是日历精确年数，也不是交易日数。所有 CAGR 均以此为准。
pub const DAYS_PER_YEAR: f64 = 365.4;

/// # Summary
/// 由结果表最后一行计算汇总统计。
///
/// # Logic
/// 1. 读取末行的持仓市值与累计投入。
/// 2. `years = days / 365.4`。
/// 3. `cagr = (final_value / total_invested)^(1/years) - 1`。
///
/// 单行序列不做特殊处理：CAGR 有定义，但反映的是极短的观测窗口。
///
/// # Returns
/// 结果表为空或累计投入非正时返回 `InvalidInput`。
pub fn summarize(result: &SimulationResult) -> Result<SummaryStatistics, SimulationError> {
    let (Some(first), Some(last)) = (result.rows().first(), result.last()) else {
        return Err(SimulationError::InvalidInput(
            "cannot summarize an empty simulation".to_string(),
        ));
    };

    if last.total_invested <= 0.0 {
        return Err(SimulationError::InvalidInput(
            "total invested must be positive".to_string(),
        ));
    }

    let days = result.len();
    let day_count = u32::try_from(days)
        .map(f64::from)
        .map_err(|_| SimulationError::InvalidInput(format!("too many rows: {days}")))?;
    let years = day_count / DAYS_PER_YEAR;
    let cagr = (last.portfolio_value / last.total_invested).powf(1.0 / years) - 1.0;
    let total_return = last.portfolio_value - last.total_invested;

    info!(
        "Final value: {}, Total invested: {}, Years: {}",
        last.portfolio_value, last.total_invested, years
    );
    info!("CAGR: {:.6} ({:.2}%)", cagr, cagr * 100.0);

    Ok(SummaryStatistics {
        final_value: last.portfolio_value,
        total_invested: last.total_invested,
        total_return,
        return_pct: total_return / last.total_invested * 100.0,
        days,
        years,
        cagr,
        start_date: first.date,
        end_date: last.date,
    })
}

/// # Summary
/// 生成模拟的描述性元数据。
///
/// # Arguments
/// * `result`: 已完成的模拟结果。
/// * `profile`: 证券描述信息，名称缺失时为空字符串。
/// * `start_year`: 用户请求的起始年份。
pub fn describe(
    result: &SimulationResult,
    profile: &TickerProfile,
    start_year: i32,
) -> Result<SimulationDescription, SimulationError> {
    let stats = summarize(result)?;
    Ok(SimulationDescription {
        ticker: profile.symbol.clone(),
        name: profile.long_name.clone().unwrap_or_default(),
        start_year,
        contribution: result.contribution(),
        data_length: stats.days,
        start_date: stats.start_date,
        end_date: stats.end_date,
        final_value: stats.final_value,
        total_invested: stats.total_invested,
        duration_years: stats.years,
        cagr_pct: stats.cagr * 100.0,
    })
}
