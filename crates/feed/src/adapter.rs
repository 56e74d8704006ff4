use chrono::NaiveDate;
use sipreel_core::common::Ticker;
use sipreel_core::market::entity::{CLOSE_FIELD, QuoteFrame, TickerProfile};
use sipreel_core::market::error::MarketError;
use sipreel_core::market::port::MarketDataProvider;
use sipreel_core::series::entity::PriceSeries;
use tracing::{info, warn};

/// # Summary
/// 把报价表展平为单一收盘价列。
///
/// # Logic
/// 1. 空表直接返回 `MarketError::Empty`。
/// 2. 选出字段名为 `Close` 的列；两层结构下只保留无代码键或代码匹配 `symbol` 的列。
/// 3. 必须恰好剩下一列，否则视为结构不可用（不会用调整后收盘价替代）。
///
/// # Arguments
/// * `frame`: 数据源返回的原始报价表。
/// * `symbol`: 请求的证券代码。
///
/// # Returns
/// (日期, 收盘价) 列表，缺失值保留为 None 交给 PriceSeries 处理。
pub fn flatten_close(
    frame: &QuoteFrame,
    symbol: &str,
) -> Result<Vec<(NaiveDate, Option<f64>)>, MarketError> {
    if frame.is_empty() {
        return Err(MarketError::Empty(symbol.to_string()));
    }

    let candidates: Vec<_> = frame
        .columns_named(CLOSE_FIELD)
        .filter(|c| {
            c.symbol
                .as_deref()
                .is_none_or(|s| s.eq_ignore_ascii_case(symbol))
        })
        .collect();

    let close = match candidates.as_slice() {
        [single] => *single,
        [] => {
            return Err(MarketError::Schema(format!(
                "'{CLOSE_FIELD}' column not found in data for {symbol}"
            )));
        }
        many => {
            return Err(MarketError::Schema(format!(
                "{} '{CLOSE_FIELD}' columns match {symbol}",
                many.len()
            )));
        }
    };

    if close.values.len() != frame.dates.len() {
        return Err(MarketError::Schema(format!(
            "'{CLOSE_FIELD}' has {} values for {} dates",
            close.values.len(),
            frame.dates.len()
        )));
    }

    Ok(frame
        .dates
        .iter()
        .copied()
        .zip(close.values.iter().copied())
        .collect())
}

/// # Summary
/// 边界适配：抓取日线、展平列结构并构建校验过的日频价格序列。
///
/// # Logic
/// 1. 从 `start_year` 的 1 月 1 日开始抓取。
/// 2. `flatten_close` 展平为单一价格列。
/// 3. `PriceSeries::from_observations` 排序、向前填充并校验。
pub async fn load_price_series(
    provider: &dyn MarketDataProvider,
    ticker: &Ticker,
    start_year: i32,
    end: Option<NaiveDate>,
) -> Result<PriceSeries, MarketError> {
    let start = NaiveDate::from_ymd_opt(start_year, 1, 1)
        .ok_or_else(|| MarketError::Parse(format!("invalid start year {start_year}")))?;

    let frame = provider.fetch_daily(ticker, start, end).await?;
    let observations = flatten_close(&frame, &ticker.symbol)?;
    let series = PriceSeries::from_observations(observations)?;

    info!(
        "Loaded {} daily prices for {} ({:?} to {:?})",
        series.len(),
        ticker,
        series.first_date(),
        series.last_date()
    );
    Ok(series)
}

/// # Summary
/// 获取证券描述信息，失败时回退为仅含代码的描述，不中断流程。
pub async fn load_profile(provider: &dyn MarketDataProvider, ticker: &Ticker) -> TickerProfile {
    match provider.fetch_profile(ticker).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Could not fetch profile for {}: {}", ticker, e);
            TickerProfile {
                symbol: ticker.symbol.clone(),
                ..Default::default()
            }
        }
    }
}
