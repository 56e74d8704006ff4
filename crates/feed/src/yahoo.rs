use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use sipreel_core::common::Ticker;
use sipreel_core::market::entity::{ADJ_CLOSE_FIELD, CLOSE_FIELD, QuoteColumn, QuoteFrame, TickerProfile};
use sipreel_core::market::error::MarketError;
use sipreel_core::market::port::MarketDataProvider;
use std::time::Duration;
use tracing::debug;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// 伪装浏览器 UA 以减少被拦截风险
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 返回的报价表为两层列结构 (字段, 代码)，与 Yahoo 多标的下载格式一致。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 配置请求超时。
    /// 2. 设置伪装浏览器 Header (User-Agent)。
    /// 3. 初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `timeout`: 单次请求超时时间。
    ///
    /// # Returns
    /// 客户端构建失败时返回 `MarketError::Network`。
    pub fn new(timeout: Duration) -> Result<Self, MarketError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// # Summary
    /// 请求 chart 接口并返回原始响应体。
    async fn get_chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<String, MarketError> {
        let url = format!("{}/{}", CHART_URL, symbol);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        resp.text()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
struct YahooError {
    description: String,
}

#[derive(Deserialize, Debug)]
struct YahooResult {
    meta: YahooMeta,
    // 无成交数据时 Yahoo 会省略该字段
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

/// # Summary
/// Yahoo API 元数据，包含名称、货币与交易所时区偏移。
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    symbol: Option<String>,
    currency: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    // 交易所相对 UTC 的秒数偏移
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
    adjclose: Option<Vec<YahooAdjClose>>,
}

#[derive(Deserialize, Debug)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// # Summary
/// Yahoo API 原始报价数据。
#[derive(Deserialize, Debug, Default)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// # Summary
/// 解析后的 chart 响应。
#[derive(Debug, Clone)]
pub struct ChartData {
    pub frame: QuoteFrame,
    pub profile: TickerProfile,
}

/// # Summary
/// 解析 Yahoo v8 chart 响应体。
///
/// # Logic
/// 1. 反序列化 JSON，若 `chart.error` 存在则返回错误。
/// 2. 按交易所时区偏移把时间戳换算为本地交易日。
/// 3. 组装 (字段, 代码) 两层列的报价表，并附带 adjclose 列。
/// 4. 从 meta 中提取名称与货币。
///
/// # Arguments
/// * `body`: 响应体 JSON 文本。
/// * `symbol`: 请求的证券代码，作为第二层列键。
pub fn parse_chart(body: &str, symbol: &str) -> Result<ChartData, MarketError> {
    let json: YahooResponse =
        serde_json::from_str(body).map_err(|e| MarketError::Parse(e.to_string()))?;

    if let Some(err) = json.chart.error {
        return Err(MarketError::Parse(err.description));
    }

    let result = json
        .chart
        .result
        .ok_or(MarketError::NotFound)?
        .pop()
        .ok_or(MarketError::NotFound)?;

    let profile = TickerProfile {
        symbol: result.meta.symbol.clone().unwrap_or_else(|| symbol.to_string()),
        long_name: result.meta.long_name.clone().or(result.meta.short_name.clone()),
        currency: result.meta.currency.clone(),
    };

    let mut dates = Vec::with_capacity(result.timestamp.len());
    for &ts in &result.timestamp {
        let local = DateTime::<Utc>::from_timestamp(ts + result.meta.gmtoffset, 0)
            .ok_or_else(|| MarketError::Parse(format!("invalid timestamp {ts}")))?;
        dates.push(local.date_naive());
    }

    let rows = dates.len();
    let column = |field: &str, values: &[Option<f64>]| -> Result<QuoteColumn, MarketError> {
        if values.len() != rows {
            return Err(MarketError::Parse(format!(
                "{field} has {} values for {rows} timestamps",
                values.len()
            )));
        }
        Ok(QuoteColumn {
            field: field.to_string(),
            symbol: Some(symbol.to_string()),
            values: values.to_vec(),
        })
    };

    let mut columns = Vec::new();
    if rows > 0 {
        let quote = result
            .indicators
            .quote
            .first()
            .ok_or(MarketError::Parse("No quote data".into()))?;
        columns.push(column("Open", &quote.open)?);
        columns.push(column("High", &quote.high)?);
        columns.push(column("Low", &quote.low)?);
        columns.push(column(CLOSE_FIELD, &quote.close)?);
        columns.push(column("Volume", &quote.volume)?);

        if let Some(adj) = result.indicators.adjclose.as_ref().and_then(|v| v.first()) {
            columns.push(column(ADJ_CLOSE_FIELD, &adj.adjclose)?);
        }
    }

    Ok(ChartData {
        frame: QuoteFrame { dates, columns },
        profile,
    })
}

/// 日期当天 00:00 UTC 的 Unix 秒
fn day_start_ts(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取日线历史数据。
    ///
    /// # Logic
    /// 1. 构建包含 period1, period2 的 API 请求。
    /// 2. 发起异步请求并解析嵌套的 JSON 数据。
    /// 3. 结束日期为 None 时截至当前时刻。
    async fn fetch_daily(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<QuoteFrame, MarketError> {
        let period2 = match end {
            Some(end) => end
                .succ_opt()
                .map(day_start_ts)
                .ok_or_else(|| MarketError::Parse(format!("invalid end date {end}")))?,
            None => Utc::now().timestamp(),
        };

        let body = self
            .get_chart(
                &ticker.symbol,
                &[
                    ("period1", day_start_ts(start).to_string()),
                    ("period2", period2.to_string()),
                    ("interval", "1d".to_string()),
                    ("events", "div,splits".to_string()),
                ],
            )
            .await?;

        let chart = parse_chart(&body, &ticker.symbol)?;
        debug!(
            "Fetched {} daily rows for {} from Yahoo",
            chart.frame.len(),
            ticker
        );
        Ok(chart.frame)
    }

    /// # Summary
    /// 通过 chart 接口的 meta 字段获取证券名称与货币。
    async fn fetch_profile(&self, ticker: &Ticker) -> Result<TickerProfile, MarketError> {
        let body = self
            .get_chart(
                &ticker.symbol,
                &[
                    ("range", "1d".to_string()),
                    ("interval", "1d".to_string()),
                ],
            )
            .await?;
        Ok(parse_chart(&body, &ticker.symbol)?.profile)
    }
}
