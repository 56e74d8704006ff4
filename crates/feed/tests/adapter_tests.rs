use async_trait::async_trait;
use chrono::NaiveDate;
use sipreel_core::common::Ticker;
use sipreel_core::market::entity::{QuoteColumn, QuoteFrame, TickerProfile};
use sipreel_core::market::error::MarketError;
use sipreel_core::market::port::MarketDataProvider;
use sipreel_feed::adapter::{flatten_close, load_price_series, load_profile};
use sipreel_feed::yahoo::parse_chart;

// 两个交易日，之间隔一个周末；gmtoffset 为 IST (+05:30)
const CHART_BODY: &str = r#"{
  "chart": {
    "result": [{
      "meta": {
        "currency": "INR",
        "symbol": "ITC.NS",
        "longName": "ITC Limited",
        "shortName": "ITC LTD",
        "gmtoffset": 19800
      },
      "timestamp": [1704426300, 1704685500],
      "indicators": {
        "quote": [{
          "open":   [466.0, 469.0],
          "high":   [470.0, 472.5],
          "low":    [464.0, 466.1],
          "close":  [468.4, null],
          "volume": [1000, 1200]
        }],
        "adjclose": [{ "adjclose": [450.1, 451.0] }]
      }
    }],
    "error": null
  }
}"#;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn close_column(symbol: Option<&str>, values: Vec<Option<f64>>) -> QuoteColumn {
    QuoteColumn {
        field: "Close".to_string(),
        symbol: symbol.map(str::to_string),
        values,
    }
}

#[test]
fn test_parse_chart_builds_multi_level_frame() {
    let chart = parse_chart(CHART_BODY, "ITC.NS").unwrap();

    assert_eq!(chart.frame.dates, vec![day(2024, 1, 5), day(2024, 1, 8)]);
    assert!(chart.frame.is_multi_level());
    assert_eq!(chart.frame.columns_named("close").count(), 1);
    assert_eq!(chart.frame.columns_named("Adj Close").count(), 1);

    assert_eq!(
        chart.profile,
        TickerProfile {
            symbol: "ITC.NS".to_string(),
            long_name: Some("ITC Limited".to_string()),
            currency: Some("INR".to_string()),
        }
    );
}

#[test]
fn test_parse_chart_surfaces_provider_error() {
    let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
    let err = parse_chart(body, "NOPE").unwrap_err();
    assert!(matches!(err, MarketError::Parse(msg) if msg.contains("delisted")));

    let err = parse_chart("not json", "NOPE").unwrap_err();
    assert!(matches!(err, MarketError::Parse(_)));
}

#[test]
fn test_flatten_close_selects_single_column() {
    let chart = parse_chart(CHART_BODY, "ITC.NS").unwrap();
    let flat = flatten_close(&chart.frame, "ITC.NS").unwrap();
    // 调整后收盘价不会被使用
    assert_eq!(flat, vec![(day(2024, 1, 5), Some(468.4)), (day(2024, 1, 8), None)]);

    let single_level = QuoteFrame {
        dates: vec![day(2024, 1, 1)],
        columns: vec![close_column(None, vec![Some(5.0)])],
    };
    assert_eq!(
        flatten_close(&single_level, "ANY").unwrap(),
        vec![(day(2024, 1, 1), Some(5.0))]
    );
}

#[test]
fn test_flatten_close_rejects_unusable_schemas() {
    let empty = QuoteFrame::default();
    assert!(matches!(flatten_close(&empty, "X"), Err(MarketError::Empty(_))));

    let other_symbol = QuoteFrame {
        dates: vec![day(2024, 1, 1)],
        columns: vec![close_column(Some("MSFT"), vec![Some(1.0)])],
    };
    assert!(matches!(
        flatten_close(&other_symbol, "AAPL"),
        Err(MarketError::Schema(_))
    ));

    let ambiguous = QuoteFrame {
        dates: vec![day(2024, 1, 1)],
        columns: vec![
            close_column(None, vec![Some(1.0)]),
            close_column(Some("AAPL"), vec![Some(2.0)]),
        ],
    };
    assert!(matches!(
        flatten_close(&ambiguous, "AAPL"),
        Err(MarketError::Schema(_))
    ));

    let ragged = QuoteFrame {
        dates: vec![day(2024, 1, 1), day(2024, 1, 2)],
        columns: vec![close_column(None, vec![Some(1.0)])],
    };
    assert!(matches!(flatten_close(&ragged, "X"), Err(MarketError::Schema(_))));
}

struct FixtureProvider {
    body: &'static str,
}

#[async_trait]
impl MarketDataProvider for FixtureProvider {
    async fn fetch_daily(
        &self,
        ticker: &Ticker,
        _: NaiveDate,
        _: Option<NaiveDate>,
    ) -> Result<QuoteFrame, MarketError> {
        Ok(parse_chart(self.body, &ticker.symbol)?.frame)
    }

    async fn fetch_profile(&self, _: &Ticker) -> Result<TickerProfile, MarketError> {
        Err(MarketError::Network("offline".to_string()))
    }
}

#[tokio::test]
async fn test_load_price_series_ends_at_last_valid_close() -> anyhow::Result<()> {
    let provider = FixtureProvider { body: CHART_BODY };
    let ticker = Ticker::new("itc.ns");

    let series = load_price_series(&provider, &ticker, 2024, None).await?;
    // 1 月 8 日收盘价缺失，序列止于最后一个有效观测日
    assert_eq!(series.len(), 1);
    assert_eq!(series.first_date(), Some(day(2024, 1, 5)));
    Ok(())
}

#[tokio::test]
async fn test_all_null_close_is_invalid_series() {
    const BODY: &str = r#"{"chart": {"result": [{
        "meta": {"symbol": "ZZZ"},
        "timestamp": [1704426300],
        "indicators": {"quote": [{"open": [null], "high": [null], "low": [null], "close": [null], "volume": [null]}]}
    }], "error": null}}"#;

    let provider = FixtureProvider { body: BODY };
    let err = load_price_series(&provider, &Ticker::new("ZZZ"), 2024, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::InvalidSeries(_)));
}

#[tokio::test]
async fn test_profile_falls_back_to_symbol() {
    let provider = FixtureProvider { body: CHART_BODY };
    let profile = load_profile(&provider, &Ticker::new("ITC.NS")).await;
    assert_eq!(profile.symbol, "ITC.NS");
    assert_eq!(profile.display_name(), "ITC.NS");
}
