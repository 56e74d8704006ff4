use chrono::{Duration as ChronoDuration, Utc};
use sipreel_core::common::Ticker;
use sipreel_core::market::port::MarketDataProvider;
use sipreel_feed::adapter::load_price_series;
use sipreel_feed::yahoo::YahooProvider;
use std::time::Duration;

fn install_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// # Summary
/// 雅虎财经日线抓取的集成测试（需要网络）。
///
/// # Logic
/// 1. 初始化 YahooProvider。
/// 2. 抓取 AAPL 过去 30 天的日线数据。
/// 3. 断言报价表非空且为两层列结构。
#[tokio::test]
#[ignore = "requires network access to Yahoo Finance"]
async fn test_yahoo_real_fetch() {
    install_crypto();
    let provider = YahooProvider::new(Duration::from_secs(10)).unwrap();
    let ticker = Ticker::new("AAPL");
    let end = Utc::now().date_naive();
    let start = end - ChronoDuration::days(30);

    let frame = provider.fetch_daily(&ticker, start, Some(end)).await;
    assert!(frame.is_ok(), "Failed to fetch real data from Yahoo: {:?}", frame.err());
    let frame = frame.unwrap();
    assert!(!frame.is_empty());
    assert!(frame.is_multi_level());

    println!("Fetched {} rows for AAPL", frame.len());
}

/// # Summary
/// 真实数据经过边界适配后必须是逐日连续的价格序列。
#[tokio::test]
#[ignore = "requires network access to Yahoo Finance"]
async fn test_yahoo_series_and_profile() {
    install_crypto();
    let provider = YahooProvider::new(Duration::from_secs(10)).unwrap();
    let ticker = Ticker::new("ITC.NS");

    let series = load_price_series(&provider, &ticker, 2024, None).await.unwrap();
    let points = series.points();
    assert!(points.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));

    let profile = provider.fetch_profile(&ticker).await.unwrap();
    assert_eq!(profile.currency.as_deref(), Some("INR"));
}
