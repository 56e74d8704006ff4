use crate::common::Ticker;
use crate::market::entity::{QuoteFrame, TickerProfile};
use crate::market::error::MarketError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// # Summary
/// 市场行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 返回的 `QuoteFrame` 不保证列结构，消费方必须经过边界适配器展平后再使用。
/// - 实现者不得自动重试；失败直接返回给调用方。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定证券在指定日期范围内的日线报价表。
    ///
    /// # Logic
    /// 1. 构建数据源请求。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 组装为按日期索引的报价表。
    ///
    /// # Arguments
    /// * `ticker`: 证券身份。
    /// * `start`: 开始日期（包含）。
    /// * `end`: 结束日期（包含），None 表示截至今日。
    ///
    /// # Returns
    /// 成功返回报价表，失败返回 MarketError。
    async fn fetch_daily(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<QuoteFrame, MarketError>;

    /// # Summary
    /// 获取证券的描述信息（名称、货币）。
    ///
    /// # Arguments
    /// * `ticker`: 证券身份。
    ///
    /// # Returns
    /// 成功返回 TickerProfile。
    async fn fetch_profile(&self, ticker: &Ticker) -> Result<TickerProfile, MarketError>;
}
