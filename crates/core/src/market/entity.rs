use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 收盘价字段名
pub const CLOSE_FIELD: &str = "Close";
/// 调整后收盘价字段名
pub const ADJ_CLOSE_FIELD: &str = "Adj Close";

/// # Summary
/// 行情数据源返回的原始报价表，按日期索引。
///
/// # Invariants
/// - 每一列的 `values` 长度必须与 `dates` 一致。
/// - 列键可能是单层 (`field`) 或两层 (`field`, `symbol`)，由边界适配器负责展平。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteFrame {
    // 行索引（交易日）
    pub dates: Vec<NaiveDate>,
    // 数据列
    pub columns: Vec<QuoteColumn>,
}

/// # Summary
/// 报价表中的一列。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteColumn {
    // 字段名，例如 "Close"
    pub field: String,
    // 第二层列键（证券代码），单层表为 None
    pub symbol: Option<String>,
    // 缺失值为 None
    pub values: Vec<Option<f64>>,
}

impl QuoteFrame {
    /// # Summary
    /// 行数。
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// # Summary
    /// 表是否为空（无行或无列）。
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.columns.is_empty()
    }

    /// # Summary
    /// 列出字段名匹配（忽略大小写）的全部列。
    pub fn columns_named<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a QuoteColumn> + 'a {
        self.columns
            .iter()
            .filter(move |c| c.field.eq_ignore_ascii_case(field))
    }

    /// # Summary
    /// 是否为两层列结构（任意一列带有 symbol 键）。
    pub fn is_multi_level(&self) -> bool {
        self.columns.iter().any(|c| c.symbol.is_some())
    }
}

/// # Summary
/// 证券的描述信息，用于图表标题与摘要。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerProfile {
    pub symbol: String,
    // 公司全称，数据源未提供时为 None
    pub long_name: Option<String>,
    // 计价货币 (例如: INR, USD)
    pub currency: Option<String>,
}

impl TickerProfile {
    /// # Summary
    /// 展示用名称：优先使用全称，缺失时回退到交易代码。
    pub fn display_name(&self) -> &str {
        self.long_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.symbol)
    }
}
