use crate::simulation::error::SimulationError;
use thiserror::Error;

/// # Summary
/// 市场数据域错误枚举，处理网络、解析、表结构及数据缺失等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 此类错误不应终止长期运行的进程，调用方负责检查并决定是否继续。
#[derive(Error, Debug)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误，如 JSON 格式不匹配
    #[error("Parse error: {0}")]
    Parse(String),
    // 请求的数据未找到 (404 或内容为空)
    #[error("Data not found")]
    NotFound,
    // 报价表结构不可用，例如缺少收盘价列或多列歧义
    #[error("Unusable schema: {0}")]
    Schema(String),
    // 数据源返回了空表
    #[error("Provider returned no rows for {0}")]
    Empty(String),
    // 展平后的数据无法构成合法价格序列
    #[error("Invalid price series: {0}")]
    InvalidSeries(#[from] SimulationError),
}
