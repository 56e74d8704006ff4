use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 证券标的实体，代表一次模拟所针对的股票或指数。
///
/// # Invariants
/// - `symbol` 一律为大写（例如: ITC.NS, ^NSEI, AAPL）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    // 交易代码
    pub symbol: String,
    // 交易所代码 (可选，例如: NSE, NASDAQ)
    pub exchange: Option<String>,
}

impl Ticker {
    /// # Summary
    /// 根据交易代码创建标的，代码会被规范化为大写并去除首尾空白。
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            exchange: None,
        }
    }

    /// # Summary
    /// 去掉交易所后缀的基础代码（`ITC.NS` -> `ITC`）。
    pub fn base_symbol(&self) -> &str {
        self.symbol.split('.').next().unwrap_or(&self.symbol)
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// # Summary
/// 价格序列的采样周期。
///
/// # Invariants
/// - `Daily` 为模拟器使用的原生粒度；`Weekly` / `Monthly` 仅用于对比图的降采样。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Frequency {
    // 日
    Daily,
    // 周 (ISO 周)
    Weekly,
    // 月
    Monthly,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "d" | "1d" | "daily" => Ok(Frequency::Daily),
            "w" | "1w" | "weekly" => Ok(Frequency::Weekly),
            "m" | "1mo" | "monthly" => Ok(Frequency::Monthly),
            _ => Err(format!("Unknown Frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "1d"),
            Frequency::Weekly => write!(f, "1w"),
            Frequency::Monthly => write!(f, "1mo"),
        }
    }
}

/// # Summary
/// 按千分位分组并保留 `decimals` 位小数，例如 `group_thousands(1234567.891, 2)` -> `1,234,567.89`。
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    // 四舍五入后为零时不保留负号
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_is_normalized() {
        let ticker = Ticker::new("  itc.ns ");
        assert_eq!(ticker.symbol, "ITC.NS");
        assert_eq!(ticker.base_symbol(), "ITC");
        assert_eq!(ticker.to_string(), "ITC.NS");
    }

    #[test]
    fn test_frequency_round_trips_through_display() {
        for freq in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
            assert_eq!(freq.to_string().parse::<Frequency>(), Ok(freq));
        }
        assert_eq!("W".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert!("hourly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0, 2), "0.00");
        assert_eq!(group_thousands(999.5, 2), "999.50");
        assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(-1500.0, 2), "-1,500.00");
        assert_eq!(group_thousands(1234567.5, 0), "1,234,568");
        assert_eq!(group_thousands(-0.001, 2), "0.00");
    }
}
