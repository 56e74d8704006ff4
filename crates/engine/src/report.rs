use sipreel_core::common::group_thousands;
use sipreel_core::simulation::entity::{SimulationDescription, SummaryStatistics};
use std::path::Path;

/// # Summary
/// 模拟摘要的纯文本产物。
pub struct SummaryReport<'a> {
    pub stats: &'a SummaryStatistics,
    pub description: &'a SimulationDescription,
    // 货币代码，例如 INR
    pub currency: &'a str,
}

impl SummaryReport<'_> {
    /// # Summary
    /// 渲染为多行文本。
    pub fn render(&self) -> String {
        let currency = self.currency;
        let stats = self.stats;
        let desc = self.description;
        let name = if desc.name.is_empty() {
            desc.ticker.as_str()
        } else {
            desc.name.as_str()
        };

        let lines = [
            format!("Ticker: {}", desc.ticker),
            format!("Company: {name}"),
            format!(
                "Period: {} to {} ({} days, {:.2} years)",
                stats.start_date, stats.end_date, stats.days, stats.years
            ),
            format!(
                "Contribution: {currency} {} per day since {}",
                desc.contribution, desc.start_year
            ),
            format!("Final Value: {currency} {}", group_thousands(stats.final_value, 2)),
            format!(
                "Total Invested: {currency} {}",
                group_thousands(stats.total_invested, 2)
            ),
            format!("CAGR: {:.2}%", stats.cagr * 100.0),
            format!(
                "Total Returns: {currency} {}",
                group_thousands(stats.total_return, 2)
            ),
            format!("Percentage Return: {:.2}%", stats.return_pct),
        ];

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// # Summary
    /// 写入文本文件，必要时创建父目录。
    pub async fn write(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.render()).await
    }
}
