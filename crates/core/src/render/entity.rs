use serde::{Deserialize, Serialize};

/// 帧文件扩展名
pub const FRAME_EXTENSION: &str = "svg";

/// # Summary
/// 帧截断点序列：第 i 帧渲染结果表的前 `cut_points[i]` 行。
///
/// # Invariants
/// - 每个截断点位于 `[1, n]`，序列单调不减且以 `n` 结尾。
/// - 每次渲染请求生成一次，不持久化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSchedule {
    cut_points: Vec<usize>,
}

impl FrameSchedule {
    pub fn new(cut_points: Vec<usize>) -> Self {
        Self { cut_points }
    }

    pub fn cut_points(&self) -> &[usize] {
        &self.cut_points
    }

    pub fn len(&self) -> usize {
        self.cut_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cut_points.is_empty()
    }

    /// # Summary
    /// 将截断点展开为带显式帧序号的渲染任务。
    ///
    /// # Logic
    /// 帧序号从 1 开始，在任务创建时即确定，与任务完成顺序无关。
    pub fn jobs(&self) -> Vec<FrameJob> {
        let total = self.cut_points.len();
        self.cut_points
            .iter()
            .enumerate()
            .map(|(i, &cut_point)| FrameJob {
                frame_index: i + 1,
                cut_point,
                total_frames: total,
            })
            .collect()
    }
}

/// # Summary
/// 单帧渲染任务。
///
/// # Invariants
/// - `frame_index` 从 1 开始且在批次内唯一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameJob {
    pub frame_index: usize,
    // 渲染的前缀行数
    pub cut_point: usize,
    // 批次总帧数，用于确定文件名补零宽度
    pub total_frames: usize,
}

impl FrameJob {
    /// # Summary
    /// 零填充的帧文件名，保证按文件名排序即为帧顺序。
    ///
    /// # Logic
    /// 宽度取 `max(3, 总帧数位数)`，例如 `frame_007.svg`、`frame_0123.svg`。
    pub fn file_name(&self) -> String {
        let width = self.total_frames.to_string().len().max(3);
        format!(
            "frame_{:0width$}.{}",
            self.frame_index,
            FRAME_EXTENSION,
            width = width
        )
    }
}

/// # Summary
/// 图表标题与画布参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMeta {
    pub ticker: String,
    // 展示名称（公司全称或代码）
    pub name: String,
    pub start_year: i32,
    pub contribution: f64,
    // 货币代码，例如 INR / USD
    pub currency: String,
    pub width: u32,
    pub height: u32,
}

impl ChartMeta {
    /// # Summary
    /// 货币符号，未知货币回退为 "代码 "。
    pub fn currency_symbol(&self) -> String {
        match self.currency.to_uppercase().as_str() {
            "USD" => "$".to_string(),
            "INR" => "₹".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            other => format!("{other} "),
        }
    }

    /// # Summary
    /// 图表主标题，例如 `₹100/day in ITC.NS since 2005`。
    pub fn title(&self) -> String {
        format!(
            "{}{}/day in {} since {}",
            self.currency_symbol(),
            format_amount(self.contribution),
            self.ticker,
            self.start_year
        )
    }
}

/// 金额整数时省略小数部分
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// # Summary
/// 视频编码参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeSettings {
    // 帧率
    pub fps: u32,
    // ffmpeg 编码器名称
    pub codec: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            fps: 10,
            codec: "libx264".to_string(),
        }
    }
}
