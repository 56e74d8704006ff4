use chrono::{Datelike, NaiveDate};

/// 文本对齐方式，对应 SVG `text-anchor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// # Summary
/// 文本样式。
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub size: f64,
    pub fill: &'a str,
    pub anchor: Anchor,
    pub bold: bool,
}

/// # Summary
/// 单条折线及其图例信息。
#[derive(Debug, Clone)]
pub struct LineSeries<'a> {
    pub label: &'a str,
    pub color: &'a str,
    pub stroke_width: f64,
    // SVG stroke-dasharray，实线为 None
    pub dash: Option<&'a str>,
    pub values: Vec<f64>,
}

/// # Summary
/// 纵轴取值范围。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// # Summary
    /// 计算多条序列的共同取值范围。
    ///
    /// # Logic
    /// 1. 忽略非有限值，下界至少包含 0。
    /// 2. 上下界重合时把上界抬高 1。
    /// 3. 顶部预留 5% 空间给标注。
    ///
    /// # Returns
    /// 所有序列都没有有限值时返回 None。
    pub fn from_series(series: &[LineSeries<'_>]) -> Option<Self> {
        let mut min = 0.0_f64;
        let mut max = f64::NEG_INFINITY;
        for value in series.iter().flat_map(|s| s.values.iter().copied()) {
            if value.is_finite() {
                min = min.min(value);
                max = max.max(value);
            }
        }
        if !max.is_finite() {
            return None;
        }
        if max <= min {
            max = min + 1.0;
        }
        let pad = (max - min) * 0.05;
        Some(Self {
            min,
            max: max + pad,
        })
    }
}

/// # Summary
/// 画布上的绘图区域（像素坐标，原点在左上角）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// # Summary
    /// 第 `index` 个点的横坐标；只有一个点时居中。
    pub fn x_at(&self, index: usize, len: usize) -> f64 {
        if len <= 1 {
            return self.left + self.width() / 2.0;
        }
        self.left + self.width() * index_to_f64(index) / index_to_f64(len - 1)
    }

    /// # Summary
    /// 数值对应的纵坐标。
    pub fn y_at(&self, value: f64, extent: Extent) -> f64 {
        let span = extent.max - extent.min;
        if span.abs() < f64::EPSILON {
            return self.top + self.height() / 2.0;
        }
        let norm = (value - extent.min) / span;
        self.top + (1.0 - norm) * self.height()
    }
}

/// 下标转浮点，超出 u32 范围时饱和
pub fn index_to_f64(index: usize) -> f64 {
    u32::try_from(index).map_or(f64::from(u32::MAX), f64::from)
}

/// # Summary
/// 把 `len` 个点稀疏到不超过 `max_points` 个下标，始终保留首尾。
pub fn thin_indices(len: usize, max_points: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let max_points = max_points.max(2);
    if len <= max_points {
        return (0..len).collect();
    }
    let stride = len.div_ceil(max_points - 1);
    let mut indices: Vec<usize> = (0..len).step_by(stride).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

pub fn svg_header(width: u32, height: u32, background: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><style>text{{font-family:Arial,Helvetica,sans-serif}}</style><rect width="100%" height="100%" fill="{background}" />"#
    )
}

pub fn svg_footer() -> &'static str {
    "</svg>"
}

/// 转义 XML 文本中的特殊字符
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

pub fn text(svg: &mut String, x: f64, y: f64, content: &str, style: TextStyle<'_>) {
    let weight = if style.bold { "bold" } else { "normal" };
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" font-size="{size:.1}" font-weight="{weight}" fill="{fill}" text-anchor="{anchor}">{content}</text>"#,
        size = style.size,
        fill = style.fill,
        anchor = style.anchor.as_str(),
        content = escape_xml(content),
    ));
}

pub fn line(svg: &mut String, from: (f64, f64), to: (f64, f64), stroke: &str, width: f64) {
    svg.push_str(&format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{stroke}" stroke-width="{width:.1}" />"#,
        from.0, from.1, to.0, to.1
    ));
}

pub fn marker(svg: &mut String, at: (f64, f64), radius: f64, fill: &str) {
    svg.push_str(&format!(
        r#"<circle cx="{:.2}" cy="{:.2}" r="{radius:.1}" fill="{fill}" />"#,
        at.0, at.1
    ));
}

pub fn polyline(svg: &mut String, points: &[(f64, f64)], series: &LineSeries<'_>) {
    if points.is_empty() {
        return;
    }
    let coords = points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ");
    let dash = series.dash.unwrap_or("0");
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{color}" stroke-width="{width:.1}" stroke-dasharray="{dash}" stroke-linejoin="round" points="{coords}" />"#,
        color = series.color,
        width = series.stroke_width,
    ));
}

/// # Summary
/// 在绘图区域内绘制多条折线。
///
/// # Returns
/// 每条序列最后一个点的像素坐标，用于终点标注。
pub fn plot_lines(
    svg: &mut String,
    area: &PlotArea,
    extent: Extent,
    series: &[LineSeries<'_>],
    max_points: usize,
) -> Vec<Option<(f64, f64)>> {
    series
        .iter()
        .map(|s| {
            let len = s.values.len();
            let points: Vec<(f64, f64)> = thin_indices(len, max_points)
                .into_iter()
                .filter_map(|i| {
                    let value = s.values.get(i).copied().filter(|v| v.is_finite())?;
                    Some((area.x_at(i, len), area.y_at(value, extent)))
                })
                .collect();
            polyline(svg, &points, s);
            points.last().copied()
        })
        .collect()
}

/// # Summary
/// 绘制水平网格线与纵轴刻度标签。
pub fn value_axis(
    svg: &mut String,
    area: &PlotArea,
    extent: Extent,
    ticks: usize,
    grid_color: &str,
    label_style: TextStyle<'_>,
    format: impl Fn(f64) -> String,
) {
    let ticks = ticks.max(1);
    for k in 0..=ticks {
        let value = extent.min + (extent.max - extent.min) * index_to_f64(k) / index_to_f64(ticks);
        let y = area.y_at(value, extent);
        line(svg, (area.left, y), (area.right, y), grid_color, 1.0);
        text(
            svg,
            area.left - label_style.size * 0.4,
            y + label_style.size * 0.35,
            &format(value),
            label_style,
        );
    }
}

/// # Summary
/// 绘制时间轴：跨年数据按年份标注，不足两年时按月标注，标签数量不超过 `max_labels`。
pub fn time_axis(
    svg: &mut String,
    area: &PlotArea,
    dates: &[NaiveDate],
    max_labels: usize,
    axis_color: &str,
    label_style: TextStyle<'_>,
) {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return;
    };
    line(svg, (area.left, area.bottom), (area.right, area.bottom), axis_color, 2.0);

    let by_year = last.year() - first.year() >= 2;
    let mut boundaries: Vec<(usize, String)> = Vec::new();
    let mut last_key = None;
    for (i, date) in dates.iter().enumerate() {
        let key = if by_year {
            (date.year(), 0)
        } else {
            (date.year(), date.month())
        };
        if last_key != Some(key) {
            let label = if by_year {
                date.format("%Y").to_string()
            } else {
                date.format("%b %Y").to_string()
            };
            boundaries.push((i, label));
            last_key = Some(key);
        }
    }

    let step = boundaries.len().div_ceil(max_labels.max(1)).max(1);
    for (i, label) in boundaries.iter().step_by(step) {
        let x = area.x_at(*i, dates.len());
        line(
            svg,
            (x, area.bottom),
            (x, area.bottom + label_style.size * 0.4),
            axis_color,
            2.0,
        );
        text(svg, x, area.bottom + label_style.size * 1.5, label, label_style);
    }
}

/// # Summary
/// 在 (x, y) 开始横向排列图例项。
pub fn legend(svg: &mut String, x: f64, y: f64, series: &[LineSeries<'_>], style: TextStyle<'_>) {
    let swatch = style.size * 1.6;
    let mut cursor = x;
    for s in series {
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="{width:.1}" stroke-dasharray="{dash}" />"#,
            x1 = cursor,
            x2 = cursor + swatch,
            y = y - style.size * 0.35,
            color = s.color,
            width = s.stroke_width,
            dash = s.dash.unwrap_or("0"),
        ));
        let label_x = cursor + swatch + style.size * 0.4;
        text(
            svg,
            label_x,
            y,
            s.label,
            TextStyle {
                anchor: Anchor::Start,
                ..style
            },
        );
        // 按字符数粗略估算文本宽度
        cursor = label_x + index_to_f64(s.label.chars().count()) * style.size * 0.6 + swatch;
    }
}

/// # Summary
/// 紧凑金额格式，例如 `1500000` -> `1.5M`。
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    let formatted = format!("{scaled:.1}");
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{trimmed}{suffix}")
}
