use crate::chart::{
    Anchor, Extent, LineSeries, PlotArea, TextStyle, format_compact, legend,
    marker, plot_lines, svg_footer, svg_header, text, time_axis, value_axis,
};
use chrono::NaiveDate;
use sipreel_core::common::group_thousands;
use sipreel_core::render::entity::ChartMeta;
use sipreel_core::render::error::RenderError;
use sipreel_core::render::port::FrameRenderer;
use sipreel_core::simulation::entity::{ComparisonRow, SimulationRow};
use std::path::Path;
use tracing::debug;

const LIGHT_BACKGROUND: &str = "#ffffff";
const LIGHT_TEXT: &str = "#1f1f1f";
const LIGHT_MUTED: &str = "#666666";
const LIGHT_GRID: &str = "#e5e5e5";
const PORTFOLIO_COLOR: &str = "#2e7d32";
const INVESTED_COLOR: &str = "#c62828";

const DARK_BACKGROUND: &str = "#111111";
const DARK_TEXT: &str = "#f2f2f2";
const DARK_MUTED: &str = "#9e9e9e";
const DARK_GRID: &str = "#2a2a2a";
const SIP_COLOR: &str = "#1e90ff";
const LUMP_COLOR: &str = "#ff6347";

/// 画布按 1080 像素宽度设计，其余尺寸按比例缩放
const BASE_WIDTH: f64 = 1080.0;

/// # Summary
/// 画布缩放后的布局参数。
struct Layout {
    width: f64,
    height: f64,
    unit: f64,
    area: PlotArea,
    canvas_width: u32,
}

impl Layout {
    fn new(meta: &ChartMeta) -> Result<Self, RenderError> {
        if meta.width == 0 || meta.height == 0 {
            return Err(RenderError::InvalidInput(format!(
                "canvas must be non-empty, got {}x{}",
                meta.width, meta.height
            )));
        }
        let width = f64::from(meta.width);
        let height = f64::from(meta.height);
        let unit = width / BASE_WIDTH;
        let area = PlotArea {
            left: 150.0 * unit,
            top: height * 0.22,
            right: width - 70.0 * unit,
            bottom: height * 0.76,
        };
        Ok(Self {
            width,
            height,
            unit,
            area,
            canvas_width: meta.width,
        })
    }

    fn style<'a>(&self, size: f64, fill: &'a str, anchor: Anchor, bold: bool) -> TextStyle<'a> {
        TextStyle {
            size: size * self.unit,
            fill,
            anchor,
            bold,
        }
    }

    /// 折线最多保留的点数，约每两个像素一个点
    fn max_points(&self) -> usize {
        usize::try_from(self.canvas_width / 2).unwrap_or(usize::MAX)
    }
}

fn money(symbol: &str, value: f64) -> String {
    format!("{symbol}{}", group_thousands(value, 0))
}

/// # Summary
/// 在两条折线的终点画标记与金额标注；数值较大的一条标注在点上方，较小的在下方。
fn annotate_endpoints(
    svg: &mut String,
    layout: &Layout,
    endpoints: [(Option<(f64, f64)>, String, &str); 2],
) {
    let [first, second] = endpoints;
    // 纵坐标越小位置越高
    let first_is_higher = match (first.0, second.0) {
        (Some(a), Some(b)) => a.1 <= b.1,
        _ => true,
    };
    let offset = 28.0 * layout.unit;
    for ((point, label, color), above) in [(first, first_is_higher), (second, !first_is_higher)] {
        let Some((x, y)) = point else {
            continue;
        };
        marker(svg, (x, y), 9.0 * layout.unit, color);
        let label_y = if above { y - offset } else { y + offset + 20.0 * layout.unit };
        text(
            svg,
            x - 12.0 * layout.unit,
            label_y,
            &label,
            layout.style(34.0, color, Anchor::End, true),
        );
    }
}

/// # Summary
/// 定投增长动画的单帧 SVG 渲染器。
///
/// # Invariants
/// - 无内部可变状态，可在多个工作线程上并发使用。
/// - 纵轴按当前前缀自动缩放，与逐帧增长的动画效果一致。
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    meta: ChartMeta,
}

impl SvgChartRenderer {
    pub fn new(meta: ChartMeta) -> Self {
        Self { meta }
    }

    pub fn meta(&self) -> &ChartMeta {
        &self.meta
    }

    /// # Summary
    /// 把结果表前缀绘制为 SVG 文本。
    ///
    /// # Logic
    /// 1. 顶部绘制标题、公司名称与当前日期。
    /// 2. 绘制网格、纵轴金额刻度与按年份标注的时间轴。
    /// 3. 绿色折线为持仓市值，红色折线为累计投入。
    /// 4. 在最后一行标注两条折线的金额，底部显示累计收益率。
    ///
    /// # Returns
    /// 前缀为空或画布尺寸为零时返回 `RenderError::InvalidInput`。
    pub fn render_svg(&self, rows: &[SimulationRow]) -> Result<String, RenderError> {
        let last = rows
            .last()
            .ok_or_else(|| RenderError::InvalidInput("cannot render an empty prefix".to_string()))?;
        let layout = Layout::new(&self.meta)?;
        let symbol = self.meta.currency_symbol();

        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        let series = [
            LineSeries {
                label: "Portfolio Value",
                color: PORTFOLIO_COLOR,
                stroke_width: 6.0 * layout.unit,
                dash: None,
                values: rows.iter().map(|r| r.portfolio_value).collect(),
            },
            LineSeries {
                label: "Total Invested",
                color: INVESTED_COLOR,
                stroke_width: 6.0 * layout.unit,
                dash: None,
                values: rows.iter().map(|r| r.total_invested).collect(),
            },
        ];
        let extent = Extent::from_series(&series).ok_or_else(|| {
            RenderError::InvalidInput("prefix contains no finite values".to_string())
        })?;

        let mut svg = svg_header(self.meta.width, self.meta.height, LIGHT_BACKGROUND);
        let center = layout.width / 2.0;
        text(
            &mut svg,
            center,
            layout.height * 0.07,
            &self.meta.title(),
            layout.style(56.0, LIGHT_TEXT, Anchor::Middle, true),
        );
        text(
            &mut svg,
            center,
            layout.height * 0.07 + 72.0 * layout.unit,
            &self.meta.name,
            layout.style(40.0, LIGHT_MUTED, Anchor::Middle, false),
        );
        text(
            &mut svg,
            center,
            layout.height * 0.17,
            &last.date.format("%d %b %Y").to_string(),
            layout.style(64.0, LIGHT_TEXT, Anchor::Middle, true),
        );

        value_axis(
            &mut svg,
            &layout.area,
            extent,
            5,
            LIGHT_GRID,
            layout.style(26.0, LIGHT_MUTED, Anchor::End, false),
            |v| format!("{symbol}{}", format_compact(v)),
        );
        time_axis(
            &mut svg,
            &layout.area,
            &dates,
            6,
            LIGHT_MUTED,
            layout.style(26.0, LIGHT_MUTED, Anchor::Middle, false),
        );

        let endpoints = plot_lines(&mut svg, &layout.area, extent, &series, layout.max_points());
        annotate_endpoints(
            &mut svg,
            &layout,
            [
                (
                    endpoints.first().copied().flatten(),
                    money(&symbol, last.portfolio_value),
                    PORTFOLIO_COLOR,
                ),
                (
                    endpoints.get(1).copied().flatten(),
                    money(&symbol, last.total_invested),
                    INVESTED_COLOR,
                ),
            ],
        );

        legend(
            &mut svg,
            layout.area.left,
            layout.height * 0.84,
            &series,
            layout.style(32.0, LIGHT_TEXT, Anchor::Start, false),
        );

        if last.total_invested > 0.0 {
            let gain_pct = (last.portfolio_value / last.total_invested - 1.0) * 100.0;
            text(
                &mut svg,
                center,
                layout.height * 0.91,
                &format!("Return: {gain_pct:+.1}% over {} days", rows.len()),
                layout.style(40.0, LIGHT_TEXT, Anchor::Middle, true),
            );
        }

        svg.push_str(svg_footer());
        Ok(svg)
    }
}

impl FrameRenderer for SvgChartRenderer {
    fn render(
        &self,
        rows: &[SimulationRow],
        frame_index: usize,
        path: &Path,
    ) -> Result<(), RenderError> {
        write_frame(self.render_svg(rows), frame_index, rows.len(), path)
    }
}

/// 把渲染结果写入帧文件，错误统一归为该帧的 `Rendering`
fn write_frame(
    svg: Result<String, RenderError>,
    frame_index: usize,
    row_count: usize,
    path: &Path,
) -> Result<(), RenderError> {
    let svg = svg.map_err(|e| RenderError::Rendering {
        frame: frame_index,
        message: e.to_string(),
    })?;
    std::fs::write(path, svg).map_err(|e| RenderError::Rendering {
        frame: frame_index,
        message: format!("failed to write {}: {}", path.display(), e),
    })?;
    debug!("Rendered frame {} ({} rows) to {}", frame_index, row_count, path.display());
    Ok(())
}

/// # Summary
/// 一次性投入 vs 定投对比动画的单帧渲染器，每帧绘制对比表的一个前缀。
#[derive(Debug, Clone)]
pub struct SvgComparisonRenderer {
    meta: ChartMeta,
}

impl SvgComparisonRenderer {
    pub fn new(meta: ChartMeta) -> Self {
        Self { meta }
    }
}

impl FrameRenderer<ComparisonRow> for SvgComparisonRenderer {
    fn render(
        &self,
        rows: &[ComparisonRow],
        frame_index: usize,
        path: &Path,
    ) -> Result<(), RenderError> {
        write_frame(render_comparison_svg(rows, &self.meta), frame_index, rows.len(), path)
    }
}

/// # Summary
/// 绘制一次性投入与定投的对比图（深色主题）。
///
/// # Logic
/// 1. 标题为公司名称与 "Lump Sum vs SIP"，下方为当前日期。
/// 2. 蓝色实线为定投市值，橙红色点线为一次性投入市值。
/// 3. 在最后一行标注两者的金额，底部显示图例与定投累计投入。
///
/// # Returns
/// 对比表为空或画布尺寸为零时返回 `RenderError::InvalidInput`。
pub fn render_comparison_svg(
    rows: &[ComparisonRow],
    meta: &ChartMeta,
) -> Result<String, RenderError> {
    let last = rows
        .last()
        .ok_or_else(|| RenderError::InvalidInput("comparison table is empty".to_string()))?;
    let layout = Layout::new(meta)?;
    let symbol = meta.currency_symbol();

    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    let series = [
        LineSeries {
            label: "SIP Investment",
            color: SIP_COLOR,
            stroke_width: 5.0 * layout.unit,
            dash: None,
            values: rows.iter().map(|r| r.sip_value).collect(),
        },
        LineSeries {
            label: "Lump Sum Investment",
            color: LUMP_COLOR,
            stroke_width: 5.0 * layout.unit,
            dash: Some("2 10"),
            values: rows.iter().map(|r| r.lump_value).collect(),
        },
    ];
    let extent = Extent::from_series(&series).ok_or_else(|| {
        RenderError::InvalidInput("comparison contains no finite values".to_string())
    })?;

    let mut svg = svg_header(meta.width, meta.height, DARK_BACKGROUND);
    let center = layout.width / 2.0;
    text(
        &mut svg,
        center,
        layout.height * 0.07,
        &meta.name,
        layout.style(56.0, DARK_TEXT, Anchor::Middle, true),
    );
    text(
        &mut svg,
        center,
        layout.height * 0.07 + 72.0 * layout.unit,
        "Lump Sum vs SIP",
        layout.style(44.0, DARK_MUTED, Anchor::Middle, false),
    );
    text(
        &mut svg,
        center,
        layout.height * 0.17,
        &last.date.format("%d %b %Y").to_string(),
        layout.style(52.0, DARK_TEXT, Anchor::Middle, true),
    );
    text(
        &mut svg,
        layout.area.left,
        layout.area.top - 30.0 * layout.unit,
        &format!("Portfolio Value ({})", symbol.trim()),
        layout.style(28.0, DARK_MUTED, Anchor::Start, false),
    );

    value_axis(
        &mut svg,
        &layout.area,
        extent,
        5,
        DARK_GRID,
        layout.style(26.0, DARK_MUTED, Anchor::End, false),
        |v| format!("{symbol}{}", format_compact(v)),
    );
    time_axis(
        &mut svg,
        &layout.area,
        &dates,
        6,
        DARK_MUTED,
        layout.style(26.0, DARK_MUTED, Anchor::Middle, false),
    );

    let endpoints = plot_lines(&mut svg, &layout.area, extent, &series, layout.max_points());
    annotate_endpoints(
        &mut svg,
        &layout,
        [
            (
                endpoints.first().copied().flatten(),
                format!("SIP: {}", money(&symbol, last.sip_value)),
                SIP_COLOR,
            ),
            (
                endpoints.get(1).copied().flatten(),
                format!("Lump Sum: {}", money(&symbol, last.lump_value)),
                LUMP_COLOR,
            ),
        ],
    );

    legend(
        &mut svg,
        layout.area.left,
        layout.height * 0.84,
        &series,
        layout.style(30.0, DARK_TEXT, Anchor::Start, false),
    );
    text(
        &mut svg,
        center,
        layout.height * 0.91,
        &format!(
            "SIP invested {} over {} periods",
            money(&symbol, last.sip_invested),
            rows.len()
        ),
        layout.style(34.0, DARK_TEXT, Anchor::Middle, false),
    );

    svg.push_str(svg_footer());
    Ok(svg)
}
