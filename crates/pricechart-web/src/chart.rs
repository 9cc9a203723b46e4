//! SVG line charts for a single date-indexed column.
//!
//! Rendering is a pure function of the column and style: the same input
//! always produces the same markup.

use std::fmt::Write as _;

use pricechart_core::Column;

use crate::html::escape;

const Y_TICKS: usize = 5;
const MAX_X_TICKS: usize = 6;

/// Geometry and colour of a rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub stroke: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 300.0,
            margin_left: 64.0,
            margin_right: 16.0,
            margin_top: 16.0,
            margin_bottom: 36.0,
            stroke: String::from("#1f77b4"),
        }
    }
}

impl ChartStyle {
    fn plot_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    fn plot_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }
}

/// Line chart of one column, x positioned by row index.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    column: Column,
    style: ChartStyle,
}

impl LineChart {
    pub fn new(column: Column) -> Self {
        Self {
            column,
            style: ChartStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn name(&self) -> &str {
        &self.column.name
    }

    /// Render the chart as standalone SVG markup.
    pub fn render(&self) -> String {
        let style = &self.style;
        let name = escape(&self.column.name);
        let mut svg = String::new();

        // Writing into a String cannot fail.
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="line-chart" viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img" aria-label="{name} line chart"><title>{name}</title>"#,
            w = style.width,
            h = style.height,
        );
        let _ = write!(
            svg,
            r##"<rect class="frame" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#d0d0d0"/>"##,
            style.margin_left,
            style.margin_top,
            style.plot_width(),
            style.plot_height(),
        );

        let (Some(min), Some(max)) = (self.column.min(), self.column.max()) else {
            let _ = write!(
                svg,
                r#"<text class="empty" x="{:.2}" y="{:.2}" text-anchor="middle">No data</text></svg>"#,
                style.margin_left + style.plot_width() / 2.0,
                style.margin_top + style.plot_height() / 2.0,
            );
            return svg;
        };

        let (lo, hi) = y_domain(min, max);
        self.write_y_axis(&mut svg, lo, hi);
        self.write_x_axis(&mut svg);

        let points = self
            .column
            .values()
            .enumerate()
            .map(|(index, value)| {
                format!("{:.2},{:.2}", self.x_at(index), self.y_at(value, lo, hi))
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            svg,
            r#"<polyline class="series" fill="none" stroke="{}" stroke-width="1.5" points="{points}"/></svg>"#,
            escape(&style.stroke),
        );

        svg
    }

    fn x_at(&self, index: usize) -> f64 {
        let style = &self.style;
        let n = self.column.len();
        if n <= 1 {
            return style.margin_left + style.plot_width() / 2.0;
        }
        style.margin_left + index as f64 / (n - 1) as f64 * style.plot_width()
    }

    fn y_at(&self, value: f64, lo: f64, hi: f64) -> f64 {
        let style = &self.style;
        style.margin_top + style.plot_height() - (value - lo) / (hi - lo) * style.plot_height()
    }

    fn write_y_axis(&self, svg: &mut String, lo: f64, hi: f64) {
        let style = &self.style;
        let right = style.margin_left + style.plot_width();

        for step in 0..Y_TICKS {
            let value = lo + (hi - lo) * step as f64 / (Y_TICKS - 1) as f64;
            let y = self.y_at(value, lo, hi);
            let _ = write!(
                svg,
                r##"<line class="grid" x1="{:.2}" y1="{y:.2}" x2="{right:.2}" y2="{y:.2}" stroke="#eeeeee"/><text class="y-tick" x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"##,
                style.margin_left,
                style.margin_left - 6.0,
                y + 4.0,
                compact_number(value),
            );
        }
    }

    fn write_x_axis(&self, svg: &mut String) {
        let style = &self.style;
        let y = style.height - style.margin_bottom + 18.0;

        for index in tick_indices(self.column.len(), MAX_X_TICKS) {
            let (day, _) = self.column.points[index];
            let _ = write!(
                svg,
                r#"<text class="x-tick" x="{:.2}" y="{y:.2}" text-anchor="middle">{day}</text>"#,
                self.x_at(index),
            );
        }
    }
}

/// Render a column as a line chart with the default style.
pub fn render_line_chart(column: &Column) -> String {
    LineChart::new(column.clone()).render()
}

/// Value domain for the y axis, padded when the series is flat.
fn y_domain(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() > f64::EPSILON {
        return (min, max);
    }
    let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.05 };
    (min - pad, max + pad)
}

/// Evenly spaced row indices, always including the first and last.
fn tick_indices(len: usize, max_ticks: usize) -> Vec<usize> {
    match len {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let count = max_ticks.min(len).max(2);
            let mut indices: Vec<usize> = (0..count)
                .map(|k| ((k * (len - 1)) as f64 / (count - 1) as f64).round() as usize)
                .collect();
            indices.dedup();
            indices
        }
    }
}

/// Short axis label: `1.2K`, `3.4M`, `5.6B`, two decimals below a thousand.
pub fn compact_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.2}")
    }
}
