//! Self-contained HTML dashboard page.

use pricechart_core::{DashboardConfig, Field, PriceSeries};

use crate::chart::LineChart;
use crate::html::{escape, render_markdown};

const STYLESHEET: &str = "\
body{font-family:system-ui,-apple-system,'Segoe UI',sans-serif;margin:0;background:#fafafa;color:#262730}\
main{max-width:760px;margin:0 auto;padding:32px 20px}\
h1{font-size:2.2rem;margin:0 0 12px}\
h2{font-size:1.1rem;margin:28px 0 8px}\
p.caption{color:#808495;font-size:.85rem}\
section.chart{background:#fff;border:1px solid #e6e6e6;border-radius:6px;padding:8px}\
svg.line-chart{width:100%;height:auto;font-size:11px;fill:#31333f}\
svg .empty{fill:#808495;font-size:14px}";

/// One page: a markdown intro followed by line charts in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    title: String,
    description: String,
    caption: Option<String>,
    charts: Vec<LineChart>,
}

impl Dashboard {
    /// `description` is rendered as a markdown subset (headings, paragraphs).
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            caption: None,
            charts: Vec::new(),
        }
    }

    /// The demo page: intro text, then the `Close` chart and the `Volume` chart.
    pub fn from_series(config: &DashboardConfig, series: &PriceSeries) -> Self {
        let caption = format!(
            "{} · {} · {} · {} rows{}",
            series.symbol,
            series.range,
            series.interval,
            series.len(),
            series
                .currency
                .as_deref()
                .map(|currency| format!(" · {currency}"))
                .unwrap_or_default(),
        );

        Self::new(config.title.clone(), config.intro_markdown())
            .with_caption(caption)
            .line_chart(series.column(Field::Close))
            .line_chart(series.column(Field::Volume))
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Append a chart section for `column`.
    pub fn line_chart(self, column: pricechart_core::Column) -> Self {
        self.chart(LineChart::new(column))
    }

    pub fn chart(mut self, chart: LineChart) -> Self {
        self.charts.push(chart);
        self
    }

    pub fn render_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        html.push_str(&format!("<style>{STYLESHEET}</style>\n"));
        html.push_str("</head>\n<body>\n<main>\n<header>\n");
        html.push_str(&render_markdown(&self.description));
        if let Some(caption) = &self.caption {
            html.push_str(&format!("<p class=\"caption\">{}</p>\n", escape(caption)));
        }
        html.push_str("</header>\n");

        for chart in &self.charts {
            html.push_str(&format!(
                "<section class=\"chart\" id=\"{}\">\n<h2>{}</h2>\n{}\n</section>\n",
                escape(&slug(chart.name())),
                escape(chart.name()),
                chart.render(),
            ));
        }

        html.push_str("</main>\n</body>\n</html>\n");
        html
    }
}

fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("chart-{slug}")
}
