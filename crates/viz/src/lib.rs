//! # tripdash-viz
//!
//! Bar charts for the dashboard views. A [`ChartSpec`] serializes to the
//! JSON shape Chart.js expects, renders to a standalone HTML page, or prints
//! as text bars in a terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Height of the HTML canvas, in pixels.
const CANVAS_HEIGHT: u32 = 500;

#[derive(Debug, Error)]
pub enum VizError {
    #[error("chart serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single-series horizontal bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub data: ChartData,
    pub axes: AxisTitles,
}

/// Category labels with one or more value series, as Chart.js takes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Axis titles. Values run along x, categories along y.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisTitles {
    pub value: String,
    pub category: String,
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl ChartSpec {
    /// One bar per point, first point on top.
    #[must_use]
    pub fn horizontal_bar<L: Into<String>>(
        title: impl Into<String>,
        value_label: &str,
        category_label: &str,
        points: impl IntoIterator<Item = (L, f64)>,
    ) -> Self {
        let (labels, values): (Vec<String>, Vec<f64>) =
            points.into_iter().map(|(label, value)| (label.into(), value)).unzip();

        Self {
            title: title.into(),
            data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: value_label.to_string(),
                    data: values,
                }],
            },
            axes: AxisTitles {
                value: value_label.to_string(),
                category: category_label.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.labels.is_empty()
    }

    /// # Errors
    ///
    /// Returns [`VizError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, VizError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Standalone page drawing the chart with Chart.js from a CDN.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Serialize`] if serialization fails.
    pub fn to_html(&self) -> Result<String, VizError> {
        let title = escape_html(&self.title);
        // "</" would close the script element early.
        let spec = self.to_json()?.replace("</", "<\\/");

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body>
    <div style="height: {CANVAS_HEIGHT}px">
        <canvas id="chart"></canvas>
    </div>
    <script>
        const spec = {spec};
        new Chart(document.getElementById('chart'), {{
            type: 'bar',
            data: spec.data,
            options: {{
                indexAxis: 'y',
                maintainAspectRatio: false,
                plugins: {{
                    title: {{ display: true, text: spec.title }},
                    legend: {{ display: false }}
                }},
                scales: {{
                    x: {{ title: {{ display: true, text: spec.axes.value }} }},
                    y: {{ title: {{ display: true, text: spec.axes.category }} }}
                }}
            }}
        }});
    </script>
</body>
</html>"#
        ))
    }

    /// First series as text bars, one line per label. The largest value
    /// gets a bar `width` characters long.
    #[must_use]
    pub fn to_text(&self, width: usize) -> String {
        let Some(series) = self.data.datasets.first() else {
            return String::new();
        };
        let label_width = self.data.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = series.data.iter().copied().fold(0.0_f64, f64::max);
        let bar_len = |value: f64| {
            if max > 0.0 {
                ((value / max) * width as f64).round() as usize
            } else {
                0
            }
        };

        self.data
            .labels
            .iter()
            .zip(&series.data)
            .map(|(label, &value)| {
                format!(
                    "{label:<label_width$} │{} {}\n",
                    "█".repeat(bar_len(value)),
                    format_value(value)
                )
            })
            .collect()
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destinations() -> ChartSpec {
        ChartSpec::horizontal_bar(
            "Destinos mais viajados",
            "Contagem",
            "Destino",
            vec![("Paris", 4.0), ("Rome", 2.0), ("Lisboa", 0.0)],
        )
    }

    #[test]
    fn test_bars_keep_order() {
        let chart = destinations();
        assert_eq!(chart.data.labels, vec!["Paris", "Rome", "Lisboa"]);
        assert_eq!(chart.data.datasets[0].data, vec![4.0, 2.0, 0.0]);
        assert_eq!(chart.axes.category, "Destino");
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&destinations().to_json().unwrap()).unwrap();
        assert_eq!(json["data"]["labels"][0], "Paris");
        assert_eq!(json["axes"]["value"], "Contagem");
    }

    #[test]
    fn test_html_escapes_title() {
        let mut chart = destinations();
        chart.title = "<script>".to_string();
        let html = chart.to_html().unwrap();
        assert!(html.contains("chart.js"));
        assert!(html.contains("indexAxis: 'y'"));
        assert!(html.contains("<title>&lt;script&gt;</title>"));
        assert!(!html.contains("\"</script>"));
    }

    #[test]
    fn test_text_bars() {
        let text = destinations().to_text(4);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Paris  │████ 4", "Rome   │██ 2", "Lisboa │ 0"]);
    }

    #[test]
    fn test_empty_chart() {
        let chart = ChartSpec::horizontal_bar("Ranking", "a", "b", Vec::<(String, f64)>::new());
        assert!(chart.is_empty());
        assert_eq!(chart.to_text(10), "");
    }
}
