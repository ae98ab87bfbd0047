//! Self-contained HTML page with a capacity-history line chart.
//!
//! The chart is inline SVG so the file opens offline. The series is also
//! embedded as JSON for the hover readout and for anyone scraping the page.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use bbr_report::{BatteryReport, CapacitySeriesPoint, SeriesSummary};
use chrono::NaiveDate;

use super::summary::SCAN_TIME_FORMAT;
use super::RenderError;
use crate::config::{ChartMetric, ChartTheme};

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 48.0;
const PLOT_WIDTH: f64 = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
const PLOT_HEIGHT: f64 = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
const Y_TICKS: usize = 5;

struct Palette {
    background: &'static str,
    surface: &'static str,
    text: &'static str,
    muted: &'static str,
    grid: &'static str,
    design: &'static str,
    full: &'static str,
}

fn palette(theme: ChartTheme) -> Palette {
    match theme {
        ChartTheme::Dark => Palette {
            background: "#111418",
            surface: "#1b1f26",
            text: "#e5e7eb",
            muted: "#9ca3af",
            grid: "#2a2f37",
            design: "#60a5fa",
            full: "#f59e0b",
        },
        ChartTheme::Light => Palette {
            background: "#ffffff",
            surface: "#f3f4f6",
            text: "#1f2937",
            muted: "#6b7280",
            grid: "#e5e7eb",
            design: "#2563eb",
            full: "#d97706",
        },
    }
}

struct Line {
    label: &'static str,
    color: &'static str,
    values: Vec<f64>,
}

/// Maps dates and values into SVG coordinates.
struct Scale {
    start: NaiveDate,
    span_days: i64,
    min: f64,
    max: f64,
}

impl Scale {
    fn new(points: &[CapacitySeriesPoint], lines: &[Line]) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;

        let (mut min, mut max) = lines
            .iter()
            .flat_map(|l| l.values.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let pad = if max > min {
            (max - min) * 0.05
        } else {
            (max.abs() * 0.05).max(1.0)
        };
        min -= pad;
        max += pad;

        Some(Self {
            start: first.date,
            span_days: (last.date - first.date).num_days(),
            min,
            max,
        })
    }

    fn x(&self, date: NaiveDate) -> f64 {
        if self.span_days == 0 {
            return MARGIN_LEFT + PLOT_WIDTH / 2.0;
        }
        let offset = (date - self.start).num_days() as f64;
        MARGIN_LEFT + PLOT_WIDTH * offset / self.span_days as f64
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + PLOT_HEIGHT * (1.0 - (value - self.min) / (self.max - self.min))
    }
}

pub struct CapacityChart {
    computer_name: String,
    scan_time: String,
    design_capacity_mwh: i64,
    full_charge_capacity_mwh: i64,
    health_percent: f64,
    points: Vec<CapacitySeriesPoint>,
    summary: Option<SeriesSummary>,
    theme: ChartTheme,
    metric: ChartMetric,
}

impl CapacityChart {
    pub fn new(report: &BatteryReport, points: Vec<CapacitySeriesPoint>) -> Self {
        let summary = SeriesSummary::from_series(&points);
        Self {
            computer_name: report.computer_name().to_string(),
            scan_time: report.scan_time.format(SCAN_TIME_FORMAT).to_string(),
            design_capacity_mwh: report.design_capacity_mwh,
            full_charge_capacity_mwh: report.full_charge_capacity_mwh,
            health_percent: report.health_percent(),
            points,
            summary,
            theme: ChartTheme::default(),
            metric: ChartMetric::default(),
        }
    }

    pub fn theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn metric(mut self, metric: ChartMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Write the page to `path`, creating parent directories. Returns the
    /// number of bytes written.
    pub fn write_to(&self, path: &Path) -> Result<usize, RenderError> {
        let html = self.to_html();
        let io_err = |source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, &html).map_err(io_err)?;
        Ok(html.len())
    }

    pub fn to_html(&self) -> String {
        let colors = palette(self.theme);
        let title = format!("Battery Report - {}", escape_html(&self.computer_name));

        let mut html = String::with_capacity(16 * 1024 + self.points.len() * 256);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        let _ = writeln!(html, "<title>{}</title>", title);
        let _ = writeln!(
            html,
            "<style>:root {{ --bg: {}; --surface: {}; --text: {}; --muted: {}; --grid: {}; }}</style>",
            colors.background, colors.surface, colors.text, colors.muted, colors.grid
        );
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n<main>\n");
        let _ = writeln!(html, "<h1>{}</h1>", title);

        self.push_cards(&mut html);

        html.push_str("<section class=\"chart\">\n");
        if self.points.is_empty() {
            html.push_str(
                "<p class=\"empty\">No capacity history was recorded in this report.</p>\n",
            );
        } else {
            self.push_svg(&mut html, &colors);
            html.push_str("<div id=\"tooltip\" class=\"tooltip\"></div>\n");
        }
        html.push_str("</section>\n");

        self.push_table(&mut html);

        let _ = writeln!(
            html,
            "<script type=\"application/json\" id=\"capacity-data\">{}</script>",
            self.json_payload()
        );
        html.push_str(SCRIPT);
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }

    fn push_cards(&self, html: &mut String) {
        html.push_str("<section class=\"cards\">\n");
        let mut card = |label: &str, value: String| {
            let _ = writeln!(
                html,
                "<div class=\"card\"><span>{}</span><strong>{}</strong></div>",
                label, value
            );
        };
        card("Computer", escape_html(&self.computer_name));
        card("Scan time", self.scan_time.clone());
        card("Design capacity", format!("{} mWh", self.design_capacity_mwh));
        card(
            "Full charge capacity",
            format!("{} mWh", self.full_charge_capacity_mwh),
        );
        card("Health", format!("{:.1}%", self.health_percent));
        if let Some(s) = &self.summary {
            card(
                "History",
                format!("{} to {} ({} days)", s.first_date, s.last_date, s.days),
            );
            card(
                "Health change",
                format!("{:+.1} points", s.health_change()),
            );
            card(
                "Full charge range",
                format!("{} - {} mWh", s.min_full_charge_mwh, s.max_full_charge_mwh),
            );
        }
        html.push_str("</section>\n");
    }

    fn lines(&self, colors: &Palette) -> Vec<Line> {
        match self.metric {
            ChartMetric::Capacity => vec![
                Line {
                    label: "Design capacity (mWh)",
                    color: colors.design,
                    values: self
                        .points
                        .iter()
                        .map(|p| p.design_capacity_mwh as f64)
                        .collect(),
                },
                Line {
                    label: "Full charge capacity (mWh)",
                    color: colors.full,
                    values: self
                        .points
                        .iter()
                        .map(|p| p.full_charge_capacity_mwh as f64)
                        .collect(),
                },
            ],
            ChartMetric::Health => vec![Line {
                label: "Health (%)",
                color: colors.full,
                values: self.points.iter().map(|p| p.health_percent).collect(),
            }],
        }
    }

    fn format_value(&self, value: f64) -> String {
        match self.metric {
            ChartMetric::Capacity => format!("{:.0}", value),
            ChartMetric::Health => format!("{:.1}%", value),
        }
    }

    fn push_svg(&self, html: &mut String, colors: &Palette) {
        let lines = self.lines(colors);
        let Some(scale) = Scale::new(&self.points, &lines) else {
            return;
        };

        let _ = writeln!(
            html,
            "<svg id=\"chart\" viewBox=\"0 0 {} {}\" role=\"img\" aria-label=\"Battery capacity history\">",
            WIDTH, HEIGHT
        );

        for i in 0..Y_TICKS {
            let value = scale.min + (scale.max - scale.min) * i as f64 / (Y_TICKS - 1) as f64;
            let y = scale.y(value);
            let _ = writeln!(
                html,
                "<line class=\"grid\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" />",
                MARGIN_LEFT,
                y,
                WIDTH - MARGIN_RIGHT,
                y
            );
            let _ = writeln!(
                html,
                "<text class=\"axis\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>",
                MARGIN_LEFT - 8.0,
                y + 4.0,
                self.format_value(value)
            );
        }

        let mut label_indices = vec![0, self.points.len() / 2, self.points.len() - 1];
        label_indices.dedup();
        for i in label_indices {
            let date = self.points[i].date;
            let _ = writeln!(
                html,
                "<text class=\"axis\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
                scale.x(date),
                HEIGHT - MARGIN_BOTTOM + 20.0,
                date
            );
        }

        for line in &lines {
            let coords: Vec<String> = self
                .points
                .iter()
                .zip(&line.values)
                .map(|(p, v)| format!("{:.1},{:.1}", scale.x(p.date), scale.y(*v)))
                .collect();
            let _ = writeln!(
                html,
                "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"2\" points=\"{}\"><title>{}</title></polyline>",
                line.color,
                coords.join(" "),
                line.label
            );
            for (i, (p, v)) in self.points.iter().zip(&line.values).enumerate() {
                let _ = writeln!(
                    html,
                    "<circle data-index=\"{}\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{}\" />",
                    i,
                    scale.x(p.date),
                    scale.y(*v),
                    line.color
                );
            }
        }
        html.push_str("</svg>\n");

        html.push_str("<ul class=\"legend\">\n");
        for line in &lines {
            let _ = writeln!(
                html,
                "<li><i style=\"background: {}\"></i>{}</li>",
                line.color, line.label
            );
        }
        html.push_str("</ul>\n");
    }

    fn push_table(&self, html: &mut String) {
        if self.points.is_empty() {
            return;
        }
        html.push_str("<details>\n<summary>Capacity history</summary>\n<table>\n");
        html.push_str(
            "<thead><tr><th>Date</th><th>Full charge (mWh)</th><th>Design (mWh)</th><th>Health</th></tr></thead>\n<tbody>\n",
        );
        for p in &self.points {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td></tr>",
                p.date, p.full_charge_capacity_mwh, p.design_capacity_mwh, p.health_percent
            );
        }
        html.push_str("</tbody>\n</table>\n</details>\n");
    }

    fn json_payload(&self) -> String {
        serde_json::to_string(&self.points)
            .unwrap_or_else(|_| "[]".to_string())
            .replace("</", "<\\/")
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

const STYLE: &str = r#"<style>
body { margin: 0; background: var(--bg); color: var(--text); font-family: system-ui, -apple-system, "Segoe UI", sans-serif; }
main { max-width: 1040px; margin: 0 auto; padding: 24px; }
h1 { font-size: 1.5rem; font-weight: 600; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 12px; margin-bottom: 24px; }
.card { background: var(--surface); border-radius: 8px; padding: 12px 16px; }
.card span { display: block; color: var(--muted); font-size: 0.8rem; }
.card strong { font-size: 1.1rem; }
.chart { position: relative; background: var(--surface); border-radius: 8px; padding: 16px; }
svg { width: 100%; height: auto; }
.grid { stroke: var(--grid); stroke-width: 1; }
.axis { fill: var(--muted); font-size: 12px; }
.legend { list-style: none; display: flex; gap: 16px; padding: 0; margin: 8px 0 0; color: var(--muted); }
.legend i { display: inline-block; width: 12px; height: 12px; border-radius: 2px; margin-right: 6px; vertical-align: middle; }
.tooltip { position: absolute; top: 16px; right: 16px; background: var(--bg); border: 1px solid var(--grid); border-radius: 6px; padding: 6px 10px; font-size: 0.85rem; opacity: 0; transition: opacity 0.1s; }
.empty { color: var(--muted); text-align: center; padding: 48px 0; }
details { margin-top: 24px; }
table { width: 100%; border-collapse: collapse; margin-top: 8px; }
th, td { text-align: right; padding: 4px 8px; border-bottom: 1px solid var(--grid); }
th:first-child, td:first-child { text-align: left; }
</style>
"#;

const SCRIPT: &str = r#"<script>
(function () {
  var data = JSON.parse(document.getElementById("capacity-data").textContent);
  var svg = document.getElementById("chart");
  var tip = document.getElementById("tooltip");
  if (!svg || !tip || !data.length) return;
  var marks = Array.prototype.slice.call(svg.querySelectorAll("circle[data-index]"));
  svg.addEventListener("mousemove", function (e) {
    var box = svg.getBoundingClientRect();
    var x = (e.clientX - box.left) * (svg.viewBox.baseVal.width / box.width);
    var best = null, dist = Infinity;
    marks.forEach(function (m) {
      var d = Math.abs(m.cx.baseVal.value - x);
      if (d < dist) { dist = d; best = m; }
    });
    if (!best) return;
    var p = data[+best.getAttribute("data-index")];
    tip.textContent = p.date + "  full " + p.full_charge_capacity_mwh + " mWh  design " +
      p.design_capacity_mwh + " mWh  " + p.health_percent.toFixed(1) + "%";
    tip.style.opacity = 1;
  });
  svg.addEventListener("mouseleave", function () { tip.style.opacity = 0; });
})();
</script>
"#;
