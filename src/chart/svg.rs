//! SVG rendering of chart models.

use std::fmt::Write as _;

use super::ChartStyle;
use super::model::{BarChart, BoxChart, LineChart, Orientation};
use super::stats::{format_tick, nice_ticks};

const AXIS_COLOR: &str = "#333333";
const TICK_LEN: f64 = 5.0;

/// Plot area inside the figure, in pixels.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Frame {
    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Linear map from a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy)]
struct Scale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl Scale {
    fn new((d0, d1): (f64, f64), (r0, r1): (f64, f64)) -> Self {
        Self { d0, d1, r0, r1 }
    }

    fn map(&self, v: f64) -> f64 {
        let span = self.d1 - self.d0;
        if span == 0.0 {
            return (self.r0 + self.r1) / 2.0;
        }
        self.r0 + (v - self.d0) / span * (self.r1 - self.r0)
    }
}

/// Append-only SVG document.
struct Svg {
    out: String,
    font_family: String,
}

impl Svg {
    fn new(style: &ChartStyle) -> Self {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = style.width,
            h = style.height
        );
        let mut svg = Self {
            out,
            font_family: style.font_family.clone(),
        };
        svg.rect(0.0, 0.0, style.width as f64, style.height as f64, &style.background, None);
        svg
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: Option<&str>) {
        let stroke = stroke
            .map(|s| format!(r#" stroke="{}" stroke-width="1""#, escape(s)))
            .unwrap_or_default();
        let _ = writeln!(
            self.out,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" fill="{}"{stroke}/>"#,
            w.max(0.0),
            h.max(0.0),
            escape(fill)
        );
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = writeln!(
            self.out,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{width}"/>"#,
            escape(stroke)
        );
    }

    fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64) {
        let pts: Vec<String> = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
        let _ = writeln!(
            self.out,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{width}"/>"#,
            pts.join(" "),
            escape(stroke)
        );
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, stroke: &str) {
        let _ = writeln!(
            self.out,
            r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r}" fill="none" stroke="{}"/>"#,
            escape(stroke)
        );
    }

    /// Five-pointed star marker.
    fn star(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        let pts: Vec<String> = (0..10)
            .map(|i| {
                let radius = if i % 2 == 0 { r } else { r * 0.4 };
                let angle = std::f64::consts::PI * (i as f64) / 5.0 - std::f64::consts::FRAC_PI_2;
                format!("{:.2},{:.2}", cx + radius * angle.cos(), cy + radius * angle.sin())
            })
            .collect();
        let _ = writeln!(
            self.out,
            r#"<polygon class="marker" points="{}" fill="{}"/>"#,
            pts.join(" "),
            escape(fill)
        );
    }

    fn text(&mut self, x: f64, y: f64, s: &str, size: f64, anchor: &str, rotate: Option<f64>) {
        let transform = rotate
            .map(|deg| format!(r#" transform="rotate({deg} {x:.2} {y:.2})""#))
            .unwrap_or_default();
        let _ = writeln!(
            self.out,
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{}" font-size="{size}" text-anchor="{anchor}" fill="{AXIS_COLOR}"{transform}>{}</text>"#,
            escape(&self.font_family),
            escape(s)
        );
    }

    fn title(&mut self, style: &ChartStyle, title: &str) {
        self.text(
            style.width as f64 / 2.0,
            style.title_font_size * 1.6,
            title,
            style.title_font_size,
            "middle",
            None,
        );
    }

    fn finish(mut self) -> String {
        self.out.push_str("</svg>\n");
        self.out
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
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

fn frame(style: &ChartStyle, left: f64) -> Frame {
    Frame {
        left,
        top: style.title_font_size * 3.0,
        right: style.width as f64 - 30.0,
        bottom: style.height as f64 - style.label_font_size * 4.0,
    }
}

fn color(style: &ChartStyle, i: usize) -> &str {
    if style.palette.is_empty() {
        AXIS_COLOR
    } else {
        &style.palette[i % style.palette.len()]
    }
}

/// Value axis ticks padded around `[lo, hi]`.
fn value_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let (lo, hi) = if lo.is_finite() && hi.is_finite() { (lo, hi) } else { (0.0, 1.0) };
    nice_ticks(lo, hi, 5)
}

fn tick_step(ticks: &[f64]) -> f64 {
    if ticks.len() > 1 { ticks[1] - ticks[0] } else { 1.0 }
}

fn x_value_axis(svg: &mut Svg, style: &ChartStyle, f: Frame, scale: Scale, ticks: &[f64], label: &str) {
    svg.line(f.left, f.bottom, f.right, f.bottom, AXIS_COLOR, 1.0);
    let step = tick_step(ticks);
    for &t in ticks {
        let x = scale.map(t);
        svg.line(x, f.bottom, x, f.bottom + TICK_LEN, AXIS_COLOR, 1.0);
        svg.text(x, f.bottom + TICK_LEN + style.tick_font_size, &format_tick(t, step), style.tick_font_size, "middle", None);
    }
    svg.text(
        (f.left + f.right) / 2.0,
        f.bottom + TICK_LEN + style.tick_font_size + style.label_font_size * 1.5,
        label,
        style.label_font_size,
        "middle",
        None,
    );
}

fn y_value_axis(svg: &mut Svg, style: &ChartStyle, f: Frame, scale: Scale, ticks: &[f64], label: Option<&str>) {
    svg.line(f.left, f.top, f.left, f.bottom, AXIS_COLOR, 1.0);
    let step = tick_step(ticks);
    for &t in ticks {
        let y = scale.map(t);
        svg.line(f.left - TICK_LEN, y, f.left, y, AXIS_COLOR, 1.0);
        svg.text(f.left - TICK_LEN - 3.0, y + style.tick_font_size / 3.0, &format_tick(t, step), style.tick_font_size, "end", None);
    }
    if let Some(label) = label {
        let x = f.left - style.label_font_size * 3.5;
        svg.text(x, (f.top + f.bottom) / 2.0, label, style.label_font_size, "middle", Some(-90.0));
    }
}

/// Legend box anchored at the upper-right corner of the plot area.
fn legend(svg: &mut Svg, style: &ChartStyle, f: Frame, title: Option<&str>, entries: &[(String, String)]) {
    let size = style.tick_font_size;
    let row_h = size * 1.5;
    let widest = entries.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let width = 34.0 + widest as f64 * size * 0.6;
    let rows = entries.len() + usize::from(title.is_some());
    let height = rows as f64 * row_h + 8.0;
    let (x0, y0) = (f.right - width - 8.0, f.top + 8.0);

    svg.rect(x0, y0, width, height, "#ffffff", Some("#cccccc"));
    let mut y = y0 + row_h;
    if let Some(title) = title {
        svg.text(x0 + 6.0, y - 4.0, title, size, "start", None);
        y += row_h;
    }
    for (label, fill) in entries {
        svg.rect(x0 + 6.0, y - size, 18.0, size * 0.8, fill, None);
        svg.text(x0 + 28.0, y - 4.0, label, size, "start", None);
        y += row_h;
    }
}

/// Render a [`LineChart`] as an SVG document.
pub fn render_line(chart: &LineChart, style: &ChartStyle) -> String {
    let mut svg = Svg::new(style);
    let f = frame(style, style.label_font_size * 5.0);
    svg.rect(f.left, f.top, f.width(), f.height(), &style.plot_background, None);
    svg.title(style, &chart.title);

    let ys = chart.series.iter().flat_map(|s| s.points.iter().map(|p| p.1));
    let (ylo, yhi) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let y_ticks = value_ticks(ylo, yhi);
    let y_scale = Scale::new(
        (y_ticks[0], y_ticks[y_ticks.len() - 1]),
        (f.bottom, f.top),
    );

    let (xlo, xhi) = match (chart.x_ticks.first(), chart.x_ticks.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => (0.0, 1.0),
    };
    let pad = if hi_lo_equal(xlo, xhi) { 1.0 } else { (xhi - xlo) * 0.05 };
    let x_scale = Scale::new((xlo - pad, xhi + pad), (f.left, f.right));

    y_value_axis(&mut svg, style, f, y_scale, &y_ticks, Some(chart.y_label.as_str()));
    svg.line(f.left, f.bottom, f.right, f.bottom, AXIS_COLOR, 1.0);
    for &t in &chart.x_ticks {
        let x = x_scale.map(t);
        svg.line(x, f.bottom, x, f.bottom + TICK_LEN, AXIS_COLOR, 1.0);
        svg.text(x, f.bottom + TICK_LEN + style.tick_font_size, &format_tick(t, 1.0), style.tick_font_size, "middle", None);
    }
    svg.text(
        (f.left + f.right) / 2.0,
        f.bottom + TICK_LEN + style.tick_font_size + style.label_font_size * 1.5,
        &chart.x_label,
        style.label_font_size,
        "middle",
        None,
    );

    let mut entries = Vec::with_capacity(chart.series.len());
    for (i, series) in chart.series.iter().enumerate() {
        let stroke = color(style, i).to_owned();
        let pts: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&(x, y)| (x_scale.map(x), y_scale.map(y)))
            .collect();
        svg.polyline(&pts, &stroke, 1.5);
        for &(x, y) in &pts {
            svg.star(x, y, 5.0, &stroke);
        }
        entries.push((series.name.clone(), stroke));
    }
    legend(&mut svg, style, f, None, &entries);

    svg.finish()
}

fn hi_lo_equal(lo: f64, hi: f64) -> bool {
    (hi - lo).abs() < f64::EPSILON
}

/// Render a [`BarChart`] as an SVG document.
pub fn render_bar(chart: &BarChart, style: &ChartStyle) -> String {
    let mut svg = Svg::new(style);
    let widest = chart.bars.iter().map(|(c, _)| c.chars().count()).max().unwrap_or(0);
    let left = match chart.orientation {
        Orientation::Vertical => style.label_font_size * 5.0,
        Orientation::Horizontal => style.label_font_size * 2.5 + widest as f64 * style.tick_font_size * 0.6,
    };
    let f = frame(style, left);
    svg.rect(f.left, f.top, f.width(), f.height(), &style.plot_background, None);
    svg.title(style, &chart.title);

    let (lo, hi) = chart
        .bars
        .iter()
        .filter_map(|(_, v)| *v)
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let ticks = value_ticks(lo, hi);
    let domain = (ticks[0], ticks[ticks.len() - 1]);
    let fill = color(style, 0).to_owned();
    let n = chart.bars.len().max(1) as f64;

    match chart.orientation {
        Orientation::Vertical => {
            let scale = Scale::new(domain, (f.bottom, f.top));
            y_value_axis(&mut svg, style, f, scale, &ticks, Some(chart.value_label.as_str()));
            svg.line(f.left, f.bottom, f.right, f.bottom, AXIS_COLOR, 1.0);
            let band = f.width() / n;
            for (i, (cat, v)) in chart.bars.iter().enumerate() {
                let center = f.left + (i as f64 + 0.5) * band;
                if let Some(v) = v {
                    let (y0, y1) = (scale.map(0.0), scale.map(*v));
                    svg.rect(center - band * 0.25, y0.min(y1), band * 0.5, (y0 - y1).abs(), &fill, None);
                }
                svg.text(center, f.bottom + TICK_LEN + style.tick_font_size, cat, style.tick_font_size, "middle", None);
            }
            svg.text(
                (f.left + f.right) / 2.0,
                f.bottom + TICK_LEN + style.tick_font_size + style.label_font_size * 1.5,
                &chart.category_label,
                style.label_font_size,
                "middle",
                None,
            );
        }
        Orientation::Horizontal => {
            let scale = Scale::new(domain, (f.left, f.right));
            x_value_axis(&mut svg, style, f, scale, &ticks, &chart.value_label);
            svg.line(f.left, f.top, f.left, f.bottom, AXIS_COLOR, 1.0);
            let band = f.height() / n;
            for (i, (cat, v)) in chart.bars.iter().enumerate() {
                // First row at the bottom.
                let center = f.bottom - (i as f64 + 0.5) * band;
                if let Some(v) = v {
                    let (x0, x1) = (scale.map(0.0), scale.map(*v));
                    svg.rect(x0.min(x1), center - band * 0.25, (x1 - x0).abs(), band * 0.5, &fill, None);
                }
                svg.text(f.left - TICK_LEN - 3.0, center + style.tick_font_size / 3.0, cat, style.tick_font_size, "end", None);
            }
        }
    }

    svg.finish()
}

/// Render a [`BoxChart`] as an SVG document.
pub fn render_box(chart: &BoxChart, style: &ChartStyle) -> String {
    let mut svg = Svg::new(style);
    let widest = chart.groups.iter().map(|g| g.category.chars().count()).max().unwrap_or(0);
    let left = style.label_font_size * 3.0 + widest as f64 * style.tick_font_size * 0.6;
    let f = frame(style, left);
    svg.rect(f.left, f.top, f.width(), f.height(), &style.plot_background, None);
    svg.title(style, &chart.title);

    let (lo, hi) = chart
        .groups
        .iter()
        .flat_map(|g| g.boxes.iter().flatten())
        .map(|b| b.extent())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
    let ticks = value_ticks(lo, hi);
    let scale = Scale::new((ticks[0], ticks[ticks.len() - 1]), (f.left, f.right));
    x_value_axis(&mut svg, style, f, scale, &ticks, &chart.value_label);
    svg.line(f.left, f.top, f.left, f.bottom, AXIS_COLOR, 1.0);
    svg.text(
        style.label_font_size,
        (f.top + f.bottom) / 2.0,
        &chart.category_label,
        style.label_font_size,
        "middle",
        Some(-90.0),
    );

    let band = f.height() / chart.groups.len().max(1) as f64;
    let sub = band * 0.8 / chart.hues.len().max(1) as f64;
    for (gi, group) in chart.groups.iter().enumerate() {
        let band_top = f.top + gi as f64 * band;
        svg.text(
            f.left - TICK_LEN - 3.0,
            band_top + band / 2.0 + style.tick_font_size / 3.0,
            &group.category,
            style.tick_font_size,
            "end",
            None,
        );
        for (hue_idx, stats) in group.boxes.iter().enumerate() {
            let Some(stats) = stats else { continue };
            let center = band_top + band * 0.1 + (hue_idx as f64 + 0.5) * sub;
            let half = sub * 0.4;
            let (q1, q3) = (scale.map(stats.q1), scale.map(stats.q3));
            let (wl, wh) = (scale.map(stats.whisker_low), scale.map(stats.whisker_high));
            svg.line(wl, center, q1, center, AXIS_COLOR, 1.0);
            svg.line(q3, center, wh, center, AXIS_COLOR, 1.0);
            svg.line(wl, center - half / 2.0, wl, center + half / 2.0, AXIS_COLOR, 1.0);
            svg.line(wh, center - half / 2.0, wh, center + half / 2.0, AXIS_COLOR, 1.0);
            svg.rect(q1, center - half, q3 - q1, half * 2.0, color(style, hue_idx), Some(AXIS_COLOR));
            let m = scale.map(stats.median);
            svg.line(m, center - half, m, center + half, AXIS_COLOR, 2.0);
            for &o in &stats.outliers {
                svg.circle(scale.map(o), center, 3.0, AXIS_COLOR);
            }
        }
    }

    let entries: Vec<(String, String)> = chart
        .hues
        .iter()
        .enumerate()
        .map(|(i, h)| (h.clone(), color(style, i).to_owned()))
        .collect();
    legend(&mut svg, style, f, Some(chart.hue_label.as_str()), &entries);

    svg.finish()
}
