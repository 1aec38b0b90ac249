// src/services/chart.rs
use log::debug;

use crate::models::ComparisonResult;

pub const CONTENT_TYPE: &str = "image/svg+xml";

// 8x6 inches at 100 dpi.
const WIDTH: i32 = 800;
const HEIGHT: i32 = 600;
const PADDING: f64 = 60.0;
const GRID_LINES: usize = 8;
const SYMBOL_COLOR: &str = "#1f77b4";
const INDEX_COLOR: &str = "#ff7f0e";
const DIFF_COLOR: &str = "#2ca02c";

struct Series<'a> {
    label: &'static str,
    color: &'static str,
    stroke_width: f64,
    values: &'a [f64],
}

/// Renders the three aligned series as an SVG line chart, x by trading-day position.
pub fn render_comparison(result: &ComparisonResult) -> String {
    let series = [
        Series {
            label: "Symbol returns",
            color: SYMBOL_COLOR,
            stroke_width: 0.5,
            values: &result.returns,
        },
        Series {
            label: "Index returns",
            color: INDEX_COLOR,
            stroke_width: 0.5,
            values: &result.index,
        },
        Series {
            label: "Returns over index",
            color: DIFF_COLOR,
            stroke_width: 2.0,
            values: &result.diffs,
        },
    ];
    let title = format!(
        "{}: Returns against the S&amp;P, {} trading days",
        escape(&result.symbol.to_uppercase()),
        result.trading_days()
    );
    debug!("Rendering chart for {} ({} points)", result.symbol, result.trading_days());

    let width = WIDTH as f64;
    let height = HEIGHT as f64;
    let (min_v, max_v) = extent(&series);
    let xs = x_positions(result.trading_days(), width);

    let mut svg = svg_header(WIDTH, HEIGHT);
    svg.push_str(&format!(
        r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="14" fill="#000">{title}</text>"##,
        x = width / 2.0,
        y = PADDING / 2.0,
        title = title
    ));

    draw_grid(&mut svg, &xs, min_v, max_v, width, height);

    for s in &series {
        let points = xs
            .iter()
            .zip(s.values)
            .filter(|(_, v)| v.is_finite())
            .map(|(x, v)| format!("{:.2},{:.2}", x, scale_value(*v, min_v, max_v, height)))
            .collect::<Vec<_>>()
            .join(" ");
        if points.is_empty() {
            continue;
        }
        svg.push_str(&format!(
            r#"<polyline fill="none" stroke="{color}" stroke-width="{width}" points="{points}" />"#,
            color = s.color,
            width = s.stroke_width,
            points = points
        ));
    }

    draw_legend(&mut svg, &series);
    svg.push_str(svg_footer());
    svg
}

fn extent(series: &[Series]) -> (f64, f64) {
    let mut min_v = 0.0_f64;
    let mut max_v = 0.0_f64;
    for value in series.iter().flat_map(|s| s.values.iter()) {
        if value.is_finite() {
            min_v = min_v.min(*value);
            max_v = max_v.max(*value);
        }
    }
    if min_v == max_v {
        // flat at zero
        return (-0.01, 0.01);
    }
    (min_v, max_v)
}

fn scale_value(value: f64, min_v: f64, max_v: f64, height: f64) -> f64 {
    let inner_height = height - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn x_positions(len: usize, width: f64) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![width / 2.0],
        _ => {
            let inner_width = width - 2.0 * PADDING;
            (0..len)
                .map(|i| PADDING + inner_width * (i as f64 / (len - 1) as f64))
                .collect()
        }
    }
}

fn draw_grid(svg: &mut String, xs: &[f64], min_v: f64, max_v: f64, width: f64, height: f64) {
    for step in 0..=GRID_LINES {
        let value = min_v + (max_v - min_v) * step as f64 / GRID_LINES as f64;
        let y = scale_value(value, min_v, max_v, height);
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#dddddd" stroke-width="0.5" />"##,
            x1 = PADDING,
            x2 = width - PADDING,
            y = y
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"#,
            x = PADDING - 6.0,
            y = y + 3.0,
            label = format_percentage(value)
        ));
    }

    let tick_every = (xs.len() / GRID_LINES).max(1);
    for (idx, x) in xs.iter().enumerate().step_by(tick_every) {
        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#dddddd" stroke-width="0.5" />"##,
            x = x,
            y1 = PADDING,
            y2 = height - PADDING
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = x,
            y = height - PADDING + 16.0,
            label = idx
        ));
    }

    svg.push_str(&format!(
        r##"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="none" stroke="#000" stroke-width="1" />"##,
        x = PADDING,
        y = PADDING,
        w = width - 2.0 * PADDING,
        h = height - 2.0 * PADDING
    ));
}

fn draw_legend(svg: &mut String, series: &[Series]) {
    let x = PADDING + 10.0;
    let mut y = PADDING + 18.0;
    for s in series {
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="{width}" />"#,
            x1 = x,
            x2 = x + 20.0,
            y = y - 4.0,
            color = s.color,
            width = s.stroke_width.max(1.5)
        ));
        svg.push_str(&format!(
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="start" fill="#333">{label}</text>"##,
            x = x + 26.0,
            y = y,
            label = s.label
        ));
        y += 16.0;
    }
}

fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn svg_header(width: i32, height: i32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:11px;fill:#444}}</style><rect width="100%" height="100%" fill="white" />"#,
        w = width,
        h = height
    )
}

fn svg_footer() -> &'static str {
    "</svg>"
}
