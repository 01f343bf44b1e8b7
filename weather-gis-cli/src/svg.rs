//! SVG export of the 12-hour temperature/humidity chart.

use std::fmt::{self, Write};

use weather_gis_core::chart::HourlyChart;

const LINE_COLOR: &str = "#4A90E2";
const HUMIDITY_FILL: &str = "rgba(218,108,126,0.5)";
const GRID_COLOR: &str = "#e0e0e0";
const LABEL_COLOR: &str = "#666";

pub fn hourly_chart(chart: &HourlyChart) -> Result<String, fmt::Error> {
    let canvas = chart.canvas;
    let mut svg = String::new();

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="10">"#,
        w = canvas.width,
        h = canvas.height,
    )?;

    for line in &chart.grid {
        writeln!(
            svg,
            r#"  <line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="{GRID_COLOR}" stroke-width="1"/>"#,
            x1 = canvas.padding.left,
            x2 = canvas.width - canvas.padding.right,
            y = line.y,
        )?;
        writeln!(
            svg,
            r#"  <text x="{x}" y="{y}" text-anchor="end" fill="{LABEL_COLOR}">{value}%</text>"#,
            x = canvas.padding.left - 8.0,
            y = line.y + 3.0,
            value = line.value,
        )?;
    }

    for bar in &chart.bars {
        writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{HUMIDITY_FILL}"/>"#,
            bar.x, bar.y, bar.width, bar.height,
        )?;
    }

    if !chart.points.is_empty() {
        writeln!(
            svg,
            r#"  <polyline points="{}" fill="none" stroke="{LINE_COLOR}" stroke-width="2"/>"#,
            chart.polyline(),
        )?;
    }

    for point in &chart.points {
        writeln!(
            svg,
            r#"  <circle cx="{}" cy="{}" r="3" fill="{LINE_COLOR}"/>"#,
            point.x, point.y,
        )?;
        writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle">{}°</text>"#,
            point.x,
            point.y - 8.0,
            point.temperature_c.round(),
        )?;
    }

    for hour in &chart.hours {
        writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle" fill="{LABEL_COLOR}">{:02}h</text>"#,
            hour.x,
            canvas.height - 10.0,
            hour.hour,
        )?;
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}
