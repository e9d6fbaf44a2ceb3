//! SVG assembly: legend swatches and axis, county paths with their
//! data attributes, and the state border outline.

use crate::config::MapConfig;
use crate::scale::{LegendTicks, LinearScale, ThresholdScale};
use crate::types::{CountyDatum, StateMesh};
use geo::{LineString, MultiPolygon};
use std::fmt::Write;

const SWATCH_HEIGHT: u32 = 8;
const TICK_SIZE: u32 = 13;

pub fn render_svg(
    map: &MapConfig,
    counties: &[CountyDatum],
    mesh: &StateMesh,
    ticks: &LegendTicks,
) -> String {
    let mut svg = format!(
        r#"<svg id="main-svg" width="{}" height="{}">"#,
        map.width, map.height
    );
    svg.push('\n');
    svg.push_str(&legend_group(ticks));
    svg.push_str(&county_group(counties));
    svg.push_str(&states_path(mesh));
    svg.push_str("</svg>\n");
    svg
}

fn legend_group(ticks: &LegendTicks) -> String {
    let scale = ThresholdScale::blues();
    let x = LinearScale::legend_x();
    let (domain_lo, domain_hi) = x.domain();

    let mut group = String::from(r#"<g id="legend" transform="translate(0,40)">"#);
    group.push('\n');
    let _ = writeln!(
        group,
        r#"<text class="caption" x="{}" y="-6" text-anchor="start">Bachelors Degree or Higher</text>"#,
        x.apply(domain_lo)
    );

    // one swatch per palette entry, spanning its inverted threshold
    // interval clipped to the visible domain
    for i in 0..scale.len() {
        let (lo, hi) = scale.invert_extent(i);
        let lo = lo.unwrap_or(domain_lo);
        let hi = hi.unwrap_or(domain_hi);
        let x0 = x.apply(lo);
        let width = x.apply(hi) - x0;
        if let Some(fill) = scale.color(lo) {
            let _ = writeln!(
                group,
                r#"<rect height="{}" x="{}" width="{}" fill="{}"/>"#,
                SWATCH_HEIGHT, x0, width, fill
            );
        }
    }

    for (i, threshold) in scale.thresholds().iter().enumerate() {
        let tx = x.apply(*threshold);
        let _ = writeln!(
            group,
            r##"<line x1="{tx}" x2="{tx}" y1="0" y2="{}" stroke="#fff"/>"##,
            TICK_SIZE
        );
        let _ = writeln!(
            group,
            r#"<text x="{tx}" y="26" text-anchor="middle" font-size="10">{}</text>"#,
            ticks.label(i)
        );
    }

    group.push_str("</g>\n");
    group
}

fn county_group(counties: &[CountyDatum]) -> String {
    let mut group = String::from("<g id=\"counties\">\n");
    for county in counties {
        let _ = writeln!(
            group,
            r#"<path class="county" data-fips="{fips}" data-education="{pct}" county-name="{name}" state-name="{state}" fill="{fill}" d="{d}"/>"#,
            fips = county.fips,
            pct = county.percent,
            name = xml_escape(&county.area_name),
            state = xml_escape(&county.state),
            fill = county.color,
            d = multi_polygon_path(&county.geometry),
        );
    }
    group.push_str("</g>\n");
    group
}

fn states_path(mesh: &StateMesh) -> String {
    let mut d = String::new();
    for line in &mesh.0 .0 {
        line_path(line, false, &mut d);
    }
    format!("<path class=\"states\" d=\"{}\"/>\n", d)
}

/// Path data for a multipolygon: one closed subpath per ring.
pub fn multi_polygon_path(geometry: &MultiPolygon<f64>) -> String {
    let mut d = String::new();
    for polygon in &geometry.0 {
        line_path(polygon.exterior(), true, &mut d);
        for interior in polygon.interiors() {
            line_path(interior, true, &mut d);
        }
    }
    d
}

fn line_path(line: &LineString<f64>, close: bool, out: &mut String) {
    let points = &line.0;
    // a closed ring repeats its first point; Z stands in for it
    let take = if close && points.len() > 1 && points.first() == points.last() {
        points.len() - 1
    } else {
        points.len()
    };
    for (i, point) in points[..take].iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{}{:.1},{:.1}", command, point.x, point.y);
    }
    if close && !points.is_empty() {
        out.push('Z');
    }
}

pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
