// Pie chart geometry
use std::f64::consts::TAU;

use super::coord;
use super::bar::NO_DATA;
use crate::domain::metric::MetricSeries;
use crate::domain::scene::{PieScene, PieSlice, Scene};

pub const PALETTE: [&str; 5] = ["#111", "#444", "#888", "#CCC", "#FFF"];
pub const RADIUS: f64 = 100.0;
const FULL_CIRCLE: f64 = 1.0 - 1e-9;

fn point(turns: f64) -> (String, String) {
    (coord((TAU * turns).cos() * RADIUS), coord((TAU * turns).sin() * RADIUS))
}

/// Wedge from the centre, or two half arcs when the slice is the whole pie
fn slice_path(start: f64, fraction: f64) -> String {
    let (sx, sy) = point(start);
    if fraction >= FULL_CIRCLE {
        let (ox, oy) = point(start + 0.5);
        return format!(
            "M {sx} {sy} A {r} {r} 0 1 1 {ox} {oy} A {r} {r} 0 1 1 {sx} {sy} Z",
            r = RADIUS,
        );
    }
    let (ex, ey) = point(start + fraction);
    let large_arc = if fraction > 0.5 { 1 } else { 0 };
    format!("M 0 0 L {sx} {sy} A {r} {r} 0 {large_arc} 1 {ex} {ey} Z", r = RADIUS)
}

/// Slices in series order, walking the cumulative fraction from angle 0
pub fn render(series: &MetricSeries, size: f64) -> Scene {
    let total = series.total();
    if !(total > 0.0) {
        return Scene::placeholder(NO_DATA);
    }

    let mut cumulative = 0.0;
    let slices = series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let fraction = p.value / total;
            let start = cumulative;
            cumulative += fraction;
            PieSlice {
                label: p.label.clone(),
                value: p.value,
                fraction,
                start_angle: start * 360.0,
                sweep_angle: fraction * 360.0,
                path: slice_path(start, fraction),
                fill: PALETTE[i % PALETTE.len()],
            }
        })
        .collect();

    Scene::Pie(PieScene {
        size,
        total,
        slices,
    })
}
