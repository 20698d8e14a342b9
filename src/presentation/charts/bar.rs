// Bar chart geometry
use super::VIEWBOX_WIDTH;
use crate::domain::metric::MetricSeries;
use crate::domain::scene::{BarRect, BarScene, Scene};

pub const NO_DATA: &str = "NO DATA";

const PADDING: f64 = 20.0;
const BAR_FILL: f64 = 0.6;

/// Bars share `[0, max * 1.1]`; negative values draw as zero height
pub fn render(series: &MetricSeries, height: f64) -> Scene {
    let max = match series.max_value() {
        Some(max) if max > 0.0 => max,
        _ => return Scene::placeholder(NO_DATA),
    };

    let y_max = max * 1.1;
    let plot_height = height - PADDING * 2.0;
    let slot = (VIEWBOX_WIDTH - PADDING * 2.0) / series.len() as f64;
    let bar_width = slot * BAR_FILL;
    let baseline_y = height - PADDING;

    let bars = series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let bar_height = p.value.max(0.0) / y_max * plot_height;
            BarRect {
                x: PADDING + i as f64 * slot + (slot - bar_width) / 2.0,
                y: baseline_y - bar_height,
                width: bar_width,
                height: bar_height,
                label: p.label.clone(),
                value: p.value,
            }
        })
        .collect();

    Scene::Bar(BarScene {
        width: VIEWBOX_WIDTH,
        height,
        y_max,
        baseline_y,
        bars,
    })
}
