// Line chart geometry
use super::{coord, VIEWBOX_WIDTH};
use crate::domain::metric::MetricSeries;
use crate::domain::scene::{GuideLine, LineScene, PlotPoint, Scene};

pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT DATA";

const PADDING_LEFT: f64 = 40.0;
const PADDING_RIGHT: f64 = 20.0;
const PADDING_TOP: f64 = 30.0;
const PADDING_BOTTOM: f64 = 20.0;

/// Domain is `[min(0, min), max(0, max) * 1.1]`, so zero is always on the canvas;
/// a zero-width domain is widened to 1.
pub fn render(series: &MetricSeries, height: f64) -> Scene {
    if series.len() < 2 {
        return Scene::placeholder(INSUFFICIENT_DATA);
    }

    let y_max = series.max_value().unwrap_or(0.0).max(0.0) * 1.1;
    let y_min = series.min_value().unwrap_or(0.0).min(0.0);
    let range = match y_max - y_min {
        r if r == 0.0 => 1.0,
        r => r,
    };

    let last_index = (series.len() - 1) as f64;
    let plot_width = VIEWBOX_WIDTH - PADDING_LEFT - PADDING_RIGHT;
    let plot_height = height - PADDING_TOP - PADDING_BOTTOM;
    let x_scale = |i: usize| PADDING_LEFT + (i as f64 / last_index) * plot_width;
    let y_scale = |v: f64| height - PADDING_BOTTOM - ((v - y_min) / range) * plot_height;

    let points: Vec<PlotPoint> = series
        .iter()
        .enumerate()
        .map(|(i, p)| PlotPoint {
            x: x_scale(i),
            y: y_scale(p.value),
            label: p.label.clone(),
            value: p.value,
        })
        .collect();

    let path = points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {} {}", if i == 0 { 'M' } else { 'L' }, coord(p.x), coord(p.y)))
        .collect::<Vec<_>>()
        .join(" ");
    let baseline = height - PADDING_BOTTOM;
    let area_path = format!(
        "{} L {} {} L {} {} Z",
        path,
        coord(VIEWBOX_WIDTH - PADDING_RIGHT),
        coord(baseline),
        coord(PADDING_LEFT),
        coord(baseline)
    );

    let guides = [y_max * 0.9, (y_max + y_min) / 2.0, 0.0]
        .into_iter()
        .map(|value| GuideLine {
            y: y_scale(value),
            value,
        })
        .collect();

    Scene::Line(LineScene {
        width: VIEWBOX_WIDTH,
        height,
        y_min,
        y_max,
        path,
        area_path,
        points,
        guides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::MetricPoint;

    fn series(values: &[f64]) -> MetricSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| MetricPoint::new(format!("P{}", i), *v))
            .collect()
    }

    fn line(scene: Scene) -> LineScene {
        match scene {
            Scene::Line(line) => line,
            other => panic!("expected a line scene, got {:?}", other),
        }
    }

    #[test]
    fn test_fewer_than_two_points_is_placeholder() {
        assert_eq!(render(&series(&[]), 200.0), Scene::placeholder(INSUFFICIENT_DATA));
        assert_eq!(render(&series(&[5.0]), 200.0), Scene::placeholder(INSUFFICIENT_DATA));
    }

    #[test]
    fn test_points_span_the_plot_area() {
        let scene = line(render(&series(&[0.0, 50.0, 100.0]), 200.0));
        assert_eq!(scene.points[0].x, 40.0);
        assert_eq!(scene.points[2].x, 780.0);
        assert_eq!(scene.points[1].x, 410.0);
        // zero sits on the bottom padding line
        assert_eq!(scene.points[0].y, 180.0);
        assert!((scene.y_max - 110.0).abs() < 1e-9);
        assert!(scene.path.starts_with("M 40 180 L 410"));
        assert!(scene.area_path.ends_with("L 780 180 L 40 180 Z"));
    }

    #[test]
    fn test_negative_values_lower_the_domain() {
        let scene = line(render(&series(&[-20.0, 10.0]), 200.0));
        assert_eq!(scene.y_min, -20.0);
        let zero_guide = scene.guides.last().unwrap();
        assert_eq!(zero_guide.value, 0.0);
        assert!(zero_guide.y < 180.0);
    }

    #[test]
    fn test_all_zero_series_uses_unit_range() {
        let scene = line(render(&series(&[0.0, 0.0]), 200.0));
        assert!(scene.points.iter().all(|p| p.y == 180.0 && p.y.is_finite()));
    }

    #[test]
    fn test_all_negative_series_stays_inside_plot() {
        let scene = line(render(&series(&[-500.0, -200.0, -350.0]), 200.0));
        assert_eq!(scene.y_max, 0.0);
        assert_eq!(scene.guides.last().unwrap().y, 30.0);
        assert!(scene.points.iter().all(|p| (30.0..=180.0).contains(&p.y)));
        assert_eq!(scene.points[0].y, 180.0);
    }
}
