// Charts - pure renderers from widget content to drawable scenes
pub mod bar;
pub mod line;
pub mod pie;
pub mod svg;

use crate::application::registry::WidgetContent;
use crate::domain::dashboard::RenderShape;
use crate::domain::format::format_number;
use crate::domain::scene::{ListRow, ListScene, Scene};

pub const VIEWBOX_WIDTH: f64 = 800.0;
pub const CHART_HEIGHT: f64 = 200.0;
pub const PIE_SIZE: f64 = 300.0;

/// Turns aggregated content into the scene for its render shape
pub fn render(shape: RenderShape, content: WidgetContent) -> Scene {
    match content {
        WidgetContent::Custom(scene) => scene,
        WidgetContent::Rows {
            rows,
            empty_message,
        } => {
            if rows.is_empty() {
                Scene::placeholder(empty_message)
            } else {
                Scene::List(ListScene { rows })
            }
        }
        WidgetContent::Series(series) => match shape {
            RenderShape::Line => line::render(&series, CHART_HEIGHT),
            RenderShape::Bar => bar::render(&series, CHART_HEIGHT),
            RenderShape::Pie => pie::render(&series, PIE_SIZE),
            RenderShape::List | RenderShape::Custom => {
                let rows = series
                    .iter()
                    .map(|p| {
                        let mut row = ListRow::new(p.label.clone());
                        row.detail = Some(format_number(p.value));
                        row
                    })
                    .collect();
                Scene::List(ListScene { rows })
            }
        },
    }
}

/// SVG coordinate with at most two decimals
pub(crate) fn coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 || !rounded.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::{MetricPoint, MetricSeries};

    #[test]
    fn test_coord_formatting() {
        assert_eq!(coord(40.0), "40");
        assert_eq!(coord(93.333333), "93.33");
        assert_eq!(coord(-0.0000001), "0");
        assert_eq!(coord(12.5), "12.5");
    }

    #[test]
    fn test_empty_rows_use_their_message() {
        let scene = render(
            RenderShape::List,
            WidgetContent::Rows {
                rows: Vec::new(),
                empty_message: "NO MISSIONS SET",
            },
        );
        assert_eq!(scene, Scene::placeholder("NO MISSIONS SET"));
    }

    #[test]
    fn test_series_dispatch_by_shape() {
        let series = MetricSeries::new(vec![MetricPoint::new("a", 1.0), MetricPoint::new("b", 3.0)]);
        assert!(matches!(render(RenderShape::Line, WidgetContent::Series(series.clone())), Scene::Line(_)));
        assert!(matches!(render(RenderShape::Bar, WidgetContent::Series(series.clone())), Scene::Bar(_)));
        assert!(matches!(render(RenderShape::Pie, WidgetContent::Series(series.clone())), Scene::Pie(_)));
        assert!(matches!(render(RenderShape::List, WidgetContent::Series(series)), Scene::List(_)));
    }
}
