// Metric series domain model
use serde::Serialize;

/// Label of the single point emitted when an aggregation has nothing to group
pub const PLACEHOLDER_LABEL: &str = "No Data";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    pub label: String,
    pub value: f64,
}

impl MetricPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Ordered, render-ready output of one aggregator. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(transparent)]
pub struct MetricSeries {
    points: Vec<MetricPoint>,
}

impl MetricSeries {
    pub fn new(points: Vec<MetricPoint>) -> Self {
        Self { points }
    }

    pub fn placeholder() -> Self {
        Self::new(vec![MetricPoint::new(PLACEHOLDER_LABEL, 0.0)])
    }

    /// Wraps grouped output, substituting the placeholder point for an empty grouping
    pub fn or_placeholder(points: Vec<MetricPoint>) -> Self {
        if points.is_empty() {
            Self::placeholder()
        } else {
            Self::new(points)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.points.as_slice(), [only] if only.label == PLACEHOLDER_LABEL && only.value == 0.0)
    }

    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricPoint> {
        self.points.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values().reduce(f64::max)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.values().reduce(f64::min)
    }

    pub fn last(&self) -> Option<&MetricPoint> {
        self.points.last()
    }
}

impl FromIterator<MetricPoint> for MetricSeries {
    fn from_iter<I: IntoIterator<Item = MetricPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_placeholder() {
        let series = MetricSeries::or_placeholder(Vec::new());
        assert!(series.is_placeholder());
        assert_eq!(series.len(), 1);

        let series = MetricSeries::or_placeholder(vec![MetricPoint::new("Food", 3.0)]);
        assert!(!series.is_placeholder());
    }

    #[test]
    fn test_bounds() {
        let series: MetricSeries = [-2.0, 5.0, 1.0]
            .into_iter()
            .map(|v| MetricPoint::new("x", v))
            .collect();
        assert_eq!(series.max_value(), Some(5.0));
        assert_eq!(series.min_value(), Some(-2.0));
        assert_eq!(series.total(), 4.0);
        assert_eq!(MetricSeries::default().max_value(), None);
    }
}
