// Drawable scene domain models produced by the chart renderers
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scene {
    Placeholder { message: String },
    Line(LineScene),
    Bar(BarScene),
    Pie(PieScene),
    List(ListScene),
    Clock(ClockFace),
    Launcher { entries: Vec<LauncherEntry> },
    Stat(StatCard),
    NoteCapture { prompt: String },
}

impl Scene {
    pub fn placeholder(message: impl Into<String>) -> Self {
        Scene::Placeholder {
            message: message.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Scene::Placeholder { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideLine {
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineScene {
    pub width: f64,
    pub height: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// SVG path data of the polyline
    pub path: String,
    /// Closed path under the line, for the gradient fill
    pub area_path: String,
    pub points: Vec<PlotPoint>,
    pub guides: Vec<GuideLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarScene {
    pub width: f64,
    pub height: f64,
    pub y_max: f64,
    pub baseline_y: f64,
    pub bars: Vec<BarRect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Fraction of the total, 0..=1
    pub fraction: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub path: String,
    pub fill: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieScene {
    pub size: f64,
    pub total: f64,
    pub slices: Vec<PieSlice>,
}

impl PieScene {
    pub fn total_sweep(&self) -> f64 {
        self.slices.iter().map(|s| s.sweep_angle).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Rendered with warning emphasis (overdue deadlines and the like)
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub alert: bool,
}

impl ListRow {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
            progress: None,
            checked: None,
            alert: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListScene {
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockFace {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LauncherEntry {
    pub view: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub caption: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
}
