// Page domain model - what a dashboard or analytics page renders to
use serde::Serialize;

use super::scene::Scene;
use super::widget::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    #[default]
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderShape {
    Line,
    Bar,
    Pie,
    List,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedWidget {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub title: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<RenderShape>,
    pub scene: Scene,
    pub removable: bool,
}

/// Entry of the add-widget menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub widget_type: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub mode: PageMode,
    pub widgets: Vec<RenderedWidget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
    /// Only populated while editing
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<CatalogEntry>,
}

impl PageView {
    pub fn widget(&self, id: &str) -> Option<&RenderedWidget> {
        self.widgets.iter().find(|w| w.id == id)
    }
}
