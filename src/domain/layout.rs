// Layout domain model
use serde::{Deserialize, Serialize};

use super::widget::{Position, StoredWidget, WidgetInstance, WidgetKind, WidgetType};

/// Ordered widget instances of one page. Order is render order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent, bound = "K: WidgetKind")]
pub struct Layout<K> {
    widgets: Vec<WidgetInstance<K>>,
}

impl<K: WidgetKind> Default for Layout<K> {
    fn default() -> Self {
        Self {
            widgets: Vec::new(),
        }
    }
}

impl<K: WidgetKind> Layout<K> {
    pub fn new(widgets: Vec<WidgetInstance<K>>) -> Self {
        Self { widgets }
    }

    pub fn widgets(&self) -> &[WidgetInstance<K>] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WidgetInstance<K>> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Position handed to the next appended widget
    pub fn next_position(&self) -> Position {
        Position::new(0, self.widgets.len() as i64)
    }

    /// Appends a widget at the end of the layout. The caller supplies a fresh id.
    pub fn append(&mut self, id: String, widget_type: WidgetType<K>) -> WidgetInstance<K> {
        let widget = WidgetInstance {
            id,
            widget_type,
            position: self.next_position(),
        };
        self.widgets.push(widget.clone());
        widget
    }

    pub fn remove(&mut self, id: &str) -> Option<WidgetInstance<K>> {
        let index = self.widgets.iter().position(|w| w.id == id)?;
        Some(self.widgets.remove(index))
    }

    pub fn to_stored(&self) -> Vec<StoredWidget> {
        self.widgets.iter().map(WidgetInstance::to_stored).collect()
    }

    pub fn from_stored(stored: &[StoredWidget]) -> Self {
        let widgets = stored
            .iter()
            .map(|s| WidgetInstance {
                id: s.id.clone(),
                widget_type: WidgetType::parse(&s.widget_type),
                position: Position::new(s.x, s.y),
            })
            .collect();
        Self { widgets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::DashboardWidgetType;

    #[test]
    fn test_append_and_remove_restores_layout() {
        let mut layout: Layout<DashboardWidgetType> = Layout::new(vec![
            WidgetInstance::new("1", DashboardWidgetType::Clock, Position::new(0, 0)),
            WidgetInstance::new("2", DashboardWidgetType::Modules, Position::new(0, 1)),
        ]);
        let before = layout.clone();

        let added = layout.append("3".to_string(), DashboardWidgetType::QuickNote.into());
        assert_eq!(added.position, Position::new(0, 2));
        assert_eq!(layout.len(), 3);

        layout.remove("3");
        assert_eq!(layout, before);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut layout: Layout<DashboardWidgetType> = Layout::default();
        assert!(layout.remove("nope").is_none());
        assert!(layout.is_empty());
    }

    #[test]
    fn test_stored_round_trip_keeps_unknown_types() {
        let stored = vec![StoredWidget {
            id: "a".to_string(),
            widget_type: "retired_widget".to_string(),
            x: 1,
            y: 0,
        }];
        let layout: Layout<DashboardWidgetType> = Layout::from_stored(&stored);
        assert_eq!(layout.to_stored(), stored);
    }
}
