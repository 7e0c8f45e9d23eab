use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated by a [`crate::editor::LayoutEditor`] session.
#[derive(Debug, Default, Clone)]
pub struct EditorMetrics {
    loads: u64,
    parse_failures: u64,
    widget_updates: u64,
    clamped_items: u64,
    areas_added: u64,
    areas_removed: u64,
    derivations: u64,
}

impl EditorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_load(&mut self) {
        self.loads = self.loads.saturating_add(1);
    }

    pub fn record_parse_failure(&mut self) {
        self.parse_failures = self.parse_failures.saturating_add(1);
    }

    pub fn record_widget_update(&mut self, clamped: usize) {
        self.widget_updates = self.widget_updates.saturating_add(1);
        if clamped > 0 {
            self.clamped_items = self.clamped_items.saturating_add(clamped as u64);
        }
    }

    pub fn record_area_added(&mut self) {
        self.areas_added = self.areas_added.saturating_add(1);
    }

    pub fn record_area_removed(&mut self) {
        self.areas_removed = self.areas_removed.saturating_add(1);
    }

    pub fn record_derivation(&mut self) {
        self.derivations = self.derivations.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            loads: self.loads,
            parse_failures: self.parse_failures,
            widget_updates: self.widget_updates,
            clamped_items: self.clamped_items,
            areas_added: self.areas_added,
            areas_removed: self.areas_removed,
            derivations: self.derivations,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub loads: u64,
    pub parse_failures: u64,
    pub widget_updates: u64,
    pub clamped_items: u64,
    pub areas_added: u64,
    pub areas_removed: u64,
    pub derivations: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "editor_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("loads".to_string(), json!(self.loads));
        map.insert("parse_failures".to_string(), json!(self.parse_failures));
        map.insert("widget_updates".to_string(), json!(self.widget_updates));
        map.insert("clamped_items".to_string(), json!(self.clamped_items));
        map.insert("areas_added".to_string(), json!(self.areas_added));
        map.insert("areas_removed".to_string(), json!(self.areas_removed));
        map.insert("derivations".to_string(), json!(self.derivations));
        map
    }
}
