use std::sync::Arc;

use blake3::{Hash, Hasher};
use serde_json::Value;

use crate::canvas::{CanvasLayout, CanvasSection, CanvasType};
use crate::error::{LayoutError, Result};
use crate::layout::{CssGrid, GridItem, bottom_edge, grid_items_to_css};
use crate::logging::{LogLevel, event_with_fields, json_kv, json_str};
use crate::metrics::{EditorMetrics, MetricSnapshot};

use super::config::EditorConfig;

/// Receives every re-derived layout. This is the editor's change callback.
pub trait LayoutObserver: Send + Sync {
    fn layout_changed(&self, grid: &CssGrid);
}

/// Default no-op implementation used when nobody listens.
#[derive(Debug, Default)]
pub struct NullLayoutObserver;

impl LayoutObserver for NullLayoutObserver {
    fn layout_changed(&self, _grid: &CssGrid) {}
}

/// A section together with the grid item that places it.
///
/// Keeping both in one record means add/delete can never shift one list
/// without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSlot {
    pub section: CanvasSection,
    pub item: GridItem,
}

/// Edit session for one canvas layout.
///
/// Load a persisted layout, feed widget updates and add/delete requests,
/// then read back the derived [`CanvasLayout`]. Failed loads leave the
/// previous state in place.
pub struct LayoutEditor {
    config: EditorConfig,
    slots: Vec<SectionSlot>,
    layout: CanvasLayout,
    next_id: u64,
    saved: Hash,
    observer: Arc<dyn LayoutObserver>,
    metrics: EditorMetrics,
}

impl LayoutEditor {
    /// Build a session. A `log_file` in `config` is opened here.
    pub fn new(mut config: EditorConfig) -> Result<Self> {
        config.validate()?;
        config.logger = config.resolve_logger()?;
        let mut editor = Self {
            config,
            slots: Vec::new(),
            layout: CanvasLayout::default(),
            next_id: 0,
            saved: Hasher::new().finalize(),
            observer: Arc::new(NullLayoutObserver),
            metrics: EditorMetrics::new(),
        };
        editor.saved = editor.fingerprint();
        Ok(editor)
    }

    pub fn with_observer(mut self, observer: Arc<dyn LayoutObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the session state with a persisted layout.
    ///
    /// `sections[i]` is paired with `layout.areas[i]`. On any error the
    /// current state is kept and the failure is logged.
    pub fn load(&mut self, sections: Vec<CanvasSection>, layout: &CanvasLayout) -> Result<()> {
        let items = match layout.to_items() {
            Ok(items) => items,
            Err(err) => {
                self.metrics.record_parse_failure();
                self.emit(
                    LogLevel::Error,
                    "layout_parse_failed",
                    [
                        json_str("error", err.to_string()),
                        json_kv("areas", layout.areas.len()),
                    ],
                );
                return Err(err.into());
            }
        };

        if items.len() != sections.len() {
            self.emit(
                LogLevel::Error,
                "layout_section_mismatch",
                [
                    json_kv("areas", items.len()),
                    json_kv("sections", sections.len()),
                ],
            );
            return Err(LayoutError::SectionMismatch {
                areas: items.len(),
                sections: sections.len(),
            });
        }

        self.next_id = items.len() as u64;
        self.slots = sections
            .into_iter()
            .zip(items)
            .map(|(section, item)| SectionSlot { section, item })
            .collect();
        self.layout = layout.clone();
        self.saved = self.fingerprint();
        self.metrics.record_load();
        self.emit(
            LogLevel::Debug,
            "layout_loaded",
            [json_kv("areas", self.slots.len())],
        );
        Ok(())
    }

    pub fn load_canvas(&mut self, canvas: &CanvasType) -> Result<()> {
        self.load(canvas.sections.clone(), &canvas.layout)
    }

    pub fn slots(&self) -> &[SectionSlot] {
        &self.slots
    }

    pub fn items(&self) -> Vec<GridItem> {
        self.slots.iter().map(|slot| slot.item.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Last derived (or loaded) layout record.
    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.item.id == id)
    }

    /// Apply a full layout emitted by the drag/resize widget.
    ///
    /// Items are matched to sections by id, so the widget may reorder them.
    /// Zero widths and heights are raised to one. The update is all or
    /// nothing: an unknown or repeated id leaves state untouched.
    pub fn apply_widget_layout(&mut self, items: Vec<GridItem>) -> Result<CssGrid> {
        if items.len() != self.slots.len() {
            self.emit(
                LogLevel::Warn,
                "widget_update_rejected",
                [
                    json_kv("items", items.len()),
                    json_kv("sections", self.slots.len()),
                ],
            );
            return Err(LayoutError::SectionMismatch {
                areas: items.len(),
                sections: self.slots.len(),
            });
        }

        let mut placed: Vec<Option<GridItem>> = vec![None; self.slots.len()];
        let mut clamped = 0usize;
        for item in items {
            let index = self
                .position(&item.id)
                .ok_or_else(|| LayoutError::UnknownItem(item.id.clone()))?;
            if placed[index].is_some() {
                return Err(LayoutError::DuplicateItem(item.id));
            }
            if item.is_degenerate() {
                clamped += 1;
            }
            placed[index] = Some(item.clamped());
        }

        for (slot, item) in self.slots.iter_mut().zip(placed) {
            if let Some(item) = item {
                slot.item = item;
            }
        }

        self.metrics.record_widget_update(clamped);
        if clamped > 0 {
            self.emit(
                LogLevel::Warn,
                "widget_items_clamped",
                [json_kv("count", clamped)],
            );
        }
        Ok(self.derive())
    }

    /// Append a section in a new default-sized area at the bottom of the grid.
    pub fn add_area(&mut self, section: CanvasSection) -> CssGrid {
        let count = self.slots.len() as u32;
        let w = self.config.default_area_width;
        let h = self.config.default_area_height;
        let x = w
            .saturating_mul(count)
            .checked_rem(self.config.placement_columns)
            .unwrap_or(0);
        let y = bottom_edge(self.slots.iter().map(|slot| &slot.item));

        let id = self.next_id.to_string();
        self.next_id += 1;

        self.emit(
            LogLevel::Debug,
            "area_added",
            [
                json_str("id", id.as_str()),
                json_str("section", section.name.as_str()),
                json_kv("x", x),
                json_kv("y", y),
            ],
        );
        self.slots.push(SectionSlot {
            section,
            item: GridItem::new(id, x, y, w, h),
        });
        self.metrics.record_area_added();
        self.derive()
    }

    /// Remove the section and area at `index`.
    pub fn delete_area(&mut self, index: usize) -> Result<CssGrid> {
        if index >= self.slots.len() {
            return Err(LayoutError::AreaIndex {
                index,
                len: self.slots.len(),
            });
        }

        let removed = self.slots.remove(index);
        self.metrics.record_area_removed();
        self.emit(
            LogLevel::Debug,
            "area_removed",
            [
                json_str("id", removed.item.id),
                json_str("section", removed.section.name),
            ],
        );
        Ok(self.derive())
    }

    pub fn delete_item(&mut self, id: &str) -> Result<CssGrid> {
        let index = self
            .position(id)
            .ok_or_else(|| LayoutError::UnknownItem(id.to_string()))?;
        self.delete_area(index)
    }

    /// True when the layout or section list differs from the last load/save.
    pub fn is_dirty(&self) -> bool {
        self.fingerprint() != self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved = self.fingerprint();
        self.emit(
            LogLevel::Info,
            "layout_saved",
            [json_kv("areas", self.slots.len())],
        );
    }

    pub fn to_canvas_layout(&self) -> CanvasLayout {
        self.layout.clone()
    }

    /// Write the edited sections and layout back into `canvas`.
    pub fn apply_to(&self, canvas: &mut CanvasType) {
        canvas.sections = self.slots.iter().map(|slot| slot.section.clone()).collect();
        canvas.layout = self.layout.clone();
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.metrics.snapshot()
    }

    pub fn log_metrics(&self) {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = self.metrics.snapshot().to_log_event(&self.config.metrics_target);
            let _ = logger.log_event(event);
        }
    }

    fn derive(&mut self) -> CssGrid {
        let grid = grid_items_to_css(&self.items());
        self.layout = CanvasLayout::from(grid.clone());
        self.metrics.record_derivation();
        self.observer.layout_changed(&grid);
        self.emit(
            LogLevel::Trace,
            "layout_derived",
            [
                json_kv("areas", grid.areas.len()),
                json_str("cols", grid.cols.as_str()),
                json_str("rows", grid.rows.as_str()),
            ],
        );
        grid
    }

    fn fingerprint(&self) -> Hash {
        let grid = grid_items_to_css(&self.items());
        let mut hasher = Hasher::new();
        for area in &grid.areas {
            hasher.update(area.as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(grid.cols.as_bytes());
        hasher.update(b"|");
        hasher.update(grid.rows.as_bytes());
        for slot in &self.slots {
            hasher.update(b"\0");
            hasher.update(slot.section.name.as_bytes());
        }
        hasher.finalize()
    }

    fn emit(&self, level: LogLevel, message: &str, fields: impl IntoIterator<Item = (String, Value)>) {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{Logger, MemorySink};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        seen: Mutex<Vec<CssGrid>>,
    }

    impl LayoutObserver for RecordingObserver {
        fn layout_changed(&self, grid: &CssGrid) {
            self.seen.lock().unwrap().push(grid.clone());
        }
    }

    fn sections(names: &[&str]) -> Vec<CanvasSection> {
        names.iter().map(|name| CanvasSection::new(*name)).collect()
    }

    fn two_up() -> CanvasLayout {
        CanvasLayout::new(
            "1fr 1fr",
            "auto",
            vec!["1 / 1 / 2 / 2".into(), "1 / 2 / 2 / 3".into()],
        )
    }

    fn editor_with_sink() -> (LayoutEditor, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let config = EditorConfig::default().with_logger(Logger::from_arc(sink.clone()));
        (LayoutEditor::new(config).unwrap(), sink)
    }

    fn loaded() -> LayoutEditor {
        let mut editor = LayoutEditor::new(EditorConfig::default()).unwrap();
        editor
            .load(sections(&["Problem", "Solution"]), &two_up())
            .unwrap();
        editor
    }

    #[test]
    fn load_pairs_sections_with_areas_by_position() {
        let editor = loaded();
        assert_eq!(editor.len(), 2);
        assert_eq!(editor.slots()[0].section.name, "Problem");
        assert_eq!(editor.slots()[0].item, GridItem::new("0", 0, 0, 1, 1));
        assert_eq!(editor.slots()[1].section.name, "Solution");
        assert_eq!(editor.slots()[1].item, GridItem::new("1", 1, 0, 1, 1));
        assert!(!editor.is_dirty());
        assert_eq!(editor.to_canvas_layout(), two_up());
    }

    #[test]
    fn repeat_rows_log_and_keep_previous_state() {
        let (mut editor, sink) = editor_with_sink();
        editor
            .load(sections(&["Problem", "Solution"]), &two_up())
            .unwrap();
        let before = editor.slots().to_vec();

        let bad = CanvasLayout::new("1fr", "repeat(3, 1fr)", vec!["1 / 1 / 2 / 2".into()]);
        let err = editor.load(sections(&["Only"]), &bad).unwrap_err();

        assert!(matches!(err, LayoutError::Grid(_)));
        assert_eq!(editor.slots(), before.as_slice());
        assert_eq!(editor.to_canvas_layout(), two_up());
        assert_eq!(editor.metrics().parse_failures, 1);

        let errors: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|event| event.level == LogLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "layout_parse_failed");
        assert_eq!(errors[0].target, "cavvy::layout.editor");
    }

    #[test]
    fn oversized_layout_fails_load_and_keeps_state() {
        let mut editor = loaded();
        let huge = CanvasLayout::new(
            "4294967295px 1fr",
            "auto",
            vec!["1 / 1 / 2 / 2".into(), "1 / 2 / 2 / 3".into()],
        );
        let err = editor
            .load(sections(&["Problem", "Solution"]), &huge)
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Grid(crate::GridError::GridTooLarge { .. })
        ));
        assert_eq!(editor.to_canvas_layout(), two_up());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn widget_items_at_u32_edge_do_not_panic() {
        let mut editor = loaded();
        let grid = editor
            .apply_widget_layout(vec![
                GridItem::new("0", 0, 0, 1, 1),
                GridItem::new("1", u32::MAX - 1, u32::MAX - 1, u32::MAX, u32::MAX),
            ])
            .unwrap();
        assert_eq!(grid.areas.len(), 2);
        assert!(editor.is_dirty());
        assert!(grid.to_items().is_ok());
    }

    #[test]
    fn load_rejects_section_count_mismatch() {
        let mut editor = loaded();
        let err = editor.load(sections(&["Lonely"]), &two_up()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::SectionMismatch {
                areas: 2,
                sections: 1
            }
        ));
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn widget_update_clamps_and_notifies_observer() {
        let observer = Arc::new(RecordingObserver::default());
        let mut editor = loaded().with_observer(observer.clone());

        let grid = editor
            .apply_widget_layout(vec![
                GridItem::new("0", 0, 0, 2, 0),
                GridItem::new("1", 2, 0, 1, 1),
            ])
            .unwrap();

        assert_eq!(grid.areas, vec!["1 / 1 / 2 / 3", "1 / 3 / 2 / 4"]);
        assert_eq!(grid.cols, "1fr 1fr 1fr");
        assert_eq!(grid.rows, "auto");
        assert_eq!(editor.slots()[0].item.h, 1);
        assert_eq!(editor.metrics().clamped_items, 1);
        assert_eq!(observer.seen.lock().unwrap().as_slice(), &[grid.clone()]);
        assert_eq!(editor.to_canvas_layout(), CanvasLayout::from(grid));
        assert!(editor.is_dirty());
    }

    #[test]
    fn widget_update_matches_items_by_id() {
        let mut editor = loaded();
        editor
            .apply_widget_layout(vec![
                GridItem::new("1", 0, 0, 1, 1),
                GridItem::new("0", 0, 1, 1, 1),
            ])
            .unwrap();
        assert_eq!(editor.slots()[0].section.name, "Problem");
        assert_eq!(editor.slots()[0].item, GridItem::new("0", 0, 1, 1, 1));
        assert_eq!(editor.slots()[1].item, GridItem::new("1", 0, 0, 1, 1));
        assert_eq!(editor.layout().areas, vec!["2 / 1 / 3 / 2", "1 / 1 / 2 / 2"]);
    }

    #[test]
    fn widget_update_rejects_foreign_and_repeated_ids() {
        let mut editor = loaded();
        let before = editor.slots().to_vec();

        let err = editor
            .apply_widget_layout(vec![
                GridItem::new("0", 0, 0, 1, 1),
                GridItem::new("9", 1, 0, 1, 1),
            ])
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownItem(id) if id == "9"));

        let err = editor
            .apply_widget_layout(vec![
                GridItem::new("0", 0, 0, 1, 1),
                GridItem::new("0", 1, 0, 1, 1),
            ])
            .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateItem(id) if id == "0"));

        let err = editor
            .apply_widget_layout(vec![GridItem::new("0", 0, 0, 1, 1)])
            .unwrap_err();
        assert!(matches!(err, LayoutError::SectionMismatch { .. }));

        assert_eq!(editor.slots(), before.as_slice());
    }

    #[test]
    fn add_area_staggers_columns_and_appends_at_bottom() {
        let mut editor = LayoutEditor::new(EditorConfig::default()).unwrap();
        let grid = editor.add_area(CanvasSection::new("Key Partners"));
        assert_eq!(grid.areas, vec!["1 / 1 / 3 / 4"]);
        assert_eq!(grid.cols, "1fr 1fr 1fr");
        assert_eq!(grid.rows, "auto auto");

        editor.add_area(CanvasSection::new("Key Activities"));
        assert_eq!(editor.slots()[1].item, GridItem::new("1", 3, 2, 3, 2));

        for name in ["Key Resources", "Value Propositions", "Channels"] {
            editor.add_area(CanvasSection::new(name));
        }
        // 3 * 4 wraps back to column 0 on a 12-column grid.
        assert_eq!(editor.slots()[4].item.x, 0);
        assert_eq!(editor.slots()[4].item.y, 8);
        assert_eq!(editor.layout().areas.len(), 5);
        assert_eq!(editor.metrics().areas_added, 5);
    }

    #[test]
    fn delete_area_removes_section_and_item_together() {
        let mut editor = loaded();
        editor.add_area(CanvasSection::new("Metrics"));

        let grid = editor.delete_area(1).unwrap();
        let names: Vec<_> = editor
            .slots()
            .iter()
            .map(|slot| slot.section.name.as_str())
            .collect();
        assert_eq!(names, vec!["Problem", "Metrics"]);
        assert_eq!(grid.areas.len(), 2);
        assert_eq!(editor.slots()[1].item.id, "2");
    }

    #[test]
    fn delete_area_out_of_range_is_an_error() {
        let mut editor = loaded();
        let err = editor.delete_area(5).unwrap_err();
        assert!(matches!(err, LayoutError::AreaIndex { index: 5, len: 2 }));
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn ids_stay_unique_after_delete_then_add() {
        let mut editor = loaded();
        editor.delete_item("0").unwrap();
        editor.add_area(CanvasSection::new("Again"));
        let ids: Vec<_> = editor.slots().iter().map(|s| s.item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn deleting_every_area_yields_empty_layout() {
        let mut editor = loaded();
        editor.delete_area(0).unwrap();
        let grid = editor.delete_area(0).unwrap();
        assert!(grid.is_empty());
        assert_eq!(editor.to_canvas_layout(), CanvasLayout::default());
    }

    #[test]
    fn dirty_flag_follows_edits_and_saves() {
        let mut editor = loaded();
        assert!(!editor.is_dirty());

        editor
            .apply_widget_layout(vec![
                GridItem::new("0", 0, 0, 2, 1),
                GridItem::new("1", 2, 0, 1, 1),
            ])
            .unwrap();
        assert!(editor.is_dirty());

        editor.mark_saved();
        assert!(!editor.is_dirty());

        editor
            .apply_widget_layout(vec![
                GridItem::new("0", 0, 0, 1, 1),
                GridItem::new("1", 1, 0, 1, 1),
            ])
            .unwrap();
        assert!(editor.is_dirty());

        // Moving back to the saved geometry clears the flag again.
        editor
            .apply_widget_layout(vec![
                GridItem::new("0", 0, 0, 2, 1),
                GridItem::new("1", 2, 0, 1, 1),
            ])
            .unwrap();
        assert!(!editor.is_dirty());
    }

    #[test]
    fn apply_to_writes_sections_and_layout() {
        let mut canvas = CanvasType {
            id: "lean".into(),
            name: "Lean Canvas".into(),
            description: String::new(),
            sections: sections(&["Problem", "Solution"]),
            layout: two_up(),
        };
        let mut editor = LayoutEditor::new(EditorConfig::default()).unwrap();
        editor.load_canvas(&canvas).unwrap();
        editor.add_area(CanvasSection::new("Unfair Advantage"));
        editor.apply_to(&mut canvas);

        assert_eq!(canvas.sections.len(), 3);
        assert!(canvas.check_alignment().is_ok());
        // Third area staggers to column 6 and lands below the first row.
        assert_eq!(canvas.layout.areas[2], "2 / 7 / 4 / 10");
    }

    #[test]
    fn log_metrics_emits_snapshot() {
        let (mut editor, sink) = editor_with_sink();
        editor.add_area(CanvasSection::new("Solo"));
        editor.log_metrics();

        let events = sink.events();
        let snapshot = events
            .iter()
            .find(|event| event.message == "editor_metrics")
            .unwrap();
        assert_eq!(snapshot.target, "cavvy::layout.metrics");
        assert_eq!(snapshot.fields["areas_added"], 1);
    }

    #[test]
    fn log_file_config_writes_editor_events() {
        let mut path = std::env::temp_dir();
        path.push(format!("cavvy-editor-{}.log", std::process::id()));
        std::fs::remove_file(&path).ok();

        let config = EditorConfig::default().with_log_file(&path);
        let mut editor = LayoutEditor::new(config).unwrap();
        editor.add_area(CanvasSection::new("Solo"));
        editor.mark_saved();

        let contents = std::fs::read_to_string(&path).unwrap();
        // Default level is info: the debug-level add is filtered out.
        assert!(!contents.contains("area_added"));
        assert!(contents.contains("\"message\":\"layout_saved\""));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unopenable_log_file_fails_construction() {
        let config = EditorConfig::default().with_log_file("/nonexistent-dir/cavvy/editor.log");
        assert!(matches!(
            LayoutEditor::new(config),
            Err(LayoutError::Logging(_))
        ));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EditorConfig::default().with_placement_columns(0);
        assert!(matches!(
            LayoutEditor::new(config),
            Err(LayoutError::Config(_))
        ));
    }
}
