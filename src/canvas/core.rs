use serde::{Deserialize, Serialize};

use crate::error::{GridError, LayoutError, Result};
use crate::layout::{CssGrid, GridItem, css_to_grid_items};

/// Track strings of a persisted layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTemplate {
    pub columns: String,
    pub rows: String,
}

/// Persisted layout record: `{ gridTemplate: { columns, rows }, areas }`.
///
/// `areas[i]` belongs to section `i` of the owning canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasLayout {
    pub grid_template: GridTemplate,
    #[serde(default)]
    pub areas: Vec<String>,
}

impl CanvasLayout {
    pub fn new(columns: impl Into<String>, rows: impl Into<String>, areas: Vec<String>) -> Self {
        Self {
            grid_template: GridTemplate {
                columns: columns.into(),
                rows: rows.into(),
            },
            areas,
        }
    }

    pub fn to_items(&self) -> std::result::Result<Vec<GridItem>, GridError> {
        css_to_grid_items(
            &self.areas,
            &self.grid_template.columns,
            &self.grid_template.rows,
        )
    }

    pub fn to_css(&self) -> CssGrid {
        CssGrid {
            areas: self.areas.clone(),
            cols: self.grid_template.columns.clone(),
            rows: self.grid_template.rows.clone(),
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<CssGrid> for CanvasLayout {
    fn from(grid: CssGrid) -> Self {
        Self::new(grid.cols, grid.rows, grid.areas)
    }
}

/// Named content block placed into one grid area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSection {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub placeholder: String,
}

impl CanvasSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

/// A canvas template: ordered sections plus the layout that places them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sections: Vec<CanvasSection>,
    pub layout: CanvasLayout,
}

impl CanvasType {
    /// Fails when the area list and the section list have drifted apart.
    pub fn check_alignment(&self) -> Result<()> {
        if self.layout.areas.len() != self.sections.len() {
            return Err(LayoutError::SectionMismatch {
                areas: self.layout.areas.len(),
                sections: self.sections.len(),
            });
        }
        Ok(())
    }

    /// Deserialize and verify areas/sections alignment.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let canvas: CanvasType = serde_json::from_str(input)?;
        canvas.check_alignment()?;
        Ok(canvas)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
