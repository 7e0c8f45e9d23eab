use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{LayoutError, Result};
use crate::logging::{FileSink, LogLevel, Logger};

/// Configuration knobs for a layout-editing session.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width, in columns, of an area created by "add area".
    pub default_area_width: u32,
    /// Height, in rows, of an area created by "add area".
    pub default_area_height: u32,
    /// Column count new areas wrap around when staggered horizontally.
    pub placement_columns: u32,
    /// Target field for editor log events.
    pub log_target: String,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// JSON-lines log file opened when no `logger` is attached.
    pub log_file: Option<PathBuf>,
    /// Size at which `log_file` rotates to `<log_file>.1`. Zero disables rotation.
    pub log_file_max_bytes: u64,
    /// Events below this level are dropped by the file logger.
    pub log_level: LogLevel,
    /// Optional structured logger used by the editor.
    #[serde(skip)]
    pub logger: Option<Logger>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_area_width: 3,
            default_area_height: 2,
            placement_columns: 12,
            log_target: "cavvy::layout.editor".to_string(),
            metrics_target: "cavvy::layout.metrics".to_string(),
            log_file: None,
            log_file_max_bytes: 1024 * 1024,
            log_level: LogLevel::Info,
            logger: None,
        }
    }
}

impl EditorConfig {
    /// Read overrides from JSON; absent keys keep their defaults.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_area_width == 0 || self.default_area_height == 0 {
            return Err(LayoutError::Config("default area size must be at least 1x1"));
        }
        if self.placement_columns == 0 {
            return Err(LayoutError::Config("placement_columns must be non-zero"));
        }
        Ok(())
    }

    /// The attached logger, or a file logger when `log_file` is set.
    pub fn resolve_logger(&self) -> Result<Option<Logger>> {
        if let Some(logger) = self.logger.as_ref() {
            return Ok(Some(logger.clone()));
        }
        match self.log_file.as_ref() {
            Some(path) => {
                let sink = FileSink::new(path, self.log_file_max_bytes)?;
                Ok(Some(Logger::new(sink).with_min_level(self.log_level)))
            }
            None => Ok(None),
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_default_area(mut self, width: u32, height: u32) -> Self {
        self.default_area_width = width;
        self.default_area_height = height;
        self
    }

    pub fn with_placement_columns(mut self, columns: u32) -> Self {
        self.placement_columns = columns;
        self
    }
}
