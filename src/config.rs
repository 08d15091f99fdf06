use serde::{Deserialize, Serialize};

use crate::domain::errors::{AppError, AppResult};
use crate::domain::timeline::{ChunkInterval, DEFAULT_DEBOUNCE_MS, VirtualizerSettings};

/// Timeline configuration, usually passed from JS as JSON.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Chunks visible at once.
    pub amount: u32,
    /// Extra chunks buffered per side.
    pub tolerance: u32,
    pub min_index: i64,
    pub max_index: i64,
    pub start_index: i64,
    pub interval: ChunkInterval,
    pub debounce_ms: u64,
    /// Horizontal position of the "current" marker, as a fraction of the viewport.
    pub marker_ratio: f64,
    /// Initial anchor; the current time when absent.
    pub anchor_ms: Option<u64>,
    /// Fallback width used until the container is measured.
    pub viewport_width: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            amount: 3,
            tolerance: 1,
            min_index: -100,
            max_index: 100,
            start_index: 0,
            interval: ChunkInterval::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            marker_ratio: 0.5,
            anchor_ms: None,
            viewport_width: 2400.0,
        }
    }
}

impl TimelineConfig {
    pub fn from_json(json: &str) -> AppResult<Self> {
        let trimmed = json.trim();
        let config: Self = if trimmed.is_empty() { Self::default() } else { serde_json::from_str(trimmed)? };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.marker_ratio) {
            return Err(AppError::ConfigError(format!(
                "markerRatio must be within [0, 1], got {}",
                self.marker_ratio
            )));
        }
        self.settings(self.viewport_width)?;
        Ok(())
    }

    /// Virtualizer settings for a measured container width.
    pub fn settings(&self, viewport_width: f64) -> AppResult<VirtualizerSettings> {
        if self.amount == 0 {
            return Err(AppError::ConfigError("amount must be at least 1".to_string()));
        }
        let settings = VirtualizerSettings {
            item_width: viewport_width / self.amount as f64,
            amount: self.amount,
            tolerance: self.tolerance,
            min_index: self.min_index,
            max_index: self.max_index,
            start_index: self.start_index,
        };
        settings.validate()?;
        Ok(settings)
    }
}
