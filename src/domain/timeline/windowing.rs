use serde::Serialize;

use crate::domain::errors::{AppError, AppResult};

/// Upper bound for chunks visible at once.
pub const MAX_AMOUNT: u32 = 64;
/// Upper bound for chunks buffered on each side.
pub const MAX_TOLERANCE: u32 = 64;
/// Indices must stay within `-INDEX_LIMIT..=INDEX_LIMIT`.
pub const INDEX_LIMIT: i64 = 1_000_000;

/// Static configuration of the index window.
///
/// Indices are signed and relative to the anchor chunk; `item_width` is the
/// pixel width of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VirtualizerSettings {
    pub item_width: f64,
    pub amount: u32,
    pub tolerance: u32,
    pub min_index: i64,
    pub max_index: i64,
    pub start_index: i64,
}

impl Default for VirtualizerSettings {
    fn default() -> Self {
        Self {
            item_width: 800.0,
            amount: 3,
            tolerance: 1,
            min_index: -100,
            max_index: 100,
            start_index: 0,
        }
    }
}

impl VirtualizerSettings {
    pub fn validate(&self) -> AppResult<()> {
        if !self.item_width.is_finite() || self.item_width <= 0.0 {
            return Err(AppError::ValidationError(format!(
                "item width must be positive, got {}",
                self.item_width
            )));
        }
        if !(1..=MAX_AMOUNT).contains(&self.amount) {
            return Err(AppError::ValidationError(format!(
                "amount must be within [1, {}], got {}",
                MAX_AMOUNT, self.amount
            )));
        }
        if self.tolerance > MAX_TOLERANCE {
            return Err(AppError::ValidationError(format!(
                "tolerance must be at most {}, got {}",
                MAX_TOLERANCE, self.tolerance
            )));
        }
        for (name, index) in [("min", self.min_index), ("max", self.max_index)] {
            if !(-INDEX_LIMIT..=INDEX_LIMIT).contains(&index) {
                return Err(AppError::ValidationError(format!(
                    "{} index {} outside [-{}, {}]",
                    name, index, INDEX_LIMIT, INDEX_LIMIT
                )));
            }
        }
        if self.min_index > self.max_index {
            return Err(AppError::ValidationError(format!(
                "min index {} exceeds max index {}",
                self.min_index, self.max_index
            )));
        }
        if !(self.min_index..=self.max_index).contains(&self.start_index) {
            return Err(AppError::ValidationError(format!(
                "start index {} outside [{}, {}]",
                self.start_index, self.min_index, self.max_index
            )));
        }
        Ok(())
    }

    pub fn item_count(&self) -> i64 {
        self.max_index - self.min_index + 1
    }

    pub fn buffered_items(&self) -> usize {
        self.amount as usize + 2 * self.tolerance as usize
    }

    pub fn viewport_width(&self) -> f64 {
        self.amount as f64 * self.item_width
    }

    pub fn total_width(&self) -> f64 {
        self.item_count() as f64 * self.item_width
    }

    pub fn tolerance_width(&self) -> f64 {
        self.tolerance as f64 * self.item_width
    }

    pub fn initial_left_padding(&self) -> f64 {
        let items_before = self.start_index - self.tolerance as i64 - self.min_index;
        (items_before as f64 * self.item_width).max(0.0)
    }

    /// Scroll offset at which `start_index` sits at the viewport's left edge.
    pub fn initial_position(&self) -> f64 {
        (self.start_index - self.min_index) as f64 * self.item_width
    }

    pub fn max_scroll(&self) -> f64 {
        (self.total_width() - self.viewport_width()).max(0.0)
    }

    pub fn clamp_scroll(&self, scroll_offset: f64) -> f64 {
        if scroll_offset.is_finite() {
            scroll_offset.clamp(0.0, self.total_width())
        } else {
            0.0
        }
    }
}

/// Derived window: paddings around the rendered indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowState {
    pub left_padding: f64,
    pub right_padding: f64,
    pub indices: Vec<i64>,
}

impl WindowState {
    pub fn first(&self) -> Option<i64> {
        self.indices.first().copied()
    }

    pub fn last(&self) -> Option<i64> {
        self.indices.last().copied()
    }

    pub fn rendered_width(&self, settings: &VirtualizerSettings) -> f64 {
        self.indices.len() as f64 * settings.item_width
    }
}

/// First buffered index for a scroll offset (tolerance included, unclamped).
pub fn first_index(settings: &VirtualizerSettings, scroll_offset: f64) -> i64 {
    let scroll = settings.clamp_scroll(scroll_offset);
    settings.min_index + ((scroll - settings.tolerance_width()) / settings.item_width).floor() as i64
}

/// Contiguous indices buffered from `index`, clamped to the settings bounds.
pub fn visible_indices(settings: &VirtualizerSettings, index: i64) -> Vec<i64> {
    let start = index.max(settings.min_index);
    let end = index
        .saturating_add(settings.buffered_items() as i64 - 1)
        .min(settings.max_index);
    if start > end {
        return Vec::new();
    }
    (start..=end).collect()
}

/// Index of the chunk at the viewport's left edge.
pub fn viewport_index(settings: &VirtualizerSettings, scroll_offset: f64) -> i64 {
    let scroll = settings.clamp_scroll(scroll_offset);
    let index = settings.min_index + (scroll / settings.item_width).floor() as i64;
    index.clamp(settings.min_index, settings.max_index)
}

/// Pure window computation for a scroll offset.
pub fn compute_window(settings: &VirtualizerSettings, scroll_offset: f64) -> WindowState {
    let total = settings.total_width();
    let index = first_index(settings, scroll_offset);
    let indices = visible_indices(settings, index);
    let rendered = indices.len() as f64 * settings.item_width;

    let left_padding = ((index - settings.min_index) as f64 * settings.item_width)
        .max(0.0)
        .min((total - rendered).max(0.0));
    let right_padding = (total - left_padding - rendered).max(0.0);

    WindowState { left_padding, right_padding, indices }
}

/// Window at the initial scroll position.
pub fn initial_window(settings: &VirtualizerSettings) -> WindowState {
    compute_window(settings, settings.initial_position())
}
