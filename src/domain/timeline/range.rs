use super::value_objects::{TimeRange, Timestamp};
use crate::domain::errors::{AppError, AppResult};

/// Geometry of one rendered chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkRect {
    pub left: f64,
    pub width: f64,
    pub from: Timestamp,
    pub to: Timestamp,
}

impl ChunkRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn contains_x(&self, x: f64) -> bool {
        self.left <= x && x < self.right()
    }

    /// Linear pixel-to-time mapping inside the chunk.
    pub fn timestamp_at(&self, x: f64) -> Option<Timestamp> {
        if self.width <= 0.0 || !self.width.is_finite() {
            return None;
        }
        let ratio = ((x - self.left) / self.width).clamp(0.0, 1.0);
        let span = self.to.value().saturating_sub(self.from.value()) as f64;
        Some(Timestamp::from_millis(self.from.value() + (span * ratio).round() as u64))
    }
}

/// Range of one chunk duration centred on the time under `marker_x`.
pub fn range_under_marker(rects: &[ChunkRect], marker_x: f64) -> Option<TimeRange> {
    let rect = rects.iter().find(|rect| rect.contains_x(marker_x))?;
    let center = rect.timestamp_at(marker_x)?;
    let span = rect.to.value().saturating_sub(rect.from.value());
    Some(centered_range(center, span))
}

pub(crate) fn centered_range(center: Timestamp, span_ms: u64) -> TimeRange {
    let half = span_ms / 2;
    let from = Timestamp::from_millis(center.value().saturating_sub(half));
    TimeRange::new(from, Timestamp::from_millis(from.value() + span_ms))
}

/// Parse the `data-from` / `data-to` attribute pair of a chunk element.
pub fn parse_chunk_bounds(from: &str, to: &str) -> AppResult<(Timestamp, Timestamp)> {
    let parse = |name: &str, value: &str| {
        value
            .trim()
            .parse::<u64>()
            .map(Timestamp::from_millis)
            .map_err(|e| AppError::DomError(format!("invalid {} attribute {:?}: {}", name, value, e)))
    };
    let from = parse("data-from", from)?;
    let to = parse("data-to", to)?;
    if to < from {
        return Err(AppError::DomError(format!("chunk ends before it starts: {} > {}", from, to)));
    }
    Ok((from, to))
}
