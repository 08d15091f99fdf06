use std::rc::Rc;

use super::chunk::{Chunk, ChunkCache, ChunkSource};
use super::range::{ChunkRect, centered_range};
use super::value_objects::{ChunkInterval, TimeRange, Timestamp};
use super::windowing::{self, VirtualizerSettings, WindowState};
use crate::domain::errors::AppResult;
use crate::domain::logging::LogComponent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { origin_x: f64, origin_scroll: f64 },
}

/// When chunk data is requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkLoading {
    /// Inside every call that moves the window.
    #[default]
    Eager,
    /// Only when the caller asks via [`TimelineVirtualizer::take_pending`]
    /// or [`TimelineVirtualizer::load_pending`].
    Deferred,
}

/// Result of feeding a scroll position into the virtualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Same offset as the previous event.
    Unchanged,
    Moved,
    /// Left extreme hit: anchor moved back, scroll reset.
    StartReached,
    /// Right extreme hit: anchor moved forward, scroll reset.
    EndReached,
}

impl ScrollOutcome {
    pub fn reanchored(&self) -> bool {
        matches!(self, Self::StartReached | Self::EndReached)
    }
}

/// Sliding window of chunks over an unbounded time axis.
///
/// The window only ever covers `min_index..=max_index` around the anchor;
/// hitting either scroll extreme moves the anchor and resets the scroll
/// position, which keeps the visible content in place.
pub struct TimelineVirtualizer<D, S> {
    settings: VirtualizerSettings,
    interval: ChunkInterval,
    anchor: Timestamp,
    scroll_left: f64,
    last_scroll: Option<f64>,
    window: WindowState,
    cache: ChunkCache<D>,
    drag: DragState,
    loading: ChunkLoading,
    source: Rc<S>,
}

impl<D, S> TimelineVirtualizer<D, S>
where
    S: ChunkSource<D>,
{
    pub fn new(settings: VirtualizerSettings, interval: ChunkInterval, anchor: Timestamp, source: S) -> AppResult<Self> {
        settings.validate()?;
        let mut virtualizer = Self {
            settings,
            interval,
            anchor: clamp_anchor(&settings, interval, anchor),
            scroll_left: settings.initial_position(),
            last_scroll: None,
            window: windowing::initial_window(&settings),
            cache: ChunkCache::new(settings.buffered_items()),
            drag: DragState::Idle,
            loading: ChunkLoading::Eager,
            source: Rc::new(source),
        };
        virtualizer.reset();
        Ok(virtualizer)
    }

    pub fn settings(&self) -> &VirtualizerSettings {
        &self.settings
    }

    pub fn interval(&self) -> ChunkInterval {
        self.interval
    }

    pub fn anchor(&self) -> Timestamp {
        self.anchor
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn window(&self) -> &WindowState {
        &self.window
    }

    pub fn chunks(&self) -> &[Chunk<D>] {
        self.cache.chunks()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Shared handle to the source, for loading chunks outside a borrow of `self`.
    pub fn source_handle(&self) -> Rc<S> {
        Rc::clone(&self.source)
    }

    pub fn chunk_loading(&self) -> ChunkLoading {
        self.loading
    }

    pub fn set_chunk_loading(&mut self, loading: ChunkLoading) {
        self.loading = loading;
        if loading == ChunkLoading::Eager {
            self.load_pending();
        }
    }

    pub fn pending_chunks(&self) -> usize {
        self.cache.pending_len()
    }

    /// Indices of the buffered chunks that still wait for data; they are
    /// no longer pending afterwards.
    pub fn take_pending(&mut self) -> Vec<i64> {
        self.cache.take_pending(self.anchor, self.interval)
    }

    /// Store a chunk loaded for one of the indices from [`take_pending`](Self::take_pending).
    /// Chunks that left the window in the meantime are dropped.
    pub fn fill_chunk(&mut self, chunk: Chunk<D>) -> bool {
        self.cache.fill(chunk)
    }

    /// Load every pending chunk from the source right away.
    pub fn load_pending(&mut self) -> usize {
        self.cache.load(self.anchor, self.interval, &*self.source)
    }

    /// Feed a scroll position (programmatic or user driven).
    pub fn scroll_to(&mut self, offset: f64) -> ScrollOutcome {
        let raw = if offset.is_finite() { offset } else { 0.0 };
        if self.last_scroll == Some(raw) {
            return ScrollOutcome::Unchanged;
        }
        self.last_scroll = Some(raw);

        let max_scroll = self.settings.max_scroll();
        let scroll = raw.clamp(0.0, max_scroll);

        let at_start = scroll <= 0.0;
        if max_scroll > 0.0 && (at_start || scroll >= max_scroll) && self.reanchor(scroll) {
            return if at_start { ScrollOutcome::StartReached } else { ScrollOutcome::EndReached };
        }

        self.scroll_left = scroll;
        self.refresh();
        ScrollOutcome::Moved
    }

    /// Wheel handling: relative scroll.
    pub fn scroll_by(&mut self, delta: f64) -> ScrollOutcome {
        if delta == 0.0 || !delta.is_finite() {
            return ScrollOutcome::Unchanged;
        }
        self.scroll_to(self.scroll_left + delta)
    }

    pub fn begin_drag(&mut self, client_x: f64) {
        self.drag = DragState::Dragging { origin_x: client_x, origin_scroll: self.scroll_left };
    }

    pub fn drag_to(&mut self, client_x: f64) -> ScrollOutcome {
        match self.drag {
            DragState::Dragging { origin_x, origin_scroll } => self.scroll_to(origin_scroll - (client_x - origin_x)),
            DragState::Idle => ScrollOutcome::Unchanged,
        }
    }

    /// Returns whether a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = DragState::Idle;
        was_dragging
    }

    /// Switch chunk duration; regenerates every chunk.
    pub fn set_interval(&mut self, interval: ChunkInterval) -> bool {
        if interval == self.interval {
            return false;
        }
        self.rebase_to_viewport();
        self.interval = interval;
        self.anchor = clamp_anchor(&self.settings, interval, self.anchor);
        self.cache.clear();
        self.reset();
        crate::log_debug!(LogComponent::Domain("Virtualizer"), "interval -> {}, anchor {}", interval, self.anchor);
        true
    }

    /// Recompute item width from the container width.
    pub fn resize(&mut self, viewport_width: f64) -> bool {
        if !viewport_width.is_finite() || viewport_width <= 0.0 {
            return false;
        }
        let item_width = viewport_width / self.settings.amount as f64;
        if item_width == self.settings.item_width {
            return false;
        }
        self.rebase_to_viewport();
        self.settings.item_width = item_width;
        self.reset();
        true
    }

    /// Put `anchor` at the start index; anchors too close to either end of
    /// the time axis are pulled in so every index maps to its own chunk.
    pub fn set_anchor(&mut self, anchor: Timestamp) {
        self.anchor = clamp_anchor(&self.settings, self.interval, anchor);
        self.reset();
    }

    /// Range under a marker placed at `marker_ratio` of the viewport width,
    /// derived from the model geometry.
    pub fn viewport_range(&self, marker_ratio: f64) -> TimeRange {
        let marker_px = self.scroll_left + marker_ratio.clamp(0.0, 1.0) * self.settings.viewport_width();
        let index = self.settings.min_index as f64 + marker_px / self.settings.item_width;
        let interval_ms = self.interval.duration_ms();
        let offset = (index * interval_ms as f64).round() as i64;
        centered_range(self.anchor.offset(offset), interval_ms)
    }

    /// Viewport-relative geometry of the buffered chunks.
    pub fn chunk_rects(&self) -> Vec<ChunkRect> {
        let width = self.settings.item_width;
        let origin = self.window.left_padding - self.scroll_left;
        self.cache
            .chunks()
            .iter()
            .enumerate()
            .map(|(i, chunk)| ChunkRect {
                left: origin + i as f64 * width,
                width,
                from: chunk.from,
                to: chunk.to,
            })
            .collect()
    }

    /// Returns false when the anchor could not move.
    fn reanchor(&mut self, scroll: f64) -> bool {
        let index = windowing::viewport_index(&self.settings, scroll);
        let shifted = self.shift_anchor(index - self.settings.start_index);
        if shifted == 0 {
            return false;
        }

        let new_scroll = scroll - shifted as f64 * self.settings.item_width;
        if let DragState::Dragging { origin_x, origin_scroll } = self.drag {
            self.drag = DragState::Dragging { origin_x, origin_scroll: origin_scroll + (new_scroll - scroll) };
        }
        self.scroll_left = new_scroll;
        self.refresh();
        crate::log_debug!(
            LogComponent::Domain("Virtualizer"),
            "re-anchored at {} (index {}), scroll {} -> {}",
            self.anchor,
            index,
            scroll,
            new_scroll
        );
        true
    }

    /// Move the anchor so that the chunk at the viewport's left edge becomes `start_index`.
    fn rebase_to_viewport(&mut self) {
        let index = windowing::viewport_index(&self.settings, self.scroll_left);
        self.shift_anchor(index - self.settings.start_index);
    }

    /// Move the anchor by whole chunks, stopping at the ends of the axis.
    /// Returns the number of chunks actually moved.
    fn shift_anchor(&mut self, chunks: i64) -> i64 {
        let interval_ms = self.interval.duration_ms();
        let (lowest, highest) = anchor_bounds(&self.settings, self.interval);
        let anchor = self.anchor.value();
        let back = (anchor.saturating_sub(lowest) / interval_ms) as i64;
        let forward = (highest.saturating_sub(anchor) / interval_ms) as i64;

        let shifted = chunks.clamp(-back, forward);
        self.anchor = self.anchor.offset(shifted * interval_ms as i64);
        shifted
    }

    fn reset(&mut self) {
        self.scroll_left = self.settings.initial_position();
        self.last_scroll = None;
        self.cache.set_capacity(self.settings.buffered_items());
        self.refresh();
    }

    fn refresh(&mut self) {
        self.window = windowing::compute_window(&self.settings, self.scroll_left);
        let pending = self.cache.align(self.anchor, self.interval, &self.window.indices);
        if self.loading == ChunkLoading::Eager {
            self.load_pending();
        }
        crate::log_trace!(
            LogComponent::Domain("Virtualizer"),
            "window {:?}..{:?}, pending {}",
            self.window.first(),
            self.window.last(),
            pending
        );
    }
}

/// Anchor range for which every index in `min_index..=max_index` maps to a
/// chunk inside `[0, Timestamp::MAX]`.
fn anchor_bounds(settings: &VirtualizerSettings, interval: ChunkInterval) -> (u64, u64) {
    let interval_ms = interval.duration_ms();
    let lowest = settings.min_index.min(0).unsigned_abs().saturating_mul(interval_ms);
    let above = (settings.max_index.max(0).unsigned_abs() + 1).saturating_mul(interval_ms);
    let highest = Timestamp::MAX.value().saturating_sub(above);
    (lowest, highest.max(lowest))
}

fn clamp_anchor(settings: &VirtualizerSettings, interval: ChunkInterval, anchor: Timestamp) -> Timestamp {
    let (lowest, highest) = anchor_bounds(settings, interval);
    let clamped = anchor.value().clamp(lowest, highest);
    if clamped != anchor.value() {
        crate::log_warn!(
            LogComponent::Domain("Virtualizer"),
            "anchor {} moved to {} to keep the window on the time axis",
            anchor,
            clamped
        );
    }
    Timestamp::from_millis(clamped)
}
