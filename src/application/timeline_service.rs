use std::cell::RefCell;
use std::rc::Rc;

use crate::config::TimelineConfig;
use crate::domain::errors::AppResult;
use crate::domain::events::{EventDispatcher, InMemoryEventDispatcher, TimelineEvent};
use crate::domain::logging::LogComponent;
use crate::domain::timeline::{
    Chunk, ChunkInterval, ChunkLoading, ChunkSource, ScrollOutcome, TimeRange, TimelineVirtualizer, Timestamp,
};

/// Consumer of the centred range (the data store side).
pub trait RangeObserver {
    /// Range the store should load.
    fn set_range(&self, range: TimeRange);

    /// Notification for everything else interested in the current range.
    fn on_range_changed(&self, _range: TimeRange) {}
}

/// Observer that ignores every report.
pub struct NoopRangeObserver;

impl RangeObserver for NoopRangeObserver {
    fn set_range(&self, _range: TimeRange) {}
}

fn deliver<O: RangeObserver + ?Sized>(observer: &O, range: TimeRange) {
    observer.set_range(range);
    observer.on_range_changed(range);
}

/// Drives the virtualizer, publishes timeline events and forwards
/// deduplicated range reports to the observer.
///
/// By default the observer and the chunk source are called from inside the
/// methods that trigger them. After [`defer_store_calls`](Self::defer_store_calls)
/// both are queued instead and run by [`flush`](Self::flush), which lets a
/// service shared through `Rc<RefCell<_>>` be used again from those callbacks.
pub struct TimelineService<D, S, O> {
    virtualizer: TimelineVirtualizer<D, S>,
    observer: Rc<O>,
    events: InMemoryEventDispatcher,
    last_range: Option<TimeRange>,
    undelivered: Option<TimeRange>,
    deferred: bool,
    marker_ratio: f64,
}

impl<D, S, O> TimelineService<D, S, O>
where
    S: ChunkSource<D>,
    O: RangeObserver,
{
    pub fn new(config: &TimelineConfig, viewport_width: f64, anchor: Timestamp, source: S, observer: O) -> AppResult<Self> {
        config.validate()?;
        let settings = config.settings(viewport_width)?;
        let virtualizer = TimelineVirtualizer::new(settings, config.interval, anchor, source)?;
        crate::log_info!(
            LogComponent::Application("TimelineService"),
            "timeline ready: {} chunks of {}, anchor {}",
            settings.buffered_items(),
            config.interval,
            anchor
        );
        Ok(Self {
            virtualizer,
            observer: Rc::new(observer),
            events: InMemoryEventDispatcher::new(),
            last_range: None,
            undelivered: None,
            deferred: false,
            marker_ratio: config.marker_ratio,
        })
    }

    /// Queue range reports and chunk loads until [`flush`](Self::flush).
    pub fn defer_store_calls(mut self) -> Self {
        self.deferred = true;
        self.virtualizer.set_chunk_loading(ChunkLoading::Deferred);
        self
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Run the queued store calls of a shared service without holding its
    /// borrow while the observer or the source run. Callbacks may borrow
    /// or mutate the service; whatever they queue is flushed too.
    ///
    /// Returns whether any chunk received data. Does nothing while the
    /// service is borrowed elsewhere; the work stays queued.
    pub fn flush(cell: &RefCell<Self>) -> bool {
        let mut filled = false;
        loop {
            let (observer, source, anchor, interval, pending, range) = {
                let Ok(mut service) = cell.try_borrow_mut() else {
                    return filled;
                };
                let pending = service.virtualizer.take_pending();
                let range = service.undelivered.take();
                if pending.is_empty() && range.is_none() {
                    return filled;
                }
                (
                    Rc::clone(&service.observer),
                    service.virtualizer.source_handle(),
                    service.virtualizer.anchor(),
                    service.virtualizer.interval(),
                    pending,
                    range,
                )
            };

            let chunks: Vec<Chunk<D>> = pending
                .into_iter()
                .map(|index| source.get_chunk(anchor, index, interval))
                .collect();
            if !chunks.is_empty() {
                let Ok(mut service) = cell.try_borrow_mut() else {
                    return filled;
                };
                for chunk in chunks {
                    filled |= service.virtualizer.fill_chunk(chunk);
                }
            }

            if let Some(range) = range {
                deliver(&*observer, range);
            }
        }
    }

    pub fn virtualizer(&self) -> &TimelineVirtualizer<D, S> {
        &self.virtualizer
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn marker_ratio(&self) -> f64 {
        self.marker_ratio
    }

    pub fn last_range(&self) -> Option<TimeRange> {
        self.last_range
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&TimelineEvent) + 'static,
    {
        self.events.subscribe(handler);
    }

    pub fn handle_scroll(&mut self, offset: f64) -> ScrollOutcome {
        let outcome = self.virtualizer.scroll_to(offset);
        self.publish_outcome(outcome);
        outcome
    }

    /// Wheel deltas; vertical wheels pan horizontally when no horizontal delta is given.
    pub fn handle_wheel(&mut self, delta_x: f64, delta_y: f64) -> ScrollOutcome {
        let delta = if delta_x != 0.0 { delta_x } else { delta_y };
        let outcome = self.virtualizer.scroll_by(delta);
        self.publish_outcome(outcome);
        outcome
    }

    pub fn begin_drag(&mut self, client_x: f64) {
        self.virtualizer.begin_drag(client_x);
        self.events.publish(TimelineEvent::DragStarted);
    }

    pub fn drag_to(&mut self, client_x: f64) -> ScrollOutcome {
        let outcome = self.virtualizer.drag_to(client_x);
        self.publish_outcome(outcome);
        outcome
    }

    pub fn end_drag(&mut self) {
        if self.virtualizer.end_drag() {
            self.events.publish(TimelineEvent::DragEnded);
        }
    }

    pub fn set_interval(&mut self, interval: ChunkInterval) -> bool {
        if !self.virtualizer.set_interval(interval) {
            return false;
        }
        self.last_range = None;
        self.undelivered = None;
        self.events.publish(TimelineEvent::IntervalChanged { interval, anchor: self.virtualizer.anchor() });
        true
    }

    pub fn resize(&mut self, viewport_width: f64) -> bool {
        self.virtualizer.resize(viewport_width)
    }

    pub fn set_anchor(&mut self, anchor: Timestamp) {
        self.virtualizer.set_anchor(anchor);
    }

    /// Forward a range unless it equals the previous report.
    pub fn report_range(&mut self, range: TimeRange) -> bool {
        if self.last_range == Some(range) {
            return false;
        }
        self.last_range = Some(range);
        self.events.publish(TimelineEvent::RangeChanged { range });
        crate::log_debug!(LogComponent::Application("TimelineService"), "range {}", range);
        if self.deferred {
            self.undelivered = Some(range);
        } else {
            deliver(&*self.observer, range);
        }
        true
    }

    /// Report the range derived from the model geometry (no DOM read).
    pub fn report_model_range(&mut self) -> bool {
        let range = self.virtualizer.viewport_range(self.marker_ratio);
        self.report_range(range)
    }

    fn publish_outcome(&self, outcome: ScrollOutcome) {
        if outcome.reanchored() {
            self.events.publish(TimelineEvent::Reanchored {
                anchor: self.virtualizer.anchor(),
                at_start: outcome == ScrollOutcome::StartReached,
            });
        }
    }
}
