use std::cell::RefCell;
use std::rc::{Rc, Weak};

use report_timeline_wasm::application::{RangeObserver, TimelineService};
use report_timeline_wasm::config::TimelineConfig;
use report_timeline_wasm::domain::events::{DomainEvent, TimelineEvent};
use report_timeline_wasm::domain::timeline::{
    Chunk, ChunkInterval, ChunkSource, FnChunkSource, ScrollOutcome, TimeRange, Timestamp,
};

#[derive(Clone, Default)]
struct RecordingObserver {
    ranges: Rc<RefCell<Vec<TimeRange>>>,
    changes: Rc<RefCell<usize>>,
}

impl RangeObserver for RecordingObserver {
    fn set_range(&self, range: TimeRange) {
        self.ranges.borrow_mut().push(range);
    }

    fn on_range_changed(&self, _range: TimeRange) {
        *self.changes.borrow_mut() += 1;
    }
}

type Source = FnChunkSource<fn(Timestamp, i64, ChunkInterval) -> Chunk<i64>>;

fn indexed_chunk(anchor: Timestamp, index: i64, interval: ChunkInterval) -> Chunk<i64> {
    Chunk::at_index(anchor, index, interval).with_data(vec![index])
}

fn service(observer: RecordingObserver) -> TimelineService<i64, Source, RecordingObserver> {
    TimelineService::new(
        &TimelineConfig::default(),
        2400.0,
        Timestamp::from_millis(1_700_000_000_000),
        FnChunkSource(indexed_chunk as fn(Timestamp, i64, ChunkInterval) -> Chunk<i64>),
        observer,
    )
    .unwrap()
}

#[test]
fn source_fills_buffered_chunks() {
    let service = service(RecordingObserver::default());
    let data: Vec<i64> = service.virtualizer().chunks().iter().map(|chunk| chunk.data[0]).collect();
    assert_eq!(data, vec![-1, 0, 1, 2, 3]);
}

#[test]
fn duplicate_ranges_are_reported_once() {
    let observer = RecordingObserver::default();
    let mut service = service(observer.clone());

    assert!(service.report_model_range());
    assert!(!service.report_model_range());
    service.handle_scroll(80_400.0);
    assert!(service.report_model_range());

    assert_eq!(observer.ranges.borrow().len(), 2);
    assert_eq!(*observer.changes.borrow(), 2);
    assert_eq!(service.last_range(), observer.ranges.borrow().last().copied());
}

#[test]
fn model_range_is_centred_on_marker() {
    let mut service = service(RecordingObserver::default());
    service.report_model_range();
    let range = service.last_range().unwrap();
    let quarter = ChunkInterval::FifteenMinutes.duration_ms();

    // marker in the middle of a three-chunk viewport: middle of chunk 1
    assert_eq!(range.center().value(), 1_700_000_000_000 + quarter + quarter / 2);
    assert_eq!(range.duration_ms(), quarter);
}

#[test]
fn events_are_published() {
    let mut service = service(RecordingObserver::default());
    let events: Rc<RefCell<Vec<TimelineEvent>>> = Rc::default();
    service.subscribe({
        let events = events.clone();
        move |event| events.borrow_mut().push(event.clone())
    });

    service.begin_drag(0.0);
    assert_eq!(service.drag_to(80_000.0), ScrollOutcome::StartReached);
    service.end_drag();
    service.end_drag();
    assert!(service.set_interval(ChunkInterval::OneHour));
    service.report_model_range();

    let kinds: Vec<&'static str> = events.borrow().iter().map(|event| event.event_type()).collect();
    assert_eq!(kinds, vec!["DragStarted", "Reanchored", "DragEnded", "IntervalChanged", "RangeChanged"]);
    assert!(matches!(events.borrow()[1], TimelineEvent::Reanchored { at_start: true, .. }));
}

#[test]
fn interval_change_forgets_last_range() {
    let mut service = service(RecordingObserver::default());
    service.report_model_range();
    assert!(service.set_interval(ChunkInterval::ThirtyMinutes));
    assert_eq!(service.last_range(), None);
}

#[test]
fn vertical_wheel_pans_horizontally() {
    let mut service = service(RecordingObserver::default());
    assert_eq!(service.handle_wheel(0.0, 100.0), ScrollOutcome::Moved);
    assert_eq!(service.virtualizer().scroll_left(), 80_100.0);
    assert_eq!(service.handle_wheel(-40.0, 100.0), ScrollOutcome::Moved);
    assert_eq!(service.virtualizer().scroll_left(), 80_060.0);
}

#[test]
fn invalid_config_is_rejected() {
    let config = TimelineConfig { min_index: 10, max_index: 0, ..TimelineConfig::default() };
    let result = TimelineService::new(
        &config,
        2400.0,
        Timestamp::from_millis(0),
        FnChunkSource(indexed_chunk as fn(Timestamp, i64, ChunkInterval) -> Chunk<i64>),
        RecordingObserver::default(),
    );
    assert!(result.is_err());
}

type Shared = TimelineService<i64, ReadingSource, MovingObserver>;
type Link = Rc<RefCell<Weak<RefCell<Shared>>>>;

/// Reads the shared timeline from inside `get_chunk`.
struct ReadingSource {
    timeline: Link,
    reads: Rc<RefCell<usize>>,
}

impl ChunkSource<i64> for ReadingSource {
    fn get_chunk(&self, anchor: Timestamp, index: i64, interval: ChunkInterval) -> Chunk<i64> {
        if let Some(timeline) = self.timeline.borrow().upgrade() {
            let _ = timeline.borrow().virtualizer().anchor();
            *self.reads.borrow_mut() += 1;
        }
        indexed_chunk(anchor, index, interval)
    }
}

/// Reads the shared timeline on every range and moves it one hour ahead.
struct MovingObserver {
    timeline: Link,
    anchors: Rc<RefCell<Vec<Timestamp>>>,
}

impl RangeObserver for MovingObserver {
    fn set_range(&self, _range: TimeRange) {
        let Some(timeline) = self.timeline.borrow().upgrade() else {
            return;
        };
        let anchor = timeline.borrow().virtualizer().anchor();
        self.anchors.borrow_mut().push(anchor);
        timeline.borrow_mut().set_anchor(anchor.offset(3_600_000));
    }
}

const START: u64 = 1_700_000_000_000;

fn shared_service() -> (Rc<RefCell<Shared>>, Rc<RefCell<usize>>, Rc<RefCell<Vec<Timestamp>>>) {
    let link: Link = Rc::default();
    let reads: Rc<RefCell<usize>> = Rc::default();
    let anchors: Rc<RefCell<Vec<Timestamp>>> = Rc::default();
    let service = TimelineService::new(
        &TimelineConfig::default(),
        2400.0,
        Timestamp::from_millis(START),
        ReadingSource { timeline: link.clone(), reads: reads.clone() },
        MovingObserver { timeline: link.clone(), anchors: anchors.clone() },
    )
    .unwrap()
    .defer_store_calls();
    let shared = Rc::new(RefCell::new(service));
    *link.borrow_mut() = Rc::downgrade(&shared);
    (shared, reads, anchors)
}

#[test]
fn observer_can_use_the_shared_timeline() {
    let (shared, _, anchors) = shared_service();

    assert!(shared.borrow_mut().report_model_range());
    assert!(anchors.borrow().is_empty());

    Shared::flush(&shared);
    assert_eq!(anchors.borrow().as_slice(), &[Timestamp::from_millis(START)]);

    let timeline = shared.borrow();
    assert_eq!(timeline.virtualizer().anchor().value(), START + 3_600_000);
    assert_eq!(timeline.virtualizer().pending_chunks(), 0);
    assert!(timeline.virtualizer().chunks().iter().all(|chunk| chunk.data.len() == 1));
}

#[test]
fn chunks_load_after_the_borrow_is_released() {
    let (shared, reads, _) = shared_service();

    assert_eq!(shared.borrow_mut().handle_scroll(81_600.0), ScrollOutcome::Moved);
    assert_eq!(shared.borrow().virtualizer().pending_chunks(), 2);
    assert_eq!(*reads.borrow(), 0);

    assert!(Shared::flush(&shared));
    assert_eq!(*reads.borrow(), 2);
    let data: Vec<i64> = shared.borrow().virtualizer().chunks().iter().map(|chunk| chunk.data[0]).collect();
    assert_eq!(data, vec![1, 2, 3, 4, 5]);
    assert!(!Shared::flush(&shared));
}

#[test]
fn flush_waits_while_the_timeline_is_borrowed() {
    let (shared, reads, _) = shared_service();
    shared.borrow_mut().handle_scroll(81_600.0);

    {
        let _held = shared.borrow();
        assert!(!Shared::flush(&shared));
    }
    assert_eq!(*reads.borrow(), 0);
    assert!(Shared::flush(&shared));
}
