use report_timeline_wasm::domain::timeline::windowing::viewport_index;
use report_timeline_wasm::domain::timeline::{
    ChunkInterval, EmptyChunkSource, ScrollOutcome, TimelineVirtualizer, Timestamp, VirtualizerSettings,
};

const ANCHOR: u64 = 1_700_000_100_000;
const QUARTER: u64 = 15 * 60 * 1000;

fn virtualizer() -> TimelineVirtualizer<(), EmptyChunkSource> {
    TimelineVirtualizer::new(
        VirtualizerSettings::default(),
        ChunkInterval::FifteenMinutes,
        Timestamp::from_millis(ANCHOR),
        EmptyChunkSource,
    )
    .unwrap()
}

/// `from` of the chunk sitting at the viewport's left edge.
fn viewport_left_from(v: &TimelineVirtualizer<(), EmptyChunkSource>) -> u64 {
    let index = viewport_index(v.settings(), v.scroll_left());
    (v.anchor().value() as i64 + index * v.interval().duration_ms() as i64) as u64
}

#[test]
fn start_reached_reanchors_to_first_visible_chunk() {
    let mut v = virtualizer();
    let initial = v.settings().initial_position();

    assert_eq!(v.scroll_to(0.0), ScrollOutcome::StartReached);
    assert_eq!(v.anchor().value(), ANCHOR - 100 * QUARTER);
    assert_eq!(v.scroll_left(), initial);
    assert_eq!(viewport_left_from(&v), ANCHOR - 100 * QUARTER);
}

#[test]
fn repeated_scroll_event_is_idempotent() {
    let mut v = virtualizer();
    v.scroll_to(0.0);
    let anchor = v.anchor();
    let scroll = v.scroll_left();
    let window = v.window().clone();

    assert_eq!(v.scroll_to(0.0), ScrollOutcome::Unchanged);
    assert_eq!(v.anchor(), anchor);
    assert_eq!(v.scroll_left(), scroll);
    assert_eq!(v.window(), &window);
}

#[test]
fn programmatic_echo_keeps_window() {
    let mut v = virtualizer();
    v.scroll_to(0.0);
    let window = v.window().clone();
    let echo = v.scroll_left();

    assert_eq!(v.scroll_to(echo), ScrollOutcome::Moved);
    assert_eq!(v.window(), &window);
}

#[test]
fn end_reached_moves_anchor_forward() {
    let mut v = virtualizer();
    let max_scroll = v.settings().max_scroll();
    assert_eq!(max_scroll, 158_400.0);

    let before = {
        let index = viewport_index(v.settings(), max_scroll);
        ANCHOR + (index as u64) * QUARTER
    };
    assert_eq!(v.scroll_to(max_scroll), ScrollOutcome::EndReached);
    assert_eq!(v.anchor().value(), ANCHOR + 98 * QUARTER);
    assert_eq!(v.scroll_left(), v.settings().initial_position());
    assert_eq!(viewport_left_from(&v), before);
}

#[test]
fn partial_chunk_offset_survives_reanchor() {
    let mut v = virtualizer();
    let max_scroll = v.settings().max_scroll();
    v.scroll_to(max_scroll + 500.0);
    assert_eq!(v.scroll_left(), v.settings().initial_position());

    v.scroll_to(80_000.0 + 300.0);
    assert_eq!(v.scroll_left(), 80_300.0);
}

#[test]
fn drag_continues_across_reanchor() {
    let mut v = virtualizer();
    v.begin_drag(10_000.0);
    assert_eq!(v.drag_to(0.0), ScrollOutcome::Moved);
    assert_eq!(v.scroll_left(), 90_000.0);

    assert_eq!(v.drag_to(-68_400.0), ScrollOutcome::EndReached);
    let after_jump = v.scroll_left();
    assert_eq!(after_jump, v.settings().initial_position());

    // pointer moves 1000px back to the right: content follows from the reset position
    assert_eq!(v.drag_to(-67_400.0), ScrollOutcome::Moved);
    assert_eq!(v.scroll_left(), after_jump - 1_000.0);
    assert!(v.end_drag());
    assert!(!v.is_dragging());
}

#[test]
fn wheel_scrolls_relative() {
    let mut v = virtualizer();
    assert_eq!(v.scroll_by(0.0), ScrollOutcome::Unchanged);
    assert_eq!(v.scroll_by(120.0), ScrollOutcome::Moved);
    assert_eq!(v.scroll_left(), 80_120.0);
}

#[test]
fn resize_recomputes_item_width() {
    let mut v = virtualizer();
    assert!(!v.resize(0.0));
    assert!(!v.resize(2_400.0));
    assert!(v.resize(3_000.0));
    assert_eq!(v.settings().item_width, 1_000.0);
    assert_eq!(v.scroll_left(), 100_000.0);
    assert_eq!(v.anchor().value(), ANCHOR);
    assert_eq!(v.window().left_padding, 99_000.0);
}

#[test]
fn set_anchor_resets_scroll() {
    let mut v = virtualizer();
    v.scroll_to(90_000.0);
    v.set_anchor(Timestamp::from_millis(QUARTER * 1_000));
    assert_eq!(v.scroll_left(), v.settings().initial_position());
    assert_eq!(v.chunks()[1].from.value(), QUARTER * 1_000);
}

fn contiguous(v: &TimelineVirtualizer<(), EmptyChunkSource>) -> bool {
    v.chunks().windows(2).all(|pair| pair[0].to == pair[1].from && pair[0].from < pair[1].from)
}

#[test]
fn anchor_near_epoch_is_pulled_in() {
    let mut v = virtualizer();
    v.set_anchor(Timestamp::from_millis(0));

    // min index -100 must still land on or after the epoch
    assert_eq!(v.anchor().value(), 100 * QUARTER);
    assert!(contiguous(&v));

    let v = TimelineVirtualizer::<(), _>::new(
        VirtualizerSettings::default(),
        ChunkInterval::FifteenMinutes,
        Timestamp::from_millis(5 * QUARTER),
        EmptyChunkSource,
    )
    .unwrap();
    assert_eq!(v.anchor().value(), 100 * QUARTER);
    assert!(contiguous(&v));
}

#[test]
fn scrolling_stops_at_the_epoch() {
    let mut v = virtualizer();
    v.set_anchor(Timestamp::from_millis(0));

    assert_eq!(v.scroll_to(0.0), ScrollOutcome::Moved);
    assert_eq!(v.scroll_left(), 0.0);
    assert_eq!(v.anchor().value(), 100 * QUARTER);
    assert_eq!(v.chunks()[0].from.value(), 0);
    assert!(contiguous(&v));
}

#[test]
fn reanchor_near_epoch_moves_only_what_is_left() {
    let mut v = virtualizer();
    v.set_anchor(Timestamp::from_millis(103 * QUARTER));

    // the left edge asks for a 100 chunk jump, only 3 remain before the epoch
    assert_eq!(v.scroll_to(0.0), ScrollOutcome::StartReached);
    assert_eq!(v.anchor().value(), 100 * QUARTER);
    assert_eq!(v.scroll_left(), 3.0 * 800.0);
    // same chunk as before the jump stays at the left edge
    assert_eq!(viewport_left_from(&v), 3 * QUARTER);
    assert!(contiguous(&v));
}

#[test]
fn interval_change_near_epoch_keeps_anchor_valid() {
    let mut v = virtualizer();
    v.set_anchor(Timestamp::from_millis(100 * QUARTER));
    assert!(v.set_interval(ChunkInterval::OneHour));
    assert_eq!(v.anchor().value(), 100 * 4 * QUARTER);
    assert!(contiguous(&v));
}
