use gloo::events::EventListener;
use leptos::html::Div;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use strum::IntoEnumIterator;
use wasm_bindgen::JsValue;

use crate::{
    application::timeline_service::TimelineService,
    domain::{
        logging::LogComponent,
        timeline::{
            ChunkInterval, ChunkSource, DEFAULT_DEBOUNCE_MS, ScrollOutcome, TimeRange, TimelineVirtualizer, Timestamp,
        },
    },
    infrastructure::{DebouncedCallback, JsChunkSource, JsRangeObserver, PointerCapture, dom},
    time_utils::format_chunk_label,
};

pub type BrowserTimeline = TimelineService<JsValue, JsChunkSource, JsRangeObserver>;
pub type SharedTimeline = Rc<RefCell<BrowserTimeline>>;

/// Reactive state of one mounted timeline.
#[derive(Clone, Copy)]
pub struct TimelineSignals {
    pub interval: RwSignal<ChunkInterval>,
    pub range: RwSignal<Option<TimeRange>>,
    pub dragging: RwSignal<bool>,
    pub reanchors: RwSignal<u32>,
    pub jump_to: RwSignal<Option<Timestamp>>,
}

impl TimelineSignals {
    pub fn new(interval: ChunkInterval) -> Self {
        Self {
            interval: create_rw_signal(interval),
            range: create_rw_signal(None),
            dragging: create_rw_signal(false),
            reanchors: create_rw_signal(0),
            jump_to: create_rw_signal(None),
        }
    }
}

/// One rendered chunk cell.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkCell {
    pub from: u64,
    pub to: u64,
    pub interval: ChunkInterval,
    pub items: usize,
}

/// Everything the view needs from one virtualizer state.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineFrame {
    pub left_padding: f64,
    pub right_padding: f64,
    pub item_width: f64,
    pub cells: Vec<ChunkCell>,
}

impl TimelineFrame {
    pub fn capture<D, S: ChunkSource<D>>(virtualizer: &TimelineVirtualizer<D, S>) -> Self {
        let window = virtualizer.window();
        let interval = virtualizer.interval();
        Self {
            left_padding: window.left_padding,
            right_padding: window.right_padding,
            item_width: virtualizer.settings().item_width,
            cells: virtualizer
                .chunks()
                .iter()
                .map(|chunk| ChunkCell {
                    from: chunk.from.value(),
                    to: chunk.to.value(),
                    interval,
                    items: chunk.data.len(),
                })
                .collect(),
        }
    }

    pub fn total_width(&self) -> f64 {
        self.left_padding + self.cells.len() as f64 * self.item_width + self.right_padding
    }
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

const TIMELINE_STYLES: &str = r#"
.timeline-app {
    font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
    color: #e0e0e0;
    background: #1e2a38;
    padding: 10px;
    border-radius: 8px;
}

.timeline-toolbar {
    display: flex;
    gap: 6px;
    align-items: center;
    margin-bottom: 8px;
}

.interval-btn {
    background: #4a5d73;
    color: white;
    border: none;
    padding: 4px 10px;
    border-radius: 5px;
    cursor: pointer;
    font-size: 12px;
}

.interval-btn.active {
    background: #72c685;
}

.timeline-range {
    margin-left: auto;
    font-family: 'Courier New', monospace;
    font-size: 12px;
}

.timeline {
    position: relative;
    user-select: none;
    cursor: grab;
}

.timeline.dragging {
    cursor: grabbing;
}

.timeline-scroll {
    overflow-x: auto;
    overflow-y: hidden;
    scrollbar-width: none;
}

.timeline-track {
    display: flex;
    height: 60px;
}

.timeline-padding,
.timeline-chunk {
    flex: none;
}

.timeline-chunk {
    box-sizing: border-box;
    border-left: 1px solid #4a5d73;
    padding: 4px;
    font-size: 11px;
}

.timeline-chunk-items {
    display: block;
    color: #72c685;
}

.timeline-marker {
    position: absolute;
    top: 0;
    bottom: 0;
    width: 2px;
    background: #f39c12;
    pointer-events: none;
}
"#;

/// Horizontally scrolling chunk strip with drag, wheel and range reporting.
#[component]
pub fn TimelineChunks(
    timeline: SharedTimeline,
    signals: TimelineSignals,
    #[prop(default = DEFAULT_DEBOUNCE_MS)] debounce_ms: u64,
) -> impl IntoView {
    let TimelineSignals { interval, range: current_range, dragging, reanchors, jump_to } = signals;
    let container = create_node_ref::<Div>();
    let frame = create_rw_signal(TimelineFrame::capture(timeline.borrow().virtualizer()));
    let marker_ratio = timeline.borrow().marker_ratio();
    let capture: Rc<RefCell<Option<PointerCapture>>> = Rc::new(RefCell::new(None));

    // Reads the rendered chunks once scrolling settles.
    let report = DebouncedCallback::new(debounce_ms, {
        let timeline = timeline.clone();
        move |_scroll_left: f64| {
            let Some(el) = container.get_untracked() else {
                return;
            };
            let range = dom::range_in_container(&el, marker_ratio)
                .unwrap_or_else(|| timeline.borrow().virtualizer().viewport_range(marker_ratio));
            let changed = timeline.borrow_mut().report_range(range);
            // onRange runs here, with the timeline free to be used again
            BrowserTimeline::flush(&timeline);
            if changed {
                current_range.set(Some(range));
            }
        }
    });

    let apply: Rc<dyn Fn(ScrollOutcome, bool)> = Rc::new({
        let timeline = timeline.clone();
        let report = report.clone();
        move |outcome: ScrollOutcome, write_scroll: bool| {
            if outcome == ScrollOutcome::Unchanged {
                return;
            }
            // getChunk runs here, outside any borrow of the timeline
            BrowserTimeline::flush(&timeline);
            let (next, scroll_left) = {
                let timeline = timeline.borrow();
                (TimelineFrame::capture(timeline.virtualizer()), timeline.virtualizer().scroll_left())
            };
            frame.set(next);
            if outcome.reanchored() {
                reanchors.update(|count| *count += 1);
            }
            if write_scroll || outcome.reanchored() {
                if let Some(el) = container.get_untracked() {
                    el.set_scroll_left(scroll_left.round() as i32);
                }
            }
            report.schedule(scroll_left);
        }
    });

    let resize: Rc<dyn Fn()> = Rc::new({
        let timeline = timeline.clone();
        let apply = apply.clone();
        move || {
            let Some(el) = container.get_untracked() else {
                return;
            };
            let Some(width) = dom::container_width(&el) else {
                return;
            };
            if timeline.borrow_mut().resize(width) {
                crate::log_debug!(LogComponent::Presentation("Timeline"), "resized to {}px", width);
            }
            apply(ScrollOutcome::Moved, true);
        }
    });

    // Initial scroll positioning once the container is laid out.
    request_animation_frame({
        let resize = resize.clone();
        move || resize()
    });

    let resize_listener = web_sys::window().map(|window| {
        let resize = resize.clone();
        EventListener::new(&window, "resize", move |_| resize())
    });

    create_effect({
        let timeline = timeline.clone();
        let apply = apply.clone();
        move |_| {
            let next = interval.get();
            if timeline.borrow_mut().set_interval(next) {
                current_range.set(None);
                apply(ScrollOutcome::Moved, true);
            }
        }
    });

    create_effect({
        let timeline = timeline.clone();
        let apply = apply.clone();
        move |_| {
            if let Some(anchor) = jump_to.get() {
                timeline.borrow_mut().set_anchor(anchor);
                apply(ScrollOutcome::Moved, true);
            }
        }
    });

    let on_scroll = {
        let timeline = timeline.clone();
        let apply = apply.clone();
        move |_: ev::Event| {
            let Some(el) = container.get_untracked() else {
                return;
            };
            let outcome = timeline.borrow_mut().handle_scroll(el.scroll_left() as f64);
            apply(outcome, false);
        }
    };

    let on_wheel = {
        let timeline = timeline.clone();
        let apply = apply.clone();
        move |ev: ev::WheelEvent| {
            ev.prevent_default();
            let outcome = timeline.borrow_mut().handle_wheel(ev.delta_x(), ev.delta_y());
            apply(outcome, true);
        }
    };

    let on_mousedown = {
        let timeline = timeline.clone();
        let apply = apply.clone();
        let capture = capture.clone();
        move |ev: ev::MouseEvent| {
            if ev.button() != 0 {
                return;
            }
            ev.prevent_default();
            timeline.borrow_mut().begin_drag(ev.client_x() as f64);
            dragging.set(true);

            let on_move = {
                let timeline = timeline.clone();
                let apply = apply.clone();
                move |ev: &web_sys::MouseEvent| {
                    let outcome = timeline.borrow_mut().drag_to(ev.client_x() as f64);
                    apply(outcome, true);
                }
            };
            let on_up = {
                let timeline = timeline.clone();
                let capture = capture.clone();
                move |_: &web_sys::MouseEvent| {
                    timeline.borrow_mut().end_drag();
                    dragging.set(false);
                    let active = capture.borrow_mut().take();
                    if let Some(active) = active {
                        active.release_deferred();
                    }
                }
            };

            // a capture left over from a missed mouseup is dropped here
            let acquired = PointerCapture::acquire(on_move, on_up);
            let _ = capture.replace(acquired);
        }
    };

    on_cleanup({
        let capture = capture.clone();
        let report = report.clone();
        move || {
            let _ = capture.borrow_mut().take();
            report.cancel();
            drop(resize_listener);
        }
    });

    view! {
        <div class="timeline" class:dragging=move || dragging.get()>
            <div class="timeline-scroll" node_ref=container on:scroll=on_scroll on:wheel=on_wheel>
                <div class="timeline-track" on:mousedown=on_mousedown>
                    <div class="timeline-padding" style:width=move || px(frame.with(|f| f.left_padding))></div>
                    <For
                        each=move || frame.with(|f| f.cells.clone())
                        key=|cell| (cell.from, cell.to)
                        children=move |cell: ChunkCell| {
                            view! {
                                <div
                                    class="timeline-chunk"
                                    data-from=cell.from.to_string()
                                    data-to=cell.to.to_string()
                                    style:width=move || px(frame.with(|f| f.item_width))
                                >
                                    <span class="timeline-chunk-label">{format_chunk_label(cell.from, cell.interval)}</span>
                                    <span class="timeline-chunk-items">{cell.items}</span>
                                </div>
                            }
                        }
                    />
                    <div class="timeline-padding" style:width=move || px(frame.with(|f| f.right_padding))></div>
                </div>
            </div>
            <div class="timeline-marker" style:left=format!("{}%", marker_ratio * 100.0)></div>
        </div>
    }
}

/// Interval switcher, current range and the chunk strip.
#[component]
pub fn TimelineApp(
    timeline: SharedTimeline,
    signals: TimelineSignals,
    #[prop(default = DEFAULT_DEBOUNCE_MS)] debounce_ms: u64,
) -> impl IntoView {
    let interval = signals.interval;
    let current_range = signals.range;

    view! {
        <style>{TIMELINE_STYLES}</style>
        <div class="timeline-app">
            <div class="timeline-toolbar">
                {ChunkInterval::iter()
                    .map(|option| {
                        view! {
                            <button
                                class="interval-btn"
                                class:active=move || interval.get() == option
                                on:click=move |_| interval.set(option)
                            >
                                {option.to_string()}
                            </button>
                        }
                    })
                    .collect_view()}
                <span class="timeline-range">
                    {move || {
                        current_range
                            .get()
                            .map(|range| {
                                format!(
                                    "{} – {}",
                                    format_chunk_label(range.from.value(), interval.get_untracked()),
                                    format_chunk_label(range.to.value(), interval.get_untracked())
                                )
                            })
                            .unwrap_or_default()
                    }}
                </span>
            </div>
            <TimelineChunks timeline=timeline signals=signals debounce_ms=debounce_ms/>
        </div>
    }
}
