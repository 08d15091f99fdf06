use js_sys::{Array, Function};
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::app::{SharedTimeline, TimelineApp, TimelineSignals};
use crate::application::timeline_service::TimelineService;
use crate::config::TimelineConfig;
use crate::domain::errors::AppError;
use crate::domain::events::DomainEvent;
use crate::domain::logging::LogComponent;
use crate::domain::timeline::{ChunkInterval, Timestamp};
use crate::infrastructure::{JsChunkSource, JsRangeObserver, dom};
use crate::time_utils::align_to_interval;

fn to_js(err: AppError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JS handle to a mounted timeline. Each `mountTimeline` call gets its own.
#[wasm_bindgen]
pub struct TimelineHandle {
    timeline: SharedTimeline,
    signals: TimelineSignals,
}

#[wasm_bindgen]
impl TimelineHandle {
    /// Switch chunk duration, e.g. `"30m"`.
    #[wasm_bindgen(js_name = setInterval)]
    pub fn set_interval(&self, interval: &str) -> Result<(), JsValue> {
        let parsed = ChunkInterval::from_str(interval)
            .map_err(|_| to_js(AppError::ValidationError(format!("unknown interval {:?}", interval))))?;
        self.signals.interval.set(parsed);
        Ok(())
    }

    /// Jump the timeline so the chunk starting at `anchor_ms` sits at the start index.
    #[wasm_bindgen(js_name = setAnchor)]
    pub fn set_anchor(&self, anchor_ms: f64) {
        let anchor = if anchor_ms.is_finite() { anchor_ms.max(0.0) as u64 } else { 0 };
        self.signals.jump_to.set(Some(Timestamp::from_millis(anchor)));
    }

    /// Last reported `[from, to]`, or `null`.
    #[wasm_bindgen(js_name = currentRange)]
    pub fn current_range(&self) -> JsValue {
        match self.timeline.borrow().last_range() {
            Some(range) => Array::of2(&JsValue::from_f64(range.from.as_f64()), &JsValue::from_f64(range.to.as_f64())).into(),
            None => JsValue::NULL,
        }
    }

    /// Current chunk duration, e.g. `"15m"`.
    #[wasm_bindgen(js_name = interval)]
    pub fn interval(&self) -> String {
        self.timeline.borrow().virtualizer().interval().to_string()
    }

    #[wasm_bindgen(js_name = anchor)]
    pub fn anchor(&self) -> f64 {
        self.timeline.borrow().virtualizer().anchor().as_f64()
    }

    /// How often the window jumped at a scroll extreme.
    #[wasm_bindgen(js_name = reanchorCount)]
    pub fn reanchor_count(&self) -> u32 {
        self.signals.reanchors.get_untracked()
    }
}

/// Mount the timeline into the element with `container_id`.
///
/// `config_json` may be empty; `on_range([from, to])` receives debounced
/// range reports; `get_chunk(anchorMs, index)` may return an array of
/// items for a chunk.
#[wasm_bindgen(js_name = mountTimeline)]
pub fn mount_timeline(
    container_id: &str,
    config_json: &str,
    on_range: Option<Function>,
    get_chunk: Option<Function>,
) -> Result<TimelineHandle, JsValue> {
    let config = TimelineConfig::from_json(config_json).map_err(to_js)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| to_js(AppError::DomError("document not available".to_string())))?;
    let parent = document
        .get_element_by_id(container_id)
        .ok_or_else(|| to_js(AppError::DomError(format!("element #{} not found", container_id))))?
        .dyn_into::<web_sys::HtmlElement>()
        .map_err(|_| to_js(AppError::DomError(format!("#{} is not an HTML element", container_id))))?;

    let viewport_width = dom::container_width(&parent).unwrap_or(config.viewport_width);
    let anchor = config
        .anchor_ms
        .unwrap_or_else(|| align_to_interval(js_sys::Date::now() as u64, config.interval));

    let mut service = TimelineService::new(
        &config,
        viewport_width,
        Timestamp::from_millis(anchor),
        JsChunkSource::new(get_chunk),
        JsRangeObserver::new(on_range),
    )
    .map_err(to_js)?
    .defer_store_calls();
    service.subscribe(|event| {
        crate::log_trace!(LogComponent::Presentation("Timeline"), "event {}", event.event_type());
    });

    let timeline: SharedTimeline = Rc::new(RefCell::new(service));
    let signals = TimelineSignals::new(config.interval);
    let debounce_ms = config.debounce_ms;

    mount_to(parent, {
        let timeline = timeline.clone();
        move || view! { <TimelineApp timeline=timeline signals=signals debounce_ms=debounce_ms/> }
    });

    crate::log_info!(
        LogComponent::Presentation("WasmApi"),
        "timeline mounted into #{} ({}px, {})",
        container_id,
        viewport_width,
        config.interval
    );

    Ok(TimelineHandle { timeline, signals })
}
