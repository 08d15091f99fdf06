use js_sys::{Array, Function};
use wasm_bindgen::JsValue;

use crate::application::timeline_service::RangeObserver;
use crate::domain::logging::LogComponent;
use crate::domain::timeline::{Chunk, ChunkInterval, ChunkSource, TimeRange, Timestamp};

/// Chunk source backed by an optional JS `getChunk(anchorMs, index)` callback
/// returning an array of chunk items.
pub struct JsChunkSource {
    get_chunk: Option<Function>,
}

impl JsChunkSource {
    pub fn new(get_chunk: Option<Function>) -> Self {
        Self { get_chunk }
    }
}

impl ChunkSource<JsValue> for JsChunkSource {
    fn get_chunk(&self, anchor: Timestamp, index: i64, interval: ChunkInterval) -> Chunk<JsValue> {
        let chunk = Chunk::at_index(anchor, index, interval);
        let Some(get_chunk) = &self.get_chunk else {
            return chunk;
        };

        match get_chunk.call2(&JsValue::NULL, &JsValue::from_f64(anchor.as_f64()), &JsValue::from_f64(index as f64)) {
            Ok(value) if Array::is_array(&value) => {
                let data = Array::from(&value).iter().collect();
                chunk.with_data(data)
            }
            Ok(_) => chunk,
            Err(e) => {
                crate::log_warn!(
                    LogComponent::Infrastructure("JsChunkSource"),
                    "getChunk({}, {}) failed: {:?}",
                    anchor,
                    index,
                    e
                );
                chunk
            }
        }
    }
}

/// Observer forwarding `[from, to]` to a JS callback.
pub struct JsRangeObserver {
    on_range: Option<Function>,
}

impl JsRangeObserver {
    pub fn new(on_range: Option<Function>) -> Self {
        Self { on_range }
    }
}

impl RangeObserver for JsRangeObserver {
    fn set_range(&self, range: TimeRange) {
        let Some(on_range) = &self.on_range else {
            return;
        };
        let pair = Array::of2(&JsValue::from_f64(range.from.as_f64()), &JsValue::from_f64(range.to.as_f64()));
        if let Err(e) = on_range.call1(&JsValue::NULL, &pair) {
            crate::log_error!(LogComponent::Infrastructure("JsRangeObserver"), "onRange callback threw: {:?}", e);
        }
    }

    fn on_range_changed(&self, range: TimeRange) {
        crate::log_debug!(LogComponent::Infrastructure("JsRangeObserver"), "range changed to {}", range);
    }
}
