use js_sys::Date;
use wasm_bindgen::JsValue;

use crate::domain::timeline::ChunkInterval;

/// Chunk label using UTC components.
///
/// - intervals shorter than a day -> `HH:MM`
/// - day intervals -> `DD.MM`
pub fn format_chunk_label(timestamp: u64, interval: ChunkInterval) -> String {
    let date = Date::new(&JsValue::from_f64(timestamp as f64));
    if interval.duration_ms() < ChunkInterval::OneDay.duration_ms() {
        format!("{:02}:{:02}", date.get_utc_hours(), date.get_utc_minutes())
    } else {
        format!("{:02}.{:02}", date.get_utc_date(), date.get_utc_month() + 1)
    }
}

/// Start of the interval containing `timestamp`.
pub fn align_to_interval(timestamp: u64, interval: ChunkInterval) -> u64 {
    let step = interval.duration_ms();
    timestamp - timestamp % step
}
