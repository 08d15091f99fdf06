#![cfg(target_arch = "wasm32")]

use report_timeline_wasm::domain::timeline::TimeRange;
use report_timeline_wasm::infrastructure::dom::{range_in_container, read_chunk_rects};
use report_timeline_wasm::time_utils::{align_to_interval, format_chunk_label};
use report_timeline_wasm::domain::timeline::{ChunkInterval, Timestamp};
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn strip(chunks: &[(&str, &str)]) -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let container = document.create_element("div").unwrap();
    container
        .set_attribute("style", "position: absolute; left: 0; top: 0; width: 300px; display: flex;")
        .unwrap();
    for (from, to) in chunks {
        let chunk = document.create_element("div").unwrap();
        chunk.set_attribute("style", "flex: none; width: 100px; height: 10px;").unwrap();
        chunk.set_attribute("data-from", from).unwrap();
        chunk.set_attribute("data-to", to).unwrap();
        container.append_child(&chunk).unwrap();
    }
    document.body().unwrap().append_child(&container).unwrap();
    container
}

#[wasm_bindgen_test]
fn reads_rendered_chunk_geometry() {
    let container = strip(&[("0", "1000"), ("1000", "2000"), ("bogus", "3000")]);
    let rects = read_chunk_rects(&container);
    assert_eq!(rects.len(), 2);
    assert_eq!(rects[1].left - rects[0].left, 100.0);
    container.remove();
}

#[wasm_bindgen_test]
fn marker_in_middle_of_strip() {
    let container = strip(&[("0", "1000"), ("1000", "2000"), ("2000", "3000")]);
    let range = range_in_container(&container, 0.5).unwrap();
    assert_eq!(range, TimeRange::new(Timestamp::from_millis(1000), Timestamp::from_millis(2000)));
    container.remove();
}

#[wasm_bindgen_test]
fn chunk_labels_use_utc() {
    assert_eq!(format_chunk_label(0, ChunkInterval::FifteenMinutes), "00:00");
    assert_eq!(format_chunk_label(90 * 60 * 1000, ChunkInterval::OneHour), "01:30");
    assert_eq!(format_chunk_label(0, ChunkInterval::OneDay), "01.01");
    assert_eq!(align_to_interval(1_000_123, ChunkInterval::OneMinute), 960_000);
}
