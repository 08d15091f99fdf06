use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::domain::logging::LogComponent;
use crate::domain::timeline::{ChunkRect, TimeRange, parse_chunk_bounds, range_under_marker};

pub const DATA_FROM: &str = "data-from";
pub const DATA_TO: &str = "data-to";

const CHUNK_SELECTOR: &str = "[data-from][data-to]";

/// Client-space geometry of every chunk element below `container`.
/// Elements with missing or malformed bounds are skipped.
pub fn read_chunk_rects(container: &Element) -> Vec<ChunkRect> {
    let Ok(nodes) = container.query_selector_all(CHUNK_SELECTOR) else {
        return Vec::new();
    };

    let mut rects = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(element) = nodes.item(i).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        let (Some(from), Some(to)) = (element.get_attribute(DATA_FROM), element.get_attribute(DATA_TO)) else {
            continue;
        };
        match parse_chunk_bounds(&from, &to) {
            Ok((from, to)) => {
                let rect = element.get_bounding_client_rect();
                rects.push(ChunkRect { left: rect.left(), width: rect.width(), from, to });
            }
            Err(e) => {
                crate::log_warn!(LogComponent::Infrastructure("Dom"), "skipping chunk element: {}", e);
            }
        }
    }
    rects
}

/// Client x of the marker placed at `ratio` of the container width.
pub fn marker_x(container: &Element, ratio: f64) -> f64 {
    let rect = container.get_bounding_client_rect();
    rect.left() + rect.width() * ratio
}

/// Range under the marker, read from the rendered chunks.
pub fn range_in_container(container: &Element, ratio: f64) -> Option<TimeRange> {
    range_under_marker(&read_chunk_rects(container), marker_x(container, ratio))
}

/// Measured container width; `None` until laid out.
pub fn container_width(container: &Element) -> Option<f64> {
    let width = container.client_width() as f64;
    (width > 0.0).then_some(width)
}
