pub mod dom;
pub mod js_bridge;
pub mod pointer;
pub mod services;
pub mod timers;

pub use js_bridge::{JsChunkSource, JsRangeObserver};
pub use pointer::PointerCapture;
pub use services::{BrowserTimeProvider, ConsoleLogger};
pub use timers::DebouncedCallback;
