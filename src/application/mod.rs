pub mod timeline_service;

pub use timeline_service::{NoopRangeObserver, RangeObserver, TimelineService};
