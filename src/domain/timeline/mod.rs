pub mod chunk;
pub mod debounce;
pub mod range;
pub mod value_objects;
pub mod virtualizer;
pub mod windowing;

pub use chunk::{Chunk, ChunkCache, ChunkSource, EmptyChunkSource, FnChunkSource, chunk_range};
pub use debounce::{DEFAULT_DEBOUNCE_MS, Debouncer};
pub use range::{ChunkRect, parse_chunk_bounds, range_under_marker};
pub use value_objects::{ChunkInterval, TimeRange, Timestamp};
pub use virtualizer::{ChunkLoading, DragState, ScrollOutcome, TimelineVirtualizer};
pub use windowing::{INDEX_LIMIT, MAX_AMOUNT, MAX_TOLERANCE, VirtualizerSettings, WindowState, compute_window, initial_window};
