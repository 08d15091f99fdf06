use serde::Serialize;

use super::value_objects::{ChunkInterval, Timestamp};

/// One fixed-duration bucket of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk<D> {
    pub from: Timestamp,
    pub to: Timestamp,
    pub data: Vec<D>,
}

impl<D> Chunk<D> {
    /// Empty chunk starting at `from` and spanning one interval.
    pub fn new(from: Timestamp, interval: ChunkInterval) -> Self {
        Self {
            from,
            to: Timestamp::from_millis(from.value().saturating_add(interval.duration_ms())),
            data: Vec::new(),
        }
    }

    /// Chunk `index` intervals away from the anchor.
    pub fn at_index(anchor: Timestamp, index: i64, interval: ChunkInterval) -> Self {
        let offset = index.saturating_mul(interval.duration_ms() as i64);
        Self::new(anchor.offset(offset), interval)
    }

    pub fn with_data(mut self, data: Vec<D>) -> Self {
        self.data = data;
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.to.value().saturating_sub(self.from.value())
    }
}

/// Contiguous set of empty chunks for the given indices.
pub fn chunk_range<D>(anchor: Timestamp, interval: ChunkInterval, indices: &[i64]) -> Vec<Chunk<D>> {
    indices
        .iter()
        .map(|&index| Chunk::at_index(anchor, index, interval))
        .collect()
}

/// Boundary to the data store that fills chunks.
///
/// Returned chunks keep the bounds of `Chunk::at_index(anchor, index, interval)`.
pub trait ChunkSource<D> {
    fn get_chunk(&self, anchor: Timestamp, index: i64, interval: ChunkInterval) -> Chunk<D>;
}

/// Source that only produces factory chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyChunkSource;

impl<D> ChunkSource<D> for EmptyChunkSource {
    fn get_chunk(&self, anchor: Timestamp, index: i64, interval: ChunkInterval) -> Chunk<D> {
        Chunk::at_index(anchor, index, interval)
    }
}

/// Adapter turning a closure into a chunk source.
pub struct FnChunkSource<F>(pub F);

impl<D, F> ChunkSource<D> for FnChunkSource<F>
where
    F: Fn(Timestamp, i64, ChunkInterval) -> Chunk<D>,
{
    fn get_chunk(&self, anchor: Timestamp, index: i64, interval: ChunkInterval) -> Chunk<D> {
        (self.0)(anchor, index, interval)
    }
}

/// Bounded array of the currently buffered chunks.
///
/// Chunks enter the cache as empty factory chunks and stay pending until
/// their data is loaded from a [`ChunkSource`] or filled in by the caller.
#[derive(Debug, Clone)]
pub struct ChunkCache<D> {
    chunks: Vec<Chunk<D>>,
    pending: Vec<Timestamp>,
    capacity: usize,
}

impl<D> ChunkCache<D> {
    pub fn new(capacity: usize) -> Self {
        Self { chunks: Vec::with_capacity(capacity), pending: Vec::new(), capacity }
    }

    pub fn chunks(&self) -> &[Chunk<D>] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered chunks still waiting for their data.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.chunks.truncate(capacity);
        let chunks = &self.chunks;
        self.pending.retain(|from| chunks.iter().any(|chunk| chunk.from == *from));
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.pending.clear();
    }

    /// Align the cache with `indices`: keep chunks that are still wanted,
    /// create empty ones for the rest and mark them pending, drop everything
    /// else. Returns the number of pending chunks.
    pub fn align(&mut self, anchor: Timestamp, interval: ChunkInterval, indices: &[i64]) -> usize {
        let mut previous: Vec<Option<Chunk<D>>> = self.chunks.drain(..).map(Some).collect();
        let was_pending = std::mem::take(&mut self.pending);

        for &index in indices.iter().take(self.capacity) {
            let from = Chunk::<D>::at_index(anchor, index, interval).from;
            let reused = previous
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|chunk| chunk.from == from))
                .and_then(Option::take);

            match reused {
                Some(chunk) => {
                    if was_pending.contains(&chunk.from) {
                        self.pending.push(chunk.from);
                    }
                    self.chunks.push(chunk);
                }
                None => {
                    self.pending.push(from);
                    self.chunks.push(Chunk::at_index(anchor, index, interval));
                }
            }
        }

        self.pending.len()
    }

    /// Hand out the pending chunks as indices relative to `anchor`.
    pub fn take_pending(&mut self, anchor: Timestamp, interval: ChunkInterval) -> Vec<i64> {
        let interval_ms = interval.duration_ms() as i128;
        self.pending
            .drain(..)
            .map(|from| ((from.value() as i128 - anchor.value() as i128) / interval_ms) as i64)
            .collect()
    }

    /// Put a loaded chunk into the slot with the same bounds.
    /// Returns false when that slot is no longer buffered.
    pub fn fill(&mut self, chunk: Chunk<D>) -> bool {
        self.pending.retain(|from| *from != chunk.from);
        match self.chunks.iter_mut().find(|slot| slot.from == chunk.from && slot.to == chunk.to) {
            Some(slot) => {
                *slot = chunk;
                true
            }
            None => false,
        }
    }

    /// Load every pending chunk from `source`. Returns the number loaded.
    pub fn load<S>(&mut self, anchor: Timestamp, interval: ChunkInterval, source: &S) -> usize
    where
        S: ChunkSource<D> + ?Sized,
    {
        let mut loaded = 0;
        for index in self.take_pending(anchor, interval) {
            if self.fill(source.get_chunk(anchor, index, interval)) {
                loaded += 1;
            }
        }
        loaded
    }

    /// [`align`](Self::align) followed by [`load`](Self::load).
    /// Returns the number of chunks fetched.
    pub fn sync<S>(&mut self, anchor: Timestamp, interval: ChunkInterval, indices: &[i64], source: &S) -> usize
    where
        S: ChunkSource<D> + ?Sized,
    {
        self.align(anchor, interval, indices);
        self.load(anchor, interval, source)
    }
}
