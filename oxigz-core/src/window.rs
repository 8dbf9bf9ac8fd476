//! Sliding window for LZ77 decompression.
//!
//! The window is one flat buffer three times the maximum back-reference
//! distance. Output is decoded in place at the boundary cursor, so
//! back-references are plain index arithmetic into the same slice. Once the
//! boundary passes the distance limit, the most recent `max_distance` bytes
//! are moved to the front and decoding continues from there.
//!
//! ```text
//! 0            max_distance                          3 * max_distance
//! |<-- history -->|<----------- room for new output ---------->|
//!                 ^ boundary (after compaction)
//! ```

/// Maximum back-reference distance for DEFLATE (32 KB).
pub const DEFLATE_MAX_DISTANCE: usize = 32768;

/// The window buffer is this many times the maximum distance.
const WINDOW_FACTOR: usize = 3;

/// Flat history buffer with periodic compaction.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    data: Vec<u8>,
    boundary: usize,
    max_distance: usize,
}

impl SlidingWindow {
    /// Create a window for DEFLATE (32 KB distance, 96 KB buffer).
    pub fn new() -> Self {
        Self::with_max_distance(DEFLATE_MAX_DISTANCE)
    }

    /// Create a window for an arbitrary maximum distance.
    ///
    /// DEFLATE decoding needs at least 259 bytes of room past a compacted
    /// boundary, so `max_distance` should be 130 or more.
    ///
    /// # Panics
    ///
    /// Panics if `max_distance` is zero. The size comes from the caller, not
    /// from stream data, so it is a precondition rather than a `GzError`.
    pub fn with_max_distance(max_distance: usize) -> Self {
        assert!(max_distance > 0, "max_distance must be greater than 0");
        Self {
            data: vec![0; max_distance * WINDOW_FACTOR],
            boundary: 0,
            max_distance,
        }
    }

    /// Next write position.
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// Maximum back-reference distance this window keeps.
    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Total buffer size.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The buffer from the boundary onward.
    pub fn write_buffer(&mut self) -> &mut [u8] {
        &mut self.data[self.boundary..]
    }

    /// The whole buffer together with the boundary, for in-place decoding
    /// that also reads history before the boundary.
    pub fn decode_area(&mut self) -> (&mut [u8], usize) {
        (&mut self.data, self.boundary)
    }

    /// The `n` bytes just written past the boundary.
    pub fn pending(&self, n: usize) -> &[u8] {
        &self.data[self.boundary..self.boundary + n]
    }

    /// History bytes before the boundary (at most `max_distance` after a
    /// compaction).
    pub fn history(&self) -> &[u8] {
        &self.data[..self.boundary]
    }

    /// Advance the boundary past `n` freshly written bytes.
    ///
    /// If the boundary would pass `max_distance`, the last `max_distance`
    /// bytes are moved to the front. Positions at or after `max_distance`
    /// are invalid afterwards.
    pub fn slide(&mut self, n: usize) {
        let end = self.boundary + n;
        debug_assert!(end <= self.data.len(), "slide past the end of the window");
        if end > self.max_distance {
            self.data.copy_within(end - self.max_distance..end, 0);
            self.boundary = self.max_distance;
        } else {
            self.boundary = end;
        }
    }

    /// Append raw bytes (e.g. a stored block), keeping at most
    /// `max_distance` bytes of history.
    pub fn extend(&mut self, bytes: &[u8]) {
        let tail = &bytes[bytes.len().saturating_sub(self.max_distance)..];
        self.data[self.boundary..self.boundary + tail.len()].copy_from_slice(tail);
        self.slide(tail.len());
    }

    /// Forget all history. Used at member boundaries.
    pub fn reset(&mut self) {
        self.boundary = 0;
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}
