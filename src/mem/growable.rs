use thiserror::Error;

/// Smallest block the buffer ever grows to.
const MIN_GROWTH: usize = 64;

/// Allocation errors surfaced by the memory layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    #[error("out of memory: could not grow buffer to {requested} bytes")]
    OutOfMemory { requested: usize },
}

/// An owned byte block whose usable length is its capacity.
///
/// Growth only ever happens through [`GrowableBuffer::ensure_capacity`].
/// Bytes past the previously requested size have unspecified contents.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GrowableBuffer {
    bytes: Vec<u8>,
}

impl GrowableBuffer {
    /// Create an empty buffer with capacity 0. Does not allocate.
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create a buffer that already holds at least `capacity` bytes.
    ///
    /// # Errors
    /// Returns [`MemError::OutOfMemory`] if the block cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, MemError> {
        let mut buf = Self::new();
        buf.ensure_capacity(capacity)?;
        Ok(buf)
    }

    /// Number of usable bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Make sure at least `requested` bytes are usable.
    ///
    /// A request that is already covered is a no-op. Otherwise the block is
    /// reallocated to at least `requested` bytes and every existing byte is
    /// kept. Returns `true` when a reallocation happened.
    ///
    /// # Errors
    /// Returns [`MemError::OutOfMemory`] when the allocator refuses or the
    /// size overflows. The buffer is left exactly as it was.
    pub fn ensure_capacity(&mut self, requested: usize) -> Result<bool, MemError> {
        let current = self.bytes.len();
        if requested <= current {
            return Ok(false);
        }

        let target = growth_target(current, requested);
        if self.bytes.try_reserve_exact(target - current).is_err() {
            // The amortized target may be what overflowed; retry with the
            // bare request before giving up.
            if target == requested || self.bytes.try_reserve_exact(requested - current).is_err() {
                return Err(MemError::OutOfMemory { requested });
            }
            self.bytes.resize(requested, 0);
            return Ok(true);
        }
        self.bytes.resize(target, 0);
        Ok(true)
    }
}

/// Size a growing block is rounded up to: double the old size, never below
/// the request or the floor.
fn growth_target(current: usize, requested: usize) -> usize {
    requested.max(current.saturating_mul(2)).max(MIN_GROWTH)
}
