use std::cell::{Cell, RefCell, RefMut};
use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use super::growable::{GrowableBuffer, MemError};
use crate::message::{MessageLevel, MessageSink};

/// The process-wide scratch slot.
///
/// One reusable block lent to one borrower at a time. The in-use marker is
/// the `RefCell` borrow flag: it polices reentrancy on a single thread, so
/// a routine that acquires scratch space while one of its callers still
/// holds it gets a private block instead of aliasing the caller's bytes.
#[derive(Debug, Default)]
pub struct ScratchArena {
    slot: RefCell<GrowableBuffer>,
    capacity: Cell<usize>,
    grow_count: Cell<usize>,
}

impl ScratchArena {
    /// Create an arena whose slot has not been allocated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena whose slot is pre-grown to `capacity` bytes.
    ///
    /// # Errors
    /// Returns [`MemError::OutOfMemory`] if the slot cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, MemError> {
        let slot = GrowableBuffer::with_capacity(capacity)?;
        Ok(Self {
            capacity: Cell::new(slot.capacity()),
            slot: RefCell::new(slot),
            grow_count: Cell::new(0),
        })
    }

    /// Capacity of the shared slot, whether or not it is lent out.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Whether a shared borrow is outstanding.
    pub fn is_in_use(&self) -> bool {
        self.slot.try_borrow_mut().is_err()
    }

    /// How many times the shared slot has been reallocated.
    pub fn grow_count(&self) -> usize {
        self.grow_count.get()
    }

    /// Borrow at least `requested` bytes of scratch space.
    ///
    /// Returns the shared slot when it is free, otherwise a private block.
    /// Release by calling [`ScratchBuf::release`] or dropping the buffer.
    ///
    /// # Errors
    /// Returns [`MemError::OutOfMemory`] after reporting it to `sink`. A
    /// failed shared acquisition leaves the slot free.
    pub fn acquire(
        &self,
        requested: usize,
        sink: &mut dyn MessageSink,
    ) -> Result<ScratchBuf<'_>, MemError> {
        let Ok(mut slot) = self.slot.try_borrow_mut() else {
            debug!(requested, "scratch slot in use, lending a private block");
            return ScratchBuf::private(requested, sink);
        };
        self.grow(&mut slot, requested, sink)?;
        Ok(ScratchBuf {
            lease: Lease::Shared { slot, arena: self },
        })
    }

    fn grow(
        &self,
        slot: &mut GrowableBuffer,
        requested: usize,
        sink: &mut dyn MessageSink,
    ) -> Result<(), MemError> {
        match slot.ensure_capacity(requested) {
            Ok(true) => {
                self.capacity.set(slot.capacity());
                self.grow_count.set(self.grow_count.get() + 1);
                debug!(requested, capacity = slot.capacity(), "scratch slot grown");
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(err) => Err(report(err, sink)),
        }
    }
}

/// Borrow scratch space from `arena` if there is one.
///
/// Before the editor is fully initialized there is no arena; every
/// acquisition is then served by a private block.
///
/// # Errors
/// Returns [`MemError::OutOfMemory`] after reporting it to `sink`.
pub fn acquire_in<'a>(
    arena: Option<&'a ScratchArena>,
    requested: usize,
    sink: &mut dyn MessageSink,
) -> Result<ScratchBuf<'a>, MemError> {
    match arena {
        Some(arena) => arena.acquire(requested, sink),
        None => ScratchBuf::private(requested, sink),
    }
}

#[derive(Debug)]
enum Lease<'a> {
    Shared {
        slot: RefMut<'a, GrowableBuffer>,
        arena: &'a ScratchArena,
    },
    Private(GrowableBuffer),
}

/// A borrowed scratch buffer.
///
/// Dereferences to the whole usable block. Contents beyond what the
/// borrower wrote are unspecified.
#[derive(Debug)]
pub struct ScratchBuf<'a> {
    lease: Lease<'a>,
}

impl ScratchBuf<'_> {
    fn private(requested: usize, sink: &mut dyn MessageSink) -> Result<Self, MemError> {
        let mut block = GrowableBuffer::new();
        block
            .ensure_capacity(requested)
            .map_err(|err| report(err, sink))?;
        Ok(Self {
            lease: Lease::Private(block),
        })
    }

    /// Whether this buffer is the arena's shared slot.
    pub fn is_shared(&self) -> bool {
        matches!(self.lease, Lease::Shared { .. })
    }

    pub fn capacity(&self) -> usize {
        match &self.lease {
            Lease::Shared { slot, .. } => slot.capacity(),
            Lease::Private(block) => block.capacity(),
        }
    }

    /// Grow the buffer to at least `requested` bytes, keeping its contents.
    ///
    /// # Errors
    /// Returns [`MemError::OutOfMemory`] after reporting it to `sink`. The
    /// buffer stays valid and keeps its old capacity.
    pub fn extend(&mut self, requested: usize, sink: &mut dyn MessageSink) -> Result<(), MemError> {
        match &mut self.lease {
            Lease::Shared { slot, arena } => arena.grow(slot, requested, sink),
            Lease::Private(block) => block
                .ensure_capacity(requested)
                .map(|_| ())
                .map_err(|err| report(err, sink)),
        }
    }

    /// Give the buffer back. Shared buffers become available to the next
    /// borrower; private blocks are freed.
    pub fn release(self) {}
}

impl Deref for ScratchBuf<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.lease {
            Lease::Shared { slot, .. } => slot.as_slice(),
            Lease::Private(block) => block.as_slice(),
        }
    }
}

impl DerefMut for ScratchBuf<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        match &mut self.lease {
            Lease::Shared { slot, .. } => slot.as_mut_slice(),
            Lease::Private(block) => block.as_mut_slice(),
        }
    }
}

fn report(err: MemError, sink: &mut dyn MessageSink) -> MemError {
    warn!(%err, "scratch allocation failed");
    sink.message(MessageLevel::SysErr, &err.to_string());
    err
}
