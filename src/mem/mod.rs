//! Transient memory for text-processing routines.
//!
//! [`GrowableBuffer`] is the "make room for N bytes" primitive.
//! [`ScratchArena`] keeps one such buffer per editor process and lends it
//! to one borrower at a time, falling back to private blocks when it is
//! already lent.

mod growable;
mod scratch;

pub use growable::{GrowableBuffer, MemError};
pub use scratch::{ScratchArena, ScratchBuf, acquire_in};
