//! Error taxonomy for pool operations.
//!
//! Allocation and resize failures are diagnostic, not structural: every
//! fallible [`Pool`](crate::pool::Pool) method returns one of these
//! variants instead of panicking or aborting. `free` additionally logs
//! its error at `warn` level (see `pool::Pool::free`) since its caller
//! often discards the result, matching real `free()` semantics.

use thiserror::Error;

/// Everything that can go wrong when talking to a [`Pool`](crate::pool::Pool).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The requested size is zero, overflows, or exceeds the pool's
    /// usable capacity (`pool_size - header_size`).
    #[error("requested allocation of {requested} bytes exceeds the pool's maximum of {max}")]
    InvalidSize { requested: usize, max: usize },

    /// No free block large enough (after alignment) was found.
    #[error("no free block of at least {requested} bytes is available")]
    OutOfMemory { requested: usize },

    /// `free` was called with no pointer/offset at all.
    #[error("attempted to free a null pointer")]
    NullFree,

    /// `free` was called on a block already marked free. The free list
    /// and block state are left untouched.
    #[error("attempted to free block at offset {offset}, which is already free")]
    DoubleFree { offset: usize },

    /// `Pool::with_config` was given a configuration it can't honour.
    #[error("invalid pool configuration: {reason}")]
    InvalidConfig { reason: &'static str },
}
