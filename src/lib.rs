//! # poolalloc — a first-fit, boundary-tag byte-pool allocator
//!
//! A bytewise heap allocator operating over a single fixed-size byte
//! region (the "pool"). It exposes the classical four primitives —
//! [`Pool::alloc`], [`Pool::free`], [`Pool::alloc_zeroed`], and
//! [`Pool::realloc`] — and maintains an address-ordered, intrusive free
//! list so that freed regions are reused and physically adjacent free
//! regions coalesce automatically.
//!
//! ## Crate Structure
//!
//! ```text
//!   poolalloc
//!   ├── align      - Alignment helpers (align_up!, is_power_of_two)
//!   ├── block      - In-band block header encoding (internal)
//!   ├── config     - PoolConfig: the two construction-time tunables
//!   ├── error      - AllocError, the typed error taxonomy
//!   ├── walker     - BlockWalker: read-only contiguous block iteration
//!   ├── pool       - Pool: the allocator core (alloc/free/alloc_zeroed/realloc)
//!   └── visualizer - visualize_memory_pool: a tracing-based pool dump
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use poolalloc::Pool;
//!
//! let mut pool = Pool::new();
//! let p = pool.alloc(128).unwrap();
//! pool.free(Some(p)).unwrap();
//! ```
//!
//! ## How It Works
//!
//! Every block in the pool begins with a header carrying `size`,
//! `free`, and `next_free` (see [`block`] internals), followed by its
//! payload bytes:
//!
//! ```text
//!   Single Block:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │      Header (H)       │           Payload              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ free: bool      │  │  │                          │  │
//!   │  │ next_free: Nil  │  │  │      N bytes usable      │  │
//!   │  └─────────────────┘  │  │                          │  │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── offset returned to the caller
//! ```
//!
//! `alloc` walks the free list first-fit, splits off a remainder block
//! when there's room for one, and returns the payload offset. `free`
//! marks a block free and splices it back into the address-ordered
//! free list, coalescing with a physically adjacent successor and then
//! predecessor so three contiguous free blocks collapse into one.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: [`Pool`] is not `Sync`; concurrent use
//!   needs external synchronisation.
//! - **One pool per `Pool` value**: no cross-pool coalescing, no
//!   automatic growth.
//! - **First-fit, not best-fit**: deliberately simple placement, see
//!   [`pool`] for the policy.
//!
//! ## Safety
//!
//! The allocator core (`pool`, `block`, `walker`) is entirely
//! offset-based and panics only on internal invariant violations; it
//! never dereferences a raw pointer from safe code. The handful of
//! `unsafe` blocks are confined to in-band header (de)serialisation
//! (`block::read_header`/`write_header`) and the payload copy in
//! [`Pool::realloc`], each carrying a safety comment.

pub mod align;
mod block;
pub mod config;
pub mod error;
pub mod pool;
pub mod visualizer;
pub mod walker;

pub use config::PoolConfig;
pub use error::AllocError;
pub use pool::Pool;
pub use visualizer::visualize_memory_pool;
pub use walker::{BlockInfo, BlockWalker};
