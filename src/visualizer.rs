//! Pool visualisation.
//!
//! A read-only collaborator built entirely on top of [`crate::walker`],
//! a separate presentation layer over the core data structure rather
//! than formatting baked into the allocator itself. Each block is
//! emitted as one structured `tracing::info!` record, so the same data
//! can be consumed by a log aggregator as well as a human at a
//! terminal.

use tracing::info;

use crate::pool::Pool;

/// Walks `pool` contiguously and logs one `tracing` event per block.
///
/// Each event carries `index` (position in the walk), `offset`, `size`
/// (payload bytes, header excluded), and `free`. The walk covers
/// `[0, pool.pool_size())` exactly once, in strict contiguous order,
/// matching the walker's own contract.
pub fn visualize_memory_pool(pool: &Pool) {
    info!(pool_size = pool.pool_size(), "memory pool visualization");
    for (index, block) in pool.walk().enumerate() {
        info!(
            index,
            offset = block.offset,
            block_size = block.size + pool.header_size(),
            payload_size = block.size,
            free = block.free,
            "block"
        );
    }
}
