//! Read-only contiguous iteration over every block in a pool, free and
//! allocated alike. This is the only way to observe the pool's layout
//! from outside the allocator core; the visualiser is built entirely on
//! top of it.

use crate::block::{self, HEADER_SIZE};

/// A snapshot of one block's metadata as yielded by [`BlockWalker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Offset of the block's header, not its payload.
    pub offset: usize,
    /// Payload size in bytes (header excluded).
    pub size: usize,
    pub free: bool,
}

/// Walks a pool's byte buffer by contiguous stride, yielding one
/// [`BlockInfo`] per block until the cursor runs past the end of the
/// buffer. Never mutates the pool.
pub struct BlockWalker<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> BlockWalker<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, cursor: 0 }
    }
}

impl<'a> Iterator for BlockWalker<'a> {
    type Item = BlockInfo;

    fn next(&mut self) -> Option<BlockInfo> {
        if self.cursor + HEADER_SIZE > self.buf.len() {
            return None;
        }
        // SAFETY: the bound above guarantees the header fits in `buf`.
        let header = unsafe { block::read_header(self.buf, self.cursor) };
        let info = BlockInfo {
            offset: self.cursor,
            size: header.size,
            free: header.free,
        };
        self.cursor += HEADER_SIZE + header.size;
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    #[test]
    fn fresh_pool_walks_as_one_free_block() {
        let pool = Pool::new();
        let blocks: Vec<_> = pool.walk().collect();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].free);
        assert_eq!(blocks[0].offset, 0);
        assert_eq!(blocks[0].size, pool.pool_size() - pool.header_size());
    }

    #[test]
    fn walk_covers_the_pool_exactly_once() {
        let mut pool = Pool::new();
        pool.alloc(128).unwrap();
        pool.alloc(64).unwrap();

        let blocks: Vec<_> = pool.walk().collect();
        let covered: usize = blocks.iter().map(|b| b.size + pool.header_size()).sum();
        assert_eq!(covered, pool.pool_size());

        for window in blocks.windows(2) {
            let expected_next = window[0].offset + pool.header_size() + window[0].size;
            assert_eq!(window[1].offset, expected_next);
        }
    }
}
