//! The allocator core: free-list management, first-fit placement,
//! splitting, coalescing, and resize.
//!
//! Every public method here mutates a single intrusive data structure
//! (the free list) threaded through the same bytes it hands out to
//! callers, so each one is responsible for restoring all six invariants
//! documented on [`Pool`] before it returns.

use tracing::warn;

use crate::align::{align_up, is_power_of_two};
use crate::block::{self, RawHeader, HEADER_SIZE};
use crate::config::PoolConfig;
use crate::error::AllocError;
use crate::walker::BlockWalker;

/// A fixed-size byte pool managed by a first-fit, boundary-tag
/// allocator with an address-ordered, coalescing free list.
///
/// `Pool` owns a single contiguous byte buffer (no global state, no
/// `static`s). [`alloc`](Pool::alloc) carves a block out of the free
/// list; [`free`](Pool::free) returns one, coalescing with physically
/// adjacent free neighbours. The following invariants hold after every
/// public method returns:
///
/// 1. Contiguity: walking the pool by `header.size` tiles `[0, pool_size)`
///    exactly, with no gaps or overlaps.
/// 2. No block has a zero-byte payload.
/// 3. The free list is strictly address-increasing.
/// 4. A block is on the free list iff its `free` flag is set.
/// 5. No two physically adjacent blocks are both free.
/// 6. The last free-list entry has no successor.
///
/// `Pool` is not `Sync`: concurrent access from multiple threads needs
/// external synchronisation, the same single-threaded contract the
/// allocator was designed around.
pub struct Pool {
    buf: Box<[u8]>,
    free_list_head: Option<usize>,
    config: PoolConfig,
}

impl Pool {
    /// Builds a pool of the default size (1024 bytes, 8-byte alignment),
    /// initialised to a single free block.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default()).expect("default config is always valid")
    }

    /// Builds a pool per `config`, validating that:
    /// - `alignment` is a power of two;
    /// - `alignment` evenly divides `HEADER_SIZE`, so every payload
    ///   offset (always a multiple of `HEADER_SIZE` bytes past another
    ///   aligned offset) is itself aligned;
    /// - `pool_size` can hold at least one header;
    /// - `pool_size - HEADER_SIZE` (the pool's usable capacity) is
    ///   itself a multiple of `alignment`, so the full-pool allocation
    ///   `alloc(pool_size - HEADER_SIZE)` can always succeed: rounding
    ///   any `n` up to `alignment` never pushes it past an
    ///   already-aligned capacity.
    pub fn with_config(config: PoolConfig) -> Result<Self, AllocError> {
        if !is_power_of_two(config.alignment) {
            return Err(AllocError::InvalidConfig {
                reason: "alignment must be a power of two",
            });
        }
        if HEADER_SIZE % config.alignment != 0 {
            return Err(AllocError::InvalidConfig {
                reason: "alignment must evenly divide the block header size",
            });
        }
        if config.pool_size <= HEADER_SIZE {
            return Err(AllocError::InvalidConfig {
                reason: "pool_size must be larger than one block header",
            });
        }
        if (config.pool_size - HEADER_SIZE) % config.alignment != 0 {
            return Err(AllocError::InvalidConfig {
                reason: "pool_size minus the header size must be a multiple of alignment",
            });
        }

        let mut pool = Self {
            buf: vec![0u8; config.pool_size].into_boxed_slice(),
            free_list_head: None,
            config,
        };
        pool.initialize_pool();
        Ok(pool)
    }

    /// Resets the pool to a single maximal free block, as if freshly
    /// constructed. Invalidates every offset previously handed out by
    /// this pool.
    pub fn initialize_pool(&mut self) {
        let size = self.buf.len() - HEADER_SIZE;
        self.write_header(
            0,
            RawHeader {
                size,
                free: true,
                next_free: block::NIL,
            },
        );
        self.free_list_head = Some(0);
    }

    /// Total byte capacity of the pool, header overhead included.
    pub fn pool_size(&self) -> usize {
        self.buf.len()
    }

    /// Fixed per-block header overhead in bytes.
    pub fn header_size(&self) -> usize {
        HEADER_SIZE
    }

    /// Read-only contiguous iteration over every block, free and
    /// allocated alike. Used by [`crate::visualize_memory_pool`].
    pub fn walk(&self) -> BlockWalker<'_> {
        BlockWalker::new(&self.buf)
    }

    /// Borrows `len` payload bytes starting at `offset`, a thin safe
    /// shim over the pool's backing buffer for callers (e.g. the demo
    /// binary) that want to read what they previously wrote, without
    /// exposing block headers.
    pub fn payload(&self, offset: usize, len: usize) -> &[u8] {
        &self.buf[offset..offset + len]
    }

    /// Mutably borrows `len` payload bytes starting at `offset`. See
    /// [`Pool::payload`].
    pub fn payload_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.buf[offset..offset + len]
    }

    fn header(&self, offset: usize) -> RawHeader {
        // SAFETY: every offset this module hands to `header`/`write_header`
        // is either 0 or was produced by a previous split/walk, so it
        // always has room for a full header before `buf`'s end.
        unsafe { block::read_header(&self.buf, offset) }
    }

    fn write_header(&mut self, offset: usize, header: RawHeader) {
        unsafe { block::write_header(&mut self.buf, offset, header) }
    }

    /// Allocates `n` bytes, first-fit, returning the payload offset.
    ///
    /// `n` is rounded up to the pool's configured alignment before the
    /// free list is searched. Fails with [`AllocError::InvalidSize`] if
    /// `n` is zero or exceeds the pool's usable capacity, or
    /// [`AllocError::OutOfMemory`] if no free block is large enough.
    pub fn alloc(&mut self, n: usize) -> Result<usize, AllocError> {
        let max = self.buf.len() - HEADER_SIZE;
        if n == 0 || n > max {
            return Err(AllocError::InvalidSize { requested: n, max });
        }
        // `with_config` guarantees `max % alignment == 0`, so for any
        // `n <= max`, `align_up(n, alignment) <= max` too: the boundary
        // case `alloc(max)` always finds a fit rather than spuriously
        // reporting out-of-memory once rounded up.
        let aligned = align_up(n, self.config.alignment);
        self.alloc_aligned(aligned)
    }

    fn alloc_aligned(&mut self, aligned: usize) -> Result<usize, AllocError> {
        let mut prev: Option<usize> = None;
        let mut cursor = self.free_list_head;

        while let Some(offset) = cursor {
            let header = self.header(offset);
            if header.size >= aligned {
                return Ok(self.place(prev, offset, header, aligned));
            }
            prev = Some(offset);
            cursor = header.next_free();
        }

        Err(AllocError::OutOfMemory { requested: aligned })
    }

    /// Carves `aligned` bytes out of the free block at `offset`,
    /// splitting off a remainder block when there's room for one (a new
    /// header plus at least one payload byte), then unlinks it from the
    /// free list. Returns the payload offset.
    fn place(
        &mut self,
        prev: Option<usize>,
        offset: usize,
        mut header: RawHeader,
        aligned: usize,
    ) -> usize {
        let replacement = if header.size > aligned + HEADER_SIZE {
            let remainder_offset = offset + HEADER_SIZE + aligned;
            let remainder = RawHeader {
                size: header.size - aligned - HEADER_SIZE,
                free: true,
                next_free: header.next_free,
            };
            self.write_header(remainder_offset, remainder);
            header.size = aligned;
            Some(remainder_offset)
        } else {
            header.next_free()
        };

        header.free = false;
        self.write_header(offset, header);
        self.unlink_free(prev, offset, replacement);

        offset + HEADER_SIZE
    }

    /// Removes the free-list entry at `at`, splicing `replacement` in
    /// its place (the predecessor's new successor, or the new head).
    fn unlink_free(&mut self, prev: Option<usize>, at: usize, replacement: Option<usize>) {
        match prev {
            Some(p) => {
                let mut p_header = self.header(p);
                p_header.set_next_free(replacement);
                self.write_header(p, p_header);
            }
            None => {
                debug_assert_eq!(self.free_list_head, Some(at));
                self.free_list_head = replacement;
            }
        }
    }

    /// Frees the block whose payload begins at `offset`.
    ///
    /// `None` is a no-op reported as [`AllocError::NullFree`]. Freeing a
    /// block that is already free is a no-op reported as
    /// [`AllocError::DoubleFree`] — neither the block nor the free list
    /// is touched in that case. Otherwise the block is marked free and
    /// spliced back into the address-ordered free list, coalescing with
    /// a physically adjacent successor first, then a physically
    /// adjacent predecessor.
    pub fn free(&mut self, offset: Option<usize>) -> Result<(), AllocError> {
        let Some(offset) = offset else {
            warn!("attempted to free a null pointer");
            return Err(AllocError::NullFree);
        };

        let block_offset = offset - HEADER_SIZE;
        let mut header = self.header(block_offset);
        if header.free {
            warn!(offset = block_offset, "attempted to free an already-free block");
            return Err(AllocError::DoubleFree { offset: block_offset });
        }
        header.free = true;

        match self.free_list_head {
            None => {
                header.set_next_free(None);
                self.write_header(block_offset, header);
                self.free_list_head = Some(block_offset);
            }
            Some(head) => {
                self.write_header(block_offset, header);
                self.insert_free(block_offset, head);
            }
        }
        Ok(())
    }

    /// Splices the newly-freed block at `block_offset` into the
    /// address-ordered free list (current head at `head`), coalescing
    /// with physically adjacent neighbours along the way: the successor
    /// first, then the predecessor, so a block freed between two free
    /// neighbours ends up as a single merged block.
    fn insert_free(&mut self, block_offset: usize, head: usize) {
        let mut prev: Option<usize> = None;
        let mut cursor = Some(head);
        while let Some(c) = cursor {
            if c > block_offset {
                break;
            }
            prev = Some(c);
            cursor = self.header(c).next_free();
        }
        let succ = cursor;

        let mut block = self.header(block_offset);
        match succ {
            Some(s) if self.adjacent(block_offset, block.size, s) => {
                let s_header = self.header(s);
                block.size += HEADER_SIZE + s_header.size;
                block.set_next_free(s_header.next_free());
            }
            other => block.set_next_free(other),
        }
        self.write_header(block_offset, block);

        match prev {
            Some(p) => {
                let mut p_header = self.header(p);
                let block = self.header(block_offset);
                if self.adjacent(p, p_header.size, block_offset) {
                    p_header.size += HEADER_SIZE + block.size;
                    p_header.set_next_free(block.next_free());
                } else {
                    p_header.set_next_free(Some(block_offset));
                }
                self.write_header(p, p_header);
            }
            None => {
                self.free_list_head = Some(block_offset);
            }
        }
    }

    /// Whether the block of `size` bytes at `left_offset` sits
    /// immediately before `right_offset` with no gap.
    fn adjacent(&self, left_offset: usize, size: usize, right_offset: usize) -> bool {
        left_offset + HEADER_SIZE + size == right_offset
    }

    /// Equivalent to `alloc(count * elem_size)` followed by zero-filling
    /// the returned payload. Overflow of `count * elem_size` is reported
    /// as [`AllocError::InvalidSize`] rather than wrapping.
    pub fn alloc_zeroed(&mut self, count: usize, elem_size: usize) -> Result<usize, AllocError> {
        let total = count.checked_mul(elem_size).ok_or_else(|| AllocError::InvalidSize {
            requested: count.saturating_mul(elem_size),
            max: self.buf.len() - HEADER_SIZE,
        })?;
        let offset = self.alloc(total)?;
        let header = self.header(offset - HEADER_SIZE);
        self.buf[offset..offset + header.size].fill(0);
        Ok(offset)
    }

    /// Resizes the allocation at `offset` to `new_size` bytes.
    ///
    /// - `offset = None` behaves as `alloc(new_size)`.
    /// - `new_size == 0` frees `offset` and returns `Ok(None)`.
    /// - a `offset` that was already freed behaves as `alloc(new_size)`;
    ///   the original block is not rescued.
    /// - shrinking returns the same offset unchanged — slack is not
    ///   reclaimed in this version.
    /// - growing allocates a new block, copies `min(old_size, new_size)`
    ///   payload bytes over, frees the old block, and returns the new
    ///   offset. On allocation failure the old block is left allocated
    ///   and untouched.
    pub fn realloc(&mut self, offset: Option<usize>, new_size: usize) -> Result<Option<usize>, AllocError> {
        let Some(offset) = offset else {
            return self.alloc(new_size).map(Some);
        };

        if new_size == 0 {
            // Diagnostic-only: a double/null free here is reported via
            // the Result this method already returns as Ok(None).
            let _ = self.free(Some(offset));
            return Ok(None);
        }

        let block_offset = offset - HEADER_SIZE;
        let header = self.header(block_offset);
        if header.free {
            return self.alloc(new_size).map(Some);
        }

        let current_size = header.size;
        if new_size <= current_size {
            return Ok(Some(offset));
        }

        // Allocate-then-copy-then-free, in that order: freeing first (as
        // the allocator this crate is modelled on used to) would let the
        // new allocation reuse and clobber the very bytes being copied.
        let new_offset = self.alloc(new_size)?;
        let to_copy = current_size.min(new_size);
        // SAFETY: `offset` and `new_offset` denote disjoint, in-bounds
        // payload ranges of at least `to_copy` bytes each — `new_offset`
        // was just carved from a block distinct from the one at `offset`,
        // which is still allocated at this point.
        unsafe {
            let src = self.buf.as_ptr().add(offset);
            let dst = self.buf.as_mut_ptr().add(new_offset);
            std::ptr::copy_nonoverlapping(src, dst, to_copy);
        }
        let _ = self.free(Some(offset));
        Ok(Some(new_offset))
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
