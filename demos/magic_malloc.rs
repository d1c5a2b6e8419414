//! An interactive walkthrough of the allocator: each step pauses for
//! ENTER so you can inspect the printed pool state between
//! operations.

use std::io::Read;

use poolalloc::{visualize_memory_pool, Pool};

/// Waits until the user presses ENTER. Useful when you want to read
/// the visualisation for one step before the next mutates the pool.
fn block_until_enter_pressed() {
    println!("\n>>> Press ENTER to continue...");
    let _ = std::io::stdin().bytes().next();
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut pool = Pool::new();
    println!(
        "[start] pool_size = {}, header_size = {}",
        pool.pool_size(),
        pool.header_size()
    );
    visualize_memory_pool(&pool);
    block_until_enter_pressed();

    // --------------------------------------------------------------
    // 1) Allocate three blocks of different sizes.
    // --------------------------------------------------------------
    println!("\n[1] Allocate 128, 256, and 128 bytes");
    let p1 = pool.alloc(128).expect("alloc 128");
    let p2 = pool.alloc(256).expect("alloc 256");
    let p3 = pool.alloc(128).expect("alloc 128");
    visualize_memory_pool(&pool);
    block_until_enter_pressed();

    // --------------------------------------------------------------
    // 2) Allocate a fourth, smaller block to leave a tail of free
    //    space, then free the middle one to see a standalone free
    //    block appear on the list.
    // --------------------------------------------------------------
    println!("\n[2] Allocate 64 bytes, then free the 256-byte block");
    let p4 = pool.alloc(64).expect("alloc 64");
    pool.free(Some(p2)).expect("free p2");
    visualize_memory_pool(&pool);
    block_until_enter_pressed();

    // --------------------------------------------------------------
    // 3) Free its two neighbours to watch a three-way coalesce
    //    collapse three free blocks into one.
    // --------------------------------------------------------------
    println!("\n[3] Free the 128-byte neighbours on both sides (coalescing)");
    pool.free(Some(p4)).expect("free p4");
    pool.free(Some(p3)).expect("free p3");
    visualize_memory_pool(&pool);
    block_until_enter_pressed();

    // --------------------------------------------------------------
    // 4) Grow p1 past its current size via realloc, forcing a move
    //    and a payload copy.
    // --------------------------------------------------------------
    println!("\n[4] Write into block 1, then realloc it from 128 to 512 bytes");
    let buf = pool.payload_mut(p1, 4);
    buf.copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let p1 = pool.realloc(Some(p1), 512).expect("realloc p1").expect("grown");
    println!(
        "[4] payload after move: {:02X?}",
        pool.payload(p1, 4)
    );
    visualize_memory_pool(&pool);
    block_until_enter_pressed();

    // --------------------------------------------------------------
    // 5) Attempt a double free to see the diagnostic-only error path.
    // --------------------------------------------------------------
    println!("\n[5] Free block 1, then attempt to free it again");
    pool.free(Some(p1)).expect("free p1");
    match pool.free(Some(p1)) {
        Ok(()) => unreachable!("double free should be reported"),
        Err(err) => println!("[5] expected error: {err}"),
    }
    visualize_memory_pool(&pool);

    println!("\n[6] End of walkthrough.");
}
