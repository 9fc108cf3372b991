//! Checks that detaching a child frees exactly that subtree. The allocator
//! counts per thread so that the test harness running other tests in parallel
//! doesn't disturb the numbers.
use std::{
    alloc::{GlobalAlloc, Layout, System},
    cell::Cell,
};

use minenbt::Tag;

struct Counting;

#[derive(Clone, Copy, Default, Debug, PartialEq)]
struct Stats {
    allocs: usize,
    frees: usize,
    freed_bytes: usize,
    live_bytes: isize,
}

thread_local! {
    static STATS: Cell<Stats> = const { Cell::new(Stats { allocs: 0, frees: 0, freed_bytes: 0, live_bytes: 0 }) };
}

fn update(f: impl FnOnce(&mut Stats)) {
    // The thread local may already be gone while the thread shuts down.
    let _ = STATS.try_with(|s| {
        let mut stats = s.get();
        f(&mut stats);
        s.set(stats);
    });
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            update(|s| {
                s.allocs += 1;
                s.live_bytes += layout.size() as isize;
            });
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        update(|s| {
            s.frees += 1;
            s.freed_bytes += layout.size();
            s.live_bytes -= layout.size() as isize;
        });
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn stats() -> Stats {
    STATS.with(Cell::get)
}

fn root_with_big_middle_child() -> Tag {
    let mut root = Tag::compound("");
    root.add_child(Tag::new("a", 1i32)).unwrap();
    root.add_child(Tag::new("b", "x".repeat(1000))).unwrap();
    root.add_child(Tag::new("c", 3i32)).unwrap();
    root
}

#[test]
fn removing_child_frees_only_its_subtree() {
    let mut root = root_with_big_middle_child();

    let b = root.find_child("b").unwrap();
    let index = root.position_of_child(b).unwrap();

    let before = stats();
    drop(root.remove_child(index));
    let after = stats();

    // The name and the string payload, and nothing else.
    assert_eq!(after.frees - before.frees, 2);
    assert_eq!(after.freed_bytes - before.freed_bytes, 1 + 1000);
    assert_eq!(after.allocs, before.allocs);

    let names: Vec<_> = root
        .as_compound()
        .unwrap()
        .iter()
        .map(Tag::name)
        .collect();
    assert_eq!(names, ["a", "c"]);
}

#[test]
fn dropping_root_frees_everything() {
    let baseline = stats().live_bytes;

    let root = root_with_big_middle_child();
    let bytes = minenbt::to_bytes(&root).unwrap();
    let parsed = minenbt::from_bytes(&bytes).unwrap();
    assert_eq!(parsed, root);

    drop(parsed);
    drop(root);
    drop(bytes);
    assert_eq!(stats().live_bytes, baseline);
}
