//! A paged arena allocator for per-frame data.
//!
//! The renderer allocates transient per-vertex data every draw call. A
//! [`Arena`] amortizes that cost: allocation is a bump of a counter, and
//! the backing pages survive [`reset`][Arena::reset] so that later frames
//! reuse the memory of earlier ones instead of returning to the global
//! allocator.

use alloc::{boxed::Box, vec, vec::Vec};
use core::mem::size_of;
use core::ops::Range;

/// Default page size, in bytes.
const PAGE_BYTES: usize = 1 << 20;

/// A growable arena of `T`s, backed by fixed-size pages.
///
/// Allocation only bumps a length counter; a page is materialized the
/// first time an element in it is written. Indices are stable until the
/// arena is reset.
#[derive(Clone, Debug, Default)]
pub struct Arena<T> {
    pages: Vec<Box<[T]>>,
    page_len: usize,
    len: usize,
}

impl<T: Clone + Default> Arena<T> {
    /// Returns an empty arena with the default page size.
    pub fn new() -> Self {
        Self::with_page_size(PAGE_BYTES)
    }

    /// Returns an empty arena with pages of `bytes` bytes.
    ///
    /// Mostly useful for exercising page-boundary behavior; the default
    /// size is appropriate for rendering workloads.
    pub fn with_page_size(bytes: usize) -> Self {
        Self {
            pages: Vec::new(),
            page_len: (bytes / size_of::<T>().max(1)).max(1),
            len: 0,
        }
    }

    /// Allocates `count` consecutive slots and returns their indices.
    ///
    /// No memory is touched until the slots are written through
    /// [`get_mut`][Self::get_mut].
    pub fn alloc(&mut self, count: usize) -> Range<usize> {
        let start = self.len;
        self.len += count;
        start..self.len
    }

    /// Returns the number of allocated slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
    /// Returns whether no slots are allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Returns the number of slots currently backed by memory.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pages.len() * self.page_len
    }

    /// Returns a reference to the element at `i`.
    ///
    /// Returns `None` if `i` is not allocated, or if the slot has never
    /// been written and its page not yet materialized.
    pub fn get(&self, i: usize) -> Option<&T> {
        if i >= self.len {
            return None;
        }
        self.pages
            .get(i / self.page_len)
            .map(|page| &page[i % self.page_len])
    }

    /// Returns a mutable reference to the element at `i`, materializing
    /// its page if needed.
    ///
    /// # Panics
    /// If `i` is not allocated.
    pub fn get_mut(&mut self, i: usize) -> &mut T {
        assert!(i < self.len, "arena index out of bounds");
        let page = i / self.page_len;
        while self.pages.len() <= page {
            let fresh = vec![T::default(); self.page_len];
            self.pages.push(fresh.into_boxed_slice());
        }
        &mut self.pages[page][i % self.page_len]
    }

    /// Deallocates all slots but keeps the backing pages for reuse.
    ///
    /// The contents of slots allocated after a reset are unspecified
    /// until written.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Deallocates all slots and releases the backing pages.
    pub fn clear(&mut self) {
        self.len = 0;
        self.pages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_consecutive_ranges() {
        let mut arena: Arena<u32> = Arena::new();
        assert_eq!(arena.alloc(3), 0..3);
        assert_eq!(arena.alloc(2), 3..5);
        assert_eq!(arena.len(), 5);
    }

    #[test]
    fn alloc_touches_no_memory() {
        let mut arena: Arena<u32> = Arena::new();
        arena.alloc(1000);
        assert_eq!(arena.capacity(), 0);
        assert_eq!(arena.get(999), None);
    }

    #[test]
    fn write_then_read() {
        let mut arena: Arena<u32> = Arena::new();
        let range = arena.alloc(4);
        for i in range {
            *arena.get_mut(i) = i as u32 * 10;
        }
        assert_eq!(arena.get(0), Some(&0));
        assert_eq!(arena.get(3), Some(&30));
        assert_eq!(arena.get(4), None);
    }

    #[test]
    fn page_boundary() {
        // Pages of four u32s
        let mut arena: Arena<u32> = Arena::with_page_size(16);
        arena.alloc(10);
        for i in 0..10 {
            *arena.get_mut(i) = i as u32;
        }
        assert_eq!(arena.capacity(), 12);
        for i in 0..10 {
            assert_eq!(arena.get(i), Some(&(i as u32)));
        }
    }

    #[test]
    fn reset_keeps_pages() {
        let mut arena: Arena<u32> = Arena::with_page_size(16);
        arena.alloc(8);
        *arena.get_mut(7) = 1;
        let cap = arena.capacity();
        arena.reset();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.capacity(), cap);
        assert_eq!(arena.get(0), None);
    }

    #[test]
    fn clear_releases_pages() {
        let mut arena: Arena<u32> = Arena::with_page_size(16);
        arena.alloc(8);
        *arena.get_mut(0) = 1;
        arena.clear();
        assert_eq!(arena.capacity(), 0);
    }

    #[test]
    #[should_panic]
    fn get_mut_unallocated_panics() {
        let mut arena: Arena<u32> = Arena::new();
        arena.alloc(2);
        arena.get_mut(2);
    }
}
