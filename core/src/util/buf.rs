//! Two-dimensional buffers, with owned storage.

use alloc::{vec, vec::Vec};
use core::ops::{Index, IndexMut};

/// A rectangular 2D buffer with elements stored in row-major order.
///
/// Used by the renderer for color, depth, and stencil planes, but generic
/// over the element type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Buf2<T> {
    w: u32,
    h: u32,
    data: Vec<T>,
}

impl<T> Buf2<T> {
    /// Returns a buffer of size `w` × `h`, with every element initialized
    /// to `T::default()`.
    pub fn new(w: u32, h: u32) -> Self
    where
        T: Clone + Default,
    {
        Self::new_with(w, h, T::default())
    }

    /// Returns a buffer of size `w` × `h`, with every element initialized
    /// to `init`.
    pub fn new_with(w: u32, h: u32, init: T) -> Self
    where
        T: Clone,
    {
        Self {
            w,
            h,
            data: vec![init; w as usize * h as usize],
        }
    }

    /// Returns the width of `self`.
    #[inline]
    pub fn width(&self) -> u32 {
        self.w
    }
    /// Returns the height of `self`.
    #[inline]
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Returns the elements of `self` as a flat slice.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }
    /// Returns the elements of `self` as a mutable flat slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns an iterator over the rows of `self`.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.w.max(1) as usize)
    }

    /// Returns a reference to the element at `(x, y)`, or `None` if out
    /// of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        (x < self.w && y < self.h)
            .then(|| &self.data[(y * self.w + x) as usize])
    }

    /// Returns a mutable reference to the element at `(x, y)`, or `None`
    /// if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        (x < self.w && y < self.h)
            .then(|| &mut self.data[(y * self.w + x) as usize])
    }

    /// Sets every element of `self` to `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        self.data.fill(val);
    }
}

impl<T> Index<[u32; 2]> for Buf2<T> {
    type Output = T;
    /// Returns the element at position `[x, y]`.
    ///
    /// # Panics
    /// If the position is out of bounds.
    #[inline]
    fn index(&self, [x, y]: [u32; 2]) -> &T {
        assert!(x < self.w && y < self.h, "position out of bounds");
        &self.data[(y * self.w + x) as usize]
    }
}

impl<T> IndexMut<[u32; 2]> for Buf2<T> {
    #[inline]
    fn index_mut(&mut self, [x, y]: [u32; 2]) -> &mut T {
        assert!(x < self.w && y < self.h, "position out of bounds");
        &mut self.data[(y * self.w + x) as usize]
    }
}
