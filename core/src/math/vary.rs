//! Interpolation of attributes across primitives.
//!
//! A *varying* is a value attached to each vertex of a primitive and
//! interpolated across its face when rendering: a color, a texture
//! coordinate, a normal vector, or any combination thereof. Clipping blends
//! varyings between two edge endpoints; rasterization blends them between
//! the three corners of a triangle using barycentric weights. Because a
//! varying is any [`Linear`] type, the record layout is fixed at compile
//! time and 1/2/3/4-component attributes interpolate without special-casing.

use crate::math::{Lerp, Linear};

/// Trait for values that can be interpolated across the face of a primitive.
///
/// The perspective correction applied to the barycentric weights is the
/// rasterizer's business; `blend` itself is a plain affine combination and
/// expects the weights to sum to 1.
pub trait Vary: Lerp + Linear + Clone {
    /// Returns the barycentric combination of three values.
    ///
    /// Computes `self * w[0] + b * w[1] + c * w[2]`. The result only lies
    /// within the triangle spanned by the three values if the weights are
    /// nonnegative and sum to 1.
    #[inline]
    fn blend(&self, b: &Self, c: &Self, w: [f32; 3]) -> Self {
        self.mul(w[0]).add(&b.mul(w[1])).add(&c.mul(w[2]))
    }
}

impl<T: Lerp + Linear + Clone> Vary for T {}
