//! Numeric utilities used by the rendering pipeline.
//!
//! Includes [vectors][vec], [matrices][mat], [colors][color], the
//! [interpolation traits][vary] the rasterizer is generic over, and support
//! for approximate equality comparisons in tests.

pub use {
    approx::ApproxEq,
    color::{rgba, Color4f},
    mat::{orthographic, perspective, viewport, Mat4x4},
    space::Linear,
    vary::Vary,
    vec::{vec2, vec3, vec4, Vec2, Vec2i, Vec3, Vec4, Vector},
};

pub mod approx;
pub mod color;
pub mod float;
pub mod mat;
pub mod space;
pub mod vary;
pub mod vec;

/// Trait for linear interpolation between two values.
pub trait Lerp: Sized {
    /// Linearly interpolates between `self` and `other`.
    ///
    /// If `t` = 0, returns `self`; if `t` = 1, returns `other`.
    /// For 0 < `t` < 1, returns the weighted average
    /// ```text
    /// (1 - t) * self + t * other
    /// ```
    /// This method does not panic if `t < 0.0` or `t > 1.0`, or if `t`
    /// is `NaN`, but the return value in those cases is unspecified.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Returns the (unweighted) average of `self` and `other`.
    fn midpoint(&self, other: &Self) -> Self {
        self.lerp(other, 0.5)
    }
}

impl<T: Linear + Clone> Lerp for T {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.add(&other.sub(self).mul(t))
    }
}

/// Linearly interpolates between two values.
///
/// For examples and more information, see [`Lerp::lerp`].
#[inline]
pub fn lerp<T: Lerp>(t: f32, from: T, to: T) -> T {
    from.lerp(&to, t)
}
