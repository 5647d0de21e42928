//! Colors as values in a linear RGBA space.
//!
//! The pipeline computes in floating point and only packs to 8-bit ARGB
//! when a color is committed to a render target, so blending and
//! interpolation do not lose precision to repeated quantization.

use core::fmt::{Debug, Formatter};

use crate::math::space::Linear;

/// An RGBA color with `f32` components, nominally in the range [0, 1].
///
/// Values outside the nominal range are allowed in intermediate
/// computations; [`to_argb8888`][Self::to_argb8888] clamps.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Color4f(pub [f32; 4]);

/// Creates a color with the given component values.
#[inline]
pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color4f {
    Color4f([r, g, b, a])
}

impl Color4f {
    /// Opaque black.
    pub const BLACK: Self = rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = rgba(1.0, 1.0, 1.0, 1.0);

    /// Returns the red component of `self`.
    #[inline]
    pub fn r(&self) -> f32 {
        self.0[0]
    }
    /// Returns the green component of `self`.
    #[inline]
    pub fn g(&self) -> f32 {
        self.0[1]
    }
    /// Returns the blue component of `self`.
    #[inline]
    pub fn b(&self) -> f32 {
        self.0[2]
    }
    /// Returns the alpha component of `self`.
    #[inline]
    pub fn a(&self) -> f32 {
        self.0[3]
    }

    /// Returns `self` with every component clamped to [0, 1].
    #[inline]
    pub fn saturate(&self) -> Self {
        Self(self.0.map(|c| c.clamp(0.0, 1.0)))
    }

    /// Packs `self` into a `0xAARRGGBB` integer, clamping components
    /// to [0, 1].
    pub fn to_argb8888(&self) -> u32 {
        let [r, g, b, a] = self.saturate().0.map(|c| (c * 255.0 + 0.5) as u32);
        a << 24 | r << 16 | g << 8 | b
    }

    /// Unpacks a `0xAARRGGBB` integer into a color.
    pub fn from_argb8888(argb: u32) -> Self {
        let ch = |sh: u32| (argb >> sh & 0xFF) as f32 / 255.0;
        Self([ch(16), ch(8), ch(0), ch(24)])
    }
}

impl Linear for Color4f {
    #[inline]
    fn zero() -> Self {
        Self([0.0; 4])
    }
    #[inline]
    fn add(&self, other: &Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] + other.0[i]))
    }
    #[inline]
    fn mul(&self, scalar: f32) -> Self {
        Self(self.0.map(|c| c * scalar))
    }
}

impl Debug for Color4f {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "rgba({r:?}, {g:?}, {b:?}, {a:?})")
    }
}

impl From<[f32; 4]> for Color4f {
    #[inline]
    fn from(comps: [f32; 4]) -> Self {
        Self(comps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing() {
        assert_eq!(rgba(0.0, 0.0, 0.0, 0.0).to_argb8888(), 0x0000_0000);
        assert_eq!(rgba(1.0, 1.0, 1.0, 1.0).to_argb8888(), 0xFFFF_FFFF);
        assert_eq!(rgba(1.0, 0.0, 0.0, 1.0).to_argb8888(), 0xFFFF_0000);
        assert_eq!(rgba(0.0, 1.0, 0.0, 0.0).to_argb8888(), 0x0000_FF00);
    }

    #[test]
    fn packing_clamps() {
        assert_eq!(rgba(2.0, -1.0, 0.0, 1.0).to_argb8888(), 0xFFFF_0000);
    }

    #[test]
    fn unpacking() {
        let c = Color4f::from_argb8888(0xFF80_0000);
        assert_eq!(c.a(), 1.0);
        assert!((c.r() - 0.502).abs() < 1e-3);
        assert_eq!(c.b(), 0.0);
    }

    #[test]
    fn round_trip() {
        for argb in [0x0000_0000, 0xFFFF_FFFF, 0x8040_20FF, 0x0123_4567] {
            let c = Color4f::from_argb8888(argb);
            assert_eq!(c.to_argb8888(), argb);
        }
    }

    #[test]
    fn linear_ops() {
        let c = rgba(0.2, 0.4, 0.6, 1.0);
        assert_eq!(c.mul(0.5), rgba(0.1, 0.2, 0.3, 0.5));
        assert_eq!(c.add(&Color4f::zero()), c);
    }
}
