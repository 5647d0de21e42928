//! Floating-point compatibility API.
//!
//! Some floating-point functions are unavailable in `no_std`. This module
//! provides the missing functions using either the `libm` or `micromath`
//! crate, depending on which feature is enabled. As a fallback, it also
//! implements a critical subset of the functions even if none of the
//! features is enabled.

#[cfg(feature = "libm")]
pub mod libm {
    pub use libm::floorf as floor;
    pub use libm::sqrtf as sqrt;

    #[inline]
    pub fn recip_sqrt(x: f32) -> f32 {
        1.0 / sqrt(x)
    }
}

#[cfg(feature = "mm")]
pub mod mm {
    use micromath::F32Ext as mm;

    #[inline]
    pub fn floor(x: f32) -> f32 {
        mm::floor(x)
    }
    /// Returns the approximate square root of `x`.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        let y = mm::sqrt(x);
        // Two rounds of Newton's method
        let y = 0.5 * (y + (x / y));
        0.5 * (y + (x / y))
    }
    /// Returns the approximate reciprocal of the square root of `x`.
    #[inline]
    pub fn recip_sqrt(x: f32) -> f32 {
        let y = mm::invsqrt(x);
        // A round of Newton's method
        y * (1.5 - 0.5 * x * y * y)
    }
}

pub mod fallback {
    /// Returns the largest integer less than or equal to `x`.
    #[inline]
    pub fn floor(x: f32) -> f32 {
        let t = x as i64 as f32;
        (x as i64 - (x < t) as i64) as f32
    }
    /// Returns the approximate reciprocal of the square root of `x`.
    #[inline]
    pub fn recip_sqrt(x: f32) -> f32 {
        super::fast_recip_sqrt(x)
    }
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        1.0 / recip_sqrt(x)
    }
}

/// Returns a fast approximation of the reciprocal square root of a number.
#[inline]
pub fn fast_recip_sqrt(x: f32) -> f32 {
    // https://en.wikipedia.org/wiki/Fast_inverse_square_root
    const MAGIC: u32 = 0x5f37_5a86;
    let mut y = f32::from_bits(MAGIC.saturating_sub(x.to_bits() >> 1));
    // A round of Newton's method
    y = y * (1.5 - 0.5 * x * y * y);
    y
}

#[cfg(feature = "std")]
pub mod std {
    //! Backend delegating to the standard library intrinsics.
    #[inline]
    pub fn floor(x: f32) -> f32 {
        x.floor()
    }
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        x.sqrt()
    }
    #[inline]
    pub fn recip_sqrt(x: f32) -> f32 {
        x.sqrt().recip()
    }
}

#[cfg(feature = "std")]
pub use self::std as f32;

#[cfg(all(feature = "libm", not(feature = "std")))]
pub use libm as f32;

#[cfg(all(feature = "mm", not(feature = "std"), not(feature = "libm")))]
pub use mm as f32;

#[cfg(not(feature = "fp"))]
pub use fallback as f32;

#[cfg(test)]
mod tests {
    #![allow(unused_imports)]
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn fallback_floor() {
        use fallback as fb;
        assert_eq!(fb::floor(1.5), 1.0);
        assert_eq!(fb::floor(0.99), 0.0);
        assert_eq!(fb::floor(-0.0), 0.0);
        assert_eq!(fb::floor(-1.1), -2.0);
        assert_eq!(fb::floor(-2.0), -2.0);
        assert_eq!(fb::floor(2.0), 2.0);
    }

    #[test]
    fn fallback_sqrt() {
        use fallback as fb;
        // A single Newton round leaves roughly 0.1% error
        assert_approx_eq!(fb::sqrt(9.0), 3.0, eps = 1e-2);
        assert_approx_eq!(fb::recip_sqrt(4.0), 0.5, eps = 1e-2);
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_functions() {
        assert_eq!(f32::floor(-0.0), 0.0);
        assert_eq!(f32::floor(1.75), 1.0);
        assert_eq!(f32::sqrt(9.0), 3.0);
        assert_eq!(f32::recip_sqrt(4.0), 0.5);
        assert!(f32::sqrt(-1.0).is_nan());
    }
}
