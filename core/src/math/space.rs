//! The `Linear` trait abstracting over vector-space values.
//!
//! Everything the pipeline interpolates across a primitive, from a bare
//! `f32` to a tuple of vectors and colors, is a value in some real vector
//! space. Abstracting over the space lets clipping and rasterization blend
//! caller-defined attribute records without knowing their layout: a record
//! is simply a type with componentwise addition and scalar multiplication,
//! fixed at compile time, rather than a run of raw float lanes interpreted
//! by offset.

use crate::math::vec::Vector;

/// Trait for types that form a real vector space.
///
/// Implementors must satisfy the usual vector space axioms: addition is
/// commutative and associative with `zero()` as the identity, and scalar
/// multiplication distributes over it.
pub trait Linear: Sized {
    /// Returns the additive identity of this space.
    fn zero() -> Self;

    /// Returns the sum of `self` and `other`.
    fn add(&self, other: &Self) -> Self;

    /// Returns `self` scaled by `scalar`.
    fn mul(&self, scalar: f32) -> Self;

    /// Returns the additive inverse of `self`.
    #[inline]
    fn neg(&self) -> Self {
        self.mul(-1.0)
    }

    /// Returns the difference of `self` and `other`.
    #[inline]
    fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }
}

impl Linear for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }
    #[inline]
    fn add(&self, other: &Self) -> Self {
        self + other
    }
    #[inline]
    fn mul(&self, scalar: f32) -> Self {
        self * scalar
    }
}

/// The trivial zero-dimensional space.
impl Linear for () {
    #[inline]
    fn zero() -> Self {}
    #[inline]
    fn add(&self, _: &Self) -> Self {}
    #[inline]
    fn mul(&self, _: f32) -> Self {}
}

impl<const N: usize> Linear for Vector<[f32; N]> {
    #[inline]
    fn zero() -> Self {
        Self([0.0; N])
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

impl<A: Linear, B: Linear> Linear for (A, B) {
    #[inline]
    fn zero() -> Self {
        (A::zero(), B::zero())
    }
    #[inline]
    fn add(&self, other: &Self) -> Self {
        (self.0.add(&other.0), self.1.add(&other.1))
    }
    #[inline]
    fn mul(&self, scalar: f32) -> Self {
        (self.0.mul(scalar), self.1.mul(scalar))
    }
}

impl<A: Linear, B: Linear, C: Linear> Linear for (A, B, C) {
    #[inline]
    fn zero() -> Self {
        (A::zero(), B::zero(), C::zero())
    }
    #[inline]
    fn add(&self, other: &Self) -> Self {
        (
            self.0.add(&other.0),
            self.1.add(&other.1),
            self.2.add(&other.2),
        )
    }
    #[inline]
    fn mul(&self, scalar: f32) -> Self {
        (self.0.mul(scalar), self.1.mul(scalar), self.2.mul(scalar))
    }
}

#[cfg(test)]
mod tests {
    use crate::math::vec::vec3;

    use super::*;

    #[test]
    fn scalar_space() {
        assert_eq!(f32::zero(), 0.0);
        assert_eq!(2.0.add(&-3.0), -1.0);
        assert_eq!(2.0.mul(1.5), 3.0);
        assert_eq!(2.0.sub(&0.5), 1.5);
    }

    #[test]
    fn vector_space() {
        let v = vec3(1.0, -2.0, 0.5);
        assert_eq!(v.add(&v.neg()), Linear::zero());
        assert_eq!(v.mul(2.0), vec3(2.0, -4.0, 1.0));
    }

    #[test]
    fn tuple_space() {
        let a = (1.0f32, vec3(0.0, 1.0, 0.0));
        let b = (2.0f32, vec3(1.0, 0.0, 0.0));
        assert_eq!(a.add(&b), (3.0, vec3(1.0, 1.0, 0.0)));
        assert_eq!(a.mul(2.0), (2.0, vec3(0.0, 2.0, 0.0)));
    }
}
