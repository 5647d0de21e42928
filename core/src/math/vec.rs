//! Fixed-size vectors of two to four components.

use core::fmt::{Debug, Formatter};
use core::ops::{Add, Index, Mul, Sub};

/// A vector with its components stored in `Repr`, typically an array.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Vector<Repr>(pub Repr);

/// A two-dimensional real vector.
pub type Vec2 = Vector<[f32; 2]>;
/// A three-dimensional real vector.
pub type Vec3 = Vector<[f32; 3]>;
/// A four-dimensional real vector, used for homogeneous coordinates.
pub type Vec4 = Vector<[f32; 4]>;

/// A two-dimensional integer vector.
pub type Vec2i = Vector<[i32; 2]>;

/// Creates a 2-vector with the given components.
#[inline]
pub const fn vec2<Sc>(x: Sc, y: Sc) -> Vector<[Sc; 2]> {
    Vector([x, y])
}
/// Creates a 3-vector with the given components.
#[inline]
pub const fn vec3<Sc>(x: Sc, y: Sc, z: Sc) -> Vector<[Sc; 3]> {
    Vector([x, y, z])
}
/// Creates a 4-vector with the given components.
#[inline]
pub const fn vec4<Sc>(x: Sc, y: Sc, z: Sc, w: Sc) -> Vector<[Sc; 4]> {
    Vector([x, y, z, w])
}

/// Returns a vector with all components equal to `s`.
#[inline]
pub fn splat<Sc: Copy, const N: usize>(s: Sc) -> Vector<[Sc; N]> {
    Vector([s; N])
}

impl<Sc: Copy, const N: usize> Vector<[Sc; N]> {
    /// Creates a vector from an array of components.
    #[inline]
    pub const fn new(comps: [Sc; N]) -> Self {
        Self(comps)
    }

    /// Returns the x component of `self`.
    #[inline]
    pub fn x(&self) -> Sc {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub fn y(&self) -> Sc {
        self.0[1]
    }
}

impl<Sc: Copy, const N: usize> Vector<[Sc; N]>
where
    Sc: Add<Output = Sc> + Mul<Output = Sc>,
{
    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> Sc {
        let mut res = self.0[0] * other.0[0];
        for i in 1..N {
            res = res + self.0[i] * other.0[i];
        }
        res
    }
}

impl<Sc: Copy> Vector<[Sc; 2]>
where
    Sc: Mul<Output = Sc> + Sub<Output = Sc>,
{
    /// Returns the perpendicular dot product of `self` and `other`.
    ///
    /// Equal to the z component of the cross product of the two vectors
    /// embedded in 3D, and to twice the signed area of the triangle they
    /// span.
    #[inline]
    pub fn perp_dot(&self, other: &Self) -> Sc {
        self.0[0] * other.0[1] - self.0[1] * other.0[0]
    }
}

impl<Sc: Copy> Vector<[Sc; 3]> {
    /// Returns the z component of `self`.
    #[inline]
    pub fn z(&self) -> Sc {
        self.0[2]
    }

    /// Returns the cross product of `self` and `other`.
    pub fn cross(&self, other: &Self) -> Self
    where
        Sc: Mul<Output = Sc> + Sub<Output = Sc>,
    {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = other.0;
        Self([ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx])
    }
}

impl<Sc: Copy> Vector<[Sc; 4]> {
    /// Returns the z component of `self`.
    #[inline]
    pub fn z(&self) -> Sc {
        self.0[2]
    }
    /// Returns the w component of `self`.
    #[inline]
    pub fn w(&self) -> Sc {
        self.0[3]
    }
}

impl Vec3 {
    /// Extends `self` into a homogeneous 4-vector with the given w.
    #[inline]
    pub fn to_homog(&self, w: f32) -> Vec4 {
        let [x, y, z] = self.0;
        vec4(x, y, z, w)
    }
}

impl Vec4 {
    /// Truncates `self` into a 3-vector, dropping the w component.
    #[inline]
    pub fn to_vec3(&self) -> Vec3 {
        let [x, y, z, _] = self.0;
        vec3(x, y, z)
    }
}

#[cfg(feature = "fp")]
impl<const N: usize> Vector<[f32; N]> {
    /// Returns the length of `self`.
    #[inline]
    pub fn len(&self) -> f32 {
        super::float::f32::sqrt(self.dot(self))
    }
    /// Returns `self` normalized to unit length.
    #[inline]
    pub fn normalize(&self) -> Self {
        use crate::math::space::Linear;
        self.mul(super::float::f32::recip_sqrt(self.dot(self)))
    }
}

//
// Foreign trait impls
//

impl<Sc: Debug, const N: usize> Debug for Vector<[Sc; N]> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Vec{}{:?}", N, self.0)
    }
}

impl<Sc, const N: usize> From<[Sc; N]> for Vector<[Sc; N]> {
    #[inline]
    fn from(comps: [Sc; N]) -> Self {
        Self(comps)
    }
}

impl<Sc, const N: usize> Index<usize> for Vector<[Sc; N]> {
    type Output = Sc;
    #[inline]
    fn index(&self, i: usize) -> &Sc {
        &self.0[i]
    }
}
