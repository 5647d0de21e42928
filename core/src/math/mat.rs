//! Matrices and linear transforms.
//!
//! Transforms are represented as row-major 4×4 matrices acting on column
//! vectors: `M.apply(v)` computes `M v`. The projection matrices here map
//! the visible volume to clip space where `-w ≤ x ≤ w`, `-w ≤ y ≤ w`, and
//! `0 ≤ z ≤ w`; the [`viewport`] matrix then takes the NDC cube to screen
//! coordinates with y growing downwards.

use core::fmt::{Debug, Formatter};
use core::ops::Range;

use crate::math::space::Linear;
use crate::math::vec::{vec4, Vec3, Vec4};

/// A 4×4 matrix of `f32`s, stored row-major.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Mat4x4(pub [[f32; 4]; 4]);

impl Mat4x4 {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Returns the composite transform that first applies `self`, then
    /// `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        let mut res = [[0.0; 4]; 4];
        for (i, row) in res.iter_mut().enumerate() {
            for (j, out) in row.iter_mut().enumerate() {
                *out = (0..4).map(|k| other.0[i][k] * self.0[k][j]).sum();
            }
        }
        Self(res)
    }

    /// Applies `self` to a homogeneous 4-vector.
    #[inline]
    pub fn apply(&self, v: &Vec4) -> Vec4 {
        let row = |i: usize| Vec4::new(self.0[i]).dot(v);
        vec4(row(0), row(1), row(2), row(3))
    }

    /// Applies `self` to a point, treating it as a 4-vector with w = 1.
    #[inline]
    pub fn apply_pt(&self, p: &Vec3) -> Vec4 {
        self.apply(&p.to_homog(1.0))
    }

    /// Returns `self` with rows and columns exchanged.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut res = [[0.0; 4]; 4];
        for (i, row) in res.iter_mut().enumerate() {
            for (j, out) in row.iter_mut().enumerate() {
                *out = self.0[j][i];
            }
        }
        Self(res)
    }
}

/// Returns a matrix translating by `offset`.
pub const fn translate(offset: Vec3) -> Mat4x4 {
    let [x, y, z] = offset.0;
    Mat4x4([
        [1.0, 0.0, 0.0, x],
        [0.0, 1.0, 0.0, y],
        [0.0, 0.0, 1.0, z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a matrix scaling by `factors`.
pub const fn scale(factors: Vec3) -> Mat4x4 {
    let [x, y, z] = factors.0;
    Mat4x4([
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a perspective projection matrix.
///
/// * `focal_ratio`: the focal length relative to the sensor size;
///   1.0 gives a 90° horizontal field of view.
/// * `aspect_ratio`: the width of the viewport divided by its height.
/// * `near_far`: the distances of the near and far clipping planes.
///
/// The resulting matrix maps the view frustum so that after perspective
/// division x and y lie in [-1, 1] and z in [0, 1], with z = 0 at the
/// near plane. The w coordinate of a transformed point equals its view
/// space depth.
pub fn perspective(
    focal_ratio: f32,
    aspect_ratio: f32,
    near_far: Range<f32>,
) -> Mat4x4 {
    let (near, far) = (near_far.start, near_far.end);
    debug_assert!(near > 0.0, "near plane must be in front of the camera");
    debug_assert!(far > near, "far plane must be beyond the near plane");

    let e = focal_ratio;
    let zr = far / (far - near);
    Mat4x4([
        [e / aspect_ratio, 0.0, 0.0, 0.0],
        [0.0, e, 0.0, 0.0],
        [0.0, 0.0, zr, -near * zr],
        [0.0, 0.0, 1.0, 0.0],
    ])
}

/// Returns an orthographic projection matrix.
///
/// `lbn` and `rtf` are the left-bottom-near and right-top-far corners of
/// the view box. Like [`perspective`], maps depth to [0, 1].
pub fn orthographic(lbn: Vec3, rtf: Vec3) -> Mat4x4 {
    let [dx, dy, dz] = rtf.sub(&lbn).0;
    let [sx, sy, _] = rtf.add(&lbn).0;
    Mat4x4([
        [2.0 / dx, 0.0, 0.0, -sx / dx],
        [0.0, 2.0 / dy, 0.0, -sy / dy],
        [0.0, 0.0, 1.0 / dz, -lbn.z() / dz],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a viewport transform mapping NDC to screen coordinates.
///
/// NDC x = -1 maps to screen x = 0 and x = +1 to `w`; NDC y = +1 maps to
/// screen y = 0 and y = -1 to `h`, flipping the vertical axis so that y
/// grows downwards. The z coordinate passes through unchanged.
pub fn viewport(w: f32, h: f32) -> Mat4x4 {
    Mat4x4([
        [w / 2.0, 0.0, 0.0, w / 2.0],
        [0.0, -h / 2.0, 0.0, h / 2.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

impl Debug for Mat4x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Mat4x4[")?;
        for row in &self.0 {
            writeln!(f, "    {row:?}")?;
        }
        write!(f, "]")
    }
}

impl From<[[f32; 4]; 4]> for Mat4x4 {
    #[inline]
    fn from(rows: [[f32; 4]; 4]) -> Self {
        Self(rows)
    }
}
