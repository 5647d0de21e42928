//! Clipping primitives against the view volume.
//!
//! Clipping converts a shape into another such that only the points inside
//! a volume enclosed by one or more planes remain; "inside" is the
//! half-space the plane's normal points away from. Geometry is clipped in
//! homogeneous clip space, before perspective division, so that primitives
//! crossing the w = 0 plane never reach the divide.
//!
//! The clip volume used by the pipeline is
//! ```text
//! -w ≤ x ≤ w,   -w ≤ y ≤ w,   0 ≤ z ≤ w
//! ```
//! with depth mapped to [0, 1] rather than [-1, 1], which distributes
//! depth precision better near the near plane.

use alloc::vec::Vec;
use core::{iter::zip, mem::swap};

use clip_volume::{outcode, status};

use crate::geom::{vertex, Edge, Tri, Vertex};
use crate::math::{vec::Vec4, Lerp};

/// Trait for types that can be [clipped][self] against convex volumes.
///
/// # Note to implementors
/// This trait is primarily meant to be implemented on slices or other
/// composites, so that several primitives can be clipped in a single call
/// and temporary buffers reused between them.
///
/// Implementations should avoid emitting degenerate primitives, such as
/// triangles with only two distinct vertices.
pub trait Clip {
    /// Type of the clipped object. For example, `Self` if implemented for
    /// the type itself, or `T` if implemented for `[T]`.
    type Item;

    /// Clips `self` against `planes`, returning the resulting zero or
    /// more primitives in the out parameter `out`.
    ///
    /// A primitive fully inside the volume is emitted as it is; one fully
    /// outside is skipped; one partially inside is clipped so that no
    /// points outside the volume remain.
    ///
    /// The result is unspecified if `out` is nonempty.
    fn clip(&self, planes: &[ClipPlane], out: &mut Vec<Self::Item>);
}

/// A vector in clip space.
pub type ClipVec = Vec4;

/// A vertex in clip space, carrying a cached outcode.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ClipVert<A> {
    pub pos: ClipVec,
    pub attrib: A,
    outcode: u8,
}

/// Visibility of a shape relative to the view volume.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    /// Entirely inside the view volume.
    Visible,
    /// Either outside or partly inside, needs clipping.
    Clipped,
    /// Entirely outside the view volume.
    Hidden,
}

/// A clip plane: a homogeneous plane equation and an outcode bit.
#[derive(Debug, Copy, Clone)]
pub struct ClipPlane(ClipVec, u8);

impl ClipPlane {
    /// Creates a clip plane given a normal, offset, and outcode bit.
    const fn new(x: f32, y: f32, z: f32, off: f32, bit: u8) -> Self {
        Self(ClipVec::new([x, y, z, -off]), bit)
    }

    /// Returns the signed distance between `pt` and `self`.
    ///
    /// The return value is positive if `pt` is "outside" the plane,
    /// defined as the half-space in the direction of the normal vector,
    /// negative if `pt` is in the other half-space, and zero if `pt`
    /// is exactly coincident with the plane.
    #[inline]
    pub fn signed_dist(&self, pt: &ClipVec) -> f32 {
        self.0.dot(pt)
    }

    /// Computes this plane's outcode bit for a point.
    ///
    /// The result is `self.1` if `pt` is outside this plane, 0 otherwise.
    #[inline]
    pub fn outcode(&self, pt: &ClipVec) -> u8 {
        (self.signed_dist(pt) > 0.0) as u8 * self.1
    }

    /// Checks the outcode of a clip vertex against `self`.
    ///
    /// Returns `true` if this plane's outcode bit in `v` is 0.
    #[inline]
    pub fn is_inside<A>(&self, v: &ClipVert<A>) -> bool {
        self.1 & v.outcode == 0
    }

    /// Returns the intersection of the edge `v0`–`v1` with `self`, or
    /// `None` if the edge does not cross the plane.
    pub fn intersect<A: Lerp>(
        &self,
        [v0, v1]: [&ClipVert<A>; 2],
    ) -> Option<ClipVert<A>> {
        // Signed distances are compared directly rather than via
        // is_inside, because the cached outcode cannot distinguish a
        // vertex lying exactly on the plane.
        let d0 = self.signed_dist(&v0.pos);
        let d1 = self.signed_dist(&v1.pos);
        (d0 * d1 < 0.0).then(|| {
            // `t` is the fractional distance from `v0` to the
            // intersection point. The condition above guarantees that
            // `d0 - d1` is nonzero.
            let t = d0 / (d0 - d1);
            debug_assert!((0.0..=1.0).contains(&t));

            ClipVert::new(vertex(
                v0.pos.lerp(&v1.pos, t),
                v0.attrib.lerp(&v1.attrib, t),
            ))
        })
    }

    /// Clips a convex polygon against `self`.
    ///
    /// Returns the resulting vertices in the out parameter `verts_out`.
    ///
    /// In the diagram below, clipping triangle ABC results in quad ABPQ,
    /// where P and Q are new vertices generated by interpolating between
    /// A and C, and B and C, respectively.
    ///
    /// ```text
    ///     n
    ///     ^            C
    ///     |           / \         outside
    ///     |         /    \
    /// ----+-------Q-------P--------self-----
    ///           /          \
    ///         A--___        \     inside
    ///               `---__   \
    ///                     `---B
    /// ```
    pub fn clip_simple_polygon<A: Lerp + Clone>(
        &self,
        verts_in: &[ClipVert<A>],
        verts_out: &mut Vec<ClipVert<A>>,
    ) {
        let mut verts = verts_in.iter().chain(&verts_in[..1]);

        let Some(mut v0) = verts.next() else {
            return;
        };

        for v1 in verts {
            if self.is_inside(v0) {
                // v0 is inside; emit it as-is. If v1 is also inside, it
                // is emitted on the next iteration.
                verts_out.push(v0.clone());
            } else {
                // v0 is outside, discard it. If v1 is also outside, it
                // is discarded on the next iteration.
            }

            if let Some(v) = self.intersect([v0, v1]) {
                verts_out.push(v);
            }
            v0 = v1;
        }
    }
}

/// The standard view volume in clip space.
///
/// The left, right, bottom, and top planes correspond to the edges of the
/// viewport; the near and far planes limit how close-up or far away
/// objects can be drawn. Unlike the symmetric OpenGL volume, depth spans
/// `0 ≤ z ≤ w`: the near plane coincides with the w = 0 plane's positive
/// side, so clipping against it also eliminates points behind the eye.
pub mod clip_volume {
    use super::*;

    /// Outcode bit of the left plane.
    pub const LEFT: u8 = 0x01;
    /// Outcode bit of the right plane.
    pub const RIGHT: u8 = 0x02;
    /// Outcode bit of the bottom plane.
    pub const BOTTOM: u8 = 0x04;
    /// Outcode bit of the top plane.
    pub const TOP: u8 = 0x08;
    /// Outcode bit of the near plane.
    pub const NEAR: u8 = 0x10;
    /// Outcode bit of the far plane.
    pub const FAR: u8 = 0x20;

    /// The near, far, left, bottom, right, and top clipping planes,
    /// in that order.
    ///
    /// Near and far come first so that the vertices generated by the
    /// lateral planes already have valid depths.
    #[rustfmt::skip]
    pub const PLANES: [ClipPlane; 6] = [
        ClipPlane::new( 0.0,  0.0, -1.0, 0.0, NEAR),
        ClipPlane::new( 0.0,  0.0,  1.0, 1.0, FAR),
        ClipPlane::new(-1.0,  0.0,  0.0, 1.0, LEFT),
        ClipPlane::new( 0.0, -1.0,  0.0, 1.0, BOTTOM),
        ClipPlane::new( 1.0,  0.0,  0.0, 1.0, RIGHT),
        ClipPlane::new( 0.0,  1.0,  0.0, 1.0, TOP),
    ];

    /// Clips geometry against the standard view volume.
    ///
    /// Returns the part that is within the volume in the out parameter
    /// `out`. This is the main entry point to clipping.
    pub fn clip<G: Clip + ?Sized>(geom: &G, out: &mut Vec<G::Item>) {
        geom.clip(&PLANES, out);
    }

    /// Returns the outcode of the given point.
    ///
    /// The outcode is a bitset where the bit of each plane is 0 if the
    /// point is inside the plane, and 1 otherwise. It is used to
    /// determine whether a primitive is fully inside, partially inside,
    /// or fully outside the volume without clipping it.
    #[inline]
    pub fn outcode(pt: &ClipVec) -> u8 {
        PLANES.iter().map(|p| p.outcode(pt)).sum()
    }

    /// Returns the visibility status of the convex hull given by `vs`.
    pub fn status<V>(vs: &[ClipVert<V>]) -> Status {
        // The set of planes outside which all vertices are
        let all_outside = vs.iter().fold(!0, |code, v| code & v.outcode);

        // The set of planes outside which at least one vertex is
        let any_outside = vs.iter().fold(0, |code, v| code | v.outcode);

        if all_outside != 0 {
            // All vertices are outside the *same* plane, so the whole
            // hull is hidden. It is not enough that every vertex is
            // outside some plane!
            Status::Hidden
        } else if any_outside == 0 {
            Status::Visible
        } else {
            Status::Clipped
        }
    }
}

/// Computes the intersection of a simple polygon and a convex volume.
///
/// Returns the part of the polygon that is inside all planes, if any, in
/// `verts_out`. Uses out parameters rather than the return value to avoid
/// extra allocations. The result is unspecified if `verts_out` is not
/// empty; `verts_in` is left empty by the function.
///
/// The algorithm used is Sutherland–Hodgman [^1].
///
/// [^1]: Ivan Sutherland, Gary W. Hodgman: Reentrant Polygon Clipping.
///        Communications of the ACM, vol. 17, pp. 32–42, 1974
pub fn clip_simple_polygon<'a, A: Lerp + Clone>(
    planes: &[ClipPlane],
    verts_in: &'a mut Vec<ClipVert<A>>,
    verts_out: &'a mut Vec<ClipVert<A>>,
) {
    debug_assert!(verts_out.is_empty());

    for (p, i) in zip(planes, 0..) {
        p.clip_simple_polygon(verts_in, verts_out);
        verts_in.clear();
        if verts_out.is_empty() {
            // Nothing left; the polygon was fully outside
            break;
        } else if i < planes.len() - 1 {
            // Use the result of this iteration as the input of the next
            swap(verts_in, verts_out);
        }
    }
}

impl<V> ClipVert<V> {
    /// Creates a clip vertex, computing and caching its outcode.
    #[inline]
    pub fn new(Vertex { pos, attrib }: Vertex<ClipVec, V>) -> Self {
        let outcode = outcode(&pos);
        Self { pos, attrib, outcode }
    }
}

impl<A: Lerp + Clone> Clip for [Edge<ClipVert<A>>] {
    type Item = Edge<ClipVert<A>>;

    fn clip(&self, planes: &[ClipPlane], out: &mut Vec<Self::Item>) {
        'edges: for Edge(a, b) in self {
            if a.outcode & b.outcode != 0 {
                // Both endpoints outside the same plane
                continue;
            }
            if a.outcode | b.outcode == 0 {
                out.push(Edge(a.clone(), b.clone()));
                continue;
            }
            // Otherwise, clipping is needed
            let mut a = a.clone();
            let mut b = b.clone();
            for p in planes {
                let a_in = p.is_inside(&a);
                let b_in = p.is_inside(&b);
                // Intermediate vertices may have moved outside a plane
                // the original endpoints were inside
                if !a_in && !b_in {
                    continue 'edges;
                }
                if let Some(v) = p.intersect([&a, &b]) {
                    if a_in {
                        b = v;
                    } else {
                        a = v;
                    }
                }
            }
            out.push(Edge(a, b));
        }
    }
}

impl<A: Lerp + Clone> Clip for [Tri<ClipVert<A>>] {
    type Item = Tri<ClipVert<A>>;

    fn clip(&self, planes: &[ClipPlane], out: &mut Vec<Self::Item>) {
        debug_assert!(out.is_empty());

        // Avoid unnecessary allocations by reusing these
        let mut verts_in = Vec::with_capacity(10);
        let mut verts_out = Vec::with_capacity(10);

        for tri @ Tri(vs) in self {
            match status(vs) {
                Status::Visible => {
                    out.push(tri.clone());
                    continue;
                }
                Status::Hidden => continue,
                Status::Clipped => { /* go on and clip */ }
            }

            verts_in.extend(vs.clone());
            clip_simple_polygon(planes, &mut verts_in, &mut verts_out);

            if let [first, rest @ ..] = &verts_out[..] {
                // Clipping a triangle yields an n-gon, where n depends
                // on how many planes the triangle crosses. Fan it into
                // triangles about the first vertex.
                out.extend(rest.windows(2).map(|e| {
                    Tri([first.clone(), e[0].clone(), e[1].clone()])
                }));
            }
            verts_out.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::geom::vertex;

    use super::{clip_volume::*, *};

    const FAR_PLANE: ClipPlane = PLANES[1];
    const NEAR_PLANE: ClipPlane = PLANES[0];

    fn vec(x: f32, y: f32, z: f32) -> ClipVec {
        [x, y, z, 1.0].into()
    }

    fn vtx(pos: ClipVec) -> ClipVert<f32> {
        ClipVert::new(vertex(pos, 0.0))
    }

    fn tri(a: ClipVec, b: ClipVec, c: ClipVec) -> Tri<ClipVert<f32>> {
        Tri([a, b, c].map(vtx))
    }

    #[test]
    fn signed_distance() {
        assert_eq!(FAR_PLANE.signed_dist(&vec(0.0, 0.0, -1.0)), -2.0);
        assert_eq!(FAR_PLANE.signed_dist(&vec(1.0, 0.0, 0.0)), -1.0);
        assert_eq!(FAR_PLANE.signed_dist(&vec(0.0, 2.0, 1.0)), 0.0);
        assert_eq!(FAR_PLANE.signed_dist(&vec(-3.0, 0.0, 2.0)), 1.0);

        assert_eq!(NEAR_PLANE.signed_dist(&vec(0.0, 0.0, 0.5)), -0.5);
        assert_eq!(NEAR_PLANE.signed_dist(&vec(0.0, 0.0, 0.0)), 0.0);
        assert_eq!(NEAR_PLANE.signed_dist(&vec(0.0, 0.0, -0.5)), 0.5);
    }

    #[test]
    fn outcode_inside() {
        assert_eq!(outcode(&vec(0.0, 0.0, 0.0)), 0);
        assert_eq!(outcode(&vec(1.0, 0.0, 0.5)), 0);
        assert_eq!(outcode(&vec(0.0, -1.0, 0.0)), 0);
        assert_eq!(outcode(&vec(0.0, 1.0, 1.0)), 0);
    }

    #[test]
    fn outcode_outside() {
        // Anything with z < 0 is outside the near plane
        assert_eq!(outcode(&vec(0.0, 0.0, -0.5)), NEAR);
        assert_eq!(outcode(&vec(2.0, 0.0, 0.5)), RIGHT);
        assert_eq!(outcode(&vec(0.0, -1.01, 0.5)), BOTTOM);
        assert_eq!(outcode(&vec(-2.0, 0.0, 2.0)), LEFT | FAR);
        assert_eq!(outcode(&vec(0.0, 1.5, -1.0)), TOP | NEAR);
    }

    #[test]
    fn edge_clip_inside() {
        let e = [vec(2.0, 0.0, -1.0), vec(-1.0, 1.0, 1.0)].map(vtx);
        let mut res = vec![];
        FAR_PLANE.clip_simple_polygon(&e, &mut res);
        assert_eq!(res, e);
    }
    #[test]
    fn edge_clip_outside() {
        let e = [vec(2.0, 0.0, 1.5), vec(-1.0, 1.0, 2.0)].map(vtx);
        let mut res = vec![];
        FAR_PLANE.clip_simple_polygon(&e, &mut res);
        assert_eq!(res, []);
    }
    #[test]
    fn edge_clip_in_out() {
        let e = [vec(2.0, 0.0, 0.0), vec(-1.0, 1.0, 2.0)].map(vtx);
        let mut res = vec![];
        FAR_PLANE.clip_simple_polygon(&e, &mut res);
        // clip_simple_polygon treats a single edge as a degenerate
        // polygon, inserting an additional vertex
        assert_eq!(res[..2], [e[0], vtx(vec(0.5, 0.5, 1.0))]);
    }
    #[test]
    fn edge_clip_out_in() {
        let e = [vec(2.0, 0.0, 4.0), vec(-1.0, 1.0, 0.0)].map(vtx);
        let mut res = vec![];
        FAR_PLANE.clip_simple_polygon(&e, &mut res);
        assert_eq!(res[..2], [vtx(vec(-0.25, 0.75, 1.0)), e[1]]);
    }

    #[test]
    fn edge_clip_against_near() {
        let e = Edge(vtx(vec(0.0, 0.0, -1.0)), vtx(vec(0.0, 0.0, 1.0)));
        let mut res = vec![];
        [e].clip(&PLANES, &mut res);
        assert_eq!(res.len(), 1);
        let Edge(a, b) = &res[0];
        assert_eq!(a.pos, vec(0.0, 0.0, 0.0));
        assert_eq!(b.pos, vec(0.0, 0.0, 1.0));
    }

    #[test]
    fn tri_clip_fully_inside() {
        let tr =
            tri(vec(0.0, -1.0, 0.0), vec(2.0, 0.0, 0.5), vec(-1.0, 1.5, 0.0));
        let res = &mut vec![];
        [tr].clip(&[FAR_PLANE], res);
        assert_eq!(res, &[tr]);
    }
    #[test]
    fn tri_clip_fully_outside() {
        let tr =
            tri(vec(0.0, -1.0, 1.5), vec(2.0, 0.0, 1.5), vec(-1.0, 1.5, 2.0));
        let res = &mut vec![];
        [tr].clip(&[FAR_PLANE], res);
        assert_eq!(res, &[]);
    }

    #[test]
    fn tri_clip_inside_on_on() {
        let tr =
            tri(vec(0.0, -1.0, 0.0), vec(2.0, 0.0, 1.0), vec(-1.0, 1.5, 1.0));
        let res = &mut vec![];
        [tr].clip(&[FAR_PLANE], res);
        assert_eq!(res, &[tr]);
    }

    #[test]
    fn tri_clip_one_vertex_outside_yields_quad() {
        // 2.0      out
        //           | \
        //           |  \
        // 1.0  -----+---+----- plane
        //           |    \
        //           |     \
        // 0.0      in1----in2
        //          0.0    1.0
        let out = vec(0.0, 0.0, 2.0);
        let in1 = vec(0.0, 1.0, 0.0);
        let in2 = vec(1.0, 0.0, 0.0);
        let tr = tri(out, in1, in2);

        let res = &mut vec![];
        [tr].clip(&[FAR_PLANE], res);
        assert_eq!(
            res,
            &[
                // Clipping `out` leaves a quadrilateral
                tri(vec(0.0, 0.5, 1.0), in1, in2),
                tri(vec(0.0, 0.5, 1.0), in2, vec(0.5, 0.0, 1.0))
            ]
        );
    }

    #[test]
    fn tri_clip_two_vertices_outside_yields_tri() {
        // Two vertices behind the near plane; one triangle remains.
        let out1 = vec(0.0, -1.0, -1.0);
        let out2 = vec(1.0, 0.0, -1.0);
        let ins = vec(0.0, 0.0, 1.0);
        let res = &mut vec![];
        [tri(out1, out2, ins)].clip(&[NEAR_PLANE], res);

        assert_eq!(res.len(), 1);
        let Tri(vs) = &res[0];
        assert_eq!(vs[0].pos, vec(0.5, 0.0, 0.0));
        assert_eq!(vs[1].pos, ins);
        assert_eq!(vs[2].pos, vec(0.0, -0.5, 0.0));
    }

    #[test]
    fn tri_clip_outside_on_on() {
        let out = vec(0.0, 0.0, 2.0);
        let on1 = vec(1.0, 0.0, 1.0);
        let on2 = vec(0.0, -1.0, 1.0);
        let res = &mut vec![];
        [tri(out, on1, on2)].clip(&[FAR_PLANE], res);
        assert_eq!(res, &[]);
    }

    #[test]
    fn tri_clip_attribs_interpolated() {
        let a = ClipVert::new(vertex(vec(0.0, 0.0, -1.0), 0.0));
        let b = ClipVert::new(vertex(vec(0.0, 1.0, 1.0), 1.0));
        let c = ClipVert::new(vertex(vec(0.0, -1.0, 1.0), 1.0));
        let res = &mut vec![];
        [Tri([a, b, c])].clip(&[NEAR_PLANE], res);

        // The two new vertices lie halfway along the clipped edges
        assert_eq!(res.len(), 2);
        let new: Vec<_> = res
            .iter()
            .flat_map(|Tri(vs)| vs)
            .filter(|v| v.pos.z() == 0.0)
            .collect();
        assert!(new.iter().all(|v| v.attrib == 0.5));
    }

    #[test]
    fn tri_clip_against_volume_fully_inside() {
        let tr = tri(
            vec(-1.0, -1.0, 0.0),
            vec(1.0, 1.0, 0.5),
            vec(0.0, 1.0, 1.0),
        );
        let res = &mut vec![];
        [tr].clip(&PLANES, res);
        assert_eq!(res, &[tr]);
    }
    #[test]
    fn tri_clip_against_volume_fully_outside() {
        let tr =
            tri(vec(2.0, 2.0, 2.0), vec(2.0, -2.0, 0.0), vec(3.0, -1.0, 2.0));
        let res = &mut vec![];
        [tr].clip(&PLANES, res);
        assert_eq!(res, &[]);
    }
    #[test]
    fn tri_clip_against_volume_result_is_quad() {
        //    z
        //    ^
        //    2
        //    | \
        //  - 1---+
        //    |   | \
        //    0---1---2 - - > x
        let tr =
            tri(vec(0.0, 0.0, 0.0), vec(2.0, 0.0, 0.0), vec(0.0, 0.0, 2.0));

        let res = &mut vec![];
        [tr].clip(&PLANES, res);
        assert_eq!(
            res,
            &[
                tri(vec(0.0, 0.0, 0.0), vec(1.0, 0.0, 0.0), vec(1.0, 0.0, 1.0)),
                tri(vec(0.0, 0.0, 0.0), vec(1.0, 0.0, 1.0), vec(0.0, 0.0, 1.0))
            ]
        );
    }

    #[test]
    fn tri_clip_against_volume_sweep() {
        // Sweep vertices over a grid spanning well outside the volume
        // and check that every output vertex is within bounds.
        let coords = [-2.0, 0.0, 2.0];
        let mut pts = vec![];
        for &x in &coords {
            for &y in &coords {
                for &z in &coords {
                    pts.push(vec(x, y, z));
                }
            }
        }

        for a in &pts {
            for b in &pts {
                for c in &pts {
                    let res = &mut vec![];
                    [tri(*a, *b, *c)].clip(&PLANES, res);
                    assert!(
                        res.iter().all(in_bounds),
                        "clip returned out-of-bounds vertex:\n\
                         input: {:?} {:?} {:?}\noutput: {:#?}",
                        a, b, c, &res
                    );
                }
            }
        }
    }

    fn in_bounds(Tri(vs): &Tri<ClipVert<f32>>) -> bool {
        const EPS: f32 = 1e-5;
        vs.iter().all(|v| {
            let w = v.pos.w();
            let [x, y, z] = [v.pos.x() / w, v.pos.y() / w, v.pos.z() / w];
            x.abs() <= 1.0 + EPS
                && y.abs() <= 1.0 + EPS
                && (-EPS..=1.0 + EPS).contains(&z)
        })
    }
}
