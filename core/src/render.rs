//! The rendering pipeline.
//!
//! The pipeline turns indexed triangles into shaded pixels in five
//! stages: vertex shading, clipping against the view volume, projection
//! and face culling, block rasterization, and the per-pixel commit into
//! the render target. All stages run on the CPU; the only state involved
//! is the [`Context`] passed in by the caller.

use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};
use core::iter::zip;

use crate::geom::{Edge, Tri, Vertex};
use crate::math::{mat::Mat4x4, vary::Vary, vec::Vec4};
use crate::util::arena::Arena;

pub use {
    clip::{Clip, ClipVert},
    ctx::Context,
    raster::{Frag, ScreenPt},
    shader::{FragColor, FragmentShader, Shader, VertexShader},
    state::RenderState,
    stats::{Stats, Throughput},
    target::{Framebuf, Target},
};

pub mod clip;
pub mod ctx;
pub mod raster;
pub mod shader;
pub mod state;
pub mod stats;
pub mod target;

/// The maximum number of vertices accepted by one draw call.
pub const MAX_VERTS: usize = 1 << 16;

/// An error from submitting work to the pipeline.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RenderError {
    /// A draw call referenced more vertices than [`MAX_VERTS`].
    TooManyVerts(usize),
    /// A framebuffer cannot have more than
    /// [`MAX_AUX`][shader::MAX_AUX] auxiliary planes.
    TooManyAux,
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyVerts(n) => write!(
                f,
                "draw call has {n} vertices, more than the maximum {MAX_VERTS}"
            ),
            Self::TooManyAux => write!(
                f,
                "framebuffer already has {} auxiliary planes",
                shader::MAX_AUX
            ),
        }
    }
}

/// Renders the given triangles into `target`.
///
/// Each triangle is a triple of indices into `verts`. The vertex shader
/// maps a vertex into a clip space position and a varying; after
/// clipping, projection, and culling, the surviving triangles are
/// rasterized, the varyings interpolated with perspective correction,
/// and each fragment shaded and committed under the state in `ctx`.
///
/// Triangles with counterclockwise NDC winding are front-facing;
/// out-of-range indices are skipped.
pub fn render<Vtx, Var, Uni, Shd, Tgt>(
    tris: &[Tri<usize>],
    verts: &[Vtx],
    shader: &Shd,
    uniform: Uni,
    viewport: &Mat4x4,
    target: &mut Tgt,
    ctx: &Context,
) -> Result<(), RenderError>
where
    Vtx: Clone,
    Var: Vary + Default,
    Uni: Copy,
    Shd: VertexShader<Vtx, Uni, Output = Vertex<Vec4, Var>>
        + FragmentShader<Var>,
    Tgt: Target,
{
    if verts.len() > MAX_VERTS {
        return Err(RenderError::TooManyVerts(verts.len()));
    }

    let mut stats = Stats::start();
    stats.calls = 1.0;
    stats.prims.i = tris.len();
    stats.verts.i = verts.len();

    // Vertex stage
    let pool = shade_vertices(verts, shader, uniform);

    let (w, h) = target.dims();
    let state = &ctx.state;

    // Gather with index validation, partitioned by visibility. Whole
    // triangles inside the view volume can be culled on their projected
    // positions right away, skipping the clipping stage; the rest are
    // clipped first and culled after projection.
    use clip::Status;
    let mut whole: Vec<Tri<ClipVert<Var>>> = Vec::new();
    let mut partial: Vec<Tri<ClipVert<Var>>> = Vec::new();
    let gather = |vs: &[usize; 3]| {
        debug_assert!(
            vs.iter().all(|&i| i < verts.len()),
            "triangle index out of bounds: {vs:?}"
        );
        let get = |i: usize| pool.get(i).cloned();
        Some(Tri([get(vs[0])?, get(vs[1])?, get(vs[2])?]))
    };
    for t in tris {
        let Some(Tri(vs)) = gather(&t.0) else {
            continue;
        };
        match clip::clip_volume::status(&vs) {
            Status::Hidden => continue,
            Status::Visible => {
                let scr =
                    [0, 1, 2].map(|i| to_screen(&vs[i].pos, viewport, ctx));
                if !state.cull.culls(screen_area2(&scr[0], &scr[1], &scr[2]))
                {
                    whole.push(Tri(vs));
                }
            }
            Status::Clipped => partial.push(Tri(vs)),
        }
    }
    let mut clipped: Vec<Tri<ClipVert<Var>>> = Vec::new();
    clip::clip_volume::clip(&partial[..], &mut clipped);

    for Tri(vs) in whole.into_iter().chain(clipped) {
        stats.verts.o += 3;

        let mut scr =
            vs.map(|v| (to_screen(&v.pos, viewport, ctx), v.attrib));

        // Front faces wind counterclockwise in NDC, which the viewport's
        // y flip turns into negative signed area in screen space.
        let area2 = screen_area2(&scr[0].0, &scr[1].0, &scr[2].0);
        if state.cull.culls(area2) {
            continue;
        }
        if area2 < 0 {
            scr.swap(1, 2);
        }
        stats.prims.o += 1;

        let verts = [scr[0].0, scr[1].0, scr[2].0];
        let attribs = [&scr[0].1, &scr[1].1, &scr[2].1];
        raster::tri_fill(verts, w, h, |blk| {
            let quad = shader::Quad {
                pos: blk.pos,
                mask: blk.mask,
                z: blk.z,
                vars: core::array::from_fn(|l| {
                    if blk.mask[l] {
                        attribs[0].blend(attribs[1], attribs[2], blk.weights[l])
                    } else {
                        Var::default()
                    }
                }),
            };
            shader.prep_quad(&quad);
            stats.frags += target.commit_quad(&quad, shader, state);
        });
    }

    *ctx.stats.borrow_mut() += stats.finish();
    Ok(())
}

/// Renders the given line segments into `target`.
///
/// Each edge is a pair of indices into `verts`. Lines are clipped like
/// triangles but never culled; varyings are interpolated linearly in
/// screen space between the two endpoints.
pub fn render_lines<Vtx, Var, Uni, Shd, Tgt>(
    edges: &[Edge<usize>],
    verts: &[Vtx],
    shader: &Shd,
    uniform: Uni,
    viewport: &Mat4x4,
    target: &mut Tgt,
    ctx: &Context,
) -> Result<(), RenderError>
where
    Vtx: Clone,
    Var: Vary + Default,
    Uni: Copy,
    Shd: VertexShader<Vtx, Uni, Output = Vertex<Vec4, Var>>
        + FragmentShader<Var>,
    Tgt: Target,
{
    if verts.len() > MAX_VERTS {
        return Err(RenderError::TooManyVerts(verts.len()));
    }

    let mut stats = Stats::start();
    stats.calls = 1.0;
    stats.prims.i = edges.len();
    stats.verts.i = verts.len();

    let pool = shade_vertices(verts, shader, uniform);

    let mut visible: Vec<Edge<ClipVert<Var>>> = Vec::new();
    let in_edges: Vec<_> = edges
        .iter()
        .filter_map(|Edge(a, b)| {
            debug_assert!(
                *a < verts.len() && *b < verts.len(),
                "edge index out of bounds: ({a}, {b})"
            );
            Some(Edge(pool.get(*a).cloned()?, pool.get(*b).cloned()?))
        })
        .collect();
    clip::clip_volume::clip(&in_edges[..], &mut visible);

    let (w, h) = target.dims();
    let state = &ctx.state;

    for Edge(a, b) in visible {
        stats.verts.o += 2;
        stats.prims.o += 1;

        let from = to_screen(&a.pos, viewport, ctx);
        let to = to_screen(&b.pos, viewport, ctx);
        raster::line(from, to, w, h, |blk| {
            let quad = shader::Quad {
                pos: blk.pos,
                mask: blk.mask,
                z: blk.z,
                vars: core::array::from_fn(|l| {
                    if blk.mask[l] {
                        a.attrib.blend(&b.attrib, &a.attrib, blk.weights[l])
                    } else {
                        Var::default()
                    }
                }),
            };
            shader.prep_quad(&quad);
            stats.frags += target.commit_quad(&quad, shader, state);
        });
    }

    *ctx.stats.borrow_mut() += stats.finish();
    Ok(())
}

/// Runs the vertex shader over `verts` into a pooled arena.
fn shade_vertices<Vtx, Var, Uni, Shd>(
    verts: &[Vtx],
    shader: &Shd,
    uniform: Uni,
) -> Arena<ClipVert<Var>>
where
    Vtx: Clone,
    Var: Vary + Default,
    Uni: Copy,
    Shd: VertexShader<Vtx, Uni, Output = Vertex<Vec4, Var>>,
{
    let mut pool = Arena::new();
    let range = pool.alloc(verts.len());
    for (i, v) in zip(range, verts) {
        *pool.get_mut(i) = ClipVert::new(shader.shade_vertex(v.clone(), uniform));
    }
    pool
}

/// Projects a clip space position to screen space.
///
/// Applies the perspective divide and the viewport transform, snaps x
/// and y to the nearest pixel, and remaps depth per the context.
fn to_screen(pos: &Vec4, viewport: &Mat4x4, ctx: &Context) -> ScreenPt {
    let inv_w = 1.0 / pos.w();
    let ndc = crate::math::vec::vec4(
        pos.x() * inv_w,
        pos.y() * inv_w,
        pos.z() * inv_w,
        1.0,
    );
    let scr = viewport.apply(&ndc);
    use crate::math::float::f32 as fp;
    ScreenPt {
        x: fp::floor(scr.x() + 0.5) as i32,
        y: fp::floor(scr.y() + 0.5) as i32,
        z: ctx.remap_depth(scr.z()),
        inv_w,
    }
}

/// Returns twice the signed area of a screen space triangle.
fn screen_area2(a: &ScreenPt, b: &ScreenPt, c: &ScreenPt) -> i64 {
    (b.x - a.x) as i64 * (c.y - a.y) as i64
        - (b.y - a.y) as i64 * (c.x - a.x) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_verts_rejected() {
        use crate::geom::{tri, vertex};
        use crate::math::color::rgba;
        use crate::util::buf::Buf2;

        let verts = alloc::vec![(); MAX_VERTS + 1];
        let shd = shader::new(
            |_: (), _: ()| vertex(Vec4::new([0.0, 0.0, 0.5, 1.0]), 0.0f32),
            |_: Frag<f32>| rgba(1.0, 1.0, 1.0, 1.0),
        );
        let mut target: Buf2<u32> = Buf2::new(4, 4);
        let res = render(
            &[tri(0, 1, 2)],
            &verts,
            &shd,
            (),
            &Mat4x4::IDENTITY,
            &mut target,
            &Context::default(),
        );
        assert_eq!(res, Err(RenderError::TooManyVerts(MAX_VERTS + 1)));
    }

    #[test]
    fn screen_area_sign() {
        let p = |x, y| ScreenPt { x, y, z: 0.0, inv_w: 1.0 };
        // Clockwise in a y-down coordinate system
        assert!(screen_area2(&p(0, 0), &p(10, 0), &p(0, 10)) > 0);
        assert!(screen_area2(&p(0, 0), &p(0, 10), &p(10, 0)) < 0);
        assert_eq!(screen_area2(&p(0, 0), &p(5, 5), &p(10, 10)), 0);
    }
}
