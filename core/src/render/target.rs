//! Render targets.
//!
//! The typical render target is a framebuffer, comprising a color buffer,
//! a depth buffer, and possibly stencil and auxiliary color buffers. The
//! target owns the per-pixel commit sequence: depth test, stencil test,
//! fragment shading, blending, and the write-back of every plane.

use alloc::vec::Vec;

use crate::math::{color::Color4f, vary::Vary};
use crate::util::buf::Buf2;

use super::ctx::Context;
use super::raster::Frag;
use super::shader::{FragmentShader, Quad, MAX_AUX};
use super::state::RenderState;
use super::stats::Throughput;
use super::RenderError;

/// Pixel offsets of the four quad lanes.
const LANES: [[i32; 2]; 4] = [[0, 0], [1, 0], [0, 1], [1, 1]];

/// Trait for types that can be used as render targets.
pub trait Target {
    /// Commits one 2×2 block of fragments into `self`.
    ///
    /// Returns the count of fragments input and output.
    fn commit_quad<V, Fs>(
        &mut self,
        quad: &Quad<V>,
        fs: &Fs,
        state: &RenderState,
    ) -> Throughput
    where
        V: Vary,
        Fs: FragmentShader<V>;

    /// Returns the width and height of `self` in pixels.
    fn dims(&self) -> (u32, u32);
}

/// A framebuffer with color, depth, and optional stencil and auxiliary
/// planes, all owned and equal-sized.
#[derive(Clone)]
pub struct Framebuf {
    pub color_buf: Buf2<u32>,
    pub depth_buf: Buf2<f32>,
    pub stencil_buf: Option<Buf2<u8>>,
    aux_bufs: Vec<Buf2<u32>>,
}

impl Framebuf {
    /// Returns a framebuffer with color and depth planes only.
    ///
    /// The depth plane is initialized to 1.0, the far plane.
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            color_buf: Buf2::new(w, h),
            depth_buf: Buf2::new_with(w, h, 1.0),
            stencil_buf: None,
            aux_bufs: Vec::new(),
        }
    }

    /// Returns `self` with a stencil plane added, initialized to zero.
    pub fn with_stencil(mut self) -> Self {
        let (w, h) = self.dims();
        self.stencil_buf = Some(Buf2::new(w, h));
        self
    }

    /// Adds an auxiliary color plane and returns its index.
    ///
    /// Fragment shaders write to it via
    /// [`FragColor::with_aux`][super::shader::FragColor::with_aux].
    pub fn add_aux(&mut self) -> Result<usize, RenderError> {
        if self.aux_bufs.len() == MAX_AUX {
            return Err(RenderError::TooManyAux);
        }
        let (w, h) = self.dims();
        self.aux_bufs.push(Buf2::new(w, h));
        Ok(self.aux_bufs.len() - 1)
    }

    /// Returns the auxiliary plane at `i`, if present.
    pub fn aux(&self, i: usize) -> Option<&Buf2<u32>> {
        self.aux_bufs.get(i)
    }

    /// Clears the planes of `self` to the clear values in `ctx`.
    ///
    /// Planes whose clear value is `None` are left untouched.
    pub fn clear(&mut self, ctx: &Context) {
        if let Some(c) = ctx.color_clear {
            let argb = c.to_argb8888();
            self.color_buf.fill(argb);
            for aux in &mut self.aux_bufs {
                aux.fill(argb);
            }
        }
        if let Some(z) = ctx.depth_clear {
            self.depth_buf.fill(z);
        }
        if let (Some(s), Some(buf)) = (ctx.stencil_clear, &mut self.stencil_buf)
        {
            buf.fill(s);
        }
    }
}

/// Blends `src` over the packed color in `dst` per `state`, or simply
/// overwrites it if blending is disabled.
#[inline]
fn write_color(dst: &mut u32, src: &Color4f, state: &RenderState) {
    *dst = match &state.blend {
        Some(b) => b.eval(src, &Color4f::from_argb8888(*dst)).to_argb8888(),
        None => src.to_argb8888(),
    };
}

impl Target for Framebuf {
    /// Commits a quad into this framebuffer.
    ///
    /// For each covered lane, in order: the depth test, the stencil test
    /// if enabled, fragment shading, the color and auxiliary writes, the
    /// depth write, and finally the stencil operation. A lane rejected
    /// by a test, or discarded by the shader, leaves every plane of its
    /// pixel untouched.
    fn commit_quad<V, Fs>(
        &mut self,
        quad: &Quad<V>,
        fs: &Fs,
        state: &RenderState,
    ) -> Throughput
    where
        V: Vary,
        Fs: FragmentShader<V>,
    {
        let mut io = Throughput::default();
        for l in 0..4 {
            if !quad.mask[l] {
                continue;
            }
            io.i += 1;

            let x = (quad.pos[0] + LANES[l][0]) as u32;
            let y = (quad.pos[1] + LANES[l][1]) as u32;

            let new_z = quad.z[l];
            if !state.depth.cmp.eval(new_z, self.depth_buf[[x, y]]) {
                continue;
            }
            if let (Some(st), Some(buf)) = (&state.stencil, &self.stencil_buf)
            {
                if !st.test(buf[[x, y]]) {
                    continue;
                }
            }

            let frag = Frag {
                pos: [x as i32, y as i32],
                z: new_z,
                var: quad.vars[l].clone(),
            };
            let Some(out) = fs.shade_fragment(frag) else {
                continue;
            };

            io.o += 1;
            write_color(&mut self.color_buf[[x, y]], &out.color, state);
            for (aux, buf) in out.aux.iter().zip(&mut self.aux_bufs) {
                if let Some(c) = aux {
                    write_color(&mut buf[[x, y]], c, state);
                }
            }
            if state.depth.write {
                self.depth_buf[[x, y]] = new_z;
            }
            if let (Some(st), Some(buf)) =
                (&state.stencil, &mut self.stencil_buf)
            {
                let cur = buf[[x, y]];
                buf[[x, y]] = st.op.apply(cur, st.reference);
            }
        }
        io
    }

    fn dims(&self) -> (u32, u32) {
        (self.color_buf.width(), self.color_buf.height())
    }
}

impl Target for Buf2<u32> {
    /// Commits a quad into this `u32` color buffer.
    ///
    /// Does no depth or stencil testing; blending is still applied.
    fn commit_quad<V, Fs>(
        &mut self,
        quad: &Quad<V>,
        fs: &Fs,
        state: &RenderState,
    ) -> Throughput
    where
        V: Vary,
        Fs: FragmentShader<V>,
    {
        let mut io = Throughput::default();
        for l in 0..4 {
            if !quad.mask[l] {
                continue;
            }
            io.i += 1;
            let x = (quad.pos[0] + LANES[l][0]) as u32;
            let y = (quad.pos[1] + LANES[l][1]) as u32;
            let frag = Frag {
                pos: [x as i32, y as i32],
                z: quad.z[l],
                var: quad.vars[l].clone(),
            };
            if let Some(out) = fs.shade_fragment(frag) {
                io.o += 1;
                write_color(&mut self[[x, y]], &out.color, state);
            }
        }
        io
    }

    fn dims(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}
