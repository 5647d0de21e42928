//! Fragment and vertex shaders.
//!
//! Shaders are functions used to customize vertex and fragment handling
//! during rendering.
//!
//! A *vertex shader* transforms and projects each vertex of the rendered
//! geometry into clip space, usually by a modelview and a projection
//! matrix, and computes the attributes interpolated across each primitive.
//!
//! A *fragment shader* computes the color of each individual pixel, or
//! fragment, drawn to the render target, given the interpolated vertex
//! attributes. A fragment shader may also discard a fragment, and may
//! write to auxiliary render targets in addition to the main color buffer.

use crate::{
    geom::Vertex,
    math::{color::Color4f, vec::Vec4},
};

use super::raster::Frag;

/// The maximum number of auxiliary color outputs per fragment.
pub const MAX_AUX: usize = 3;

/// The output of a fragment shader: a color for the main buffer and
/// optional colors for up to [`MAX_AUX`] auxiliary buffers.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FragColor {
    pub color: Color4f,
    pub aux: [Option<Color4f>; MAX_AUX],
}

impl FragColor {
    /// Returns a fragment color with no auxiliary outputs.
    #[inline]
    pub const fn new(color: Color4f) -> Self {
        Self { color, aux: [None; MAX_AUX] }
    }

    /// Returns `self` with auxiliary output `i` set.
    ///
    /// # Panics
    /// If `i >= MAX_AUX`.
    #[inline]
    pub fn with_aux(mut self, i: usize, color: Color4f) -> Self {
        self.aux[i] = Some(color);
        self
    }
}

impl From<Color4f> for FragColor {
    #[inline]
    fn from(color: Color4f) -> Self {
        Self::new(color)
    }
}

impl From<Color4f> for Option<FragColor> {
    #[inline]
    fn from(color: Color4f) -> Self {
        Some(FragColor::new(color))
    }
}

/// A 2×2 block of fragments about to be shaded.
///
/// Lane `l` corresponds to the pixel at
/// `(pos[0] + l % 2, pos[1] + l / 2)`; the varyings and depths of
/// uncovered lanes are unspecified.
#[derive(Clone, Debug, PartialEq)]
pub struct Quad<V> {
    pub pos: [i32; 2],
    pub mask: [bool; 4],
    pub z: [f32; 4],
    pub vars: [V; 4],
}

/// Trait for vertex shaders, used to transform vertices and perform
/// other per-vertex computations.
///
/// # Type parameters
/// * `In`: Type of the input vertex.
/// * `Uni`: Type of custom "uniform" (non-vertex-specific) data, such as
///   transform matrices, passed through to the shader.
pub trait VertexShader<In, Uni> {
    /// The type of the output vertex.
    type Output;

    /// Transforms `vertex`, outputting a new vertex of type
    /// `Self::Output`. For rendering, the output position must be in
    /// clip space.
    ///
    /// # Panics
    /// `shade_vertex` should never panic.
    fn shade_vertex(&self, vertex: In, uniform: Uni) -> Self::Output;
}

/// Trait for fragment shaders, used to compute the color of each
/// individual pixel, or fragment, rendered.
///
/// # Type parameters
/// * `Var`: The varying of the input fragment.
pub trait FragmentShader<Var> {
    /// Computes the color of `frag`. Returns either `Some(output)`, or
    /// `None` if the fragment should be discarded.
    ///
    /// # Panics
    /// `shade_fragment` should never panic.
    fn shade_fragment(&self, frag: Frag<Var>) -> Option<FragColor>;

    /// Called once per 2×2 block before its lanes are shaded.
    ///
    /// Shaders that need quad-level information, such as the
    /// cross-lane differences used to estimate screen-space
    /// derivatives, can observe it here. The default does nothing.
    fn prep_quad(&self, quad: &Quad<Var>) {
        let _ = quad;
    }
}

impl<F, In, Out, Uni> VertexShader<In, Uni> for F
where
    F: Fn(In, Uni) -> Out,
{
    type Output = Out;

    fn shade_vertex(&self, vertex: In, uniform: Uni) -> Out {
        self(vertex, uniform)
    }
}

impl<F, Var, Out> FragmentShader<Var> for F
where
    F: Fn(Frag<Var>) -> Out,
    Out: Into<Option<FragColor>>,
{
    fn shade_fragment(&self, frag: Frag<Var>) -> Option<FragColor> {
        self(frag).into()
    }
}

/// Composes a vertex and a fragment shader into a [`Shader`].
pub fn new<Vs, Fs, Vtx, Var, Uni>(vs: Vs, fs: Fs) -> Shader<Vs, Fs>
where
    Vs: VertexShader<Vtx, Uni, Output = Vertex<Vec4, Var>>,
    Fs: FragmentShader<Var>,
{
    Shader::new(vs, fs)
}

/// A type that composes a vertex and a fragment shader.
#[derive(Copy, Clone)]
pub struct Shader<Vs, Fs> {
    pub vertex_shader: Vs,
    pub fragment_shader: Fs,
}

impl<Vs, Fs> Shader<Vs, Fs> {
    /// Returns a new `Shader` with `vs` as the vertex shader
    /// and `fs` as the fragment shader.
    pub const fn new<In, Uni, Pos, Attr>(vs: Vs, fs: Fs) -> Self
    where
        Vs: VertexShader<In, Uni, Output = Vertex<Pos, Attr>>,
        Fs: FragmentShader<Attr>,
    {
        Self {
            vertex_shader: vs,
            fragment_shader: fs,
        }
    }
}

impl<In, Vs, Fs, Uni> VertexShader<In, Uni> for Shader<Vs, Fs>
where
    Vs: VertexShader<In, Uni>,
{
    type Output = Vs::Output;

    fn shade_vertex(&self, vertex: In, uniform: Uni) -> Self::Output {
        self.vertex_shader.shade_vertex(vertex, uniform)
    }
}

impl<Vs, Fs, Var> FragmentShader<Var> for Shader<Vs, Fs>
where
    Fs: FragmentShader<Var>,
{
    fn shade_fragment(&self, frag: Frag<Var>) -> Option<FragColor> {
        self.fragment_shader.shade_fragment(frag)
    }
    fn prep_quad(&self, quad: &Quad<Var>) {
        self.fragment_shader.prep_quad(quad);
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use crate::geom::vertex;
    use crate::math::color::rgba;
    use crate::math::vec::vec4;

    use super::*;

    #[test]
    fn closure_shaders() {
        let shd = new(
            |v: Vertex<Vec4, f32>, off: f32| {
                vertex(v.pos, v.attrib + off)
            },
            |frag: Frag<f32>| rgba(frag.var, 0.0, 0.0, 1.0),
        );

        let v = shd.shade_vertex(vertex(vec4(0.0, 0.0, 0.5, 1.0), 0.25), 0.25);
        assert_eq!(v.attrib, 0.5);

        let out = shd
            .shade_fragment(Frag { pos: [0, 0], z: 0.5, var: 0.5 })
            .unwrap();
        assert_eq!(out.color, rgba(0.5, 0.0, 0.0, 1.0));
        assert_eq!(out.aux, [None; MAX_AUX]);
    }

    #[test]
    fn closure_shader_discard() {
        let fs = |frag: Frag<f32>| {
            (frag.var > 0.5).then(|| FragColor::new(rgba(1.0, 1.0, 1.0, 1.0)))
        };
        assert!(fs.shade_fragment(Frag { pos: [0, 0], z: 0.0, var: 1.0 }).is_some());
        assert!(fs.shade_fragment(Frag { pos: [0, 0], z: 0.0, var: 0.0 }).is_none());
    }

    #[test]
    fn aux_outputs() {
        let out = FragColor::new(rgba(1.0, 0.0, 0.0, 1.0))
            .with_aux(1, rgba(0.0, 1.0, 0.0, 1.0));
        assert_eq!(out.aux[0], None);
        assert_eq!(out.aux[1], Some(rgba(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn prep_quad_observes_blocks() {
        struct Fs(Cell<usize>);
        impl FragmentShader<()> for Fs {
            fn shade_fragment(&self, _: Frag<()>) -> Option<FragColor> {
                Some(FragColor::default())
            }
            fn prep_quad(&self, _: &Quad<()>) {
                self.0.set(self.0.get() + 1);
            }
        }

        let fs = Fs(Cell::new(0));
        let quad = Quad {
            pos: [0, 0],
            mask: [true; 4],
            z: [0.0; 4],
            vars: [(); 4],
        };
        fs.prep_quad(&quad);
        fs.prep_quad(&quad);
        assert_eq!(fs.0.get(), 2);
    }
}
