//! Core functionality of the `rasterpipe` software rasterizer.
//!
//! `rasterpipe-core` is a `no_std` crate implementing a programmable
//! triangle rasterization pipeline entirely on the CPU: homogeneous-space
//! clipping, incremental edge-function coverage in 2×2 pixel blocks,
//! perspective-correct interpolation of generic vertex attributes, and a
//! configurable depth/stencil/blend output-merger stage.
//!
//! # Features
//! * `std`: Enables `std` support. Enables `fp`.
//! * `fp`: Enables features requiring floating-point intrinsics,
//!   in particular vector length and normalization.
//! * `libm`: Uses the [`libm`] crate for floating-point functions
//!   in `no_std`. Enables `fp`.
//! * `mm`: Uses the [`micromath`] crate for fast approximate
//!   floating-point functions in `no_std`. Enables `fp`.

#![no_std]
#![allow(clippy::needless_range_loop)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

/// Convenience re-exports of the most commonly used items.
pub mod prelude {
    pub use crate::geom::{tri, vertex, Edge, Tri, Vertex};

    pub use crate::math::{
        color::{rgba, Color4f},
        mat::{orthographic, perspective, viewport, Mat4x4},
        vary::Vary,
        vec::{vec2, vec3, vec4, Vec2, Vec2i, Vec3, Vec4},
        Lerp, Linear,
    };

    pub use crate::render::{
        clip::ClipVert,
        ctx::Context,
        raster::Frag,
        render, render_lines, shader,
        shader::{FragColor, Shader},
        state::{
            Blend, BlendFactor, BlendOp, Compare, CullMode, DepthState,
            RenderState, StencilOp, StencilState,
        },
        target::{Framebuf, Target},
    };

    pub use crate::util::buf::Buf2;
}
