//! Per-draw render state: culling, depth, stencil, and blending.
//!
//! The state is a plain value passed to [`render`][super::render]; there
//! is no hidden global configuration. The defaults give the common
//! opaque-geometry setup: back-face culling, less-or-equal depth testing
//! with writes enabled, no stencil, no blending.

use crate::math::color::Color4f;

/// A comparison function, as used by depth and stencil tests.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Compare {
    /// The test always passes.
    Always,
    /// The test never passes.
    Never,
    Less,
    #[default]
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Compare {
    /// Applies the comparison to `new` (left operand) and `old` (right
    /// operand).
    #[inline]
    pub fn eval<T: PartialOrd>(self, new: T, old: T) -> bool {
        use Compare::*;
        match self {
            Always => true,
            Never => false,
            Less => new < old,
            LessEqual => new <= old,
            Greater => new > old,
            GreaterEqual => new >= old,
            Equal => new == old,
            NotEqual => new != old,
        }
    }
}

/// Depth test and write configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DepthState {
    /// Comparison between the incoming fragment depth and the value in
    /// the depth buffer; the fragment is kept if the test passes.
    pub cmp: Compare,
    /// Whether the depth of surviving fragments is written back.
    pub write: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        Self { cmp: Compare::LessEqual, write: true }
    }
}

/// Action applied to the stencil buffer when a fragment is committed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum StencilOp {
    /// Leaves the stencil value unchanged.
    #[default]
    Keep,
    /// Clears the stencil value to zero.
    Zero,
    /// Replaces the stencil value with the reference value.
    Replace,
}

impl StencilOp {
    /// Returns the new stencil value, given the current value and the
    /// reference value.
    #[inline]
    pub fn apply(self, cur: u8, reference: u8) -> u8 {
        match self {
            Self::Keep => cur,
            Self::Zero => 0,
            Self::Replace => reference,
        }
    }
}

/// Stencil test configuration.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StencilState {
    /// Comparison between the reference value and the stencil buffer.
    pub cmp: Compare,
    /// The reference value compared and possibly written.
    pub reference: u8,
    /// Operation applied to the stencil buffer when a fragment passes
    /// all tests.
    pub op: StencilOp,
}

impl StencilState {
    /// Returns whether a fragment at a pixel with stencil value `cur`
    /// passes the stencil test.
    #[inline]
    pub fn test(&self, cur: u8) -> bool {
        self.cmp.eval(self.reference, cur)
    }
}

/// A blending coefficient.
///
/// Factors are applied componentwise, except `SrcAlphaSaturate`, whose
/// alpha component is always 1.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

impl BlendFactor {
    fn eval(self, src: &Color4f, dst: &Color4f) -> [f32; 4] {
        use BlendFactor::*;
        match self {
            Zero => [0.0; 4],
            One => [1.0; 4],
            SrcColor => src.0,
            OneMinusSrcColor => src.0.map(|c| 1.0 - c),
            SrcAlpha => [src.a(); 4],
            OneMinusSrcAlpha => [1.0 - src.a(); 4],
            DstColor => dst.0,
            OneMinusDstColor => dst.0.map(|c| 1.0 - c),
            DstAlpha => [dst.a(); 4],
            OneMinusDstAlpha => [1.0 - dst.a(); 4],
            SrcAlphaSaturate => {
                let f = src.a().min(1.0 - dst.a());
                [f, f, f, 1.0]
            }
        }
    }
}

/// The operation combining the weighted source and destination colors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BlendOp {
    /// `src * sf + dst * df`
    #[default]
    Add,
    /// `src * sf - dst * df`
    Subtract,
    /// `dst * df - src * sf`
    ReverseSubtract,
    /// `min(src, dst)`; the factors are ignored.
    Min,
    /// `max(src, dst)`; the factors are ignored.
    Max,
}

/// A complete blend equation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Blend {
    pub src: BlendFactor,
    pub dst: BlendFactor,
    pub op: BlendOp,
}

impl Blend {
    /// Standard alpha blending: `src * srcA + dst * (1 - srcA)`.
    pub const ALPHA: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
        op: BlendOp::Add,
    };
    /// Additive blending: `src + dst`.
    pub const ADD: Self = Self {
        src: BlendFactor::One,
        dst: BlendFactor::One,
        op: BlendOp::Add,
    };

    /// Combines a source color with the color already in the buffer.
    ///
    /// The result is clamped to [0, 1] componentwise.
    pub fn eval(&self, src: &Color4f, dst: &Color4f) -> Color4f {
        use BlendOp::*;
        let sf = self.src.eval(src, dst);
        let df = self.dst.eval(src, dst);
        let comp = |i: usize| match self.op {
            Add => src.0[i] * sf[i] + dst.0[i] * df[i],
            Subtract => src.0[i] * sf[i] - dst.0[i] * df[i],
            ReverseSubtract => dst.0[i] * df[i] - src.0[i] * sf[i],
            Min => src.0[i].min(dst.0[i]),
            Max => src.0[i].max(dst.0[i]),
        };
        Color4f(core::array::from_fn(comp)).saturate()
    }
}

/// Which triangles are discarded based on their facing.
///
/// A triangle is front-facing if its vertices wind counterclockwise in
/// NDC; the viewport's y flip makes that a clockwise, negative-area
/// winding in screen space.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CullMode {
    /// Draws all triangles regardless of facing.
    Off,
    /// Culls front-facing triangles.
    Front,
    /// Culls back-facing triangles.
    #[default]
    Back,
}

impl CullMode {
    /// Returns whether a triangle with the given doubled signed screen
    /// area is culled. Zero-area triangles are always culled.
    #[inline]
    pub fn culls(self, area2: i64) -> bool {
        match self {
            _ if area2 == 0 => true,
            Self::Off => false,
            Self::Front => area2 < 0,
            Self::Back => area2 > 0,
        }
    }
}

/// The complete per-draw state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RenderState {
    pub cull: CullMode,
    pub depth: DepthState,
    /// Stencil test; `None` disables it even if a stencil buffer exists.
    pub stencil: Option<StencilState>,
    /// Blend equation; `None` overwrites the buffer without blending.
    pub blend: Option<Blend>,
}
