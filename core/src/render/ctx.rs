//! Rendering context and parameters.

use core::cell::RefCell;
use core::ops::Range;

use crate::math::color::Color4f;

use super::{state::RenderState, Stats};

/// Context and parameters used by the renderer.
///
/// The context carries the settings that persist across draw calls, the
/// per-draw [`RenderState`], and the statistics accumulator. There is no
/// global state; two contexts can render concurrently to different
/// targets.
#[derive(Clone, Debug)]
pub struct Context {
    /// The color with which to fill the color buffer to clear it, if any.
    ///
    /// If rendered geometry always covers the entire frame, `color_clear`
    /// can be set to `None` to avoid redundant work.
    pub color_clear: Option<Color4f>,

    /// The value with which to fill the depth buffer to clear it, if any.
    pub depth_clear: Option<f32>,

    /// The value with which to fill the stencil buffer to clear it,
    /// if any.
    pub stencil_clear: Option<u8>,

    /// The per-draw render state: culling, depth, stencil, and blending.
    pub state: RenderState,

    /// Remaps device depth from [0, 1] into the given subrange before
    /// the depth test, or passes it through unchanged if `None`.
    ///
    /// Useful for reserving depth ranges for overlays or split scenes.
    pub depth_range: Option<Range<f32>>,

    /// Collected rendering statistics.
    pub stats: RefCell<Stats>,
}

impl Default for Context {
    /// Creates a rendering context with default settings.
    ///
    /// The default values are:
    /// * Color clear:   Opaque black
    /// * Depth clear:   1.0 (the far plane)
    /// * Stencil clear: 0
    /// * Render state:  [`RenderState::default`]
    /// * Depth range:   Passthrough
    fn default() -> Self {
        Self {
            color_clear: Some(Color4f::BLACK),
            depth_clear: Some(1.0),
            stencil_clear: Some(0),
            state: RenderState::default(),
            depth_range: None,
            stats: Default::default(),
        }
    }
}

impl Context {
    /// Applies the depth range remap, if any, to a device depth value.
    #[inline]
    pub fn remap_depth(&self, z: f32) -> f32 {
        match &self.depth_range {
            Some(r) => r.start + z * (r.end - r.start),
            None => z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_remap() {
        let mut ctx = Context::default();
        assert_eq!(ctx.remap_depth(0.25), 0.25);

        ctx.depth_range = Some(0.5..1.0);
        assert_eq!(ctx.remap_depth(0.0), 0.5);
        assert_eq!(ctx.remap_depth(1.0), 1.0);
        assert_eq!(ctx.remap_depth(0.5), 0.75);
    }
}
