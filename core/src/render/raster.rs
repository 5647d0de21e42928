//! Converting primitives into fragments.
//!
//! Triangle coverage is decided by integer edge functions: a pixel is
//! inside a triangle if it is on the interior side of all three edges.
//! Because the edge functions are affine in x and y, they are evaluated
//! incrementally, two additions per pixel step, and four pixels at a time
//! as a 2×2 block whose lanes share a single setup. Pixels exactly on a
//! shared edge are claimed by exactly one of the adjacent triangles by
//! the top-left fill rule, so abutting triangles neither crack nor double
//! blend.

/// A vertex projected to screen space.
///
/// `x` and `y` are integer pixel coordinates with y growing downwards;
/// `z` is the depth in [0, 1] and `inv_w` the reciprocal of the clip
/// space w, kept for perspective correction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenPt {
    pub x: i32,
    pub y: i32,
    pub z: f32,
    pub inv_w: f32,
}

/// A single fragment: a candidate pixel emitted by the rasterizer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frag<V> {
    pub pos: [i32; 2],
    pub z: f32,
    pub var: V,
}

/// A 2×2 block of fragment candidates.
///
/// Lane `l` of the block corresponds to the pixel at
/// `(pos[0] + l % 2, pos[1] + l / 2)`. Uncovered lanes have an
/// unspecified weight and depth.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Block {
    /// Position of the top-left pixel. Always even in both coordinates
    /// for blocks emitted by [`tri_fill`].
    pub pos: [i32; 2],
    /// Which of the four lanes are covered.
    pub mask: [bool; 4],
    /// Perspective-corrected barycentric weights per lane; each covered
    /// lane's weights sum to 1.
    pub weights: [[f32; 3]; 4],
    /// Interpolated depth per lane. Depth is interpolated linearly in
    /// screen space, matching a depth buffer in device coordinates.
    pub z: [f32; 4],
}

/// Pixel offsets of the four block lanes.
const LANES: [[i32; 2]; 4] = [[0, 0], [1, 0], [0, 1], [1, 1]];

/// Evaluates the edge function of the directed edge `a`–`b` at `p`.
///
/// The result is positive if `p` is on the left of the edge when looking
/// from `a` towards `b` in a y-down coordinate system, and equals twice
/// the signed area of the triangle `a`, `b`, `p`.
#[inline]
fn edge_fn(a: [i32; 2], b: [i32; 2], p: [i32; 2]) -> i32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// A directed edge set up for incremental evaluation.
struct EdgeFn {
    /// Change per unit step in +x.
    step_x: i32,
    /// Change per unit step in +y.
    step_y: i32,
    /// Fill-rule bias: 0 for top and left edges, -1 otherwise, so that
    /// `value + bias >= 0` admits points exactly on a top or left edge
    /// but rejects those on a bottom or right edge.
    bias: i32,
}

impl EdgeFn {
    fn new(a: [i32; 2], b: [i32; 2]) -> Self {
        let d = [b[0] - a[0], b[1] - a[1]];
        // With y growing downwards and positive-area winding, a "top"
        // edge runs exactly rightwards and a "left" edge upwards.
        let top_left = d[1] < 0 || (d[1] == 0 && d[0] > 0);
        Self {
            step_x: -d[1],
            step_y: d[0],
            bias: if top_left { 0 } else { -1 },
        }
    }
}

/// Returns whether the pixel at `(x, y)` is covered by the triangle.
///
/// This is the same test [`tri_fill`] applies to every lane; the block
/// path computes the identical integers incrementally.
pub fn covered(verts: &[ScreenPt; 3], x: i32, y: i32) -> bool {
    let [p0, p1, p2] = verts.map(|v| [v.x, v.y]);
    if edge_fn(p0, p1, p2) <= 0 {
        return false;
    }
    let p = [x, y];
    [[p0, p1], [p1, p2], [p2, p0]].iter().all(|&[a, b]| {
        edge_fn(a, b, p) + EdgeFn::new(a, b).bias >= 0
    })
}

/// Rasterizes a triangle, calling `emit` for each 2×2 block with at
/// least one covered pixel.
///
/// The triangle must have positive signed area in screen space; callers
/// are expected to have culled or reordered it accordingly. Degenerate
/// and negative-area triangles produce no output. Coverage is clipped to
/// the `width` × `height` viewport.
pub fn tri_fill<F>(verts: [ScreenPt; 3], width: u32, height: u32, mut emit: F)
where
    F: FnMut(&Block),
{
    let [v0, v1, v2] = verts;
    let [p0, p1, p2] = [[v0.x, v0.y], [v1.x, v1.y], [v2.x, v2.y]];

    let area = edge_fn(p0, p1, p2);
    if area <= 0 {
        return;
    }

    // Bounding box clamped to the viewport, with the block origin
    // aligned down to even coordinates.
    let min_x = (v0.x.min(v1.x).min(v2.x)).max(0) & !1;
    let min_y = (v0.y.min(v1.y).min(v2.y)).max(0) & !1;
    let max_x = (v0.x.max(v1.x).max(v2.x)).min(width as i32 - 1);
    let max_y = (v0.y.max(v1.y).max(v2.y)).min(height as i32 - 1);
    if max_x < min_x || max_y < min_y {
        return;
    }

    let ends = [[p0, p1], [p1, p2], [p2, p0]];
    let edges = ends.map(|[a, b]| EdgeFn::new(a, b));

    // Edge values at the four lanes of the block at (min_x, min_y)
    let mut rows: [[i32; 4]; 3] = ends.map(|[a, b]| {
        LANES.map(|[ox, oy]| edge_fn(a, b, [min_x + ox, min_y + oy]))
    });

    let inv_area = 1.0 / area as f32;
    let zs = [v0.z, v1.z, v2.z];
    let inv_ws = [v0.inv_w, v1.inv_w, v2.inv_w];

    let mut y = min_y;
    while y <= max_y {
        let mut vals = rows;
        let mut x = min_x;
        while x <= max_x {
            let mut mask = [false; 4];
            let mut any = false;
            for l in 0..4 {
                let in_bounds =
                    x + LANES[l][0] <= max_x && y + LANES[l][1] <= max_y;
                let inside = (0..3)
                    .all(|i| vals[i][l] + edges[i].bias >= 0);
                if in_bounds && inside {
                    mask[l] = true;
                    any = true;
                }
            }
            if any {
                let mut weights = [[0.0; 3]; 4];
                let mut z = [0.0; 4];
                for l in 0..4 {
                    if !mask[l] {
                        continue;
                    }
                    // The weight of a vertex is proportional to the
                    // edge function of the opposite edge.
                    let bary = [
                        vals[1][l] as f32 * inv_area,
                        vals[2][l] as f32 * inv_area,
                        vals[0][l] as f32 * inv_area,
                    ];
                    z[l] = bary[0] * zs[0]
                        + bary[1] * zs[1]
                        + bary[2] * zs[2];

                    // Perspective correction: scale by 1/w and
                    // renormalize so the weights again sum to 1.
                    let pw = [
                        bary[0] * inv_ws[0],
                        bary[1] * inv_ws[1],
                        bary[2] * inv_ws[2],
                    ];
                    let sum = pw[0] + pw[1] + pw[2];
                    weights[l] = pw.map(|w| w / sum);
                }
                emit(&Block { pos: [x, y], mask, weights, z });
            }
            for i in 0..3 {
                for l in 0..4 {
                    vals[i][l] += 2 * edges[i].step_x;
                }
            }
            x += 2;
        }
        for i in 0..3 {
            for l in 0..4 {
                rows[i][l] += 2 * edges[i].step_y;
            }
        }
        y += 2;
    }
}

/// Rasterizes a line segment, calling `emit` for each pixel with a
/// single-lane block.
///
/// The weights of the emitted lane are `[1 - t, t, 0]`, where `t` is the
/// fraction travelled from `from` to `to`, interpolated in screen space.
pub fn line<F>(from: ScreenPt, to: ScreenPt, width: u32, height: u32, mut emit: F)
where
    F: FnMut(&Block),
{
    use crate::math::float::f32 as fp;

    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let steps = dx.abs().max(dy.abs());

    for i in 0..=steps {
        let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
        let x = fp::floor(from.x as f32 + dx as f32 * t + 0.5) as i32;
        let y = fp::floor(from.y as f32 + dy as f32 * t + 0.5) as i32;
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            continue;
        }
        let mut block = Block {
            pos: [x, y],
            mask: [true, false, false, false],
            weights: [[0.0; 3]; 4],
            z: [0.0; 4],
        };
        block.weights[0] = [1.0 - t, t, 0.0];
        block.z[0] = from.z + (to.z - from.z) * t;
        emit(&block);
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;

    use super::*;

    fn pt(x: i32, y: i32) -> ScreenPt {
        ScreenPt { x, y, z: 0.0, inv_w: 1.0 }
    }

    fn pixels(verts: [ScreenPt; 3], w: u32, h: u32) -> Vec<[i32; 2]> {
        let mut out = Vec::new();
        tri_fill(verts, w, h, |blk| {
            for l in 0..4 {
                if blk.mask[l] {
                    out.push([blk.pos[0] + LANES[l][0], blk.pos[1] + LANES[l][1]]);
                }
            }
        });
        out.sort_unstable();
        out
    }

    #[test]
    fn right_triangle_coverage() {
        let verts = [pt(0, 0), pt(10, 0), pt(0, 10)];
        let px = pixels(verts, 16, 16);

        // Top and left edges are included, the diagonal is not:
        // exactly the pixels with x + y <= 9
        assert_eq!(px.len(), 55);
        assert!(px.contains(&[0, 0]));
        assert!(px.contains(&[1, 1]));
        assert!(px.contains(&[9, 0]));
        assert!(px.contains(&[0, 9]));
        assert!(!px.contains(&[10, 0]));
        assert!(!px.contains(&[0, 10]));
        assert!(!px.contains(&[9, 9]));
        assert!(px.iter().all(|&[x, y]| x + y <= 9));
    }

    #[test]
    fn shared_edge_covered_exactly_once() {
        // A square split along its diagonal. Every pixel inside must be
        // covered by exactly one of the two triangles.
        let t1 = [pt(0, 0), pt(8, 0), pt(8, 8)];
        let t2 = [pt(0, 0), pt(8, 8), pt(0, 8)];

        let mut counts: BTreeMap<[i32; 2], u32> = BTreeMap::new();
        for t in [t1, t2] {
            for p in pixels(t, 16, 16) {
                *counts.entry(p).or_default() += 1;
            }
        }

        for x in 0..8 {
            for y in 0..8 {
                assert_eq!(
                    counts.get(&[x, y]),
                    Some(&1),
                    "pixel ({x}, {y}) not covered exactly once"
                );
            }
        }
        assert_eq!(counts.len(), 64);
    }

    #[test]
    fn blocks_match_scalar_coverage() {
        let verts = [pt(3, 1), pt(13, 6), pt(2, 11)];
        let px = pixels(verts, 16, 16);

        for x in 0..16 {
            for y in 0..16 {
                assert_eq!(
                    px.contains(&[x, y]),
                    covered(&verts, x, y),
                    "block and scalar coverage disagree at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn degenerate_covers_nothing() {
        assert!(pixels([pt(0, 0), pt(5, 5), pt(10, 10)], 16, 16).is_empty());
        assert!(pixels([pt(3, 3), pt(3, 3), pt(3, 3)], 16, 16).is_empty());
    }

    #[test]
    fn negative_area_covers_nothing() {
        // Opposite winding; the caller is responsible for reordering
        assert!(pixels([pt(0, 0), pt(0, 10), pt(10, 0)], 16, 16).is_empty());
    }

    #[test]
    fn coverage_clipped_to_viewport() {
        let px = pixels([pt(0, 0), pt(10, 0), pt(0, 10)], 4, 4);
        assert!(px.iter().all(|&[x, y]| x < 4 && y < 4));
        assert_eq!(px.len(), 16);
    }

    #[test]
    fn weights_sum_to_one() {
        let verts = [
            ScreenPt { x: 0, y: 0, z: 0.0, inv_w: 1.0 },
            ScreenPt { x: 12, y: 0, z: 0.5, inv_w: 0.5 },
            ScreenPt { x: 0, y: 12, z: 1.0, inv_w: 0.25 },
        ];
        tri_fill(verts, 16, 16, |blk| {
            for l in 0..4 {
                if blk.mask[l] {
                    let sum: f32 = blk.weights[l].iter().sum();
                    assert!((sum - 1.0).abs() < 1e-5);
                }
            }
        });
    }

    #[test]
    fn depth_interpolation_is_affine() {
        // With equal vertex depths, every fragment has that depth
        let verts = [
            ScreenPt { x: 0, y: 0, z: 0.25, inv_w: 1.0 },
            ScreenPt { x: 10, y: 0, z: 0.25, inv_w: 0.5 },
            ScreenPt { x: 0, y: 10, z: 0.25, inv_w: 2.0 },
        ];
        tri_fill(verts, 16, 16, |blk| {
            for l in 0..4 {
                if blk.mask[l] {
                    assert!((blk.z[l] - 0.25).abs() < 1e-6);
                }
            }
        });
    }

    #[test]
    fn line_horizontal() {
        let mut px = Vec::new();
        line(pt(1, 2), pt(5, 2), 16, 16, |blk| px.push(blk.pos));
        assert_eq!(px, [[1, 2], [2, 2], [3, 2], [4, 2], [5, 2]]);
    }

    #[test]
    fn line_diagonal_weights() {
        let mut ends = Vec::new();
        line(pt(0, 0), pt(4, 4), 16, 16, |blk| {
            ends.push((blk.pos, blk.weights[0]));
        });
        assert_eq!(ends.len(), 5);
        assert_eq!(ends[0].0, [0, 0]);
        assert_eq!(ends[0].1, [1.0, 0.0, 0.0]);
        assert_eq!(ends[4].0, [4, 4]);
        assert_eq!(ends[4].1, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn line_single_point() {
        let mut px = Vec::new();
        line(pt(3, 3), pt(3, 3), 16, 16, |blk| px.push(blk.pos));
        assert_eq!(px, [[3, 3]]);
    }
}
