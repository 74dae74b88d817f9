//! Triangle Scan Conversion
//!
//! Edge-walking rasterizer: vertices sorted by y, boundary x tracked in
//! 16.16 fixed point per edge, attributes interpolated to per-scanline
//! endpoints and then forward-differenced across the span. Texturing is
//! perspective-correct via linear s/w, t/w, 1/w with one reciprocal per
//! NB_INTERP-pixel block.

use super::framebuffer::FrameBuffer;
use super::state::{FragmentState, RasterVertex, DEPTH_MAX};
use super::combine_texel;

/// Pixels between true perspective divides along a textured span
const NB_INTERP: i32 = 8;

/// Interpolated attribute bundle (per scanline endpoint / per pixel)
#[derive(Debug, Clone, Copy, Default)]
struct Attrs {
    z: f32,
    r: f32,
    g: f32,
    b: f32,
    a: f32,
    /// s/w, t/w, 1/w — affine in screen space
    sw: f32,
    tw: f32,
    iw: f32,
    fog: f32,
}

impl Attrs {
    fn from_vertex(v: &RasterVertex, color: [u8; 4]) -> Self {
        Self {
            z: v.z as f32,
            r: color[0] as f32,
            g: color[1] as f32,
            b: color[2] as f32,
            a: color[3] as f32,
            sw: v.s * v.inv_w,
            tw: v.t * v.inv_w,
            iw: v.inv_w,
            fog: v.fog,
        }
    }

    /// (other - self) * scale
    fn step_to(&self, other: &Self, scale: f32) -> Self {
        Self {
            z: (other.z - self.z) * scale,
            r: (other.r - self.r) * scale,
            g: (other.g - self.g) * scale,
            b: (other.b - self.b) * scale,
            a: (other.a - self.a) * scale,
            sw: (other.sw - self.sw) * scale,
            tw: (other.tw - self.tw) * scale,
            iw: (other.iw - self.iw) * scale,
            fog: (other.fog - self.fog) * scale,
        }
    }

    /// self + step * k
    fn offset(&self, step: &Self, k: f32) -> Self {
        Self {
            z: self.z + step.z * k,
            r: self.r + step.r * k,
            g: self.g + step.g * k,
            b: self.b + step.b * k,
            a: self.a + step.a * k,
            sw: self.sw + step.sw * k,
            tw: self.tw + step.tw * k,
            iw: self.iw + step.iw * k,
            fog: self.fog + step.fog * k,
        }
    }

    #[inline]
    fn advance(&mut self, step: &Self) {
        self.z += step.z;
        self.r += step.r;
        self.g += step.g;
        self.b += step.b;
        self.a += step.a;
        self.sw += step.sw;
        self.tw += step.tw;
        self.iw += step.iw;
        self.fog += step.fog;
    }
}

/// Signed doubled area of the triangle in screen space.
///
/// The sign encodes winding: positive = clockwise in the y-down viewport
/// frame. Stable under cyclic rotation of the vertices, flips under
/// reversal.
pub fn signed_area2(v0: &RasterVertex, v1: &RasterVertex, v2: &RasterVertex) -> i64 {
    (v1.x - v0.x) as i64 * (v2.y - v0.y) as i64 - (v2.x - v0.x) as i64 * (v1.y - v0.y) as i64
}

/// Rasterize one triangle with the captured state.
///
/// The vertices are viewport-space (already clipped and projected). Flat
/// shading is resolved upstream: the context writes the provoking vertex's
/// color into all three vertices, so `smooth == false` only skips the
/// per-pixel color interpolation.
pub fn fill_triangle(
    fb: &mut FrameBuffer,
    state: &FragmentState,
    v0: &RasterVertex,
    v1: &RasterVertex,
    v2: &RasterVertex,
) {
    if signed_area2(v0, v1, v2) == 0 {
        return;
    }
    match (state.texture.is_some(), state.smooth) {
        (true, true) => fill::<true, true>(fb, state, v0, v1, v2),
        (true, false) => fill::<true, false>(fb, state, v0, v1, v2),
        (false, true) => fill::<false, true>(fb, state, v0, v1, v2),
        (false, false) => fill::<false, false>(fb, state, v0, v1, v2),
    }
}

fn fill<const TEXTURED: bool, const SMOOTH: bool>(
    fb: &mut FrameBuffer,
    st: &FragmentState,
    v0: &RasterVertex,
    v1: &RasterVertex,
    v2: &RasterVertex,
) {
    let bounds = fb.effective_bounds(st);
    if bounds.is_empty() {
        return;
    }

    let flat_color = [v0.r, v0.g, v0.b, v0.a];
    let color_of = |v: &RasterVertex| {
        if SMOOTH {
            [v.r, v.g, v.b, v.a]
        } else {
            flat_color
        }
    };

    // Depth bias from polygon offset, using the plane's depth gradients
    let mut z_bias = 0.0f32;
    if st.offset_fill {
        let area2 = signed_area2(v0, v1, v2) as f32;
        let dz1 = v1.z as f32 - v0.z as f32;
        let dz2 = v2.z as f32 - v0.z as f32;
        let dzdx = (dz1 * (v2.y - v0.y) as f32 - dz2 * (v1.y - v0.y) as f32) / area2;
        let dzdy = ((v1.x - v0.x) as f32 * dz2 - (v2.x - v0.x) as f32 * dz1) / area2;
        z_bias = st.offset_factor * dzdx.abs().max(dzdy.abs()) + st.offset_units;
    }

    // Sort by y (then x for stability at equal heights)
    let mut p = [*v0, *v1, *v2];
    p.sort_by_key(|v| (v.y, v.x));
    let [p0, p1, p2] = p;
    if p0.y == p2.y {
        return; // zero-height sliver
    }

    let a0 = Attrs::from_vertex(&p0, color_of(&p0));
    let a1 = Attrs::from_vertex(&p1, color_of(&p1));
    let a2 = Attrs::from_vertex(&p2, color_of(&p2));

    // Long edge p0 -> p2 in 16.16 fixed point
    let long_dy = p2.y - p0.y;
    let long_dxdy = (((p2.x - p0.x) as i64) << 16) / long_dy as i64;
    let long_step = a0.step_to(&a2, 1.0 / long_dy as f32);

    // Is the long edge the left boundary? p1's side decides.
    let long_on_left = signed_area2(&p0, &p1, &p2) > 0;

    let fb_width = fb.width();

    // Upper half uses edge p0->p1, lower half p1->p2
    for part in 0..2 {
        let (top, bot) = if part == 0 { (p0, p1) } else { (p1, p2) };
        let edge_dy = bot.y - top.y;
        if edge_dy == 0 {
            continue;
        }
        let edge_dxdy = (((bot.x - top.x) as i64) << 16) / edge_dy as i64;
        let (a_top, a_bot) = if part == 0 { (a0, a1) } else { (a1, a2) };
        let edge_step = a_top.step_to(&a_bot, 1.0 / edge_dy as f32);

        let y_start = top.y.max(bounds.top);
        let y_end = bot.y.min(bounds.bottom);

        for y in y_start..y_end {
            let t_long = (y - p0.y) as f32;
            let t_edge = (y - top.y) as f32;
            let x_long = ((p0.x as i64) << 16) + long_dxdy * (y - p0.y) as i64;
            let x_edge = ((top.x as i64) << 16) + edge_dxdy * (y - top.y) as i64;
            let al = a0.offset(&long_step, t_long);
            let ae = a_top.offset(&edge_step, t_edge);

            let (xl_fixed, xr_fixed, attr_l, attr_r) = if long_on_left {
                (x_long, x_edge, al, ae)
            } else {
                (x_edge, x_long, ae, al)
            };

            // Span covers [ceil(xl), ceil(xr)); shared edges paint once
            let mut xs = ((xl_fixed + 0xffff) >> 16) as i32;
            let mut xe = ((xr_fixed + 0xffff) >> 16) as i32;
            if xs < bounds.left {
                xs = bounds.left;
            }
            if xe > bounds.right {
                xe = bounds.right;
            }
            if xs >= xe {
                continue;
            }

            let span_w = (xr_fixed - xl_fixed) as f32 / 65536.0;
            let d = if span_w > 0.0 {
                attr_l.step_to(&attr_r, 1.0 / span_w)
            } else {
                Attrs::default()
            };
            // Prestep to the first covered pixel center
            let prestep = xs as f32 - (xl_fixed as f32 / 65536.0);
            let mut acc = attr_l.offset(&d, prestep);
            acc.z += z_bias;

            let mut idx = (y * fb_width + xs) as usize;

            if TEXTURED {
                let binding = st.texture.as_ref().expect("textured fill without binding");
                let mut x = xs;
                let mut s0 = acc.sw / acc.iw;
                let mut t0 = acc.tw / acc.iw;
                while x < xe {
                    let n = (xe - x).min(NB_INTERP);
                    let iw_end = acc.iw + d.iw * n as f32;
                    let sw_end = acc.sw + d.sw * n as f32;
                    let tw_end = acc.tw + d.tw * n as f32;
                    let s1 = sw_end / iw_end;
                    let t1 = tw_end / iw_end;
                    let ds = (s1 - s0) / n as f32;
                    let dt = (t1 - t0) / n as f32;
                    let mut s = s0;
                    let mut t = t0;
                    for _ in 0..n {
                        let texel = binding.sampler.sample(s, t);
                        let (r, g, b, a) = combine_texel(
                            binding.env,
                            binding.env_color,
                            texel,
                            (
                                acc.r.clamp(0.0, 255.0) as u8,
                                acc.g.clamp(0.0, 255.0) as u8,
                                acc.b.clamp(0.0, 255.0) as u8,
                                acc.a.clamp(0.0, 255.0) as u8,
                            ),
                        );
                        let z = acc.z.clamp(0.0, DEPTH_MAX as f32) as u32;
                        fb.fragment(idx, z, r, g, b, a, acc.fog, st);
                        acc.advance(&d);
                        s += ds;
                        t += dt;
                        idx += 1;
                    }
                    s0 = s1;
                    t0 = t1;
                    x += n;
                }
            } else {
                for _ in xs..xe {
                    let z = acc.z.clamp(0.0, DEPTH_MAX as f32) as u32;
                    fb.fragment(
                        idx,
                        z,
                        acc.r.clamp(0.0, 255.0) as u8,
                        acc.g.clamp(0.0, 255.0) as u8,
                        acc.b.clamp(0.0, 255.0) as u8,
                        acc.a.clamp(0.0, 255.0) as u8,
                        acc.fog,
                        st,
                    );
                    acc.advance(&d);
                    idx += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelFormat;
    use crate::raster::state::Comparison;

    fn fb(w: u32, h: u32) -> FrameBuffer {
        FrameBuffer::new(w, h, PixelFormat::Rgba8888, false)
    }

    fn tri(x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32) -> [RasterVertex; 3] {
        [
            RasterVertex::flat(x0, y0, 0, [0, 255, 0, 255]),
            RasterVertex::flat(x1, y1, 0, [0, 255, 0, 255]),
            RasterVertex::flat(x2, y2, 0, [0, 255, 0, 255]),
        ]
    }

    #[test]
    fn test_signed_area_cyclic_invariance() {
        let [a, b, c] = tri(1, 1, 9, 2, 4, 8);
        let s0 = signed_area2(&a, &b, &c);
        assert_eq!(s0, signed_area2(&b, &c, &a));
        assert_eq!(s0, signed_area2(&c, &a, &b));
        // Reversing the order flips the sign
        assert_eq!(-s0, signed_area2(&c, &b, &a));
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let mut fb = fb(16, 16);
        let [a, b, _] = tri(2, 2, 8, 8, 0, 0);
        let colinear = RasterVertex::flat(5, 5, 0, [0, 255, 0, 255]);
        fill_triangle(&mut fb, &FragmentState::default(), &a, &b, &colinear);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(fb.read_pixel(x, y), (0, 0, 0, 0));
            }
        }
    }

    #[test]
    fn test_full_viewport_triangle_covers_everything() {
        // Clear to red, draw a green triangle over the whole viewport with
        // depth testing off: everything must read back green.
        let mut fb = fb(32, 32);
        fb.clear(Some([255, 0, 0, 255]), Some(DEPTH_MAX), None);
        let st = FragmentState::default();
        // Oversized triangle fully containing the 32x32 target
        let [a, b, c] = tri(-40, -10, 100, -10, 30, 100);
        fill_triangle(&mut fb, &st, &a, &b, &c);
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(fb.read_pixel(x, y), (0, 255, 0, 255), "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn test_depth_ordering_is_draw_order_independent() {
        let st = FragmentState {
            depth_test: true,
            depth_func: Comparison::Less,
            ..FragmentState::default()
        };
        let near: Vec<RasterVertex> = tri(-10, -10, 50, -10, 0, 50)
            .iter()
            .map(|v| RasterVertex { z: 100, r: 0, g: 0, b: 255, ..*v })
            .collect();
        let far: Vec<RasterVertex> = tri(-10, -10, 50, -10, 0, 50)
            .iter()
            .map(|v| RasterVertex { z: 9000, r: 255, g: 0, b: 0, ..*v })
            .collect();

        // near then far
        let mut fb1 = fb(16, 16);
        fb1.clear(Some([0, 0, 0, 255]), Some(DEPTH_MAX), None);
        fill_triangle(&mut fb1, &st, &near[0], &near[1], &near[2]);
        fill_triangle(&mut fb1, &st, &far[0], &far[1], &far[2]);
        // far then near
        let mut fb2 = fb(16, 16);
        fb2.clear(Some([0, 0, 0, 255]), Some(DEPTH_MAX), None);
        fill_triangle(&mut fb2, &st, &far[0], &far[1], &far[2]);
        fill_triangle(&mut fb2, &st, &near[0], &near[1], &near[2]);

        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(fb1.read_pixel(x, y), fb2.read_pixel(x, y));
                // Overlap region shows the nearer (blue) triangle
                if fb1.read_pixel(x, y) != (0, 0, 0, 255) {
                    assert_eq!(fb1.read_pixel(x, y), (0, 0, 255, 255));
                }
            }
        }
    }

    #[test]
    fn test_adjacent_triangles_share_edge_without_overlap() {
        // Two triangles splitting a quad: with additive blending, any pixel
        // painted twice would exceed the base color.
        let mut fb = fb(16, 16);
        fb.clear(Some([0, 0, 0, 255]), None, None);
        let st = FragmentState {
            blend: true,
            blend_src: crate::raster::state::BlendFactor::One,
            blend_dst: crate::raster::state::BlendFactor::One,
            ..FragmentState::default()
        };
        let c = [100u8, 100, 100, 255];
        let q = |x, y| RasterVertex::flat(x, y, 0, c);
        fill_triangle(&mut fb, &st, &q(0, 0), &q(12, 0), &q(12, 12));
        fill_triangle(&mut fb, &st, &q(0, 0), &q(12, 12), &q(0, 12));
        for y in 0..16 {
            for x in 0..16 {
                let (r, ..) = fb.read_pixel(x, y);
                assert!(r <= 100, "double-painted pixel at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_scissor_limits_fill() {
        let mut fb = fb(16, 16);
        let st = FragmentState {
            scissor: Some(crate::rect::Rect::new(4, 4, 8, 8)),
            ..FragmentState::default()
        };
        let [a, b, c] = tri(-10, -10, 40, -10, 10, 40);
        fill_triangle(&mut fb, &st, &a, &b, &c);
        assert_eq!(fb.read_pixel(5, 5), (0, 255, 0, 255));
        assert_eq!(fb.read_pixel(2, 2), (0, 0, 0, 0));
        assert_eq!(fb.read_pixel(9, 5), (0, 0, 0, 0));
    }

    #[test]
    fn test_smooth_interpolates_colors() {
        let mut fb = fb(32, 32);
        let v0 = RasterVertex::flat(0, 0, 0, [255, 0, 0, 255]);
        let v1 = RasterVertex::flat(31, 0, 0, [0, 255, 0, 255]);
        let v2 = RasterVertex::flat(0, 31, 0, [0, 0, 255, 255]);
        fill_triangle(&mut fb, &FragmentState::default(), &v0, &v1, &v2);
        let (r, _, _, _) = fb.read_pixel(1, 1);
        assert!(r > 200, "corner near v0 should be mostly red, got r={r}");
        let (_, g, _, _) = fb.read_pixel(29, 1);
        assert!(g > 200, "corner near v1 should be mostly green, got g={g}");
    }

    #[test]
    fn test_flat_uses_single_color() {
        let mut fb = fb(16, 16);
        let st = FragmentState {
            smooth: false,
            ..FragmentState::default()
        };
        let v0 = RasterVertex::flat(0, 0, 0, [10, 20, 30, 255]);
        let v1 = RasterVertex::flat(15, 0, 0, [200, 200, 200, 255]);
        let v2 = RasterVertex::flat(0, 15, 0, [50, 60, 70, 255]);
        fill_triangle(&mut fb, &st, &v0, &v1, &v2);
        // Interior pixels all carry v0's color
        assert_eq!(fb.read_pixel(2, 2), (10, 20, 30, 255));
        assert_eq!(fb.read_pixel(5, 3), (10, 20, 30, 255));
    }
}
