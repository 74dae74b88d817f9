//! Line & Point Rasterization
//!
//! Bresenham over the major axis with linear attribute stepping. Endpoints
//! reach this code already clipped to the view volume; the per-pixel rect
//! test only enforces the replay clip / scissor bounds, which change per
//! dirty-rectangle replay.

use super::combine_texel;
use super::framebuffer::FrameBuffer;
use super::state::{FragmentState, RasterVertex, DEPTH_MAX};

/// Per-step attribute increments along the line
#[derive(Default, Clone, Copy)]
struct LineStep {
    z: f32,
    r: f32,
    g: f32,
    b: f32,
    a: f32,
    sw: f32,
    tw: f32,
    iw: f32,
    fog: f32,
}

pub fn draw_line(fb: &mut FrameBuffer, st: &FragmentState, p0: &RasterVertex, p1: &RasterVertex) {
    let bounds = fb.effective_bounds(st);
    if bounds.is_empty() {
        return;
    }

    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();
    let steps = dx.max(dy);
    if steps == 0 {
        draw_point(fb, st, p0);
        return;
    }

    // Flat shading: lines take the second (provoking) vertex's color; the
    // context already copies it into both endpoints, so p0 is safe here.
    let inv = 1.0 / steps as f32;
    let d = LineStep {
        z: (p1.z as f32 - p0.z as f32) * inv,
        r: if st.smooth { (p1.r as f32 - p0.r as f32) * inv } else { 0.0 },
        g: if st.smooth { (p1.g as f32 - p0.g as f32) * inv } else { 0.0 },
        b: if st.smooth { (p1.b as f32 - p0.b as f32) * inv } else { 0.0 },
        a: if st.smooth { (p1.a as f32 - p0.a as f32) * inv } else { 0.0 },
        sw: (p1.s * p1.inv_w - p0.s * p0.inv_w) * inv,
        tw: (p1.t * p1.inv_w - p0.t * p0.inv_w) * inv,
        iw: (p1.inv_w - p0.inv_w) * inv,
        fog: (p1.fog - p0.fog) * inv,
    };

    let (mut z, mut r, mut g, mut b, mut a) = (
        p0.z as f32,
        p0.r as f32,
        p0.g as f32,
        p0.b as f32,
        p0.a as f32,
    );
    let (mut sw, mut tw, mut iw, mut fog) = (p0.s * p0.inv_w, p0.t * p0.inv_w, p0.inv_w, p0.fog);

    // Bresenham
    let sx = if p0.x < p1.x { 1 } else { -1 };
    let sy = if p0.y < p1.y { 1 } else { -1 };
    let mut err = dx - dy;
    let mut x = p0.x;
    let mut y = p0.y;
    let width = fb.width();

    loop {
        if bounds.contains(x, y) {
            let idx = (y * width + x) as usize;
            let zq = z.clamp(0.0, DEPTH_MAX as f32) as u32;
            let (cr, cg, cb, ca) = (
                r.clamp(0.0, 255.0) as u8,
                g.clamp(0.0, 255.0) as u8,
                b.clamp(0.0, 255.0) as u8,
                a.clamp(0.0, 255.0) as u8,
            );
            if let Some(binding) = st.texture.as_ref() {
                // Lines are short: a true perspective divide per pixel
                let texel = binding.sampler.sample(sw / iw, tw / iw);
                let (fr, fg, fbl, fa) =
                    combine_texel(binding.env, binding.env_color, texel, (cr, cg, cb, ca));
                fb.fragment(idx, zq, fr, fg, fbl, fa, fog, st);
            } else {
                fb.fragment(idx, zq, cr, cg, cb, ca, fog, st);
            }
        }

        if x == p1.x && y == p1.y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }

        z += d.z;
        r += d.r;
        g += d.g;
        b += d.b;
        a += d.a;
        sw += d.sw;
        tw += d.tw;
        iw += d.iw;
        fog += d.fog;
    }
}

/// A single size-1 point
pub fn draw_point(fb: &mut FrameBuffer, st: &FragmentState, p: &RasterVertex) {
    let bounds = fb.effective_bounds(st);
    if !bounds.contains(p.x, p.y) {
        return;
    }
    let idx = (p.y * fb.width() + p.x) as usize;
    if let Some(binding) = st.texture.as_ref() {
        let texel = binding.sampler.sample(p.s, p.t);
        let (r, g, b, a) =
            combine_texel(binding.env, binding.env_color, texel, (p.r, p.g, p.b, p.a));
        fb.fragment(idx, p.z, r, g, b, a, p.fog, st);
    } else {
        fb.fragment(idx, p.z, p.r, p.g, p.b, p.a, p.fog, st);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelFormat;

    fn fb() -> FrameBuffer {
        FrameBuffer::new(16, 16, PixelFormat::Rgba8888, false)
    }

    #[test]
    fn test_horizontal_line_paints_every_pixel() {
        let mut fb = fb();
        let a = RasterVertex::flat(2, 5, 0, [255, 255, 255, 255]);
        let b = RasterVertex::flat(10, 5, 0, [255, 255, 255, 255]);
        draw_line(&mut fb, &FragmentState::default(), &a, &b);
        for x in 2..=10 {
            assert_eq!(fb.read_pixel(x, 5), (255, 255, 255, 255));
        }
        assert_eq!(fb.read_pixel(1, 5), (0, 0, 0, 0));
        assert_eq!(fb.read_pixel(11, 5), (0, 0, 0, 0));
    }

    #[test]
    fn test_diagonal_line_endpoints() {
        let mut fb = fb();
        let a = RasterVertex::flat(0, 0, 0, [9, 9, 9, 255]);
        let b = RasterVertex::flat(7, 7, 0, [9, 9, 9, 255]);
        draw_line(&mut fb, &FragmentState::default(), &a, &b);
        assert_eq!(fb.read_pixel(0, 0), (9, 9, 9, 255));
        assert_eq!(fb.read_pixel(7, 7), (9, 9, 9, 255));
        assert_eq!(fb.read_pixel(3, 3), (9, 9, 9, 255));
    }

    #[test]
    fn test_line_clips_to_bounds() {
        let mut fb = fb();
        fb.set_clip(crate::rect::Rect::new(0, 0, 8, 16));
        let a = RasterVertex::flat(0, 3, 0, [1, 2, 3, 255]);
        let b = RasterVertex::flat(15, 3, 0, [1, 2, 3, 255]);
        draw_line(&mut fb, &FragmentState::default(), &a, &b);
        assert_eq!(fb.read_pixel(7, 3), (1, 2, 3, 255));
        assert_eq!(fb.read_pixel(8, 3), (0, 0, 0, 0));
    }

    #[test]
    fn test_point_draws_one_pixel() {
        let mut fb = fb();
        let p = RasterVertex::flat(4, 4, 0, [100, 100, 100, 255]);
        draw_point(&mut fb, &FragmentState::default(), &p);
        assert_eq!(fb.read_pixel(4, 4), (100, 100, 100, 255));
        assert_eq!(fb.read_pixel(5, 4), (0, 0, 0, 0));
        assert_eq!(fb.read_pixel(3, 4), (0, 0, 0, 0));
    }
}
