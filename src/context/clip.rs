//! Homogeneous-Space Clipping
//!
//! Clip codes mark which of the six view-volume planes a clip-space vertex
//! violates; triangles touching planes are split recursively, plane by plane,
//! with color/texcoord/fog interpolated at the same parametric t as position.
//! The epsilon-scaled w keeps vertices sitting exactly on a plane classified
//! as inside, avoiding seam cracks from floating rounding.

use crate::math3d::{lerp4, Vec4};
use crate::raster::RasterVertex;

use super::vertex::PipelineVertex;
use super::Context;

pub(crate) const CLIP_EPSILON: f32 = 1e-5;

/// 6-bit clip-plane violation mask.
/// Bits: 0 = x < -w, 1 = x > w, 2 = y < -w, 3 = y > w, 4 = z < -w, 5 = z > w.
#[inline]
pub(crate) fn clip_code(c: Vec4) -> u32 {
    let w = c.w * (1.0 + CLIP_EPSILON);
    u32::from(c.x < -w)
        | (u32::from(c.x > w) << 1)
        | (u32::from(c.y < -w) << 2)
        | (u32::from(c.y > w) << 3)
        | (u32::from(c.z < -w) << 4)
        | (u32::from(c.z > w) << 5)
}

/// Signed distance to clip plane `plane`; negative = outside
#[inline]
fn clip_dist(c: Vec4, plane: usize) -> f32 {
    match plane {
        0 => c.w + c.x,
        1 => c.w - c.x,
        2 => c.w + c.y,
        3 => c.w - c.y,
        4 => c.w + c.z,
        _ => c.w - c.z,
    }
}

fn lerp_component(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl Context {
    /// Interpolate a new vertex on edge a-b at parameter t, recomputing its
    /// clip code and, when inside, its screen projection
    fn lerp_vertex(&self, a: &PipelineVertex, b: &PipelineVertex, t: f32) -> PipelineVertex {
        let clip = lerp4(a.clip, b.clip, t);
        let mut v = PipelineVertex {
            obj: lerp4(a.obj, b.obj, t),
            eye: lerp4(a.eye, b.eye, t),
            clip,
            color: [
                lerp_component(a.color[0], b.color[0], t),
                lerp_component(a.color[1], b.color[1], t),
                lerp_component(a.color[2], b.color[2], t),
                lerp_component(a.color[3], b.color[3], t),
            ],
            tex: [
                lerp_component(a.tex[0], b.tex[0], t),
                lerp_component(a.tex[1], b.tex[1], t),
            ],
            fog: lerp_component(a.fog, b.fog, t),
            edge: a.edge,
            clip_code: clip_code(clip),
            screen: a.screen,
        };
        if v.clip_code == 0 {
            v.screen = self.project_vertex(&v);
        }
        v
    }

    /// Recursive plane-by-plane triangle clip. `clip_bit` is the first plane
    /// index still to consider; planes below it are already satisfied.
    pub(crate) fn clip_triangle(
        &self,
        v0: &PipelineVertex,
        v1: &PipelineVertex,
        v2: &PipelineVertex,
        clip_bit: usize,
        out: &mut Vec<[RasterVertex; 3]>,
    ) {
        let co = v0.clip_code | v1.clip_code | v2.clip_code;
        if co == 0 {
            self.emit_raster_triangle(v0.screen, v1.screen, v2.screen, out);
            return;
        }
        if v0.clip_code & v1.clip_code & v2.clip_code != 0 {
            return;
        }

        let mut bit = clip_bit;
        while bit < 6 && co & (1 << bit) == 0 {
            bit += 1;
        }
        if bit == 6 {
            // Only epsilon-band codes remain; the triangle is inside for all
            // practical purposes. Project whatever is missing and emit.
            let sa = self.project_vertex(v0);
            let sb = self.project_vertex(v1);
            let sc = self.project_vertex(v2);
            self.emit_raster_triangle(sa, sb, sc, out);
            return;
        }

        let d = [
            clip_dist(v0.clip, bit),
            clip_dist(v1.clip, bit),
            clip_dist(v2.clip, bit),
        ];
        let outside = [d[0] < 0.0, d[1] < 0.0, d[2] < 0.0];
        let outside_count = outside.iter().filter(|o| **o).count();

        match outside_count {
            0 => {
                // The plane's bit was set only within the epsilon band
                self.clip_triangle(v0, v1, v2, bit + 1, out);
            }
            1 => {
                // Rotate so `a` is the outside vertex (preserves winding)
                let (a, b, c, da, db, dc) = if outside[0] {
                    (v0, v1, v2, d[0], d[1], d[2])
                } else if outside[1] {
                    (v1, v2, v0, d[1], d[2], d[0])
                } else {
                    (v2, v0, v1, d[2], d[0], d[1])
                };
                let ab = self.lerp_vertex(a, b, da / (da - db));
                let ac = self.lerp_vertex(a, c, da / (da - dc));
                // Quadrilateral ab, b, c, ac split along ab-c
                self.clip_triangle(&ab, b, c, bit + 1, out);
                self.clip_triangle(&ab, c, &ac, bit + 1, out);
            }
            2 => {
                // Rotate so `a` is the inside vertex
                let (a, b, c, da, db, dc) = if !outside[0] {
                    (v0, v1, v2, d[0], d[1], d[2])
                } else if !outside[1] {
                    (v1, v2, v0, d[1], d[2], d[0])
                } else {
                    (v2, v0, v1, d[2], d[0], d[1])
                };
                let ab = self.lerp_vertex(a, b, da / (da - db));
                let ac = self.lerp_vertex(a, c, da / (da - dc));
                self.clip_triangle(a, &ab, &ac, bit + 1, out);
            }
            _ => {
                // All three below the plane would have tripped the AND test
            }
        }
    }

    /// Parametric segment clip against all six planes
    pub(crate) fn clip_line(
        &self,
        a: &PipelineVertex,
        b: &PipelineVertex,
        out: &mut Vec<[RasterVertex; 2]>,
    ) {
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;
        for plane in 0..6 {
            let da = clip_dist(a.clip, plane);
            let db = clip_dist(b.clip, plane);
            if da < 0.0 && db < 0.0 {
                return;
            }
            if da < 0.0 {
                t0 = t0.max(da / (da - db));
            } else if db < 0.0 {
                t1 = t1.min(da / (da - db));
            }
        }
        if t0 > t1 {
            return;
        }
        let va = if t0 > 0.0 {
            self.lerp_vertex(a, b, t0)
        } else {
            *a
        };
        let vb = if t1 < 1.0 {
            self.lerp_vertex(a, b, t1)
        } else {
            *b
        };
        let sa = if va.clip_code == 0 {
            va.screen
        } else {
            self.project_vertex(&va)
        };
        let sb = if vb.clip_code == 0 {
            vb.screen
        } else {
            self.project_vertex(&vb)
        };
        out.push([sa, sb]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_code_inside_volume() {
        assert_eq!(clip_code(Vec4::new(0.0, 0.0, 0.0, 1.0)), 0);
        assert_eq!(clip_code(Vec4::new(0.5, -0.5, 0.9, 1.0)), 0);
        // Exactly on a plane counts as inside (epsilon margin)
        assert_eq!(clip_code(Vec4::new(1.0, 0.0, 0.0, 1.0)), 0);
        assert_eq!(clip_code(Vec4::new(-1.0, 1.0, -1.0, 1.0)), 0);
    }

    #[test]
    fn test_clip_code_flags_each_plane() {
        let w = 1.0;
        assert_eq!(clip_code(Vec4::new(-1.1, 0.0, 0.0, w)), 1 << 0);
        assert_eq!(clip_code(Vec4::new(1.1, 0.0, 0.0, w)), 1 << 1);
        assert_eq!(clip_code(Vec4::new(0.0, -1.1, 0.0, w)), 1 << 2);
        assert_eq!(clip_code(Vec4::new(0.0, 1.1, 0.0, w)), 1 << 3);
        assert_eq!(clip_code(Vec4::new(0.0, 0.0, -1.1, w)), 1 << 4);
        assert_eq!(clip_code(Vec4::new(0.0, 0.0, 1.1, w)), 1 << 5);
        // A far corner violates three planes at once
        assert_eq!(
            clip_code(Vec4::new(2.0, 2.0, 2.0, 1.0)),
            (1 << 1) | (1 << 3) | (1 << 5)
        );
    }

    #[test]
    fn test_clip_code_scales_with_w() {
        // The volume is -w..w, not -1..1
        assert_eq!(clip_code(Vec4::new(5.0, -5.0, 5.0, 6.0)), 0);
        assert_ne!(clip_code(Vec4::new(7.0, 0.0, 0.0, 6.0)), 0);
    }

    #[test]
    fn test_clip_dist_sign_matches_code() {
        for (v, plane) in [
            (Vec4::new(-2.0, 0.0, 0.0, 1.0), 0),
            (Vec4::new(2.0, 0.0, 0.0, 1.0), 1),
            (Vec4::new(0.0, -2.0, 0.0, 1.0), 2),
            (Vec4::new(0.0, 2.0, 0.0, 1.0), 3),
            (Vec4::new(0.0, 0.0, -2.0, 1.0), 4),
            (Vec4::new(0.0, 0.0, 2.0, 1.0), 5),
        ] {
            assert!(clip_dist(v, plane) < 0.0);
            assert_ne!(clip_code(v) & (1 << plane), 0);
        }
    }
}
