//! Vertex Pipeline & Primitive Assembly
//!
//! `begin`/`vertex`/`end` handling: each vertex is transformed to eye and
//! clip space immediately (lighting and fog included — Gouraud is per-vertex),
//! and `end` decomposes the accumulated buffer into points, line segments, or
//! triangles, clips them, and issues one rasterization draw call per batch.

use crate::math3d::Vec4;
use crate::queue::{DrawCall, Primitives, RasterizeCall};
use crate::raster::{signed_area2, FogMode, RasterVertex, DEPTH_MAX};

use super::clip::clip_code;
use super::op::{Face, FrontFace, Primitive};
use super::Context;

/// A vertex mid-pipeline: object, eye, and clip coordinates plus the
/// attributes that survive into rasterization. `screen` is valid only when
/// `clip_code == 0`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PipelineVertex {
    pub obj: Vec4,
    pub eye: Vec4,
    pub clip: Vec4,
    pub color: [f32; 4],
    pub tex: [f32; 2],
    pub fog: f32,
    pub edge: bool,
    pub clip_code: u32,
    pub screen: RasterVertex,
}

pub(crate) fn color_to_u8(c: [f32; 4]) -> [u8; 4] {
    let q = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    [q(c[0]), q(c[1]), q(c[2]), q(c[3])]
}

impl Context {
    pub(crate) fn exec_begin(&mut self, mode: Primitive) {
        assert!(
            self.begin_mode.is_none(),
            "begin called while already assembling a primitive"
        );
        self.update_matrices();
        self.begin_mode = Some(mode);
        self.verts.clear();
    }

    pub(crate) fn exec_vertex(&mut self, pos: [f32; 4]) {
        assert!(
            self.begin_mode.is_some(),
            "vertex called outside begin/end"
        );
        let obj = Vec4::new(pos[0], pos[1], pos[2], pos[3]);
        let eye = self.modelview().transform(obj);
        let clip = self.projection().transform(eye);
        let code = clip_code(clip);

        let color = if self.lighting {
            let mut n = self.normal_matrix.transform_dir(self.current_normal);
            if self.normalize_normals {
                n = n.normalize();
            }
            self.light_vertex(eye, n)
        } else {
            self.current_color
        };

        let tex = if self.texture_matrix_identity {
            self.current_texcoord
        } else {
            let t = self
                .texture_matrix()
                .transform(Vec4::new(self.current_texcoord[0], self.current_texcoord[1], 0.0, 1.0));
            [t.x, t.y]
        };

        let fog = if self.fog_enabled {
            self.fog_factor(eye)
        } else {
            1.0
        };

        let mut pv = PipelineVertex {
            obj,
            eye,
            clip,
            color,
            tex,
            fog,
            edge: self.current_edge_flag,
            clip_code: code,
            screen: RasterVertex::flat(0, 0, 0, [0; 4]),
        };
        if code == 0 {
            pv.screen = self.project_vertex(&pv);
        }
        self.verts.push(pv);
    }

    pub(crate) fn exec_end(&mut self) {
        let mode = self
            .begin_mode
            .take()
            .expect("end called outside begin/end");
        let verts = std::mem::take(&mut self.verts);
        let n = verts.len();

        let prims = match mode {
            Primitive::Points => {
                let mut points = Vec::new();
                for v in &verts {
                    if v.clip_code == 0 {
                        points.push(v.screen);
                    }
                }
                Primitives::Points(points)
            }
            Primitive::Lines | Primitive::LineStrip | Primitive::LineLoop => {
                let mut lines = Vec::new();
                match mode {
                    Primitive::Lines => {
                        for pair in verts.chunks_exact(2) {
                            self.emit_line(&pair[0], &pair[1], &mut lines);
                        }
                    }
                    Primitive::LineStrip => {
                        for i in 1..n {
                            self.emit_line(&verts[i - 1], &verts[i], &mut lines);
                        }
                    }
                    _ => {
                        for i in 1..n {
                            self.emit_line(&verts[i - 1], &verts[i], &mut lines);
                        }
                        if n > 2 {
                            self.emit_line(&verts[n - 1], &verts[0], &mut lines);
                        }
                    }
                }
                Primitives::Lines(lines)
            }
            Primitive::Triangles => {
                let mut tris = Vec::new();
                for t in verts.chunks_exact(3) {
                    self.emit_triangle(&t[0], &t[1], &t[2], &t[2], &mut tris);
                }
                Primitives::Triangles(tris)
            }
            Primitive::TriangleStrip => {
                let mut tris = Vec::new();
                for i in 2..n {
                    // Alternate winding so all strip triangles face the same way
                    if i % 2 == 0 {
                        self.emit_triangle(&verts[i - 2], &verts[i - 1], &verts[i], &verts[i], &mut tris);
                    } else {
                        self.emit_triangle(&verts[i - 1], &verts[i - 2], &verts[i], &verts[i], &mut tris);
                    }
                }
                Primitives::Triangles(tris)
            }
            Primitive::TriangleFan | Primitive::Polygon => {
                let mut tris = Vec::new();
                for i in 2..n {
                    // A flat-shaded polygon takes its color from the first
                    // vertex; a fan from the triangle's last
                    let provoking = if mode == Primitive::Polygon {
                        &verts[0]
                    } else {
                        &verts[i]
                    };
                    self.emit_triangle(&verts[0], &verts[i - 1], &verts[i], provoking, &mut tris);
                }
                Primitives::Triangles(tris)
            }
            Primitive::Quads => {
                let mut tris = Vec::new();
                for q in verts.chunks_exact(4) {
                    self.emit_triangle(&q[0], &q[1], &q[2], &q[3], &mut tris);
                    self.emit_triangle(&q[0], &q[2], &q[3], &q[3], &mut tris);
                }
                Primitives::Triangles(tris)
            }
            Primitive::QuadStrip => {
                let mut tris = Vec::new();
                let mut i = 0;
                while i + 3 < n {
                    // Strip order v0 v1 v2 v3 forms the quad v0 v1 v3 v2
                    self.emit_triangle(&verts[i], &verts[i + 1], &verts[i + 3], &verts[i + 3], &mut tris);
                    self.emit_triangle(&verts[i], &verts[i + 3], &verts[i + 2], &verts[i + 3], &mut tris);
                    i += 2;
                }
                Primitives::Triangles(tris)
            }
        };

        if prims.is_empty() {
            return;
        }
        let state = self.fragment_state();
        let bounds = self.fb.bounds();
        let call = DrawCall::Rasterize(RasterizeCall::new(prims, state, &bounds));
        self.queue.issue(call, &mut self.fb);
    }

    /// Perspective divide + viewport mapping
    pub(crate) fn project_vertex(&self, pv: &PipelineVertex) -> RasterVertex {
        let winv = 1.0 / pv.clip.w;
        let ndx = pv.clip.x * winv;
        let ndy = pv.clip.y * winv;
        let ndz = pv.clip.z * winv;
        let vp = self.viewport;
        let x = vp.left as f32 + (ndx * 0.5 + 0.5) * vp.width() as f32;
        // GL's y axis points up; the framebuffer's points down
        let y = vp.top as f32 + (0.5 - ndy * 0.5) * vp.height() as f32;
        let z = (ndz * 0.5 + 0.5) * DEPTH_MAX as f32;
        let [r, g, b, a] = color_to_u8(pv.color);
        RasterVertex {
            x: x.round() as i32,
            y: y.round() as i32,
            z: z.clamp(0.0, DEPTH_MAX as f32) as u32,
            r,
            g,
            b,
            a,
            s: pv.tex[0],
            t: pv.tex[1],
            inv_w: winv,
            fog: pv.fog,
        }
    }

    /// Cull (if enabled) and append one screen-space triangle
    pub(crate) fn emit_raster_triangle(
        &self,
        a: RasterVertex,
        b: RasterVertex,
        c: RasterVertex,
        out: &mut Vec<[RasterVertex; 3]>,
    ) {
        let area2 = signed_area2(&a, &b, &c);
        if area2 == 0 {
            return;
        }
        if self.cull_face_enabled {
            // The framebuffer's y axis points down, so positive screen-space
            // area means clockwise in GL window coordinates
            let gl_ccw = area2 < 0;
            let front = gl_ccw == (self.front_face == FrontFace::CounterClockwise);
            let culled = match self.cull_face {
                Face::FrontAndBack => true,
                Face::Front => front,
                Face::Back => !front,
            };
            if culled {
                return;
            }
        }
        out.push([a, b, c]);
    }

    fn emit_triangle(
        &self,
        v0: &PipelineVertex,
        v1: &PipelineVertex,
        v2: &PipelineVertex,
        provoking: &PipelineVertex,
        out: &mut Vec<[RasterVertex; 3]>,
    ) {
        if v0.clip_code & v1.clip_code & v2.clip_code != 0 {
            return; // fully outside one plane
        }
        let (mut a, mut b, mut c) = (*v0, *v1, *v2);
        if !self.shade_model_smooth {
            let col = provoking.color;
            for v in [&mut a, &mut b, &mut c] {
                set_vertex_color(v, col);
            }
        }
        if a.clip_code | b.clip_code | c.clip_code == 0 {
            self.emit_raster_triangle(a.screen, b.screen, c.screen, out);
        } else {
            self.clip_triangle(&a, &b, &c, 0, out);
        }
    }

    fn emit_line(
        &self,
        v0: &PipelineVertex,
        v1: &PipelineVertex,
        out: &mut Vec<[RasterVertex; 2]>,
    ) {
        if v0.clip_code & v1.clip_code != 0 {
            return;
        }
        let (mut a, mut b) = (*v0, *v1);
        if !self.shade_model_smooth {
            // Lines take the second (provoking) vertex's color
            set_vertex_color(&mut a, v1.color);
        }
        if a.clip_code | b.clip_code == 0 {
            out.push([a.screen, b.screen]);
        } else {
            self.clip_line(&a, &b, out);
        }
    }

    /// Per-vertex fog factor from eye-space distance; 1 = unfogged
    pub(crate) fn fog_factor(&self, eye: Vec4) -> f32 {
        let d = eye.z.abs();
        let f = match self.fog_mode {
            FogMode::Linear => (self.fog_end - d) / (self.fog_end - self.fog_start),
            FogMode::Exp => (-self.fog_density * d).exp(),
            FogMode::Exp2 => {
                let e = self.fog_density * d;
                (-(e * e)).exp()
            }
        };
        f.clamp(0.0, 1.0)
    }
}

/// Overwrite a vertex's color, keeping the projected copy in sync
pub(crate) fn set_vertex_color(v: &mut PipelineVertex, color: [f32; 4]) {
    v.color = color;
    let [r, g, b, a] = color_to_u8(color);
    v.screen.r = r;
    v.screen.g = g;
    v.screen.b = b;
    v.screen.a = a;
}
