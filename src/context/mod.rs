//! GL Context State Machine
//!
//! A fixed-function GL 1.x context rendering into a CPU-owned framebuffer.
//! Every public call is normalized into an [`Op`] and dispatched (or recorded
//! into an open display list); vertex-producing opcodes run the transform /
//! light / clip pipeline and `end` hands finished primitive batches to the
//! draw-call queue.
//!
//! There is no hidden global: the context is an explicit handle with
//! lifecycle `new -> use -> drop`.

mod clip;
mod light;
mod list;
mod matrix;
mod op;
mod texture;
mod vertex;

pub use light::{Light, Material};
pub use op::{
    Capability, ColorMaterialMode, Face, FrontFace, HintMode, HintTarget, LightParam,
    MaterialParam, MatrixMode, Op, Primitive, ShadeModel, TexParam,
};

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::blit::{BlitImage, BlitTransform};
use crate::math3d::{Mat4, Vec3};
use crate::pixel::PixelFormat;
use crate::queue::{BlitCall, ClearCall, DrawCall, DrawCallQueue};
use crate::raster::{
    BlendFactor, Comparison, FogMode, FragmentState, FrameBuffer, StencilOp, TextureEnv,
    DEPTH_MAX,
};
use crate::rect::Rect;

use light::MAX_LIGHTS;
use list::ListRecorder;
use matrix::MATRIX_STACK_DEPTHS;
use texture::TextureObject;
use vertex::{color_to_u8, PipelineVertex};

// ============================================================================
// Options
// ============================================================================

/// Context creation parameters. Serializable so hosts can keep them in a
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextOptions {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Must be a power of two in 2..=4096
    pub max_texture_size: u32,
    pub stencil_buffer: bool,
    /// Dirty-rectangle presentation; disabling falls back to full redraw
    pub dirty_rects: bool,
}

impl ContextOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Rgba8888,
            max_texture_size: 4096,
            stencil_buffer: true,
            dirty_rects: true,
        }
    }

    /// Save options to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load options from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}

// ============================================================================
// Context
// ============================================================================

struct BlitSlot {
    version: u32,
    image: Option<Arc<BlitImage>>,
}

pub struct Context {
    opts: ContextOptions,
    fb: FrameBuffer,
    queue: DrawCallQueue,

    // Matrix state
    matrix_mode: MatrixMode,
    stacks: [Vec<Mat4>; 3],
    matrices_dirty: bool,
    normal_matrix: Mat4,
    texture_matrix_identity: bool,

    // Current vertex attributes
    current_color: [f32; 4],
    current_normal: Vec3,
    current_texcoord: [f32; 2],
    current_edge_flag: bool,

    // Primitive assembly
    begin_mode: Option<Primitive>,
    verts: Vec<PipelineVertex>,

    // Capability flags
    texture_2d: bool,
    lighting: bool,
    depth_test: bool,
    blend: bool,
    stencil_test: bool,
    fog_enabled: bool,
    scissor_test: bool,
    alpha_test: bool,
    cull_face_enabled: bool,
    color_material_enabled: bool,
    polygon_offset_fill: bool,
    normalize_normals: bool,

    // Rasterization parameters
    shade_model_smooth: bool,
    cull_face: Face,
    front_face: FrontFace,
    depth_func: Comparison,
    depth_write: bool,
    alpha_func: Comparison,
    alpha_ref: u8,
    blend_src: BlendFactor,
    blend_dst: BlendFactor,
    stencil_func: Comparison,
    stencil_ref: u8,
    stencil_value_mask: u8,
    stencil_write_mask: u8,
    stencil_fail: StencilOp,
    stencil_depth_fail: StencilOp,
    stencil_depth_pass: StencilOp,
    scissor_rect: Rect,
    color_mask: [bool; 4],
    polygon_offset_factor: f32,
    polygon_offset_units: f32,
    point_size: f32,
    line_width: f32,

    // Fog
    fog_mode: FogMode,
    fog_density: f32,
    fog_start: f32,
    fog_end: f32,
    fog_color: [f32; 4],

    // Clear values
    clear_color: [f32; 4],
    clear_depth: f32,
    clear_stencil: u8,

    viewport: Rect,

    // Lighting
    lights: [Light; MAX_LIGHTS],
    enabled_lights: Vec<usize>,
    materials: [Material; 2],
    scene_ambient: [f32; 4],
    color_material_face: Face,
    color_material_mode: ColorMaterialMode,
    light_model_two_side: bool,

    // Textures
    textures: HashMap<u32, TextureObject>,
    bound_texture: u32,
    next_texture_id: u32,
    texture_env: TextureEnv,
    texture_env_color: [f32; 4],

    // Blit images
    blit_images: HashMap<u32, BlitSlot>,
    next_blit_id: u32,

    // Display lists
    lists: HashMap<u32, Vec<Op>>,
    next_list_id: u32,
    compiling: Option<ListRecorder>,
    call_depth: u32,
}

impl Context {
    /// Create a context. Invalid options (zero dimensions, non-power-of-two
    /// or out-of-range max texture size) are caller bugs and panic.
    pub fn new(opts: ContextOptions) -> Self {
        assert!(opts.width > 0 && opts.height > 0, "zero-sized framebuffer");
        assert!(
            opts.max_texture_size.is_power_of_two()
                && (2..=4096).contains(&opts.max_texture_size),
            "max_texture_size {} must be a power of two in 2..=4096",
            opts.max_texture_size
        );

        let fb = FrameBuffer::new(opts.width, opts.height, opts.format, opts.stencil_buffer);
        let queue = DrawCallQueue::new(opts.dirty_rects);
        let bounds = fb.bounds();

        let mut lights = [Light::default(); MAX_LIGHTS];
        // Light 0 defaults to a white directional light, per GL
        lights[0].diffuse = [1.0, 1.0, 1.0, 1.0];
        lights[0].specular = [1.0, 1.0, 1.0, 1.0];

        let mut textures = HashMap::new();
        textures.insert(0, TextureObject::default());

        Self {
            opts,
            fb,
            queue,
            matrix_mode: MatrixMode::ModelView,
            stacks: [
                vec![Mat4::IDENTITY],
                vec![Mat4::IDENTITY],
                vec![Mat4::IDENTITY],
            ],
            matrices_dirty: true,
            normal_matrix: Mat4::IDENTITY,
            texture_matrix_identity: true,
            current_color: [1.0, 1.0, 1.0, 1.0],
            current_normal: Vec3::new(0.0, 0.0, 1.0),
            current_texcoord: [0.0, 0.0],
            current_edge_flag: true,
            begin_mode: None,
            verts: Vec::new(),
            texture_2d: false,
            lighting: false,
            depth_test: false,
            blend: false,
            stencil_test: false,
            fog_enabled: false,
            scissor_test: false,
            alpha_test: false,
            cull_face_enabled: false,
            color_material_enabled: false,
            polygon_offset_fill: false,
            normalize_normals: false,
            shade_model_smooth: true,
            cull_face: Face::Back,
            front_face: FrontFace::CounterClockwise,
            depth_func: Comparison::Less,
            depth_write: true,
            alpha_func: Comparison::Always,
            alpha_ref: 0,
            blend_src: BlendFactor::One,
            blend_dst: BlendFactor::Zero,
            stencil_func: Comparison::Always,
            stencil_ref: 0,
            stencil_value_mask: 0xff,
            stencil_write_mask: 0xff,
            stencil_fail: StencilOp::Keep,
            stencil_depth_fail: StencilOp::Keep,
            stencil_depth_pass: StencilOp::Keep,
            scissor_rect: bounds,
            color_mask: [true; 4],
            polygon_offset_factor: 0.0,
            polygon_offset_units: 0.0,
            point_size: 1.0,
            line_width: 1.0,
            fog_mode: FogMode::Exp,
            fog_density: 1.0,
            fog_start: 0.0,
            fog_end: 1.0,
            fog_color: [0.0, 0.0, 0.0, 0.0],
            clear_color: [0.0, 0.0, 0.0, 0.0],
            clear_depth: 1.0,
            clear_stencil: 0,
            viewport: bounds,
            lights,
            enabled_lights: Vec::new(),
            materials: [Material::default(); 2],
            scene_ambient: [0.2, 0.2, 0.2, 1.0],
            color_material_face: Face::FrontAndBack,
            color_material_mode: ColorMaterialMode::AmbientAndDiffuse,
            light_model_two_side: false,
            textures,
            bound_texture: 0,
            next_texture_id: 1,
            texture_env: TextureEnv::Modulate,
            texture_env_color: [0.0, 0.0, 0.0, 0.0],
            blit_images: HashMap::new(),
            next_blit_id: 1,
            lists: HashMap::new(),
            next_list_id: 1,
            compiling: None,
            call_depth: 0,
        }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.opts
    }

    pub fn width(&self) -> u32 {
        self.opts.width
    }

    pub fn height(&self) -> u32 {
        self.opts.height
    }

    /// Snapshot access to the color buffer (row-major, pitch = width * bpp)
    pub fn pixels(&self) -> &[u8] {
        self.fb.pixels()
    }

    /// Snapshot access to the depth buffer
    pub fn depth_buffer(&self) -> &[u32] {
        self.fb.depth_buffer()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.fb.format()
    }

    /// Read one pixel back as RGBA
    pub fn read_pixel(&self, x: i32, y: i32) -> (u8, u8, u8, u8) {
        self.fb.read_pixel(x, y)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Record into an open display list and/or execute
    pub(crate) fn issue(&mut self, op: Op) {
        let execute = match self.compiling.as_mut() {
            Some(rec) => {
                rec.ops.push(op.clone());
                rec.execute
            }
            None => true,
        };
        if execute {
            self.exec(op);
        }
    }

    pub(crate) fn exec(&mut self, op: Op) {
        match op {
            Op::Begin(mode) => self.exec_begin(mode),
            Op::End => self.exec_end(),
            Op::Vertex(v) => self.exec_vertex(v),
            Op::Normal(n) => self.current_normal = Vec3::new(n[0], n[1], n[2]),
            Op::Color(c) => self.current_color = c,
            Op::TexCoord(t) => self.current_texcoord = t,
            Op::EdgeFlag(f) => self.current_edge_flag = f,

            Op::MatrixMode(m) => self.exec_matrix_mode(m),
            Op::PushMatrix => self.exec_push_matrix(),
            Op::PopMatrix => self.exec_pop_matrix(),
            Op::LoadIdentity => self.exec_load_identity(),
            Op::LoadMatrix(m) => self.exec_load_matrix(m),
            Op::MultMatrix(m) => self.exec_mult_matrix(m),
            Op::Rotate(a, x, y, z) => self.exec_mult_matrix(Mat4::rotation(a, x, y, z)),
            Op::Translate(x, y, z) => self.exec_mult_matrix(Mat4::translation(x, y, z)),
            Op::Scale(x, y, z) => self.exec_mult_matrix(Mat4::scaling(x, y, z)),
            Op::Frustum {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => self.exec_mult_matrix(Mat4::frustum(left, right, bottom, top, near, far)),
            Op::Ortho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => self.exec_mult_matrix(Mat4::ortho(left, right, bottom, top, near, far)),
            Op::Viewport {
                x,
                y,
                width,
                height,
            } => self.viewport = Rect::from_size(x, y, width, height),

            Op::Enable(cap) => self.exec_enable(cap, true),
            Op::Disable(cap) => self.exec_enable(cap, false),
            Op::ShadeModel(m) => self.shade_model_smooth = m == ShadeModel::Smooth,
            Op::CullFace(f) => self.cull_face = f,
            Op::FrontFace(f) => self.front_face = f,

            Op::DepthFunc(f) => self.depth_func = f,
            Op::DepthMask(on) => self.depth_write = on,
            Op::AlphaFunc(f, reference) => {
                self.alpha_func = f;
                self.alpha_ref = (reference * 255.0).round().clamp(0.0, 255.0) as u8;
            }
            Op::BlendFunc(src, dst) => {
                self.blend_src = src;
                self.blend_dst = dst;
            }
            Op::StencilFunc(f, reference, mask) => {
                self.stencil_func = f;
                self.stencil_ref = reference;
                self.stencil_value_mask = mask;
            }
            Op::StencilOp(fail, depth_fail, depth_pass) => {
                self.stencil_fail = fail;
                self.stencil_depth_fail = depth_fail;
                self.stencil_depth_pass = depth_pass;
            }
            Op::StencilMask(mask) => self.stencil_write_mask = mask,
            Op::ColorMask(r, g, b, a) => self.color_mask = [r, g, b, a],
            Op::Scissor {
                x,
                y,
                width,
                height,
            } => self.scissor_rect = Rect::from_size(x, y, width, height),
            Op::PolygonOffset(factor, units) => {
                self.polygon_offset_factor = factor;
                self.polygon_offset_units = units;
            }
            Op::PointSize(s) => {
                if s != 1.0 {
                    tracing::debug!(size = s, "point sizes other than 1 rasterize as 1");
                }
                self.point_size = s;
            }
            Op::LineWidth(w) => {
                if w != 1.0 {
                    tracing::debug!(width = w, "line widths other than 1 rasterize as 1");
                }
                self.line_width = w;
            }

            Op::FogMode(m) => self.fog_mode = m,
            Op::FogDensity(d) => self.fog_density = d,
            Op::FogStart(s) => self.fog_start = s,
            Op::FogEnd(e) => self.fog_end = e,
            Op::FogColor(c) => self.fog_color = c,

            Op::Material(face, param) => self.exec_material(face, param),
            Op::Light(index, param) => self.exec_light(index, param),
            Op::LightModelAmbient(c) => self.scene_ambient = c,
            Op::LightModelTwoSide(on) => {
                if on {
                    tracing::warn!("two-sided lighting is accepted but evaluated single-sided");
                }
                self.light_model_two_side = on;
            }
            Op::ColorMaterial(face, mode) => {
                self.color_material_face = face;
                self.color_material_mode = mode;
            }

            Op::BindTexture(id) => self.exec_bind_texture(id),
            Op::TexParameter(p) => self.exec_tex_parameter(p),
            Op::TexEnv(env) => self.texture_env = env,
            Op::TexEnvColor(c) => self.texture_env_color = c,

            Op::ClearColor(c) => self.clear_color = c,
            Op::ClearDepth(d) => self.clear_depth = d,
            Op::ClearStencil(s) => self.clear_stencil = s,
            Op::Clear {
                color,
                depth,
                stencil,
            } => self.exec_clear(color, depth, stencil),

            Op::Hint(target, mode) => {
                tracing::debug!(?target, ?mode, "hint accepted and ignored");
            }
            Op::CallList(id) => self.exec_call_list(id),
        }
    }

    fn exec_enable(&mut self, cap: Capability, on: bool) {
        match cap {
            Capability::Texture2D => self.texture_2d = on,
            Capability::Lighting => {
                self.lighting = on;
                if on {
                    // Normal matrix may be stale from a lighting-off period
                    self.matrices_dirty = true;
                }
            }
            Capability::Light(i) => self.set_light_enabled(i, on),
            Capability::DepthTest => self.depth_test = on,
            Capability::Blend => self.blend = on,
            Capability::StencilTest => {
                if on && !self.fb.has_stencil() {
                    tracing::warn!("stencil test enabled without a stencil buffer");
                }
                self.stencil_test = on;
            }
            Capability::Fog => self.fog_enabled = on,
            Capability::ScissorTest => self.scissor_test = on,
            Capability::AlphaTest => self.alpha_test = on,
            Capability::CullFace => self.cull_face_enabled = on,
            Capability::ColorMaterial => self.color_material_enabled = on,
            Capability::PolygonOffsetFill => self.polygon_offset_fill = on,
            Capability::Normalize => self.normalize_normals = on,
        }
    }

    fn exec_clear(&mut self, color: bool, depth: bool, stencil: bool) {
        let color = color.then(|| color_to_u8(self.clear_color));
        let depth = depth.then(|| (self.clear_depth.clamp(0.0, 1.0) * DEPTH_MAX as f32) as u32);
        let stencil = stencil.then_some(self.clear_stencil);
        let bounds = self.fb.bounds();
        let call = DrawCall::Clear(ClearCall::new(color, depth, stencil, &bounds));
        self.queue.issue(call, &mut self.fb);
    }

    /// Snapshot the fragment-pipeline configuration for a draw call
    pub(crate) fn fragment_state(&self) -> FragmentState {
        let fog_color = color_to_u8(self.fog_color);
        FragmentState {
            smooth: self.shade_model_smooth,
            depth_test: self.depth_test,
            depth_write: self.depth_write,
            depth_func: self.depth_func,
            alpha_test: self.alpha_test,
            alpha_func: self.alpha_func,
            alpha_ref: self.alpha_ref,
            blend: self.blend,
            blend_src: self.blend_src,
            blend_dst: self.blend_dst,
            stencil_test: self.stencil_test && self.fb.has_stencil(),
            stencil_func: self.stencil_func,
            stencil_ref: self.stencil_ref,
            stencil_value_mask: self.stencil_value_mask,
            stencil_write_mask: self.stencil_write_mask,
            stencil_fail: self.stencil_fail,
            stencil_depth_fail: self.stencil_depth_fail,
            stencil_depth_pass: self.stencil_depth_pass,
            scissor: self.scissor_test.then_some(self.scissor_rect),
            color_mask: self.color_mask,
            fog: self.fog_enabled,
            fog_color: [fog_color[0], fog_color[1], fog_color[2]],
            offset_fill: self.polygon_offset_fill,
            offset_factor: self.polygon_offset_factor,
            offset_units: self.polygon_offset_units,
            texture: if self.texture_2d {
                self.texture_binding()
            } else {
                None
            },
        }
    }

    // ========================================================================
    // Frame lifecycle
    // ========================================================================

    /// Finalize the frame: resolve dirty regions, replay affected draw
    /// calls, and return the rects the host needs to re-present
    pub fn present(&mut self) -> Vec<Rect> {
        assert!(self.begin_mode.is_none(), "present inside begin/end");
        self.queue.present(&mut self.fb)
    }

    // ========================================================================
    // Blit images
    // ========================================================================

    pub fn gen_blit_image(&mut self) -> u32 {
        let id = self.next_blit_id;
        self.next_blit_id += 1;
        self.blit_images.insert(
            id,
            BlitSlot {
                version: 0,
                image: None,
            },
        );
        id
    }

    /// Decode RGBA pixels into the blit image, pre-packed for the
    /// framebuffer's format. Re-upload bumps the version; queued blits keep
    /// the previous pixels.
    pub fn upload_blit_image(&mut self, id: u32, width: u32, height: u32, rgba: &[u8]) {
        let format = self.fb.format();
        let slot = self
            .blit_images
            .get_mut(&id)
            .expect("upload to unknown blit image handle");
        slot.version += 1;
        slot.image = Some(Arc::new(BlitImage::new(
            id,
            slot.version,
            width,
            height,
            rgba,
            format,
        )));
    }

    pub fn delete_blit_image(&mut self, id: u32) {
        if self.blit_images.remove(&id).is_none() {
            tracing::warn!(id, "delete_blit_image: unknown handle");
        }
    }

    /// Queue a 2D blit
    pub fn blit(&mut self, id: u32, transform: BlitTransform) {
        let Some(slot) = self.blit_images.get(&id) else {
            tracing::warn!(id, "blit: unknown handle");
            return;
        };
        let Some(image) = slot.image.clone() else {
            tracing::warn!(id, "blit: image has no pixels uploaded");
            return;
        };
        let bounds = self.fb.bounds();
        let call = DrawCall::Blit(BlitCall::new(image, transform, &bounds));
        self.queue.issue(call, &mut self.fb);
    }

    /// Unscaled, untinted blit at a position
    pub fn blit_at(&mut self, id: u32, x: i32, y: i32) {
        self.blit(id, BlitTransform::at(x, y));
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get_integer(&self, param: GetParam) -> Vec<i32> {
        match param {
            GetParam::Viewport => vec![
                self.viewport.left,
                self.viewport.top,
                self.viewport.width(),
                self.viewport.height(),
            ],
            GetParam::MaxTextureSize => vec![self.opts.max_texture_size as i32],
            GetParam::MaxLights => vec![MAX_LIGHTS as i32],
            GetParam::MaxModelviewStackDepth => vec![MATRIX_STACK_DEPTHS[0] as i32],
            GetParam::MaxProjectionStackDepth => vec![MATRIX_STACK_DEPTHS[1] as i32],
            GetParam::MaxTextureStackDepth => vec![MATRIX_STACK_DEPTHS[2] as i32],
            GetParam::ModelviewStackDepth => vec![self.stacks[0].len() as i32],
            GetParam::ProjectionStackDepth => vec![self.stacks[1].len() as i32],
            GetParam::TextureStackDepth => vec![self.stacks[2].len() as i32],
            GetParam::DepthBits => vec![24],
            GetParam::StencilBits => vec![if self.fb.has_stencil() { 8 } else { 0 }],
            GetParam::LightModelTwoSide => vec![i32::from(self.light_model_two_side)],
        }
    }

    pub fn get_float(&self, param: GetFloatParam) -> Vec<f32> {
        match param {
            GetFloatParam::ModelviewMatrix => self.modelview().to_rows().to_vec(),
            GetFloatParam::ProjectionMatrix => self.projection().to_rows().to_vec(),
            GetFloatParam::TextureMatrix => self.texture_matrix().to_rows().to_vec(),
            GetFloatParam::CurrentColor => self.current_color.to_vec(),
            GetFloatParam::ClearColor => self.clear_color.to_vec(),
            GetFloatParam::FogColor => self.fog_color.to_vec(),
            GetFloatParam::PointSize => vec![self.point_size],
            GetFloatParam::LineWidth => vec![self.line_width],
        }
    }

    // ========================================================================
    // Public API (thin Op builders)
    // ========================================================================

    pub fn begin(&mut self, mode: Primitive) {
        self.issue(Op::Begin(mode));
    }

    pub fn end(&mut self) {
        self.issue(Op::End);
    }

    pub fn vertex2(&mut self, x: f32, y: f32) {
        self.issue(Op::Vertex([x, y, 0.0, 1.0]));
    }

    pub fn vertex3(&mut self, x: f32, y: f32, z: f32) {
        self.issue(Op::Vertex([x, y, z, 1.0]));
    }

    pub fn vertex4(&mut self, x: f32, y: f32, z: f32, w: f32) {
        self.issue(Op::Vertex([x, y, z, w]));
    }

    pub fn normal3(&mut self, x: f32, y: f32, z: f32) {
        self.issue(Op::Normal([x, y, z]));
    }

    pub fn color3(&mut self, r: f32, g: f32, b: f32) {
        self.issue(Op::Color([r, g, b, 1.0]));
    }

    pub fn color4(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.issue(Op::Color([r, g, b, a]));
    }

    pub fn tex_coord2(&mut self, s: f32, t: f32) {
        self.issue(Op::TexCoord([s, t]));
    }

    pub fn edge_flag(&mut self, flag: bool) {
        self.issue(Op::EdgeFlag(flag));
    }

    pub fn matrix_mode(&mut self, mode: MatrixMode) {
        self.issue(Op::MatrixMode(mode));
    }

    pub fn push_matrix(&mut self) {
        self.issue(Op::PushMatrix);
    }

    pub fn pop_matrix(&mut self) {
        self.issue(Op::PopMatrix);
    }

    pub fn load_identity(&mut self) {
        self.issue(Op::LoadIdentity);
    }

    pub fn load_matrix(&mut self, m: Mat4) {
        self.issue(Op::LoadMatrix(m));
    }

    pub fn mult_matrix(&mut self, m: Mat4) {
        self.issue(Op::MultMatrix(m));
    }

    pub fn rotate(&mut self, angle_deg: f32, x: f32, y: f32, z: f32) {
        self.issue(Op::Rotate(angle_deg, x, y, z));
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.issue(Op::Translate(x, y, z));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.issue(Op::Scale(x, y, z));
    }

    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.issue(Op::Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        });
    }

    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.issue(Op::Ortho {
            left,
            right,
            bottom,
            top,
            near,
            far,
        });
    }

    pub fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.issue(Op::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    pub fn enable(&mut self, cap: Capability) {
        self.issue(Op::Enable(cap));
    }

    pub fn disable(&mut self, cap: Capability) {
        self.issue(Op::Disable(cap));
    }

    pub fn shade_model(&mut self, model: ShadeModel) {
        self.issue(Op::ShadeModel(model));
    }

    pub fn cull_face(&mut self, face: Face) {
        self.issue(Op::CullFace(face));
    }

    pub fn front_face(&mut self, winding: FrontFace) {
        self.issue(Op::FrontFace(winding));
    }

    pub fn depth_func(&mut self, func: Comparison) {
        self.issue(Op::DepthFunc(func));
    }

    pub fn depth_mask(&mut self, write: bool) {
        self.issue(Op::DepthMask(write));
    }

    /// `reference` in 0.0..=1.0
    pub fn alpha_func(&mut self, func: Comparison, reference: f32) {
        self.issue(Op::AlphaFunc(func, reference));
    }

    pub fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.issue(Op::BlendFunc(src, dst));
    }

    pub fn stencil_func(&mut self, func: Comparison, reference: u8, mask: u8) {
        self.issue(Op::StencilFunc(func, reference, mask));
    }

    pub fn stencil_op(&mut self, fail: StencilOp, depth_fail: StencilOp, depth_pass: StencilOp) {
        self.issue(Op::StencilOp(fail, depth_fail, depth_pass));
    }

    pub fn stencil_mask(&mut self, mask: u8) {
        self.issue(Op::StencilMask(mask));
    }

    pub fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        self.issue(Op::ColorMask(r, g, b, a));
    }

    pub fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.issue(Op::Scissor {
            x,
            y,
            width,
            height,
        });
    }

    pub fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.issue(Op::PolygonOffset(factor, units));
    }

    pub fn point_size(&mut self, size: f32) {
        self.issue(Op::PointSize(size));
    }

    pub fn line_width(&mut self, width: f32) {
        self.issue(Op::LineWidth(width));
    }

    pub fn fog_mode(&mut self, mode: FogMode) {
        self.issue(Op::FogMode(mode));
    }

    pub fn fog_density(&mut self, density: f32) {
        self.issue(Op::FogDensity(density));
    }

    pub fn fog_start(&mut self, start: f32) {
        self.issue(Op::FogStart(start));
    }

    pub fn fog_end(&mut self, end: f32) {
        self.issue(Op::FogEnd(end));
    }

    pub fn fog_color(&mut self, color: [f32; 4]) {
        self.issue(Op::FogColor(color));
    }

    pub fn material(&mut self, face: Face, param: MaterialParam) {
        self.issue(Op::Material(face, param));
    }

    pub fn light(&mut self, index: usize, param: LightParam) {
        self.issue(Op::Light(index, param));
    }

    pub fn light_model_ambient(&mut self, color: [f32; 4]) {
        self.issue(Op::LightModelAmbient(color));
    }

    pub fn light_model_two_side(&mut self, on: bool) {
        self.issue(Op::LightModelTwoSide(on));
    }

    pub fn color_material(&mut self, face: Face, mode: ColorMaterialMode) {
        self.issue(Op::ColorMaterial(face, mode));
    }

    pub fn bind_texture(&mut self, id: u32) {
        self.issue(Op::BindTexture(id));
    }

    pub fn tex_parameter(&mut self, param: TexParam) {
        self.issue(Op::TexParameter(param));
    }

    pub fn tex_env(&mut self, env: TextureEnv) {
        self.issue(Op::TexEnv(env));
    }

    pub fn tex_env_color(&mut self, color: [f32; 4]) {
        self.issue(Op::TexEnvColor(color));
    }

    pub fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.issue(Op::ClearColor([r, g, b, a]));
    }

    pub fn clear_depth(&mut self, depth: f32) {
        self.issue(Op::ClearDepth(depth));
    }

    pub fn clear_stencil(&mut self, value: u8) {
        self.issue(Op::ClearStencil(value));
    }

    pub fn clear(&mut self, color: bool, depth: bool, stencil: bool) {
        self.issue(Op::Clear {
            color,
            depth,
            stencil,
        });
    }

    pub fn hint(&mut self, target: HintTarget, mode: HintMode) {
        self.issue(Op::Hint(target, mode));
    }
}

/// Integer query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetParam {
    Viewport,
    MaxTextureSize,
    MaxLights,
    MaxModelviewStackDepth,
    MaxProjectionStackDepth,
    MaxTextureStackDepth,
    ModelviewStackDepth,
    ProjectionStackDepth,
    TextureStackDepth,
    DepthBits,
    StencilBits,
    LightModelTwoSide,
}

/// Float query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetFloatParam {
    ModelviewMatrix,
    ProjectionMatrix,
    TextureMatrix,
    CurrentColor,
    ClearColor,
    FogColor,
    PointSize,
    LineWidth,
}
