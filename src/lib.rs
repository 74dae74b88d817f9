//! softgl — a software fixed-function OpenGL-style rasterizer
//!
//! The whole pipeline runs on the CPU: an immediate-mode GL 1.x context
//! transforms, lights, and clips geometry, a scanline rasterizer with
//! perspective-correct texturing writes into a CPU-owned color/depth/stencil
//! framebuffer, and a draw-call queue diffs consecutive frames into dirty
//! rectangles so hosts only re-present what changed.
//!
//! ```no_run
//! use softgl::{Context, ContextOptions, Primitive};
//!
//! let mut gl = Context::new(ContextOptions::new(640, 480));
//! gl.clear_color(0.0, 0.0, 0.0, 1.0);
//! gl.clear(true, true, false);
//! gl.begin(Primitive::Triangles);
//! gl.color3(1.0, 0.0, 0.0);
//! gl.vertex3(-0.5, -0.5, 0.0);
//! gl.vertex3(0.5, -0.5, 0.0);
//! gl.vertex3(0.0, 0.5, 0.0);
//! gl.end();
//! let dirty = gl.present();
//! # let _ = dirty;
//! ```

pub mod blit;
pub mod context;
pub mod math3d;
pub mod pixel;
pub mod queue;
pub mod raster;
pub mod rect;
pub mod texel;
pub mod util;

#[cfg(feature = "display")]
pub mod display;

pub use blit::{BlitImage, BlitTransform};
pub use context::{
    Capability, ColorMaterialMode, Context, ContextOptions, Face, FrontFace, GetFloatParam,
    GetParam, HintMode, HintTarget, Light, LightParam, Material, MaterialParam, MatrixMode,
    Primitive, ShadeModel, TexParam,
};
pub use math3d::{Mat4, Vec3, Vec4};
pub use pixel::PixelFormat;
pub use raster::{BlendFactor, Comparison, FogMode, StencilOp, TextureEnv};
pub use rect::Rect;
pub use texel::{TextureFilter, TextureWrap};
