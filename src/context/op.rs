//! Opcodes & API Enums
//!
//! Every state or geometry call on the context is normalized into one [`Op`]
//! value. The public API builds an `Op` and hands it to the dispatcher, which
//! either records it into an open display list or executes it — a tagged
//! discriminated union instead of a raw positional parameter stream.

use crate::math3d::Mat4;
use crate::raster::{BlendFactor, Comparison, FogMode, StencilOp, TextureEnv};
use crate::texel::{TextureFilter, TextureWrap};

/// Primitive assembly mode for `begin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    Polygon,
}

/// Matrix stack selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixMode {
    ModelView,
    Projection,
    Texture,
}

impl MatrixMode {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::ModelView => 0,
            Self::Projection => 1,
            Self::Texture => 2,
        }
    }
}

/// Toggleable capabilities for `enable`/`disable`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Texture2D,
    Lighting,
    /// One of the fixed light slots
    Light(usize),
    DepthTest,
    Blend,
    StencilTest,
    Fog,
    ScissorTest,
    AlphaTest,
    CullFace,
    ColorMaterial,
    PolygonOffsetFill,
    Normalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
    FrontAndBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeModel {
    Flat,
    Smooth,
}

/// Which material components track the current color under `ColorMaterial`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMaterialMode {
    Emission,
    Ambient,
    Diffuse,
    Specular,
    AmbientAndDiffuse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialParam {
    Ambient([f32; 4]),
    Diffuse([f32; 4]),
    Specular([f32; 4]),
    Emission([f32; 4]),
    Shininess(f32),
    AmbientAndDiffuse([f32; 4]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightParam {
    Ambient([f32; 4]),
    Diffuse([f32; 4]),
    Specular([f32; 4]),
    /// Transformed by the current modelview matrix at set time, per GL
    Position([f32; 4]),
    SpotDirection([f32; 3]),
    SpotExponent(f32),
    /// Degrees; 180 disables the spotlight cone
    SpotCutoff(f32),
    ConstantAttenuation(f32),
    LinearAttenuation(f32),
    QuadraticAttenuation(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexParam {
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
    WrapS(TextureWrap),
    WrapT(TextureWrap),
}

/// Advisory rendering hints; accepted and ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintTarget {
    PerspectiveCorrection,
    PointSmooth,
    LineSmooth,
    Fog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintMode {
    DontCare,
    Fastest,
    Nicest,
}

/// One normalized call. Everything here is recordable into a display list;
/// resource management (texture/list/blit lifecycles) and queries execute
/// immediately and never appear as an `Op`.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Begin(Primitive),
    End,
    Vertex([f32; 4]),
    Normal([f32; 3]),
    Color([f32; 4]),
    TexCoord([f32; 2]),
    EdgeFlag(bool),

    MatrixMode(MatrixMode),
    PushMatrix,
    PopMatrix,
    LoadIdentity,
    LoadMatrix(Mat4),
    MultMatrix(Mat4),
    Rotate(f32, f32, f32, f32),
    Translate(f32, f32, f32),
    Scale(f32, f32, f32),
    Frustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Ortho {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    Enable(Capability),
    Disable(Capability),
    ShadeModel(ShadeModel),
    CullFace(Face),
    FrontFace(FrontFace),

    DepthFunc(Comparison),
    DepthMask(bool),
    AlphaFunc(Comparison, f32),
    BlendFunc(BlendFactor, BlendFactor),
    StencilFunc(Comparison, u8, u8),
    StencilOp(StencilOp, StencilOp, StencilOp),
    StencilMask(u8),
    ColorMask(bool, bool, bool, bool),
    Scissor {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    PolygonOffset(f32, f32),
    PointSize(f32),
    LineWidth(f32),

    FogMode(FogMode),
    FogDensity(f32),
    FogStart(f32),
    FogEnd(f32),
    FogColor([f32; 4]),

    Material(Face, MaterialParam),
    Light(usize, LightParam),
    LightModelAmbient([f32; 4]),
    LightModelTwoSide(bool),
    ColorMaterial(Face, ColorMaterialMode),

    BindTexture(u32),
    TexParameter(TexParam),
    TexEnv(TextureEnv),
    TexEnvColor([f32; 4]),

    ClearColor([f32; 4]),
    ClearDepth(f32),
    ClearStencil(u8),
    Clear {
        color: bool,
        depth: bool,
        stencil: bool,
    },

    Hint(HintTarget, HintMode),
    CallList(u32),
}
