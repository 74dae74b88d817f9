//! Replayable Draw Calls
//!
//! Every pixel-affecting operation is captured as an immutable [`DrawCall`]:
//! enough state to redo the exact operation later (dirty-region replay) and
//! to compare it structurally against the previous frame's call at the same
//! position.

use std::sync::Arc;

use crate::blit::{BlitImage, BlitTransform};
use crate::raster::{
    draw_line, draw_point, fill_triangle, FragmentState, FrameBuffer, RasterVertex,
};
use crate::rect::Rect;

/// Primitive batch from one `begin`/`end` bracket
#[derive(Debug, Clone, PartialEq)]
pub enum Primitives {
    Points(Vec<RasterVertex>),
    Lines(Vec<[RasterVertex; 2]>),
    Triangles(Vec<[RasterVertex; 3]>),
}

impl Primitives {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Points(v) => v.is_empty(),
            Self::Lines(v) => v.is_empty(),
            Self::Triangles(v) => v.is_empty(),
        }
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = &RasterVertex> + '_> {
        match self {
            Self::Points(v) => Box::new(v.iter()),
            Self::Lines(v) => Box::new(v.iter().flatten()),
            Self::Triangles(v) => Box::new(v.iter().flatten()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterizeCall {
    pub prims: Primitives,
    pub state: FragmentState,
    dirty: Rect,
}

impl RasterizeCall {
    /// Capture a batch. Vertices are post-clip, so the dirty rect is simply
    /// their bounding box clamped to the target.
    pub fn new(prims: Primitives, state: FragmentState, target: &Rect) -> Self {
        let dirty = Rect::bounding(prims.vertices().map(|v| (v.x, v.y)), target);
        Self {
            prims,
            state,
            dirty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlitCall {
    pub image: Arc<BlitImage>,
    pub transform: BlitTransform,
    dirty: Rect,
}

impl BlitCall {
    pub fn new(image: Arc<BlitImage>, transform: BlitTransform, target: &Rect) -> Self {
        let dirty = image.dest_bounds(&transform).intersection(target);
        Self {
            image,
            transform,
            dirty,
        }
    }
}

impl PartialEq for BlitCall {
    fn eq(&self, other: &Self) -> bool {
        // Image identity is id + version; the Arc pointer may differ between
        // frames for the same uploaded content
        self.image.id() == other.image.id()
            && self.image.version() == other.image.version()
            && self.transform == other.transform
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClearCall {
    pub color: Option<[u8; 4]>,
    pub depth: Option<u32>,
    pub stencil: Option<u8>,
    dirty: Rect,
}

impl ClearCall {
    pub fn new(
        color: Option<[u8; 4]>,
        depth: Option<u32>,
        stencil: Option<u8>,
        target: &Rect,
    ) -> Self {
        Self {
            color,
            depth,
            stencil,
            dirty: *target,
        }
    }
}

/// One recorded pixel-affecting operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Rasterize(RasterizeCall),
    Blit(BlitCall),
    Clear(ClearCall),
}

impl DrawCall {
    /// Screen region this call can affect
    pub fn dirty_rect(&self) -> Rect {
        match self {
            Self::Rasterize(c) => c.dirty,
            Self::Blit(c) => c.dirty,
            Self::Clear(c) => c.dirty,
        }
    }

    /// Replay against the framebuffer's current clip rect
    pub fn execute(&self, fb: &mut FrameBuffer) {
        match self {
            Self::Rasterize(c) => match &c.prims {
                Primitives::Points(points) => {
                    for p in points {
                        draw_point(fb, &c.state, p);
                    }
                }
                Primitives::Lines(lines) => {
                    for [a, b] in lines {
                        draw_line(fb, &c.state, a, b);
                    }
                }
                Primitives::Triangles(tris) => {
                    for [a, b, v] in tris {
                        fill_triangle(fb, &c.state, a, b, v);
                    }
                }
            },
            Self::Blit(c) => c.image.execute(fb, &c.transform),
            Self::Clear(c) => fb.clear(c.color, c.depth, c.stencil),
        }
    }

    /// Replay restricted to `rect`
    pub fn execute_clipped(&self, fb: &mut FrameBuffer, rect: Rect) {
        fb.set_clip(rect);
        self.execute(fb);
        fb.reset_clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelFormat;

    fn target() -> Rect {
        Rect::new(0, 0, 64, 64)
    }

    #[test]
    fn test_rasterize_dirty_is_vertex_bbox() {
        let tri = [
            RasterVertex::flat(10, 5, 0, [255; 4]),
            RasterVertex::flat(30, 5, 0, [255; 4]),
            RasterVertex::flat(20, 25, 0, [255; 4]),
        ];
        let call = RasterizeCall::new(
            Primitives::Triangles(vec![tri]),
            FragmentState::default(),
            &target(),
        );
        assert_eq!(call.dirty, Rect::new(10, 5, 31, 26));
    }

    #[test]
    fn test_rasterize_dirty_clamps_to_target() {
        let tri = [
            RasterVertex::flat(-10, -10, 0, [255; 4]),
            RasterVertex::flat(100, 0, 0, [255; 4]),
            RasterVertex::flat(0, 100, 0, [255; 4]),
        ];
        let call = RasterizeCall::new(
            Primitives::Triangles(vec![tri]),
            FragmentState::default(),
            &target(),
        );
        assert_eq!(call.dirty, target());
    }

    #[test]
    fn test_identical_calls_compare_equal() {
        let mk = || {
            DrawCall::Rasterize(RasterizeCall::new(
                Primitives::Points(vec![RasterVertex::flat(3, 3, 0, [1, 2, 3, 4])]),
                FragmentState::default(),
                &target(),
            ))
        };
        assert_eq!(mk(), mk());
    }

    #[test]
    fn test_differing_state_compares_unequal() {
        let prims = Primitives::Points(vec![RasterVertex::flat(3, 3, 0, [1, 2, 3, 4])]);
        let a = DrawCall::Rasterize(RasterizeCall::new(
            prims.clone(),
            FragmentState::default(),
            &target(),
        ));
        let b = DrawCall::Rasterize(RasterizeCall::new(
            prims,
            FragmentState {
                depth_test: true,
                ..FragmentState::default()
            },
            &target(),
        ));
        assert_ne!(a, b);
    }

    #[test]
    fn test_clear_call_replays() {
        let mut fb = FrameBuffer::new(8, 8, PixelFormat::Rgba8888, false);
        let call = DrawCall::Clear(ClearCall::new(
            Some([5, 6, 7, 255]),
            None,
            None,
            &Rect::new(0, 0, 8, 8),
        ));
        call.execute(&mut fb);
        assert_eq!(fb.read_pixel(4, 4), (5, 6, 7, 255));
    }

    #[test]
    fn test_clipped_replay_stays_inside_rect() {
        let mut fb = FrameBuffer::new(8, 8, PixelFormat::Rgba8888, false);
        let call = DrawCall::Clear(ClearCall::new(
            Some([9, 9, 9, 255]),
            None,
            None,
            &Rect::new(0, 0, 8, 8),
        ));
        call.execute_clipped(&mut fb, Rect::new(0, 0, 4, 8));
        assert_eq!(fb.read_pixel(3, 0), (9, 9, 9, 255));
        assert_eq!(fb.read_pixel(4, 0), (0, 0, 0, 0));
        // Clip restored afterward
        assert_eq!(fb.clip(), fb.bounds());
    }
}
