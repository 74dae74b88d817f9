//! Draw-Call Queue & Dirty-Rectangle Tracking
//!
//! With dirty rectangles enabled, draw calls are deferred: issued calls
//! accumulate for the frame, and `present` diffs them against the previous
//! frame's list to repaint only the regions that changed. With the
//! optimization disabled, calls execute immediately and `present` reports the
//! whole screen — the correctness baseline the dirty path must match
//! pixel-for-pixel.

mod draw_call;

pub use draw_call::{BlitCall, ClearCall, DrawCall, Primitives, RasterizeCall};

use crate::raster::FrameBuffer;
use crate::rect::{merge_rects, Rect};

pub struct DrawCallQueue {
    dirty_rects: bool,
    current: Vec<DrawCall>,
    previous: Vec<DrawCall>,
}

impl DrawCallQueue {
    pub fn new(dirty_rects: bool) -> Self {
        Self {
            dirty_rects,
            current: Vec::new(),
            previous: Vec::new(),
        }
    }

    #[inline]
    pub fn dirty_rects_enabled(&self) -> bool {
        self.dirty_rects
    }

    /// Number of calls queued in the current frame
    pub fn pending(&self) -> usize {
        self.current.len()
    }

    /// Record (dirty mode) or immediately execute (baseline mode) a call
    pub fn issue(&mut self, call: DrawCall, fb: &mut FrameBuffer) {
        if self.dirty_rects {
            self.current.push(call);
        } else {
            call.execute(fb);
        }
    }

    /// Finalize the frame. Returns the regions the host needs to re-present.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Vec<Rect> {
        if !self.dirty_rects {
            return vec![fb.bounds()];
        }

        // Lock-step diff: wherever the lists disagree (content or length),
        // both the outgoing call's region (stale pixels to erase) and the
        // incoming call's region become dirty.
        let mut rects: Vec<Rect> = Vec::new();
        let len = self.previous.len().max(self.current.len());
        for i in 0..len {
            let prev = self.previous.get(i);
            let cur = self.current.get(i);
            let same = matches!((prev, cur), (Some(p), Some(c)) if p == c);
            if !same {
                if let Some(p) = prev {
                    rects.push(p.dirty_rect());
                }
                if let Some(c) = cur {
                    rects.push(c.dirty_rect());
                }
            }
        }

        merge_rects(&mut rects);

        // Replay affected calls per region. Regions are pairwise disjoint
        // after merging, and calls stay in issue order within each, so
        // last-write-wins semantics hold everywhere.
        for rect in &rects {
            for call in &self.current {
                if call.dirty_rect().intersects(rect) {
                    call.execute_clipped(fb, *rect);
                }
            }
        }

        // The current list becomes the reference frame; the old list's
        // allocation is recycled for the next frame.
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();

        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelFormat;
    use crate::raster::{FragmentState, RasterVertex};

    fn fb() -> FrameBuffer {
        FrameBuffer::new(32, 32, PixelFormat::Rgba8888, false)
    }

    fn tri_call(x: i32, y: i32, color: [u8; 4], target: &Rect) -> DrawCall {
        DrawCall::Rasterize(RasterizeCall::new(
            Primitives::Triangles(vec![[
                RasterVertex::flat(x, y, 0, color),
                RasterVertex::flat(x + 8, y, 0, color),
                RasterVertex::flat(x, y + 8, 0, color),
            ]]),
            FragmentState::default(),
            target,
        ))
    }

    fn clear_call(color: [u8; 4], target: &Rect) -> DrawCall {
        DrawCall::Clear(ClearCall::new(Some(color), None, None, target))
    }

    fn run_frame(queue: &mut DrawCallQueue, fb: &mut FrameBuffer, calls: Vec<DrawCall>) -> Vec<Rect> {
        for c in calls {
            queue.issue(c, fb);
        }
        queue.present(fb)
    }

    #[test]
    fn test_baseline_mode_reports_full_screen() {
        let mut fb = fb();
        let mut q = DrawCallQueue::new(false);
        let t = fb.bounds();
        let rects = run_frame(&mut q, &mut fb, vec![clear_call([255, 0, 0, 255], &t)]);
        assert_eq!(rects, vec![fb.bounds()]);
        assert_eq!(fb.read_pixel(0, 0), (255, 0, 0, 255));
    }

    #[test]
    fn test_first_frame_repaints_everything_issued() {
        let mut fb = fb();
        let mut q = DrawCallQueue::new(true);
        let t = fb.bounds();
        let rects = run_frame(
            &mut q,
            &mut fb,
            vec![clear_call([0, 0, 0, 255], &t), tri_call(4, 4, [0, 255, 0, 255], &t)],
        );
        assert!(!rects.is_empty());
        assert_eq!(fb.read_pixel(5, 5), (0, 255, 0, 255));
    }

    #[test]
    fn test_identical_frames_produce_no_dirty_rects() {
        let mut fb = fb();
        let mut q = DrawCallQueue::new(true);
        let t = fb.bounds();
        let frame = |t: &Rect| {
            vec![
                clear_call([0, 0, 0, 255], t),
                tri_call(4, 4, [0, 255, 0, 255], t),
            ]
        };
        run_frame(&mut q, &mut fb, frame(&t));
        let before: Vec<u8> = fb.pixels().to_vec();
        let rects = run_frame(&mut q, &mut fb, frame(&t));
        assert!(rects.is_empty());
        assert_eq!(fb.pixels(), &before[..]);
    }

    #[test]
    fn test_dirty_path_matches_baseline() {
        // Same two-frame sequence through both paths must end identically
        let t = Rect::new(0, 0, 32, 32);
        let frame1 = |t: &Rect| {
            vec![
                clear_call([10, 10, 10, 255], t),
                tri_call(2, 2, [200, 0, 0, 255], t),
            ]
        };
        let frame2 = |t: &Rect| {
            vec![
                clear_call([10, 10, 10, 255], t),
                tri_call(12, 12, [200, 0, 0, 255], t),
            ]
        };

        let mut fb_base = fb();
        let mut q_base = DrawCallQueue::new(false);
        run_frame(&mut q_base, &mut fb_base, frame1(&t));
        run_frame(&mut q_base, &mut fb_base, frame2(&t));

        let mut fb_dirty = fb();
        let mut q_dirty = DrawCallQueue::new(true);
        run_frame(&mut q_dirty, &mut fb_dirty, frame1(&t));
        run_frame(&mut q_dirty, &mut fb_dirty, frame2(&t));

        assert_eq!(fb_base.pixels(), fb_dirty.pixels());
    }

    #[test]
    fn test_moved_triangle_marks_old_and_new_regions() {
        let mut fb = fb();
        let mut q = DrawCallQueue::new(true);
        let t = fb.bounds();
        run_frame(
            &mut q,
            &mut fb,
            vec![clear_call([0, 0, 0, 255], &t), tri_call(2, 2, [255, 255, 255, 255], &t)],
        );
        let rects = run_frame(
            &mut q,
            &mut fb,
            vec![clear_call([0, 0, 0, 255], &t), tri_call(20, 20, [255, 255, 255, 255], &t)],
        );
        // Old region was repainted with the clear (stale pixels erased)...
        assert_eq!(fb.read_pixel(3, 3), (0, 0, 0, 255));
        // ...and the new position rendered
        assert_eq!(fb.read_pixel(21, 21), (255, 255, 255, 255));
        // Both regions are covered by the reported rects
        let covers = |x, y| rects.iter().any(|r| r.contains(x, y));
        assert!(covers(3, 3));
        assert!(covers(21, 21));
    }

    #[test]
    fn test_queue_recycles_after_present() {
        let mut fb = fb();
        let mut q = DrawCallQueue::new(true);
        let t = fb.bounds();
        run_frame(&mut q, &mut fb, vec![clear_call([1, 1, 1, 255], &t)]);
        assert_eq!(q.pending(), 0);
    }
}
