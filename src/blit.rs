//! 2D Blit Image Layer
//!
//! Sprites composited over the framebuffer, independent of the triangle
//! rasterizer. Upload converts the caller's RGBA pixels to the target pixel
//! format and indexes each row's maximal opaque runs, so the common
//! axis-aligned blit never touches transparent pixels and never converts
//! formats per pixel. Flip/tint/scale/rotate requests fall back to a generic
//! inverse-mapping path.

use crate::pixel::{mul_channel, PixelFormat};
use crate::raster::FrameBuffer;
use crate::rect::Rect;

/// One maximal run of non-transparent pixels, pre-packed in the framebuffer's
/// pixel format
#[derive(Debug, Clone, PartialEq)]
struct BlitLine {
    x: i32,
    y: i32,
    /// Packed pixel bytes, `len / bytes_per_pixel` pixels long
    pixels: Vec<u8>,
}

/// A decoded sprite surface plus its RLE span index
#[derive(Debug)]
pub struct BlitImage {
    id: u32,
    version: u32,
    width: i32,
    height: i32,
    format: PixelFormat,
    lines: Vec<BlitLine>,
    /// Full RGBA copy for the generic path
    texels: Vec<[u8; 4]>,
    /// Every alpha is 0 or 255
    binary_transparent: bool,
}

/// Placement and effects for one blit operation
#[derive(Debug, Clone, PartialEq)]
pub struct BlitTransform {
    pub x: i32,
    pub y: i32,
    /// Sub-rect of the source image; `None` = whole image
    pub source: Option<Rect>,
    /// Destination size; `None` = unscaled
    pub dst_width: Option<i32>,
    pub dst_height: Option<i32>,
    /// Degrees clockwise about the destination rect center
    pub rotation: f32,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Per-channel multiplier; [255; 4] = untinted
    pub tint: [u8; 4],
}

impl BlitTransform {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            source: None,
            dst_width: None,
            dst_height: None,
            rotation: 0.0,
            flip_h: false,
            flip_v: false,
            tint: [255; 4],
        }
    }

    fn is_simple(&self) -> bool {
        self.source.is_none()
            && self.dst_width.is_none()
            && self.dst_height.is_none()
            && self.rotation == 0.0
            && !self.flip_h
            && !self.flip_v
            && self.tint == [255; 4]
    }
}

impl BlitImage {
    /// Decode RGBA data (4 bytes per pixel, row-major) into a blit image
    /// packed for `format`.
    pub fn new(id: u32, version: u32, width: u32, height: u32, rgba: &[u8], format: PixelFormat) -> Self {
        assert_eq!(
            rgba.len(),
            (width * height * 4) as usize,
            "blit image data size mismatch"
        );
        let w = width as i32;
        let h = height as i32;
        let bpp = format.bytes_per_pixel();
        let texels: Vec<[u8; 4]> = rgba
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();

        let mut binary_transparent = true;
        let mut lines = Vec::new();
        for y in 0..h {
            let row = &texels[(y * w) as usize..((y + 1) * w) as usize];
            let mut x = 0;
            while x < w {
                // Skip transparent gap
                while x < w && row[x as usize][3] == 0 {
                    x += 1;
                }
                if x >= w {
                    break;
                }
                let start = x;
                let mut pixels = Vec::new();
                while x < w && row[x as usize][3] != 0 {
                    let [r, g, b, a] = row[x as usize];
                    if a != 255 {
                        binary_transparent = false;
                    }
                    let mut packed = [0u8; 4];
                    format.write(&mut packed, format.pack(r, g, b, a));
                    pixels.extend_from_slice(&packed[..bpp]);
                    x += 1;
                }
                lines.push(BlitLine { x: start, y, pixels });
            }
        }

        Self {
            id,
            version,
            width: w,
            height: h,
            format,
            lines,
            texels,
            binary_transparent,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_binary_transparent(&self) -> bool {
        self.binary_transparent
    }

    /// Destination bounding box of a blit, before framebuffer clamping
    pub fn dest_bounds(&self, t: &BlitTransform) -> Rect {
        let src = t
            .source
            .unwrap_or_else(|| Rect::from_size(0, 0, self.width, self.height));
        let dw = t.dst_width.unwrap_or(src.width());
        let dh = t.dst_height.unwrap_or(src.height());
        if t.rotation == 0.0 {
            return Rect::from_size(t.x, t.y, dw, dh);
        }
        // Conservative box of the rotated rect
        let (s, c) = t.rotation.to_radians().sin_cos();
        let (cx, cy) = (dw as f32 / 2.0, dh as f32 / 2.0);
        let mut r = Rect::empty();
        for (px, py) in [(0.0, 0.0), (dw as f32, 0.0), (0.0, dh as f32), (dw as f32, dh as f32)] {
            let (dx, dy) = (px - cx, py - cy);
            let rx = cx + dx * c - dy * s;
            let ry = cy + dx * s + dy * c;
            let (ix, iy) = (t.x + rx.floor() as i32, t.y + ry.floor() as i32);
            if r.is_empty() {
                r = Rect::new(ix, iy, ix + 1, iy + 1);
            } else {
                r.extend_to(ix, iy);
            }
        }
        // One pixel of slack for the ceil side of the rotation
        Rect::new(r.left, r.top, r.right + 1, r.bottom + 1)
    }

    /// Composite this image into the framebuffer. Clipping to the replay
    /// rect happens inside the framebuffer's write paths.
    pub fn execute(&self, fb: &mut FrameBuffer, t: &BlitTransform) {
        debug_assert_eq!(self.format, fb.format(), "blit image packed for another target");
        if t.is_simple() {
            if self.binary_transparent {
                // Opaque spans: straight packed copies
                for line in &self.lines {
                    fb.write_packed_span(t.x + line.x, t.y + line.y, &line.pixels);
                }
            } else {
                // Soft alpha: per-pixel composite over the span range only
                for line in &self.lines {
                    let count = line.pixels.len() / self.format.bytes_per_pixel();
                    for i in 0..count as i32 {
                        let [r, g, b, a] =
                            self.texels[(line.y * self.width + line.x + i) as usize];
                        fb.compose_pixel(t.x + line.x + i, t.y + line.y, r, g, b, a);
                    }
                }
            }
            return;
        }
        self.execute_generic(fb, t);
    }

    /// Flip / tint / scale / rotate path: inverse-map every destination pixel
    /// back into the source and nearest-sample.
    fn execute_generic(&self, fb: &mut FrameBuffer, t: &BlitTransform) {
        let src = t
            .source
            .unwrap_or_else(|| Rect::from_size(0, 0, self.width, self.height));
        let dw = t.dst_width.unwrap_or(src.width());
        let dh = t.dst_height.unwrap_or(src.height());
        if dw <= 0 || dh <= 0 || src.is_empty() {
            return;
        }
        let bounds = self.dest_bounds(t).intersection(&fb.bounds());
        if bounds.is_empty() {
            return;
        }

        let sx_scale = src.width() as f32 / dw as f32;
        let sy_scale = src.height() as f32 / dh as f32;
        let (sin, cos) = (-t.rotation.to_radians()).sin_cos(); // inverse rotation
        let (cx, cy) = (dw as f32 / 2.0, dh as f32 / 2.0);

        for dy in bounds.top..bounds.bottom {
            for dx in bounds.left..bounds.right {
                // Destination pixel center, relative to the unrotated rect
                let fx = (dx - t.x) as f32 + 0.5 - cx;
                let fy = (dy - t.y) as f32 + 0.5 - cy;
                let ux = cx + fx * cos - fy * sin;
                let uy = cy + fx * sin + fy * cos;
                if ux < 0.0 || uy < 0.0 || ux >= dw as f32 || uy >= dh as f32 {
                    continue;
                }
                let mut sx = (ux * sx_scale) as i32;
                let mut sy = (uy * sy_scale) as i32;
                if t.flip_h {
                    sx = src.width() - 1 - sx;
                }
                if t.flip_v {
                    sy = src.height() - 1 - sy;
                }
                let sx = (src.left + sx).clamp(0, self.width - 1);
                let sy = (src.top + sy).clamp(0, self.height - 1);
                let [r, g, b, a] = self.texels[(sy * self.width + sx) as usize];
                if a == 0 {
                    continue;
                }
                let (r, g, b, a) = (
                    mul_channel(r, t.tint[0]),
                    mul_channel(g, t.tint[1]),
                    mul_channel(b, t.tint[2]),
                    mul_channel(a, t.tint[3]),
                );
                fb.compose_pixel(dx, dy, r, g, b, a);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_rgba(w: u32, h: u32) -> Vec<u8> {
        let mut data = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if (x + y) % 2 == 0 {
                    data.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    data.extend_from_slice(&[0, 0, 0, 0]); // transparent
                }
            }
        }
        data
    }

    #[test]
    fn test_rle_spans_skip_transparent() {
        let img = BlitImage::new(1, 0, 4, 1, &[
            0, 0, 0, 0, // gap
            255, 0, 0, 255,
            255, 0, 0, 255,
            0, 0, 0, 0, // gap
        ], PixelFormat::Rgba8888);
        assert_eq!(img.lines.len(), 1);
        assert_eq!(img.lines[0].x, 1);
        assert_eq!(img.lines[0].pixels.len(), 2 * 4);
        assert!(img.is_binary_transparent());
    }

    #[test]
    fn test_soft_alpha_clears_binary_flag() {
        let img = BlitImage::new(1, 0, 2, 1, &[255, 0, 0, 128, 255, 0, 0, 255], PixelFormat::Rgba8888);
        assert!(!img.is_binary_transparent());
    }

    #[test]
    fn test_simple_blit_respects_transparency() {
        let mut fb = FrameBuffer::new(8, 8, PixelFormat::Rgba8888, false);
        fb.clear(Some([0, 0, 255, 255]), None, None);
        let img = BlitImage::new(1, 0, 4, 4, &checker_rgba(4, 4), PixelFormat::Rgba8888);
        img.execute(&mut fb, &BlitTransform::at(2, 2));
        assert_eq!(fb.read_pixel(2, 2), (255, 0, 0, 255)); // opaque texel
        assert_eq!(fb.read_pixel(3, 2), (0, 0, 255, 255)); // transparent gap kept background
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut fb = FrameBuffer::new(4, 4, PixelFormat::Rgba8888, false);
        let solid: Vec<u8> = (0..4 * 4).flat_map(|_| [9u8, 9, 9, 255]).collect();
        let img = BlitImage::new(1, 0, 4, 4, &solid, PixelFormat::Rgba8888);
        img.execute(&mut fb, &BlitTransform::at(2, 2));
        assert_eq!(fb.read_pixel(3, 3), (9, 9, 9, 255));
        assert_eq!(fb.read_pixel(1, 1), (0, 0, 0, 0));
    }

    #[test]
    fn test_flip_h_mirrors() {
        let mut fb = FrameBuffer::new(4, 1, PixelFormat::Rgba8888, false);
        // Two-pixel image: red, green
        let img = BlitImage::new(
            1,
            0,
            2,
            1,
            &[255, 0, 0, 255, 0, 255, 0, 255],
            PixelFormat::Rgba8888,
        );
        let t = BlitTransform {
            flip_h: true,
            ..BlitTransform::at(0, 0)
        };
        img.execute(&mut fb, &t);
        assert_eq!(fb.read_pixel(0, 0), (0, 255, 0, 255));
        assert_eq!(fb.read_pixel(1, 0), (255, 0, 0, 255));
    }

    #[test]
    fn test_tint_multiplies() {
        let mut fb = FrameBuffer::new(2, 1, PixelFormat::Rgba8888, false);
        let img = BlitImage::new(1, 0, 1, 1, &[200, 100, 50, 255], PixelFormat::Rgba8888);
        let t = BlitTransform {
            tint: [128, 255, 0, 255],
            ..BlitTransform::at(0, 0)
        };
        img.execute(&mut fb, &t);
        let (r, g, b, _) = fb.read_pixel(0, 0);
        assert!((r as i32 - 100).abs() <= 1);
        assert_eq!(g, 100);
        assert_eq!(b, 0);
    }

    #[test]
    fn test_scaled_blit_covers_destination() {
        let mut fb = FrameBuffer::new(8, 8, PixelFormat::Rgba8888, false);
        let img = BlitImage::new(1, 0, 2, 2, &{
            let mut v = Vec::new();
            for _ in 0..4 {
                v.extend_from_slice(&[10, 20, 30, 255]);
            }
            v
        }, PixelFormat::Rgba8888);
        let t = BlitTransform {
            dst_width: Some(8),
            dst_height: Some(8),
            ..BlitTransform::at(0, 0)
        };
        img.execute(&mut fb, &t);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.read_pixel(x, y), (10, 20, 30, 255));
            }
        }
    }

    #[test]
    fn test_dest_bounds_unrotated() {
        let img = BlitImage::new(1, 0, 4, 4, &checker_rgba(4, 4), PixelFormat::Rgba8888);
        assert_eq!(
            img.dest_bounds(&BlitTransform::at(10, 20)),
            Rect::new(10, 20, 14, 24)
        );
    }
}
