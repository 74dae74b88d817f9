//! Texel Buffer
//!
//! Read-only sampling wrapper over an uploaded texture level. The filter is
//! chosen once at upload: nearest keeps a plain texel array, bilinear
//! additionally builds a 4-samples-per-texel cache (wrap already applied) so
//! the per-pixel sample path has no neighbor-wrapping branches.

/// Texture coordinate wrap policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Bilinear,
}

/// Wrap a texel coordinate into [0, size)
#[inline]
fn wrap_coord(c: i32, size: i32, mode: TextureWrap) -> i32 {
    match mode {
        TextureWrap::Repeat => c.rem_euclid(size),
        TextureWrap::MirroredRepeat => {
            let period = c.rem_euclid(2 * size);
            if period < size {
                period
            } else {
                2 * size - 1 - period
            }
        }
        TextureWrap::ClampToEdge => c.clamp(0, size - 1),
    }
}

/// RGBA packed as [r, g, b, a]
type Texel = [u8; 4];

/// Immutable sampling view over one texture level
#[derive(Debug)]
pub struct TexelBuffer {
    width: i32,
    height: i32,
    filter: TextureFilter,
    wrap_s: TextureWrap,
    wrap_t: TextureWrap,
    texels: Vec<Texel>,
    /// For each texel: itself and its +x / +y / +x+y neighbors, wrap applied.
    /// Present only for bilinear filtering.
    quads: Vec<[Texel; 4]>,
}

impl TexelBuffer {
    /// Build a sampler from RGBA bytes (4 per texel, row-major).
    ///
    /// `data.len()` must equal `width * height * 4`; the caller (texture
    /// upload) validates dimensions before reaching this point.
    pub fn new(
        width: u32,
        height: u32,
        data: &[u8],
        filter: TextureFilter,
        wrap_s: TextureWrap,
        wrap_t: TextureWrap,
    ) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "texel data size mismatch"
        );
        let texels: Vec<Texel> = data
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();

        let mut buf = Self {
            width: width as i32,
            height: height as i32,
            filter,
            wrap_s,
            wrap_t,
            texels,
            quads: Vec::new(),
        };
        if filter == TextureFilter::Bilinear {
            buf.build_quads();
        }
        buf
    }

    fn build_quads(&mut self) {
        let (w, h) = (self.width, self.height);
        let mut quads = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            let y1 = wrap_coord(y + 1, h, self.wrap_t);
            for x in 0..w {
                let x1 = wrap_coord(x + 1, w, self.wrap_s);
                quads.push([
                    self.texels[(y * w + x) as usize],
                    self.texels[(y * w + x1) as usize],
                    self.texels[(y1 * w + x) as usize],
                    self.texels[(y1 * w + x1) as usize],
                ]);
            }
        }
        self.quads = quads;
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height as u32
    }

    #[inline]
    pub fn filter(&self) -> TextureFilter {
        self.filter
    }

    /// Raw RGBA texels (retained for sampler rebuilds on parameter change)
    pub fn texel_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.texels.len() * 4);
        for t in &self.texels {
            out.extend_from_slice(t);
        }
        out
    }

    /// Sample at normalized coordinates with the upload-time filter
    #[inline]
    pub fn sample(&self, s: f32, t: f32) -> (u8, u8, u8, u8) {
        match self.filter {
            TextureFilter::Nearest => self.sample_nearest(s, t),
            TextureFilter::Bilinear => self.sample_bilinear(s, t),
        }
    }

    /// Nearest-neighbor fetch with wrap-mode-adjusted coordinates
    #[inline]
    pub fn sample_nearest(&self, s: f32, t: f32) -> (u8, u8, u8, u8) {
        let x = wrap_coord((s * self.width as f32).floor() as i32, self.width, self.wrap_s);
        let y = wrap_coord(
            (t * self.height as f32).floor() as i32,
            self.height,
            self.wrap_t,
        );
        let [r, g, b, a] = self.texels[(y * self.width + x) as usize];
        (r, g, b, a)
    }

    /// Bilinear fetch from the pre-expanded neighbor cache
    #[inline]
    pub fn sample_bilinear(&self, s: f32, t: f32) -> (u8, u8, u8, u8) {
        // Sample positions sit at texel centers
        let u = s * self.width as f32 - 0.5;
        let v = t * self.height as f32 - 0.5;
        let x0 = u.floor();
        let y0 = v.floor();
        let fx = u - x0;
        let fy = v - y0;

        let x = wrap_coord(x0 as i32, self.width, self.wrap_s);
        let y = wrap_coord(y0 as i32, self.height, self.wrap_t);
        let [c00, c10, c01, c11] = self.quads[(y * self.width + x) as usize];

        #[inline]
        fn lerp(a: u8, b: u8, t: f32) -> f32 {
            a as f32 + (b as f32 - a as f32) * t
        }

        let mut out = [0u8; 4];
        for i in 0..4 {
            let top = lerp(c00[i], c10[i], fx);
            let bot = lerp(c01[i], c11[i], fx);
            out[i] = (top + (bot - top) * fy).clamp(0.0, 255.0) as u8;
        }
        (out[0], out[1], out[2], out[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture_2x2(filter: TextureFilter, wrap: TextureWrap) -> TexelBuffer {
        // red, green / blue, white
        let data: Vec<u8> = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        TexelBuffer::new(2, 2, &data, filter, wrap, wrap)
    }

    #[test]
    fn test_nearest_repeat_wraps_whole_periods() {
        let tex = texture_2x2(TextureFilter::Nearest, TextureWrap::Repeat);
        // s=1.5 is one full period past s=0.5: identical texel
        assert_eq!(tex.sample(1.5, 0.5), tex.sample(0.5, 0.5));
        assert_eq!(tex.sample(-0.5, 0.25), tex.sample(0.5, 0.25));
    }

    #[test]
    fn test_nearest_fetches_quadrants() {
        let tex = texture_2x2(TextureFilter::Nearest, TextureWrap::Repeat);
        assert_eq!(tex.sample(0.25, 0.25), (255, 0, 0, 255));
        assert_eq!(tex.sample(0.75, 0.25), (0, 255, 0, 255));
        assert_eq!(tex.sample(0.25, 0.75), (0, 0, 255, 255));
        assert_eq!(tex.sample(0.75, 0.75), (255, 255, 255, 255));
    }

    #[test]
    fn test_clamp_to_edge_pins_border() {
        let tex = texture_2x2(TextureFilter::Nearest, TextureWrap::ClampToEdge);
        assert_eq!(tex.sample(4.0, 0.25), (0, 255, 0, 255));
        assert_eq!(tex.sample(-3.0, 0.25), (255, 0, 0, 255));
    }

    #[test]
    fn test_mirrored_repeat_reflects() {
        assert_eq!(wrap_coord(4, 4, TextureWrap::MirroredRepeat), 3);
        assert_eq!(wrap_coord(7, 4, TextureWrap::MirroredRepeat), 0);
        assert_eq!(wrap_coord(-1, 4, TextureWrap::MirroredRepeat), 0);
    }

    #[test]
    fn test_bilinear_solid_color_is_exact() {
        // A solid texture must sample to exactly its color everywhere,
        // including across wrap seams in the neighbor cache.
        let data: Vec<u8> = (0..16 * 16).flat_map(|_| [17u8, 34, 51, 255]).collect();
        let tex = TexelBuffer::new(16, 16, &data, TextureFilter::Bilinear, TextureWrap::Repeat, TextureWrap::Repeat);
        for &(s, t) in &[(0.0, 0.0), (0.5, 0.5), (0.031, 0.97), (0.999, 0.001)] {
            assert_eq!(tex.sample(s, t), (17, 34, 51, 255));
        }
    }

    #[test]
    fn test_bilinear_midpoint_average() {
        // 2x1 black/white: halfway between texel centers averages to ~127
        let data: Vec<u8> = vec![0, 0, 0, 255, 255, 255, 255, 255];
        let tex = TexelBuffer::new(
            2,
            1,
            &data,
            TextureFilter::Bilinear,
            TextureWrap::ClampToEdge,
            TextureWrap::ClampToEdge,
        );
        let (r, _, _, _) = tex.sample(0.5, 0.5);
        assert!((r as i32 - 127).abs() <= 1);
    }
}
