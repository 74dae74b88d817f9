//! Texture Objects
//!
//! Id-keyed, created on first bind (id 0 is the always-present default
//! object). Each upload builds a fresh `Arc<TexelBuffer>` and bumps the
//! version counter: draw calls queued before a re-upload keep their Arc and
//! continue to render the pixels they captured, and the version makes the
//! old and new calls compare unequal so the region repaints.

use std::sync::Arc;

use crate::raster::TextureBinding;
use crate::texel::{TexelBuffer, TextureFilter, TextureWrap};

use super::op::TexParam;
use super::vertex::color_to_u8;
use super::Context;

pub(crate) const MAX_TEXTURE_LEVELS: usize = 13; // 4096 = 2^12, levels 0..=12

#[derive(Debug)]
pub(crate) struct TextureObject {
    pub version: u32,
    pub levels: Vec<Option<Arc<TexelBuffer>>>,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
}

impl Default for TextureObject {
    fn default() -> Self {
        Self {
            version: 0,
            levels: vec![None; MAX_TEXTURE_LEVELS],
            min_filter: TextureFilter::Bilinear,
            mag_filter: TextureFilter::Bilinear,
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
        }
    }
}

impl Context {
    /// Reserve `n` fresh texture handles
    pub fn gen_textures(&mut self, n: usize) -> Vec<u32> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let id = self.next_texture_id;
            self.next_texture_id += 1;
            self.textures.insert(id, TextureObject::default());
            out.push(id);
        }
        out
    }

    pub(crate) fn exec_bind_texture(&mut self, id: u32) {
        self.textures.entry(id).or_default();
        self.bound_texture = id;
    }

    /// Upload one mip level of the bound texture from RGBA bytes.
    ///
    /// Width and height must be powers of two within 2..=max_texture_size;
    /// anything else is a caller bug and panics. The sampler's filter is
    /// fixed here from the texture's current parameters.
    pub fn tex_image_2d(&mut self, level: usize, width: u32, height: u32, rgba: &[u8]) {
        assert!(level < MAX_TEXTURE_LEVELS, "texture level {level} out of range");
        let max = self.opts.max_texture_size;
        for (name, dim) in [("width", width), ("height", height)] {
            assert!(
                dim.is_power_of_two() && (2..=max).contains(&dim),
                "texture {name} {dim} must be a power of two in 2..={max}"
            );
        }
        let bound = self.bound_texture;
        let tex = self
            .textures
            .get_mut(&bound)
            .expect("bound texture missing");
        // Level 0 is sampled magnified; higher levels are minification data
        let filter = if level == 0 {
            tex.mag_filter
        } else {
            tex.min_filter
        };
        let buf = TexelBuffer::new(width, height, rgba, filter, tex.wrap_s, tex.wrap_t);
        tex.levels[level] = Some(Arc::new(buf));
        tex.version += 1;
    }

    /// Filter / wrap changes rebuild the bound texture's samplers so queued
    /// draw calls keep the configuration they captured
    pub(crate) fn exec_tex_parameter(&mut self, param: TexParam) {
        let bound = self.bound_texture;
        let Some(tex) = self.textures.get_mut(&bound) else {
            return;
        };
        match param {
            TexParam::MinFilter(f) => tex.min_filter = f,
            TexParam::MagFilter(f) => tex.mag_filter = f,
            TexParam::WrapS(w) => tex.wrap_s = w,
            TexParam::WrapT(w) => tex.wrap_t = w,
        }
        let mut rebuilt = false;
        for (i, level) in tex.levels.iter_mut().enumerate() {
            if let Some(old) = level.as_ref() {
                let bytes = old.texel_bytes();
                let filter = if i == 0 { tex.mag_filter } else { tex.min_filter };
                let buf = TexelBuffer::new(
                    old.width(),
                    old.height(),
                    &bytes,
                    filter,
                    tex.wrap_s,
                    tex.wrap_t,
                );
                *level = Some(Arc::new(buf));
                rebuilt = true;
            }
        }
        if rebuilt {
            tex.version += 1;
        }
    }

    pub fn delete_textures(&mut self, ids: &[u32]) {
        for &id in ids {
            if id == 0 {
                tracing::warn!("ignoring attempt to delete default texture 0");
                continue;
            }
            if self.textures.remove(&id).is_none() {
                tracing::warn!(id, "delete_textures: unknown texture");
            }
            if self.bound_texture == id {
                self.bound_texture = 0;
            }
        }
    }

    /// Capture the bound texture for a draw call; `None` when nothing
    /// sampleable is bound (texturing then renders untextured)
    pub(crate) fn texture_binding(&self) -> Option<TextureBinding> {
        let tex = self.textures.get(&self.bound_texture)?;
        // The fixed-function pipeline has no derivative information, so
        // level 0 is the sampled level; higher levels are stored only.
        let sampler = tex.levels[0].clone()?;
        Some(TextureBinding {
            sampler,
            id: self.bound_texture,
            version: tex.version,
            env: self.texture_env,
            env_color: color_to_u8(self.texture_env_color),
        })
    }
}
