//! Lights & Materials
//!
//! Fixed-function per-vertex (Gouraud) lighting. The enabled set is a small
//! index vector rebuilt on enable/disable so the per-vertex loop only visits
//! active lights.

use crate::math3d::{Vec3, Vec4};

use super::op::{ColorMaterialMode, Face, LightParam, MaterialParam};
use super::Context;

pub(crate) const MAX_LIGHTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// Eye coordinates (transformed by the modelview matrix at set time);
    /// w = 0 marks a directional light
    pub position: Vec4,
    pub spot_direction: Vec3,
    pub spot_exponent: f32,
    /// Degrees; 180 = no cone
    pub spot_cutoff: f32,
    /// Constant, linear, quadratic
    pub attenuation: [f32; 3],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse: [0.0, 0.0, 0.0, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            position: Vec4::new(0.0, 0.0, 1.0, 0.0),
            spot_direction: Vec3::new(0.0, 0.0, -1.0),
            spot_exponent: 0.0,
            spot_cutoff: 180.0,
            attenuation: [1.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emission: [f32; 4],
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            emission: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
        }
    }
}

impl Context {
    pub(crate) fn exec_material(&mut self, face: Face, param: MaterialParam) {
        let indices: &[usize] = match face {
            Face::Front => &[0],
            Face::Back => &[1],
            Face::FrontAndBack => &[0, 1],
        };
        for &i in indices {
            let m = &mut self.materials[i];
            match param {
                MaterialParam::Ambient(v) => m.ambient = v,
                MaterialParam::Diffuse(v) => m.diffuse = v,
                MaterialParam::Specular(v) => m.specular = v,
                MaterialParam::Emission(v) => m.emission = v,
                MaterialParam::Shininess(v) => m.shininess = v,
                MaterialParam::AmbientAndDiffuse(v) => {
                    m.ambient = v;
                    m.diffuse = v;
                }
            }
        }
    }

    pub(crate) fn exec_light(&mut self, index: usize, param: LightParam) {
        assert!(index < MAX_LIGHTS, "light index {index} out of range");
        match param {
            LightParam::Position(p) => {
                // Position is fixed in eye space at set time, per GL
                let p = Vec4::new(p[0], p[1], p[2], p[3]);
                self.lights[index].position = self.modelview().transform(p);
            }
            LightParam::SpotDirection(d) => {
                let d = Vec3::new(d[0], d[1], d[2]);
                self.lights[index].spot_direction = self.modelview().transform_dir(d);
            }
            LightParam::Ambient(v) => self.lights[index].ambient = v,
            LightParam::Diffuse(v) => self.lights[index].diffuse = v,
            LightParam::Specular(v) => self.lights[index].specular = v,
            LightParam::SpotExponent(v) => self.lights[index].spot_exponent = v,
            LightParam::SpotCutoff(v) => self.lights[index].spot_cutoff = v,
            LightParam::ConstantAttenuation(v) => self.lights[index].attenuation[0] = v,
            LightParam::LinearAttenuation(v) => self.lights[index].attenuation[1] = v,
            LightParam::QuadraticAttenuation(v) => self.lights[index].attenuation[2] = v,
        }
    }

    /// Rebuild the active-light index set
    pub(crate) fn set_light_enabled(&mut self, index: usize, enabled: bool) {
        assert!(index < MAX_LIGHTS, "light index {index} out of range");
        if enabled {
            if !self.enabled_lights.contains(&index) {
                self.enabled_lights.push(index);
                self.enabled_lights.sort_unstable();
            }
        } else {
            self.enabled_lights.retain(|&i| i != index);
        }
    }

    /// Full fixed-function lighting for one vertex (front material).
    /// `eye` is the vertex position in eye space; `normal` the transformed
    /// (optionally renormalized) surface normal.
    pub(crate) fn light_vertex(&self, eye: Vec4, normal: Vec3) -> [f32; 4] {
        let mut mat = self.materials[0];
        // Evaluation uses the front material, so color-material tracking
        // limited to the back face leaves it untouched
        if self.color_material_enabled && self.color_material_face != Face::Back {
            let cc = self.current_color;
            match self.color_material_mode {
                ColorMaterialMode::Emission => mat.emission = cc,
                ColorMaterialMode::Ambient => mat.ambient = cc,
                ColorMaterialMode::Diffuse => mat.diffuse = cc,
                ColorMaterialMode::Specular => mat.specular = cc,
                ColorMaterialMode::AmbientAndDiffuse => {
                    mat.ambient = cc;
                    mat.diffuse = cc;
                }
            }
        }

        let mut out = [
            mat.emission[0] + mat.ambient[0] * self.scene_ambient[0],
            mat.emission[1] + mat.ambient[1] * self.scene_ambient[1],
            mat.emission[2] + mat.ambient[2] * self.scene_ambient[2],
        ];

        for &li in &self.enabled_lights {
            let l = &self.lights[li];

            let (dir, att) = if l.position.w == 0.0 {
                (l.position.xyz().normalize(), 1.0)
            } else {
                let lp = l.position.xyz() * (1.0 / l.position.w);
                let to_light = lp - eye.xyz();
                let dist = to_light.length();
                let dir = if dist > 0.0 {
                    to_light * (1.0 / dist)
                } else {
                    Vec3::new(0.0, 0.0, 1.0)
                };
                let denom =
                    l.attenuation[0] + l.attenuation[1] * dist + l.attenuation[2] * dist * dist;
                (dir, if denom > 0.0 { 1.0 / denom } else { 1.0 })
            };

            let spot = if l.spot_cutoff < 180.0 {
                let cos_angle = (-dir).dot(&l.spot_direction.normalize());
                if cos_angle < l.spot_cutoff.to_radians().cos() {
                    0.0
                } else {
                    cos_angle.max(0.0).powf(l.spot_exponent)
                }
            } else {
                1.0
            };
            if spot <= 0.0 {
                continue;
            }

            let ndotl = normal.dot(&dir).max(0.0);
            let mut term = [
                mat.ambient[0] * l.ambient[0] + ndotl * mat.diffuse[0] * l.diffuse[0],
                mat.ambient[1] * l.ambient[1] + ndotl * mat.diffuse[1] * l.diffuse[1],
                mat.ambient[2] * l.ambient[2] + ndotl * mat.diffuse[2] * l.diffuse[2],
            ];

            if ndotl > 0.0 && mat.shininess > 0.0 {
                // Infinite-viewer half vector
                let half = (dir + Vec3::new(0.0, 0.0, 1.0)).normalize();
                let ndoth = normal.dot(&half).max(0.0);
                if ndoth > 0.0 {
                    let spec = ndoth.powf(mat.shininess);
                    term[0] += spec * mat.specular[0] * l.specular[0];
                    term[1] += spec * mat.specular[1] * l.specular[1];
                    term[2] += spec * mat.specular[2] * l.specular[2];
                }
            }

            let scale = att * spot;
            out[0] += scale * term[0];
            out[1] += scale * term[1];
            out[2] += scale * term[2];
        }

        [
            out[0].clamp(0.0, 1.0),
            out[1].clamp(0.0, 1.0),
            out[2].clamp(0.0, 1.0),
            mat.diffuse[3].clamp(0.0, 1.0),
        ]
    }
}
