//! Blinn-Phong material definitions
//!
//! Materials are plain data owned by each scene object. The optional texture
//! is a handle into the scene's texture table, never the GPU texture itself.

use crate::gfx::scene::TextureKey;

/// Reflectivities and specular exponent of one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    /// Specular exponent `n`
    pub shininess: f32,
    pub texture: Option<TextureKey>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.1, 0.1, 0.1],
            diffuse: [0.6, 0.6, 0.6],
            specular: [0.3, 0.3, 0.3],
            shininess: 11.0,
            texture: None,
        }
    }
}

impl Material {
    pub fn new(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            texture: None,
        }
    }

    /// Builder pattern: attach a texture slot
    pub fn with_texture(mut self, texture: TextureKey) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}

/// How textured objects combine their image with lighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureMode {
    /// Raw texel color, lighting ignored
    #[default]
    Replace,
    /// Texel color multiplied by the lit color
    Modulate,
}

impl TextureMode {
    pub fn toggled(self) -> Self {
        match self {
            TextureMode::Replace => TextureMode::Modulate,
            TextureMode::Modulate => TextureMode::Replace,
        }
    }

    /// Value handed to the fragment shader; untextured draws use -1
    pub fn shader_value(material: &Material, mode: TextureMode) -> i32 {
        match (material.is_textured(), mode) {
            (false, _) => -1,
            (true, TextureMode::Replace) => 0,
            (true, TextureMode::Modulate) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_toggle_flips_between_modes() {
        assert_eq!(TextureMode::default(), TextureMode::Replace);
        assert_eq!(TextureMode::Replace.toggled(), TextureMode::Modulate);
        assert_eq!(TextureMode::Modulate.toggled(), TextureMode::Replace);
    }

    #[test]
    fn test_shader_value_for_untextured_ignores_mode() {
        let plain = Material::default();
        assert_eq!(TextureMode::shader_value(&plain, TextureMode::Replace), -1);
        assert_eq!(TextureMode::shader_value(&plain, TextureMode::Modulate), -1);

        let mut table: SlotMap<TextureKey, ()> = SlotMap::with_key();
        let textured = plain.with_texture(table.insert(()));
        assert_eq!(TextureMode::shader_value(&textured, TextureMode::Replace), 0);
        assert_eq!(TextureMode::shader_value(&textured, TextureMode::Modulate), 1);
    }
}
