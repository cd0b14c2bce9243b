//! Global uniform bindings for camera and light data
//!
//! Everything here is shared by all draws of a frame and is bound to slot 0
//! of the scene pipeline.

use crate::{
    config::LightConfig,
    wgpu_utils::{
        binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
        UniformBuffer,
    },
};

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in `blinn_phong.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    eye_position: [f32; 4],
    light_ambient: [f32; 4],
    light_diffuse: [f32; 4],
    light_specular: [f32; 4],
    light_position: [f32; 4],
}

impl GlobalUBOContent {
    pub fn new(eye: [f32; 3], light: &LightConfig) -> Self {
        let extend = |v: [f32; 3], w: f32| [v[0], v[1], v[2], w];
        Self {
            eye_position: extend(eye, 1.0),
            light_ambient: extend(light.ambient, 1.0),
            light_diffuse: extend(light.diffuse, 1.0),
            light_specular: extend(light.specular, 1.0),
            light_position: extend(light.position, 1.0),
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with the current eye and light
pub fn update_global_ubo(ubo: &mut GlobalUBO, queue: &wgpu::Queue, eye: [f32; 3], light: &LightConfig) {
    ubo.update_content(queue, GlobalUBOContent::new(eye, light));
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
