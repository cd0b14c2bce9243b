//! WGPU-based rendering engine
//!
//! Owns the surface, device and every frame-independent GPU resource, and
//! records a [`FramePlan`] into a single depth-tested render pass.

use std::sync::Arc;
use wgpu::Device;

use crate::{
    config::LightConfig,
    error::RenderError,
    gfx::{
        resources::{update_global_ubo, GlobalBindings, GlobalUBO, ImageData, TextureResource},
        scene::{DrawMesh, Scene, TextureBinding, TextureKey},
    },
    wgpu_utils::{binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc, DynamicUniformBuffer},
};

use super::{
    frame_renderer::{DrawUniform, FramePlan},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

const SCENE_PIPELINE: &str = "Scene";
const INITIAL_DRAW_CAPACITY: usize = 64;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    light_config: LightConfig,

    draw_uniforms: DynamicUniformBuffer<DrawUniform>,
    draw_layout: BindGroupLayoutWithDesc,
    draw_bind_group: wgpu::BindGroup,

    texture_layout: BindGroupLayoutWithDesc,
    // Bound for untextured draws and for slots whose image never arrived
    placeholder: TextureBinding,
}

impl RenderEngine {
    /// Creates a render engine for the given window
    ///
    /// Any shader or pipeline the driver rejects is reported as
    /// [`RenderError::CompileOrLink`].
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        light_config: LightConfig,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Adapter(e.to_string()))?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RenderError::Adapter("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let draw_uniforms = DynamicUniformBuffer::<DrawUniform>::new(&device, INITIAL_DRAW_CAPACITY);
        let draw_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_dynamic(
                std::mem::size_of::<DrawUniform>() as u64,
            ))
            .create(&device, "Draw Bind Group Layout");
        let draw_bind_group = Self::create_draw_bind_group(&device, &draw_layout, &draw_uniforms);

        let texture_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(&device, "Texture Bind Group Layout");

        let placeholder = Self::create_texture_binding(
            &device,
            &texture_layout,
            TextureResource::create_placeholder(&device, &queue, "placeholder"),
        );

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("blinn_phong", include_str!("blinn_phong.wgsl"))?;
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default()
                .with_label("SCENE")
                .with_shader("blinn_phong")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    draw_layout.layout.clone(),
                    texture_layout.layout.clone(),
                ]),
        )?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            light_config,
            draw_uniforms,
            draw_layout,
            draw_bind_group,
            texture_layout,
            placeholder,
        })
    }

    fn create_draw_bind_group(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        uniforms: &DynamicUniformBuffer<DrawUniform>,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(layout)
            .resource(uniforms.binding_resource())
            .create(device, "Draw Bind Group")
    }

    fn create_texture_binding(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        resource: TextureResource,
    ) -> TextureBinding {
        let bind_group = BindGroupBuilder::new(layout)
            .resource(wgpu::BindingResource::TextureView(&resource.view))
            .resource(wgpu::BindingResource::Sampler(&resource.sampler))
            .create(device, "Texture Bind Group");
        TextureBinding {
            resource,
            bind_group,
        }
    }

    /// Uploads meshes and gives every texture slot a placeholder texture
    pub fn init_scene(&self, scene: &mut Scene) {
        scene.init_gpu_resources(&self.device);

        let keys: Vec<TextureKey> = scene.textures().map(|(key, _)| key).collect();
        for key in keys {
            let resource =
                TextureResource::create_placeholder(&self.device, &self.queue, "placeholder");
            let binding = Self::create_texture_binding(&self.device, &self.texture_layout, resource);
            scene.set_texture_binding(key, binding, false);
        }
    }

    /// Replaces the texture of slot `key` with a decoded image
    ///
    /// Images larger than the device allows are downscaled first. An image
    /// whose pixel buffer does not match its size keeps the placeholder.
    pub fn install_texture(&self, scene: &mut Scene, key: TextureKey, image: ImageData) {
        let max_dim = self.device.limits().max_texture_dimension_2d;
        let Some(image) = image.fit_within(max_dim) else {
            log::warn!("keeping placeholder texture: pixel data does not match image size");
            return;
        };
        let resource = TextureResource::create_from_rgba_data(
            &self.device,
            &self.queue,
            &image.data,
            image.width,
            image.height,
            &format!("Texture {key:?}"),
        );
        let binding = Self::create_texture_binding(&self.device, &self.texture_layout, resource);
        scene.set_texture_binding(key, binding, true);
    }

    /// Records and presents one frame
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame(&mut self, scene: &Scene, plan: &FramePlan) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        update_global_ubo(&mut self.global_ubo, &self.queue, plan.eye, &self.light_config);

        let uniforms: Vec<DrawUniform> = plan.draws.iter().map(|d| d.uniform).collect();
        if self.draw_uniforms.write_all(&self.device, &self.queue, &uniforms) {
            self.draw_bind_group =
                Self::create_draw_bind_group(&self.device, &self.draw_layout, &self.draw_uniforms);
        }

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(SCENE_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                for (index, draw) in plan.draws.iter().enumerate() {
                    let Some(mesh) = scene.mesh(draw.mesh) else {
                        continue;
                    };
                    let texture = draw
                        .texture
                        .and_then(|key| scene.texture_bind_group(key))
                        .unwrap_or(&self.placeholder.bind_group);

                    render_pass.set_bind_group(1, &self.draw_bind_group, &[self.draw_uniforms.offset(index)]);
                    render_pass.set_bind_group(2, texture, &[]);
                    render_pass.draw_mesh(mesh);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}
