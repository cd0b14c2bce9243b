use anyhow::Context;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes},
};

use crate::{
    config::ViewerConfig,
    controls::{command_for_key, fire_command, Command, InputController},
    gfx::{
        camera::ViewCamera,
        rendering::{FrameRenderer, RenderEngine},
        resources::TextureLoader,
        scene::{load_description, DirectorySource, Scene, SceneSource},
    },
    simulation::ProjectileSimulator,
};

/// Windowed host for the scene, the controls and the projectile simulation
pub struct MissileApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    source: Arc<DirectorySource>,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    camera: ViewCamera,
    controller: InputController,
    simulator: ProjectileSimulator,
    frame_renderer: FrameRenderer,
    texture_loader: TextureLoader,
    shift: bool,
    cursor: PhysicalPosition<f64>,
    failure: Option<anyhow::Error>,
}

impl MissileApp {
    /// Loads the scene described under `config.scene_dir`
    ///
    /// Fails when the description cannot be fetched within the load timeout
    /// or does not parse.
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let source = Arc::new(DirectorySource::new(&config.scene_dir));
        let description = load_description(source.clone(), config.load_timeout)?;
        let scene = Scene::from_description(&description, config.longitude_steps)?;

        let (width, height) = config.window_size;
        let camera = ViewCamera::new(config.view, width as f32 / height.max(1) as f32);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                source,
                window: None,
                render_engine: None,
                scene,
                camera,
                controller: InputController::new(config.rotate_theta),
                simulator: ProjectileSimulator::new(config.projectiles),
                frame_renderer: FrameRenderer::new(config.highlight_scale),
                texture_loader: TextureLoader::new(),
                shift: false,
                cursor: PhysicalPosition::new(0.0, 0.0),
                failure: None,
                config,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Failed to run event loop")?;

        match self.app_state.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.failure = Some(error);
        event_loop.exit();
    }

    fn request_textures(&mut self) {
        for (key, slot) in self.scene.textures() {
            self.texture_loader.request(key, self.source.locate(&slot.name));
        }
    }

    fn install_loaded_textures(&mut self) {
        let Some(render_engine) = self.render_engine.as_ref() else {
            return;
        };
        for loaded in self.texture_loader.drain() {
            match loaded.result {
                Ok(image) => render_engine.install_texture(&mut self.scene, loaded.key, image),
                Err(e) => log::warn!("keeping placeholder texture: {e}"),
            }
        }
    }

    fn apply(&mut self, command: Command) {
        self.controller.apply(
            command,
            &mut self.scene,
            &mut self.camera,
            &mut self.simulator,
        );
    }

    fn handle_key(&mut self, event: KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        if let Some(command) = command_for_key(code, self.shift) {
            self.apply(command);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.install_loaded_textures();

        // Planning advances the projectiles; nothing moves until the engine exists
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let plan = self.frame_renderer.plan(
            &self.scene,
            &self.camera,
            &mut self.simulator,
            self.controller.texture_mode(),
        );
        match render_engine.render_frame(&self.scene, &plan) {
            Ok(()) => {}
            Err(crate::error::RenderError::Frame(wgpu::SurfaceError::Timeout)) => {
                log::warn!("frame acquisition timed out");
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title("Missile Command")
                .with_inner_size(PhysicalSize::new(width, height)),
        ) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let light = self.config.light;
        let renderer = match pollster::block_on(RenderEngine::new(window, width, height, light)) {
            Ok(renderer) => renderer,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        renderer.init_scene(&mut self.scene);
        self.camera.resize(width, height);
        self.render_engine = Some(renderer);
        self.request_textures();

        log::info!("{:?}", self.scene.statistics());
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event),
            WindowEvent::CursorMoved { position, .. } => self.cursor = position,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let Some(window) = self.window.as_ref() else {
                    return;
                };
                if let Some(command) = fire_command(self.cursor, window.inner_size()) {
                    self.apply(command);
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
