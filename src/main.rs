use glam::Vec3;
use std::sync::Arc;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

// Import from the library crate
use clawbox::{controller, logging, model, ui, utils, view};

use controller::{
    advance, physics, CameraUniform, Command, CommandQueue, LightingUniform, PhysicsWorld,
};
use model::{Camera, Scene};
use view::gpu_init::GpuContext;
use view::render::{self, RenderState};

struct App {
    // Core GPU resources
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    // Rendering state
    render_state: RenderState,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Game state
    camera: Camera,
    physics: PhysicsWorld,
    scene: Scene,
    commands: CommandQueue,

    // Frame timing
    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let gpu = GpuContext::new_native(window.clone(), size.width.max(1), size.height.max(1)).await;
        let device = gpu.device.clone();
        let queue = gpu.queue.clone();
        let config = gpu.config.clone();

        // Depth texture
        let depth_format = wgpu::TextureFormat::Depth32Float;
        let (_depth_texture, depth_view) =
            render::create_depth_texture(&device, size.width.max(1), size.height.max(1));

        // Fixed camera above and in front of the play field
        let mut camera = Camera::new(size.width.max(1), size.height.max(1));
        camera.set_look_at(Vec3::ZERO);

        // Camera, lighting buffers & bind groups
        let camera_resources = render::create_camera_resources(&device);
        let camera_buffer = camera_resources.camera_buffer;
        let lighting_buffer = camera_resources.lighting_buffer;
        let camera_bgl = camera_resources.bind_group_layout;
        let camera_bind_group = camera_resources.camera_bind_group;

        let cam_buf_data = CameraUniform {
            view_proj: camera.view_proj().to_cols_array_2d(),
        };
        queue.write_buffer(&camera_buffer, 0, bytemuck::bytes_of(&cam_buf_data));

        let sun_dir = Vec3::new(5.0, 10.0, 5.0).normalize();
        let lighting_buf_data = LightingUniform {
            sun_dir: [sun_dir.x, sun_dir.y, sun_dir.z],
            sun_intensity: 1.0,
            ambient: 0.35,
            _pad1: 0.0,
            _pad2: 0.0,
            _pad3: 0.0,
        };
        queue.write_buffer(&lighting_buffer, 0, bytemuck::bytes_of(&lighting_buf_data));

        // Pipeline and meshes
        let pipeline =
            render::create_scene_pipeline(&device, config.format, &camera_bgl, depth_format);
        let cube_mesh = utils::create_cube_mesh().upload(&device);
        let sphere_mesh = utils::create_sphere_mesh(0.5, 16, 16).upload(&device);
        let instance_buffer = render::create_instance_buffer(&device);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        // Physics world, scene, and command intake
        let mut physics = PhysicsWorld::new(physics::GRAVITY);
        let scene = Scene::new(&mut physics, &mut rand::thread_rng());
        let commands = CommandQueue::default();

        let render_state = RenderState {
            format: config.format,
            alpha_mode: config.alpha_mode,
            width: size.width.max(1),
            height: size.height.max(1),
            pipeline,
            cube_mesh,
            sphere_mesh,
            instance_buffer,
            cube_instances: Vec::new(),
            sphere_instances: Vec::new(),
            egui_renderer,
            egui_primitives: None,
            egui_full_output: None,
            egui_dpr: 1.0,
        };

        Self {
            surface: gpu.surface,
            device,
            queue,
            config,
            size,
            window,
            render_state,
            depth_view,
            camera_buffer,
            camera_bind_group,
            egui_state,
            egui_ctx,
            camera,
            physics,
            scene,
            commands,
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // First let egui process the event
        let egui_captured = self
            .egui_state
            .on_window_event(self.window.as_ref(), event)
            .consumed;
        if egui_captured {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => {
                let command = match code {
                    KeyCode::ArrowLeft => Some(Command::MoveLeft),
                    KeyCode::ArrowRight => Some(Command::MoveRight),
                    KeyCode::ArrowUp => Some(Command::MoveForward),
                    KeyCode::ArrowDown => Some(Command::MoveBack),
                    KeyCode::Space => Some(Command::Drop),
                    _ => None,
                };
                match command {
                    Some(command) => {
                        self.commands.push(command);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (_depth_texture, depth_view) =
                render::create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_view = depth_view;

            self.camera.set_aspect(new_size.width, new_size.height);
            self.render_state.width = new_size.width;
            self.render_state.height = new_size.height;
        }
    }

    fn update(&mut self, dt: f32) {
        // Update FPS
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        advance(&mut self.physics, &mut self.scene, &mut self.commands);

        // Camera uniform (aspect may have changed on resize)
        let cam_buf_data = CameraUniform {
            view_proj: self.camera.view_proj().to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&cam_buf_data));

        let (cubes, spheres) = render::scene_instances(&self.scene);
        self.render_state.cube_instances = cubes;
        self.render_state.sphere_instances = spheres;
    }

    fn render(&mut self) {
        // Build the egui overlay
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let mut full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw_panels(
                ctx,
                &self.scene.claw,
                self.scene.prizes.len(),
                self.fps,
                &mut self.commands,
            );
        });
        self.egui_state.handle_platform_output(
            &self.window,
            std::mem::take(&mut full_output.platform_output),
        );

        let dpr = self.window.scale_factor() as f32;
        let primitives = self
            .egui_ctx
            .tessellate(std::mem::take(&mut full_output.shapes), dpr);
        self.render_state.egui_primitives = Some(primitives);
        self.render_state.egui_full_output = Some(full_output);
        self.render_state.egui_dpr = dpr;

        self.render_state.draw_frame(
            &self.device,
            &self.queue,
            &self.surface,
            &self.depth_view,
            &self.camera_bind_group,
        );
    }
}

fn main() {
    logging::init();

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("clawbox")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window.clone()));

    event_loop
        .run(move |event, elwt| {
            match event {
                Event::WindowEvent {
                    ref event,
                    window_id,
                } if window_id == app.window.id() => {
                    if !app.input(event) {
                        match event {
                            WindowEvent::CloseRequested => elwt.exit(),
                            WindowEvent::Resized(physical_size) => {
                                app.resize(*physical_size);
                            }
                            WindowEvent::RedrawRequested => {
                                let now = std::time::Instant::now();
                                let dt = (now - app.last_frame_time).as_secs_f32();
                                app.last_frame_time = now;

                                app.update(dt);
                                app.render();
                            }
                            _ => {}
                        }
                    }
                }
                Event::AboutToWait => {
                    app.window.request_redraw();
                }
                _ => {}
            }
        })
        .unwrap();
}
