use std::cell::RefCell;
use std::rc::Rc;

use wgpu::{Device, Queue, Surface, TextureView};

use crate::controller::input::CommandQueue;
use crate::controller::physics::PhysicsWorld;
use crate::model::{Camera, Scene};
use crate::ui;
use crate::view::render::{self, RenderState};

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub sun_dir: [f32; 3],
    pub sun_intensity: f32,
    pub ambient: f32,
    pub _pad1: f32,
    pub _pad2: f32,
    pub _pad3: f32,
}

/// One simulation frame, GPU-free so the state machine is testable headless:
/// apply the commands that arrived since the last frame, step the physics
/// world, mirror prize bodies into render positions, then advance the claw's
/// drop cycle.
pub fn advance(physics: &mut PhysicsWorld, scene: &mut Scene, commands: &mut CommandQueue) {
    for command in commands.drain() {
        command.apply(&mut scene.claw);
    }
    physics.step();
    scene.sync_from_physics(physics);
    scene.claw.advance_drop();
}

/// Frame loop state for the WASM build, re-entered once per
/// `requestAnimationFrame` tick.
pub struct FrameLoopContext {
    pub cam: Rc<RefCell<Camera>>,
    pub cam_buf: wgpu::Buffer,
    pub cam_buf_data: Rc<RefCell<CameraUniform>>,
    pub lighting_buf: wgpu::Buffer,
    pub lighting_buf_data: Rc<RefCell<LightingUniform>>,
    pub depth_view_cell: Rc<RefCell<TextureView>>,
    pub physics: Rc<RefCell<PhysicsWorld>>,
    pub scene: Rc<RefCell<Scene>>,
    pub commands: Rc<RefCell<CommandQueue>>,
    pub egui_ctx: egui::Context,
    pub egui_events: Rc<RefCell<Vec<egui::Event>>>,
    pub last_time: Rc<RefCell<f64>>,
}

impl FrameLoopContext {
    /// Advance the simulation and refresh everything the renderer reads:
    /// uniforms, per-object instances, and the egui overlay.
    pub fn update(
        &mut self,
        device: &Device,
        queue: &Queue,
        window: &web_sys::Window,
        surface: &Surface,
        render_state: &mut RenderState,
    ) {
        let now = window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now);
        let mut last = self.last_time.borrow_mut();
        let dt = ((now - *last) / 1000.0).clamp(0.0, 0.1) as f32;
        *last = now;
        drop(last);

        advance(
            &mut self.physics.borrow_mut(),
            &mut self.scene.borrow_mut(),
            &mut self.commands.borrow_mut(),
        );

        self.handle_resize(window, device, surface, render_state);

        // Camera uniform (aspect may have changed on resize)
        self.cam_buf_data.borrow_mut().view_proj =
            self.cam.borrow().view_proj().to_cols_array_2d();
        queue.write_buffer(
            &self.cam_buf,
            0,
            bytemuck::bytes_of(&*self.cam_buf_data.borrow()),
        );
        queue.write_buffer(
            &self.lighting_buf,
            0,
            bytemuck::bytes_of(&*self.lighting_buf_data.borrow()),
        );

        {
            let scene = self.scene.borrow();
            let (cubes, spheres) = render::scene_instances(&scene);
            render_state.cube_instances = cubes;
            render_state.sphere_instances = spheres;
        }

        // Build egui overlay from queued browser events
        let dpr = window.device_pixel_ratio() as f32;
        let mut raw_input = egui::RawInput::default();
        raw_input.time = Some(now / 1000.0);
        raw_input.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::new(0.0, 0.0),
            egui::vec2(
                render_state.width as f32 / dpr,
                render_state.height as f32 / dpr,
            ),
        ));
        raw_input
            .events
            .extend(self.egui_events.borrow_mut().drain(..));
        self.egui_ctx.set_pixels_per_point(dpr);

        let mut full_output = {
            let scene = self.scene.borrow();
            let mut commands = self.commands.borrow_mut();
            let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
            ui::build_ui(
                &self.egui_ctx,
                raw_input,
                &scene.claw,
                scene.prizes.len(),
                fps,
                &mut commands,
            )
        };
        let primitives = self
            .egui_ctx
            .tessellate(std::mem::take(&mut full_output.shapes), dpr);
        render_state.egui_primitives = Some(primitives);
        render_state.egui_full_output = Some(full_output);
        render_state.egui_dpr = dpr;
    }

    fn handle_resize(
        &self,
        window: &web_sys::Window,
        device: &Device,
        surface: &Surface,
        render_state: &mut RenderState,
    ) {
        if let (Ok(w), Ok(h)) = (window.inner_width(), window.inner_height()) {
            let nw = w.as_f64().unwrap_or(800.0) as u32;
            let nh = h.as_f64().unwrap_or(600.0) as u32;
            if (nw != render_state.width || nh != render_state.height) && nw > 0 && nh > 0 {
                self.cam.borrow_mut().set_aspect(nw, nh);
                render_state.width = nw;
                render_state.height = nh;

                let config = wgpu::SurfaceConfiguration {
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    format: render_state.format,
                    width: nw,
                    height: nh,
                    present_mode: wgpu::PresentMode::Fifo,
                    alpha_mode: render_state.alpha_mode,
                    view_formats: vec![],
                    desired_maximum_frame_latency: 2,
                };
                surface.configure(device, &config);

                let (_, depth_view) = render::create_depth_texture(device, nw, nh);
                *self.depth_view_cell.borrow_mut() = depth_view;
            }
        }
    }
}
