// Re-export all public modules so they can be used from main.rs
pub mod logging;
pub mod ui;
pub mod utils;

// MVC Architecture
pub mod controller;
pub mod model;
pub mod view;

// Common imports
use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use controller::{
    physics, CameraUniform, Command, CommandQueue, FrameLoopContext, LightingUniform, PhysicsWorld,
};
use model::{Camera, Scene};
use view::render;
#[cfg(target_arch = "wasm32")]
use view::GpuContext;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init();
    let (window, document, canvas) = init_page()?;
    setup_app(&window, &document, &canvas).await
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
async fn setup_app(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    // Initialize GPU
    let gpu = GpuContext::new(canvas, canvas.width(), canvas.height())
        .await
        .map_err(|e| js_error(format!("GPU init failed: {e:?}")))?;

    let width = gpu.config.width;
    let height = gpu.config.height;

    // Fixed camera above and in front of the play field
    let cam = Rc::new(RefCell::new(Camera::new(width, height)));
    cam.borrow_mut().set_look_at(Vec3::ZERO);

    // Camera, lighting buffers & bind groups
    let camera_resources = render::create_camera_resources(gpu.device.as_ref());
    let cam_buf = camera_resources.camera_buffer;
    let cam_bgl = camera_resources.bind_group_layout;
    let cam_bg = camera_resources.camera_bind_group;
    let lighting_buf = camera_resources.lighting_buffer;

    let cam_buf_data = Rc::new(RefCell::new(CameraUniform {
        view_proj: cam.borrow().view_proj().to_cols_array_2d(),
    }));
    gpu.queue
        .as_ref()
        .write_buffer(&cam_buf, 0, bytemuck::bytes_of(&*cam_buf_data.borrow()));

    // One white directional light, offset above the field
    let sun_dir = Vec3::new(5.0, 10.0, 5.0).normalize();
    let lighting_buf_data = Rc::new(RefCell::new(LightingUniform {
        sun_dir: [sun_dir.x, sun_dir.y, sun_dir.z],
        sun_intensity: 1.0,
        ambient: 0.35,
        _pad1: 0.0,
        _pad2: 0.0,
        _pad3: 0.0,
    }));
    gpu.queue.as_ref().write_buffer(
        &lighting_buf,
        0,
        bytemuck::bytes_of(&*lighting_buf_data.borrow()),
    );

    // Depth texture
    let depth_format = wgpu::TextureFormat::Depth32Float;
    let (_depth_tex, depth_view) = render::create_depth_texture(gpu.device.as_ref(), width, height);
    let depth_view_cell = Rc::new(RefCell::new(depth_view));

    // Pipeline and meshes
    let pipeline =
        render::create_scene_pipeline(gpu.device.as_ref(), gpu.format, &cam_bgl, depth_format);
    let cube_mesh = utils::create_cube_mesh().upload(gpu.device.as_ref());
    let sphere_mesh = utils::create_sphere_mesh(0.5, 16, 16).upload(gpu.device.as_ref());
    let instance_buffer = render::create_instance_buffer(gpu.device.as_ref());

    // Physics world, scene, and command intake
    let physics = Rc::new(RefCell::new(PhysicsWorld::new(physics::GRAVITY)));
    let scene = Rc::new(RefCell::new(Scene::new(
        &mut physics.borrow_mut(),
        &mut rand::thread_rng(),
    )));
    let commands = Rc::new(RefCell::new(CommandQueue::default()));
    let egui_events: Rc<RefCell<Vec<egui::Event>>> = Rc::new(RefCell::new(Vec::new()));

    // egui setup
    let egui_ctx = egui::Context::default();
    let egui_renderer = egui_wgpu::Renderer::new(
        gpu.device.as_ref(),
        gpu.format,
        egui_wgpu::RendererOptions::default(),
    );

    setup_input_listeners(document, commands.clone(), egui_events.clone())?;

    let mut render_state = render::RenderState {
        format: gpu.format,
        alpha_mode: gpu.config.alpha_mode,
        width,
        height,
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

    let mut frame_ctx = FrameLoopContext {
        cam: cam.clone(),
        cam_buf,
        cam_buf_data,
        lighting_buf,
        lighting_buf_data,
        depth_view_cell,
        physics,
        scene,
        commands,
        egui_ctx,
        egui_events,
        last_time: Rc::new(RefCell::new(
            window.performance().map(|p| p.now()).unwrap_or(0.0),
        )),
    };

    tracing::info!("scene ready, entering frame loop");

    // Continuous redraw using requestAnimationFrame
    let f = RcCellCallback::new(window.clone(), {
        let window_for_loop = window.clone();

        move || {
            frame_ctx.update(
                gpu.device.as_ref(),
                gpu.queue.as_ref(),
                &window_for_loop,
                &gpu.surface,
                &mut render_state,
            );

            let dv = frame_ctx.depth_view_cell.borrow();
            render_state.draw_frame(
                gpu.device.as_ref(),
                gpu.queue.as_ref(),
                &gpu.surface,
                &dv,
                &cam_bg,
            );
        }
    });
    f.start();

    Ok(())
}

/// Wire every input source to the shared command queue: keyboard, the five
/// DOM buttons, and pointer events for the egui overlay.
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    document: &Document,
    commands: Rc<RefCell<CommandQueue>>,
    egui_events: Rc<RefCell<Vec<egui::Event>>>,
) -> Result<(), JsValue> {
    // Keyboard
    {
        let commands = commands.clone();
        let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            if let Some(command) = Command::from_key(&e.key()) {
                e.prevent_default();
                commands.borrow_mut().push(command);
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // On-screen buttons, one per command
    for (id, command) in [
        ("left", Command::MoveLeft),
        ("right", Command::MoveRight),
        ("forward", Command::MoveForward),
        ("back", Command::MoveBack),
        ("drop", Command::Drop),
    ] {
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| js_error(format!("missing #{id} control")))?;
        let commands = commands.clone();
        let click = Closure::wrap(Box::new(move |_e: MouseEvent| {
            commands.borrow_mut().push(command);
        }) as Box<dyn FnMut(MouseEvent)>);
        element.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        click.forget();
    }

    // Pointer events for the egui overlay
    {
        let egui_events = egui_events.clone();
        let mm = Closure::wrap(Box::new(move |e: MouseEvent| {
            let pos = egui::pos2(e.client_x() as f32, e.client_y() as f32);
            egui_events.borrow_mut().push(egui::Event::PointerMoved(pos));
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback("mousemove", mm.as_ref().unchecked_ref())?;
        mm.forget();
    }
    for (event_name, pressed) in [("mousedown", true), ("mouseup", false)] {
        let egui_events = egui_events.clone();
        let cb = Closure::wrap(Box::new(move |e: MouseEvent| {
            if e.button() == 0 {
                egui_events.borrow_mut().push(egui::Event::PointerButton {
                    pos: egui::pos2(e.client_x() as f32, e.client_y() as f32),
                    button: egui::PointerButton::Primary,
                    pressed,
                    modifiers: egui::Modifiers::default(),
                });
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback(event_name, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}

/// Build the page: a window-sized canvas plus the control pad.
#[cfg(target_arch = "wasm32")]
fn init_page() -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
    let window = web_sys::window().ok_or(js_error("no global `window`"))?;
    let document = window.document().ok_or(js_error("no document on window"))?;
    let body = document.body().ok_or(js_error("no body on document"))?;

    let width = window.inner_width()?.as_f64().unwrap_or(800.0) as u32;
    let height = window.inner_height()?.as_f64().unwrap_or(600.0) as u32;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error("failed to create canvas"))?;
    canvas.set_width(width.max(1));
    canvas.set_height(height.max(1));
    body.append_child(&canvas)?;

    let controls = document.create_element("div")?;
    controls.set_attribute("id", "controls")?;
    controls.set_attribute(
        "style",
        "position:fixed;bottom:16px;left:50%;transform:translateX(-50%);display:flex;gap:8px;",
    )?;
    for (id, label) in [
        ("left", "<"),
        ("forward", "^"),
        ("back", "v"),
        ("right", ">"),
        ("drop", "Drop"),
    ] {
        let button = document.create_element("button")?;
        button.set_attribute("id", id)?;
        button.set_text_content(Some(label));
        controls.append_child(&button)?;
    }
    body.append_child(&controls)?;

    Ok((window, document, canvas))
}

#[cfg(target_arch = "wasm32")]
fn js_error<E: Into<String>>(msg: E) -> JsValue {
    JsValue::from_str(&msg.into())
}

struct RcCellCallback {
    inner: Rc<RefCell<Box<dyn FnMut()>>>,
    window: Window,
}

impl RcCellCallback {
    fn new(window: Window, f: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(f))),
            window,
        }
    }

    fn start(self) {
        let inner = self.inner.clone();
        let window = self.window.clone();

        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
        let callback_clone = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            inner.borrow_mut().as_mut()();

            // Recursively schedule next frame
            let cb_ref = callback_clone.borrow();
            window
                .request_animation_frame(cb_ref.as_ref().unwrap().as_ref().unchecked_ref())
                .expect("RAF failed");
        }) as Box<dyn FnMut()>));

        self.window
            .request_animation_frame(callback.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .expect("RAF start failed");

        // Leak the closure to keep it alive
        std::mem::forget(callback);
    }
}
