/// Vitrine Web - WebGL 2 host for the showroom scene
///
/// Owns the canvas, the render loop and the DOM event wiring. Everything
/// drawn comes from `vitrine-core`.

mod backend;
mod logger;
mod shader;
mod texture;

pub use backend::{GlBuffers, WebGlBackend};
pub use shader::{compile_shader, link_program, ProgramLocations};
pub use texture::load_texture;

use std::cell::RefCell;
use std::rc::Rc;

use log::LevelFilter;
use vitrine_core::{
    props, AnimationController, AnimationPhase, InputEvent, RenderError, Scene, SceneConfig,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, HtmlCanvasElement, HtmlElement, MouseEvent, WebGl2RenderingContext,
    WheelEvent, Window,
};

pub const TOGGLE_BUTTON_ID: &str = "toggleAnimation";

const START_LABEL: &str = "Start Animation";
const STOP_LABEL: &str = "Stop Animation";

/// State shared by the frame callback and the event listeners.
struct App {
    scene: Scene<WebGlBackend>,
    animation: AnimationController,
    canvas: HtmlCanvasElement,
    toggle_button: Option<HtmlElement>,
}

impl App {
    fn frame(&mut self, now: f64) {
        if self.animation.is_running()
            && self.scene.tick_animation(&mut self.animation, now) == AnimationPhase::Done
        {
            self.update_label();
        }
        self.scene.render_frame();
    }

    fn toggle_animation(&mut self, now: f64) {
        self.animation.toggle(now);
        self.update_label();
    }

    fn update_label(&self) {
        if let Some(button) = &self.toggle_button {
            let label = if self.animation.is_running() {
                STOP_LABEL
            } else {
                START_LABEL
            };
            button.set_text_content(Some(label));
        }
    }

    /// Match the drawing buffer to the canvas' displayed size.
    fn fit_canvas(&mut self) {
        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        if width == 0 || height == 0 {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.scene.handle_input(InputEvent::Resize { width, height });
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn now(window: &Window) -> f64 {
    window.performance().map_or(0.0, |performance| performance.now())
}

fn to_js(err: RenderError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logger::init(LevelFilter::Info);
}

/// Build the showroom on the canvas with id `canvas_id` and render it until
/// the page closes.
#[wasm_bindgen]
pub fn start(canvas_id: &str) -> Result<(), JsValue> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("canvas #{} not found", canvas_id)))?
        .dyn_into()?;

    let gl = match canvas.get_context("webgl2")? {
        Some(context) => context.dyn_into::<WebGl2RenderingContext>()?,
        None => {
            let err = RenderError::DeviceUnavailable("WebGL 2 is not supported".to_string());
            log::error!("{}", err);
            window.alert_with_message(
                "Unable to initialize WebGL. Your browser may not support it.",
            )?;
            return Err(to_js(err));
        }
    };

    let config = SceneConfig::default();
    let backend = WebGlBackend::new(gl, config.lighting.clear_color);
    let width = canvas.width();
    let height = canvas.height();
    let mut scene = Scene::new(backend, &config, width, height);

    let placed = props::populate(&mut scene).map_err(to_js)?;
    let animation = AnimationController::from_config(placed.bottle, &config.animation);

    let toggle_button = document
        .get_element_by_id(TOGGLE_BUTTON_ID)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());
    if toggle_button.is_none() {
        log::warn!("No #{} button; animation cannot be started", TOGGLE_BUTTON_ID);
    }

    let app = Rc::new(RefCell::new(App {
        scene,
        animation,
        canvas,
        toggle_button,
    }));
    app.borrow_mut().fit_canvas();
    app.borrow().update_label();

    attach_listeners(&window, &app)?;
    run_frame_loop(window, app)?;

    log::info!("Showroom running on #{}", canvas_id);
    Ok(())
}

fn attach_listeners(window: &Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let canvas = app.borrow().canvas.clone();

    let state = app.clone();
    let on_mouse_down = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        event.prevent_default();
        let (x, y) = (event.client_x() as f32, event.client_y() as f32);
        state
            .borrow_mut()
            .scene
            .handle_input(InputEvent::PointerDown { x, y });
    });
    canvas.add_event_listener_with_callback("mousedown", on_mouse_down.as_ref().unchecked_ref())?;
    on_mouse_down.forget();

    let state = app.clone();
    let on_mouse_up = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
        state.borrow_mut().scene.handle_input(InputEvent::PointerUp);
    });
    window.add_event_listener_with_callback("mouseup", on_mouse_up.as_ref().unchecked_ref())?;
    on_mouse_up.forget();

    let state = app.clone();
    let on_mouse_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let (x, y) = (event.client_x() as f32, event.client_y() as f32);
        state
            .borrow_mut()
            .scene
            .handle_input(InputEvent::PointerMove { x, y });
    });
    window.add_event_listener_with_callback("mousemove", on_mouse_move.as_ref().unchecked_ref())?;
    on_mouse_move.forget();

    let state = app.clone();
    let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
        event.prevent_default();
        let delta_y = event.delta_y() as f32;
        state
            .borrow_mut()
            .scene
            .handle_input(InputEvent::Wheel { delta_y });
    });
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    canvas.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        on_wheel.as_ref().unchecked_ref(),
        &options,
    )?;
    on_wheel.forget();

    let state = app.clone();
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        state.borrow_mut().fit_canvas();
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    let button = app.borrow().toggle_button.clone();
    if let Some(button) = button {
        let state = app.clone();
        let clock = window.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            state.borrow_mut().toggle_animation(now(&clock));
        });
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    Ok(())
}

/// Schedule `App::frame` on every display refresh.
fn run_frame_loop(window: Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let handle = callback.clone();
    let scheduler = window.clone();

    *handle.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        app.borrow_mut().frame(timestamp);

        if let Some(next) = callback.borrow().as_ref() {
            if let Err(err) = scheduler.request_animation_frame(next.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", err);
            }
        }
    }));

    if let Some(first) = handle.borrow().as_ref() {
        window.request_animation_frame(first.as_ref().unchecked_ref())?;
    }
    Ok(())
}
