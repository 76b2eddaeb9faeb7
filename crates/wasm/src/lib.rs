//! Browser host for the point field.
//!
//! Mounts an [`Animator`] on a `<canvas>` element: a fixed-rate interval
//! drives updates, an animation-frame loop drives drawing (split schedule
//! only), and window resizes re-fit the canvas to its layout box. Each
//! [`mount`] returns a [`Background`] handle that owns its timers, so
//! several backgrounds can run side by side and each can be stopped.

#![cfg(target_arch = "wasm32")]

use live_background_core::{Animator, PointField, Srgb, Surface};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

const DEFAULT_CANVAS_ID: &str = "background-canvas";
const DEFAULT_PRESET: &str = "orbital";

/// [`Surface`] over a 2D rendering context. Styles are mirrored locally
/// so reads never round-trip through JS.
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    fill_style: Srgb,
    stroke_style: Srgb,
}

impl CanvasSurface {
    fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let mut surface = Self {
            canvas,
            context,
            fill_style: Srgb::BLACK,
            stroke_style: Srgb::BLACK,
        };
        surface.set_fill_style(Srgb::BLACK);
        surface.set_stroke_style(Srgb::BLACK);
        Ok(surface)
    }

    /// Matches the backing store to the element's layout size.
    /// Setting the size resets context state, so styles are re-applied.
    fn fit_to_layout(&mut self) -> (f64, f64) {
        let width = self.canvas.offset_width().max(0) as u32;
        let height = self.canvas.offset_height().max(0) as u32;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.set_fill_style(self.fill_style);
        self.set_stroke_style(self.stroke_style);
        (width as f64, height as f64)
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        // Throws only for a negative radius.
        if let Err(e) = self.context.arc(x, y, radius, start_angle, end_angle) {
            warn!(?e, radius, "arc rejected");
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn fill_style(&self) -> Srgb {
        self.fill_style
    }

    fn set_fill_style(&mut self, color: Srgb) {
        self.fill_style = color;
        self.context.set_fill_style_str(&color.to_css());
    }

    fn stroke_style(&self) -> Srgb {
        self.stroke_style
    }

    fn set_stroke_style(&mut self, color: Srgb) {
        self.stroke_style = color;
        self.context.set_stroke_style_str(&color.to_css());
    }
}

/// Everything the browser callbacks share.
struct Host {
    animator: Animator<PointField>,
    surface: CanvasSurface,
}

type SharedHost = Rc<RefCell<Host>>;

thread_local! {
    /// The background started by [`start`], kept alive until [`stop`].
    static DEFAULT_BACKGROUND: RefCell<Option<Background>> = const { RefCell::new(None) };
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// A mounted background. Stopping or dropping it cancels the update
/// interval and the resize listener; the frame loop ends on its next frame.
#[wasm_bindgen]
pub struct Background {
    window: Window,
    host: SharedHost,
    interval: Option<i32>,
    /// Kept alive while the interval may still fire.
    _on_tick: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut(JsValue)>,
}

#[wasm_bindgen]
impl Background {
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.host.borrow().animator.is_running()
    }

    pub fn stop(&mut self) {
        let Some(interval) = self.interval.take() else {
            return;
        };
        self.host.borrow_mut().animator.stop();
        self.window.clear_interval_with_handle(interval);
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
        {
            warn!(?e, "resize listener removal failed");
        }
        info!("background stopped");
    }
}

impl Drop for Background {
    fn drop(&mut self) {
        self.stop();
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let background = mount(DEFAULT_CANVAS_ID, DEFAULT_PRESET, "{}")?;
    DEFAULT_BACKGROUND.with(|slot| *slot.borrow_mut() = Some(background));
    Ok(())
}

/// Stops the background started on page load.
#[wasm_bindgen]
pub fn stop() {
    if let Some(mut background) = DEFAULT_BACKGROUND.with(|slot| slot.borrow_mut().take()) {
        background.stop();
    }
}

/// Starts a background on the canvas with id `canvas_id`.
///
/// `params` is a JSON object of overrides on top of `preset`. The returned
/// handle owns the timers; keep it alive for as long as the background runs.
#[wasm_bindgen]
pub fn mount(canvas_id: &str, preset: &str, params: &str) -> Result<Background, JsValue> {
    let window = window()?;
    let canvas = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()?;

    let params: serde_json::Value =
        serde_json::from_str(params).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let mut surface = CanvasSurface::new(canvas)?;
    let (width, height) = surface.fit_to_layout();
    let seed = js_sys::Date::now() as u64;
    let field = PointField::from_preset(preset, width, height, seed, &params)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    info!(preset, width, height, points = field.points().len(), "mounted background");

    let host: SharedHost = Rc::new(RefCell::new(Host {
        animator: Animator::for_field(field),
        surface,
    }));

    let on_resize = resize_listener(host.clone());
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

    let on_tick = tick_callback(host.clone());
    let interval_ms = host.borrow().animator.tick_interval_ms().round().max(1.0) as i32;
    let interval = window.set_interval_with_callback_and_timeout_and_arguments_0(
        on_tick.as_ref().unchecked_ref(),
        interval_ms,
    )?;

    let background = Background {
        window: window.clone(),
        host: host.clone(),
        interval: Some(interval),
        _on_tick: on_tick,
        on_resize,
    };
    if host.borrow().animator.wants_frames() {
        install_frame_loop(&window, host)?;
    }
    Ok(background)
}

fn resize_listener(host: SharedHost) -> Closure<dyn FnMut(JsValue)> {
    Closure::wrap(Box::new(move |_| {
        let mut host = host.borrow_mut();
        let Host { animator, surface } = &mut *host;
        if !animator.is_running() {
            return;
        }
        let (width, height) = surface.fit_to_layout();
        if let Err(e) = animator.on_resize(width, height) {
            warn!(%e, width, height, "resize ignored");
        }
    }) as Box<dyn FnMut(JsValue)>)
}

fn tick_callback(host: SharedHost) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let mut host = host.borrow_mut();
        let Host { animator, surface } = &mut *host;
        animator.on_tick(surface);
    }) as Box<dyn FnMut()>)
}

/// Self-rescheduling `requestAnimationFrame` callback. Stops rescheduling
/// once the animator is stopped and releases itself.
fn install_frame_loop(window: &Window, host: SharedHost) -> Result<(), JsValue> {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let loop_window = window.clone();

    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let running = {
            let mut host = host.borrow_mut();
            let Host { animator, surface } = &mut *host;
            animator.on_frame(surface);
            animator.is_running()
        };
        if !running {
            return;
        }
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(e) = loop_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                warn!(?e, "animation frame request failed");
            }
        }
    }) as Box<dyn FnMut()>));

    let first = slot.borrow();
    let callback = first
        .as_ref()
        .ok_or_else(|| JsValue::from_str("frame callback missing"))?;
    window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    Ok(())
}
