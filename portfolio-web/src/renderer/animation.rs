//! Background animation loop
//!
//! Owns the scene, the GPU state and the page-wide pointer/resize listeners.
//! Frames are chained through `request_animation_frame`; dropping the
//! `AnimationLoop` (or calling `stop`) cancels the pending frame and detaches
//! the listeners.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlCanvasElement, MouseEvent, Window};

use super::points::render_frame;
use super::state::GpuState;
use crate::config::{DomConfig, SceneConfig};
use crate::error::PortfolioError;
use crate::scene::{AmbientScene, PointerPosition, Viewport};

struct SceneRuntime {
    scene: RefCell<AmbientScene>,
    gpu: RefCell<GpuState>,
    canvas: HtmlCanvasElement,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
    stopped: Cell<bool>,
}

/// Handle to the running background. Dropping it stops the loop.
pub struct AnimationLoop {
    runtime: Rc<SceneRuntime>,
}

impl AnimationLoop {
    pub fn stop(&self) {
        if self.runtime.stopped.replace(true) {
            return;
        }
        self.runtime.frame.borrow_mut().take();
        self.runtime.listeners.borrow_mut().clear();
        log::info!("ambient scene stopped after {} frames", self.runtime.scene.borrow().frames());
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Create the background canvas inside the scene container and start animating
pub async fn mount_ambient_scene(
    window: &Window,
    document: &Document,
    dom: &DomConfig,
    config: &SceneConfig,
) -> Result<AnimationLoop, PortfolioError> {
    let container = document
        .get_element_by_id(&dom.scene_container_id)
        .ok_or_else(|| PortfolioError::MissingElement(format!("#{}", dom.scene_container_id)))?;
    let canvas = document
        .create_element("canvas")
        .map_err(PortfolioError::js)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| PortfolioError::WrongElementType("canvas".to_string(), "HtmlCanvasElement"))?;
    container.append_child(&canvas).map_err(PortfolioError::js)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scene = AmbientScene::new(config, window_viewport(window), &mut rng);
    let gpu = GpuState::new(canvas.clone(), &scene, config).await?;

    let runtime = Rc::new(SceneRuntime {
        scene: RefCell::new(scene),
        gpu: RefCell::new(gpu),
        canvas,
        frame: RefCell::new(None),
        listeners: RefCell::new(Vec::new()),
        stopped: Cell::new(false),
    });

    {
        let mut listeners = runtime.listeners.borrow_mut();
        listeners.push(pointer_listener(window, document, Rc::downgrade(&runtime)));
        listeners.push(resize_listener(window, Rc::downgrade(&runtime)));
    }
    schedule_frame(Rc::clone(&runtime));

    Ok(AnimationLoop { runtime })
}

fn schedule_frame(runtime: Rc<SceneRuntime>) {
    let next = Rc::clone(&runtime);
    let handle = request_animation_frame(move |_timestamp| {
        next.frame.borrow_mut().take();
        if next.stopped.get() {
            return;
        }
        {
            let mut scene = next.scene.borrow_mut();
            scene.advance_frame();
            render_frame(&next.gpu.borrow(), &scene);
        }
        schedule_frame(Rc::clone(&next));
    });
    *runtime.frame.borrow_mut() = Some(handle);
}

fn pointer_listener(window: &Window, document: &Document, runtime: Weak<SceneRuntime>) -> EventListener {
    let window = window.clone();
    EventListener::new(document, "mousemove", move |event: &Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
        let Some(runtime) = runtime.upgrade() else { return };

        let viewport = window_viewport(&window);
        let pointer = PointerPosition::from_client(
            event.client_x() as f32,
            event.client_y() as f32,
            viewport.width as f32,
            viewport.height as f32,
        );
        runtime.scene.borrow_mut().set_pointer(pointer);
    })
}

fn resize_listener(window: &Window, runtime: Weak<SceneRuntime>) -> EventListener {
    let source = window.clone();
    EventListener::new(window, "resize", move |_event: &Event| {
        let Some(runtime) = runtime.upgrade() else { return };

        let viewport = window_viewport(&source);
        runtime.scene.borrow_mut().resize(viewport);
        runtime.canvas.set_width(viewport.width.max(1));
        runtime.canvas.set_height(viewport.height.max(1));
        runtime.gpu.borrow_mut().resize(viewport);
    })
}

fn window_viewport(window: &Window) -> Viewport {
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
    };
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}
