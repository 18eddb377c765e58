//! Browser implementations of the session traits and the page wiring

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Event, HtmlCanvasElement, HtmlElement, HtmlVideoElement};

use super::session::{HandTrackingSession, PipelineFactory, SessionState, SessionUi, TrackingPipeline};
use crate::bridge::{create_camera, hands_from_results, Camera, HandDetector};
use crate::config::{DomConfig, HandTrackingConfig};
use crate::error::PortfolioError;
use crate::renderer::{OverlayPainter, OverlayStyle};

pub type WebSession = HandTrackingSession<WebPipelineFactory, WebSessionUi>;

// ============================================================================
// PIPELINE
// ============================================================================

/// Webcam feeding MediaPipe Hands, results painted onto the overlay canvas
pub struct WebPipeline {
    camera: Camera,
    _detector: Rc<HandDetector>,
    _on_frame: Closure<dyn FnMut() -> Promise>,
    session: Weak<RefCell<WebSession>>,
}

impl TrackingPipeline for WebPipeline {
    fn start(&mut self) {
        let started = JsFuture::from(self.camera.start());
        let session = self.session.clone();
        spawn_local(async move {
            if let Err(e) = started.await {
                let reason = e.as_string().unwrap_or_else(|| format!("camera unavailable: {:?}", e));
                if let Some(session) = session.upgrade() {
                    session.borrow_mut().fail(&reason);
                }
            }
        });
    }

    fn stop(&mut self) {
        let stopped = JsFuture::from(self.camera.stop());
        spawn_local(async move {
            if let Err(e) = stopped.await {
                log::warn!("camera did not stop cleanly: {:?}", e);
            }
        });
    }
}

pub struct WebPipelineFactory {
    config: HandTrackingConfig,
    video: HtmlVideoElement,
    painter: Rc<OverlayPainter>,
    session: Weak<RefCell<WebSession>>,
}

impl PipelineFactory for WebPipelineFactory {
    type Pipeline = WebPipeline;

    fn build(&mut self) -> Result<WebPipeline, PortfolioError> {
        let painter = Rc::clone(&self.painter);
        let detector = Rc::new(HandDetector::new(&self.config, move |results: JsValue| {
            let image = js_sys::Reflect::get(&results, &JsValue::from_str("image"))
                .unwrap_or(JsValue::UNDEFINED);
            let hands = hands_from_results(&results);
            painter.paint(&image, &hands);
        })?);

        let frame_detector = Rc::clone(&detector);
        let video = self.video.clone();
        let on_frame = Closure::<dyn FnMut() -> Promise>::new(move || {
            frame_detector.send_image(video.as_ref())
        });
        let camera = create_camera(&self.video, &self.config, &on_frame)?;

        Ok(WebPipeline {
            camera,
            _detector: detector,
            _on_frame: on_frame,
            session: self.session.clone(),
        })
    }
}

// ============================================================================
// UI
// ============================================================================

pub struct WebSessionUi {
    overlay: HtmlElement,
    toggle: HtmlElement,
    status: Option<HtmlElement>,
    active_class: String,
    idle_label: String,
    busy_label: String,
    pending_hide: Option<Timeout>,
}

impl WebSessionUi {
    fn set_status(&self, text: &str) {
        if let Some(status) = &self.status {
            status.set_text_content(Some(text));
        }
    }
}

impl SessionUi for WebSessionUi {
    fn show_overlay(&mut self) {
        self.set_status("");
        if let Err(e) = self.overlay.class_list().add_1(&self.active_class) {
            log::warn!("failed to show overlay: {:?}", e);
        }
    }

    fn hide_overlay(&mut self) {
        if let Err(e) = self.overlay.class_list().remove_1(&self.active_class) {
            log::warn!("failed to hide overlay: {:?}", e);
        }
    }

    fn show_busy_toggle(&mut self) {
        self.toggle.set_text_content(Some(&self.busy_label));
    }

    fn schedule_toggle_hide(&mut self, delay_ms: u32) {
        let toggle = self.toggle.clone();
        let timeout = Timeout::new(delay_ms, move || {
            let _ = toggle.style().set_property("display", "none");
        });
        self.pending_hide = Some(timeout);
    }

    fn restore_toggle(&mut self) {
        // Dropping the pending timeout cancels it
        self.pending_hide.take();
        let _ = self.toggle.style().remove_property("display");
        self.toggle.set_text_content(Some(&self.idle_label));
    }

    fn show_error(&mut self, message: &str) {
        self.set_status(message);
    }
}

// ============================================================================
// PAGE WIRING
// ============================================================================

/// Hand tracking mounted on the page: the session plus its button listeners
pub struct HandTracking {
    session: Rc<RefCell<WebSession>>,
    _listeners: Vec<EventListener>,
}

impl HandTracking {
    pub fn open(&self) -> Result<bool, PortfolioError> {
        self.session.borrow_mut().activate()
    }

    pub fn close(&self) -> bool {
        self.session.borrow_mut().deactivate()
    }

    pub fn toggle(&self) -> Result<SessionState, PortfolioError> {
        self.session.borrow_mut().toggle()
    }

    pub fn is_active(&self) -> bool {
        self.session.borrow().is_active()
    }
}

fn element<T: JsCast>(document: &Document, id: &str, kind: &'static str) -> Result<T, PortfolioError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| PortfolioError::MissingElement(format!("#{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| PortfolioError::WrongElementType(format!("#{}", id), kind))
}

/// Look up the overlay elements and wire the toggle and close buttons.
///
/// Returns `Ok(None)` when the page has no toggle button: hand tracking is optional.
pub fn mount_hand_tracking(
    document: &Document,
    dom: &DomConfig,
    config: &HandTrackingConfig,
) -> Result<Option<HandTracking>, PortfolioError> {
    if document.get_element_by_id(&dom.hand_toggle_id).is_none() {
        log::info!("no #{} on page, hand tracking disabled", dom.hand_toggle_id);
        return Ok(None);
    }

    let toggle: HtmlElement = element(document, &dom.hand_toggle_id, "HtmlElement")?;
    let overlay: HtmlElement = element(document, &dom.hand_overlay_id, "HtmlElement")?;
    let canvas: HtmlCanvasElement = element(document, &dom.hand_canvas_id, "HtmlCanvasElement")?;
    let video: HtmlVideoElement = element(document, &dom.hand_video_id, "HtmlVideoElement")?;
    let close: Option<HtmlElement> = element(document, &dom.hand_close_id, "HtmlElement").ok();
    let status: Option<HtmlElement> = element(document, &dom.hand_status_id, "HtmlElement").ok();

    let painter = Rc::new(OverlayPainter::new(canvas, OverlayStyle::from(config))?);
    toggle.set_text_content(Some(&config.idle_label));

    let ui = WebSessionUi {
        overlay,
        toggle: toggle.clone(),
        status,
        active_class: dom.active_class.clone(),
        idle_label: config.idle_label.clone(),
        busy_label: config.busy_label.clone(),
        pending_hide: None,
    };

    let session = Rc::new_cyclic(|weak: &Weak<RefCell<WebSession>>| {
        let factory = WebPipelineFactory {
            config: config.clone(),
            video,
            painter,
            session: weak.clone(),
        };
        RefCell::new(HandTrackingSession::new(factory, ui, config))
    });

    let mut listeners = Vec::new();
    let on_toggle = Rc::downgrade(&session);
    listeners.push(EventListener::new(&toggle, "click", move |_event: &Event| {
        let Some(session) = on_toggle.upgrade() else { return };
        // Activation errors are already shown in the status line
        let _ = session.borrow_mut().activate();
    }));
    if let Some(close) = close {
        let on_close = Rc::downgrade(&session);
        listeners.push(EventListener::new(&close, "click", move |_event: &Event| {
            if let Some(session) = on_close.upgrade() {
                session.borrow_mut().deactivate();
            }
        }));
    }

    Ok(Some(HandTracking {
        session,
        _listeners: listeners,
    }))
}
