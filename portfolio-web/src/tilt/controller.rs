//! Pointer listeners for every tiltable element

use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

use super::transform::TiltTransform;
use crate::config::TiltConfig;
use crate::error::PortfolioError;

/// Owns the listeners; dropping it detaches them
pub struct TiltController {
    listeners: Vec<EventListener>,
    elements: usize,
}

impl TiltController {
    /// Attach to every element matching `selector`. Matching nothing is not an error.
    pub fn attach(
        document: &Document,
        selector: &str,
        config: TiltConfig,
    ) -> Result<Self, PortfolioError> {
        let nodes = document
            .query_selector_all(selector)
            .map_err(PortfolioError::js)?;
        let config = Rc::new(config);

        let mut listeners = Vec::new();
        let mut elements = 0;
        for i in 0..nodes.length() {
            let Some(node) = nodes.item(i) else { continue };
            let Ok(element) = node.dyn_into::<HtmlElement>() else {
                log::warn!("'{}' match {} is not an HTML element, skipping", selector, i);
                continue;
            };

            listeners.push(Self::move_listener(&element, Rc::clone(&config)));
            listeners.push(Self::leave_listener(&element, Rc::clone(&config)));
            elements += 1;
        }

        log::info!("tilt attached to {} element(s)", elements);
        Ok(Self { listeners, elements })
    }

    pub fn element_count(&self) -> usize {
        self.elements
    }

    pub fn detach(&mut self) {
        self.listeners.clear();
    }

    fn move_listener(element: &HtmlElement, config: Rc<TiltConfig>) -> EventListener {
        let target = element.clone();
        EventListener::new(element, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else { return };

            let rect = target.get_bounding_client_rect();
            let x = event.client_x() as f32 - rect.left() as f32;
            let y = event.client_y() as f32 - rect.top() as f32;
            let width = target.client_width() as f32;
            let height = target.client_height() as f32;

            let transform = TiltTransform::from_pointer(x, y, width, height, &config);
            apply(&target, &transform);
        })
    }

    fn leave_listener(element: &HtmlElement, config: Rc<TiltConfig>) -> EventListener {
        let target = element.clone();
        EventListener::new(element, "mouseleave", move |_event: &Event| {
            apply(&target, &TiltTransform::resting(&config));
        })
    }
}

fn apply(element: &HtmlElement, transform: &TiltTransform) {
    if let Err(e) = element.style().set_property("transform", &transform.to_css()) {
        log::warn!("failed to set tilt transform: {:?}", e);
    }
}
