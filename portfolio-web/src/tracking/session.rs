//! Hand-tracking session lifecycle
//!
//! Idle → Active on explicit activation, Active → Idle on explicit close.
//! The capture+detector pipeline is built lazily on the first activation and
//! reused afterwards. Closing only hides the overlay unless the session was
//! configured to release the camera.

use crate::config::HandTrackingConfig;
use crate::error::PortfolioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// A running (or resumable) webcam → detector pipeline
pub trait TrackingPipeline {
    /// Begin streaming frames. Failures that surface later are reported through `HandTrackingSession::fail`.
    fn start(&mut self);

    fn stop(&mut self);
}

/// Builds the pipeline on first activation
pub trait PipelineFactory {
    type Pipeline: TrackingPipeline;

    fn build(&mut self) -> Result<Self::Pipeline, PortfolioError>;
}

/// Visible controls the session drives
pub trait SessionUi {
    fn show_overlay(&mut self);
    fn hide_overlay(&mut self);
    /// Swap the toggle's label for the in-progress indicator
    fn show_busy_toggle(&mut self);
    /// Hide the toggle once `delay_ms` has passed, unless restored first
    fn schedule_toggle_hide(&mut self, delay_ms: u32);
    /// Bring back the toggle with its idle label, cancelling a pending hide
    fn restore_toggle(&mut self);
    fn show_error(&mut self, message: &str);
}

pub struct HandTrackingSession<F: PipelineFactory, U: SessionUi> {
    state: SessionState,
    factory: F,
    pipeline: Option<F::Pipeline>,
    ui: U,
    hide_toggle_delay_ms: u32,
    release_camera_on_close: bool,
}

impl<F: PipelineFactory, U: SessionUi> HandTrackingSession<F, U> {
    pub fn new(factory: F, ui: U, config: &HandTrackingConfig) -> Self {
        Self {
            state: SessionState::Idle,
            factory,
            pipeline: None,
            ui,
            hide_toggle_delay_ms: config.hide_toggle_delay_ms,
            release_camera_on_close: config.release_camera_on_close,
        }
    }

    /// Open the overlay and start tracking. Returns false when already active.
    pub fn activate(&mut self) -> Result<bool, PortfolioError> {
        if self.state == SessionState::Active {
            return Ok(false);
        }

        let pipeline = match self.pipeline.take() {
            Some(pipeline) => pipeline,
            None => match self.factory.build() {
                Ok(pipeline) => {
                    log::info!("hand tracking pipeline created");
                    pipeline
                }
                Err(e) => {
                    log::error!("hand tracking unavailable: {}", e);
                    self.ui.show_error(&e.to_string());
                    return Err(e);
                }
            },
        };
        let pipeline = self.pipeline.insert(pipeline);
        pipeline.start();

        self.ui.show_overlay();
        self.ui.show_busy_toggle();
        self.ui.schedule_toggle_hide(self.hide_toggle_delay_ms);
        self.state = SessionState::Active;
        Ok(true)
    }

    /// Close the overlay. Returns false when already idle.
    pub fn deactivate(&mut self) -> bool {
        if self.state == SessionState::Idle {
            return false;
        }

        if self.release_camera_on_close {
            if let Some(pipeline) = self.pipeline.as_mut() {
                pipeline.stop();
            }
        }
        self.ui.hide_overlay();
        self.ui.restore_toggle();
        self.state = SessionState::Idle;
        true
    }

    /// The pipeline could not start (e.g. camera permission denied): go back to Idle and say why
    pub fn fail(&mut self, reason: &str) {
        log::warn!("hand tracking failed: {}", reason);
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.stop();
        }
        self.ui.hide_overlay();
        self.ui.restore_toggle();
        self.ui.show_error(reason);
        self.state = SessionState::Idle;
    }

    pub fn toggle(&mut self) -> Result<SessionState, PortfolioError> {
        match self.state {
            SessionState::Idle => {
                self.activate()?;
            }
            SessionState::Active => {
                self.deactivate();
            }
        }
        Ok(self.state)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        builds: Cell<usize>,
        starts: Cell<usize>,
        stops: Cell<usize>,
    }

    struct FakePipeline(Rc<Counters>);

    impl TrackingPipeline for FakePipeline {
        fn start(&mut self) {
            self.0.starts.set(self.0.starts.get() + 1);
        }
        fn stop(&mut self) {
            self.0.stops.set(self.0.stops.get() + 1);
        }
    }

    struct FakeFactory {
        counters: Rc<Counters>,
        fail: bool,
    }

    impl PipelineFactory for FakeFactory {
        type Pipeline = FakePipeline;

        fn build(&mut self) -> Result<FakePipeline, PortfolioError> {
            if self.fail {
                return Err(PortfolioError::TrackingUnavailable("no Hands global".to_string()));
            }
            self.counters.builds.set(self.counters.builds.get() + 1);
            Ok(FakePipeline(Rc::clone(&self.counters)))
        }
    }

    #[derive(Default)]
    struct FakeUi {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl SessionUi for FakeUi {
        fn show_overlay(&mut self) {
            self.events.borrow_mut().push("show_overlay".into());
        }
        fn hide_overlay(&mut self) {
            self.events.borrow_mut().push("hide_overlay".into());
        }
        fn show_busy_toggle(&mut self) {
            self.events.borrow_mut().push("busy".into());
        }
        fn schedule_toggle_hide(&mut self, delay_ms: u32) {
            self.events.borrow_mut().push(format!("hide_toggle_in_{}", delay_ms));
        }
        fn restore_toggle(&mut self) {
            self.events.borrow_mut().push("restore".into());
        }
        fn show_error(&mut self, message: &str) {
            self.events.borrow_mut().push(format!("error:{}", message));
        }
    }

    type Session = HandTrackingSession<FakeFactory, FakeUi>;

    fn session(config: &HandTrackingConfig) -> (Session, Rc<Counters>, Rc<RefCell<Vec<String>>>) {
        let counters = Rc::new(Counters::default());
        let ui = FakeUi::default();
        let events = Rc::clone(&ui.events);
        let factory = FakeFactory { counters: Rc::clone(&counters), fail: false };
        (HandTrackingSession::new(factory, ui, config), counters, events)
    }

    #[test]
    fn test_activation_is_idempotent() {
        let (mut s, counters, _) = session(&HandTrackingConfig::default());
        assert!(s.activate().unwrap());
        assert!(!s.activate().unwrap());
        assert_eq!(counters.builds.get(), 1);
        assert_eq!(counters.starts.get(), 1);
        assert!(s.is_active());
    }

    #[test]
    fn test_deactivate_while_idle_is_noop() {
        let (mut s, _, events) = session(&HandTrackingConfig::default());
        assert!(!s.deactivate());
        assert!(events.borrow().is_empty());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_reactivation_reuses_pipeline() {
        let (mut s, counters, _) = session(&HandTrackingConfig::default());
        s.activate().unwrap();
        assert!(s.deactivate());
        s.activate().unwrap();
        assert_eq!(counters.builds.get(), 1);
        assert_eq!(counters.starts.get(), 2);
    }

    #[test]
    fn test_close_keeps_camera_by_default() {
        let (mut s, counters, _) = session(&HandTrackingConfig::default());
        s.activate().unwrap();
        s.deactivate();
        assert_eq!(counters.stops.get(), 0);
        assert!(s.has_pipeline());
    }

    #[test]
    fn test_close_can_release_camera() {
        let config = HandTrackingConfig {
            release_camera_on_close: true,
            ..HandTrackingConfig::default()
        };
        let (mut s, counters, _) = session(&config);
        s.activate().unwrap();
        s.deactivate();
        assert_eq!(counters.stops.get(), 1);
    }

    #[test]
    fn test_ui_sequence() {
        let (mut s, _, events) = session(&HandTrackingConfig::default());
        s.activate().unwrap();
        s.deactivate();
        assert_eq!(
            *events.borrow(),
            vec!["show_overlay", "busy", "hide_toggle_in_1000", "hide_overlay", "restore"]
        );
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let (mut s, counters, events) = session(&HandTrackingConfig::default());
        s.activate().unwrap();
        s.fail("Permission denied");
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(counters.stops.get(), 1);
        assert!(events.borrow().iter().any(|e| e == "error:Permission denied"));

        s.activate().unwrap();
        assert_eq!(counters.builds.get(), 1);
        assert!(s.is_active());
    }

    #[test]
    fn test_build_error_stays_idle() {
        let ui = FakeUi::default();
        let events = Rc::clone(&ui.events);
        let factory = FakeFactory { counters: Rc::new(Counters::default()), fail: true };
        let mut s = HandTrackingSession::new(factory, ui, &HandTrackingConfig::default());

        assert!(s.activate().is_err());
        assert_eq!(s.state(), SessionState::Idle);
        assert!(!s.has_pipeline());
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_toggle_flips_state() {
        let (mut s, _, _) = session(&HandTrackingConfig::default());
        assert_eq!(s.toggle().unwrap(), SessionState::Active);
        assert_eq!(s.toggle().unwrap(), SessionState::Idle);
    }
}
