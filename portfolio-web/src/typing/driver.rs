//! Timer loop that feeds `TextCycler` output into the page

use std::cell::Cell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

use super::cycler::TextCycler;

/// Handle to a running typing loop. Dropping it stops the loop.
pub struct TypingTask {
    cancelled: Rc<Cell<bool>>,
}

impl TypingTask {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }
}

impl Drop for TypingTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start typing into `target`. The first character appears immediately.
pub fn spawn_typing(target: web_sys::Element, mut cycler: TextCycler) -> TypingTask {
    let cancelled = Rc::new(Cell::new(false));
    let flag = Rc::clone(&cancelled);

    spawn_local(async move {
        loop {
            if flag.get() {
                break;
            }
            let step = cycler.tick();
            target.set_text_content(Some(&step.text));
            TimeoutFuture::new(step.delay_ms).await;
        }
        log::debug!("typing loop stopped");
    });

    TypingTask { cancelled }
}
