//! BrowserEventLoop: `setTimeout`/`clearTimeout` + `spawn_local`
//!
//! Timer closures must outlive their JS registration, so they are parked in a
//! table keyed by handle. Fired entries are reclaimed on the next schedule
//! call, never from inside their own invocation.

use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use super::describe_js;
use crate::console;
use crate::event_loop::{EventLoop, TimerHandle};

#[derive(Default)]
struct TimerTable {
    next_key: u32,
    /// key -> (JS timeout id, registered closure)
    live: HashMap<u32, (i32, Closure<dyn FnMut()>)>,
    fired: Vec<u32>,
}

impl TimerTable {
    fn reclaim_fired(&mut self) {
        for key in self.fired.drain(..) {
            self.live.remove(&key);
        }
    }
}

pub struct BrowserEventLoop {
    window: Window,
    timers: Rc<RefCell<TimerTable>>,
}

impl BrowserEventLoop {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            timers: Rc::new(RefCell::new(TimerTable::default())),
        }
    }
}

impl EventLoop for BrowserEventLoop {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let key = {
            let mut table = self.timers.borrow_mut();
            table.reclaim_fired();
            table.next_key = table.next_key.wrapping_add(1);
            table.next_key
        };

        let table = Rc::downgrade(&self.timers);
        let closure: Closure<dyn FnMut()> = Closure::once(move || {
            callback();
            if let Some(table) = table.upgrade() {
                table.borrow_mut().fired.push(key);
            }
        });

        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            ) {
            Ok(id) => {
                self.timers.borrow_mut().live.insert(key, (id, closure));
            }
            Err(e) => {
                console::error(&format!("[EventLoop] setTimeout failed: {}", describe_js(&e)));
            }
        }

        TimerHandle(key)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let entry = self.timers.borrow_mut().live.remove(&handle.0);
        if let Some((id, _closure)) = entry {
            self.window.clear_timeout_with_handle(id);
        }
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
