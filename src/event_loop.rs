//! EventLoop: timers and task spawning on the UI thread
//!
//! Everything runs on one thread. Timer callbacks and spawned tasks execute
//! as later turns of the host event loop.

use futures::future::LocalBoxFuture;
use std::rc::Rc;

/// Opaque handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// Host event loop
pub trait EventLoop {
    /// Run `callback` once after `delay_ms`
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle;

    /// Cancel a timer that has not fired yet; no-op otherwise
    fn clear_timeout(&self, handle: TimerHandle);

    /// Drive a future to completion on the current thread
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
}

impl<E: EventLoop + ?Sized> EventLoop for Rc<E> {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        (**self).set_timeout(delay_ms, callback)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        (**self).clear_timeout(handle)
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        (**self).spawn_local(task)
    }
}
