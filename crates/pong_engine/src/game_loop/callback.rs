//! Host-callback scheduling for targets that forbid a blocking loop.
//!
//! The host scheduler owns the thread and invokes the registered
//! callback once per its own tick cadence. The callback body must return
//! promptly; termination is self-initiated by cancelling the host main
//! loop from within the callback once the application stops.

use std::os::raw::c_void;

use super::{Application, Clock, LoopScheduler, Ticker};
use crate::emscripten;

/// Registers a single host callback carrying the ticker as its opaque
/// user-data pointer; no global mutable trampoline state.
#[derive(Debug, Default)]
pub struct CallbackScheduler;

impl LoopScheduler for CallbackScheduler {
    fn run<A, C>(self, ticker: Ticker<A, C>)
    where
        A: Application + 'static,
        C: Clock + 'static,
    {
        let data = Box::into_raw(Box::new(ticker));
        unsafe {
            // fps 0 = let the host pick (requestAnimationFrame cadence).
            emscripten::emscripten_set_main_loop_arg(trampoline::<A, C>, data.cast(), 0, 1);
        }
    }
}

extern "C" fn trampoline<A, C>(data: *mut c_void)
where
    A: Application + 'static,
    C: Clock + 'static,
{
    let ticker = unsafe { &mut *data.cast::<Ticker<A, C>>() };
    if !ticker.tick() {
        unsafe {
            drop(Box::from_raw(data.cast::<Ticker<A, C>>()));
            emscripten::emscripten_cancel_main_loop();
        }
    }
}
