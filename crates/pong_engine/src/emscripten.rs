//! Minimal bindings to the Emscripten host scheduler and WebGL helpers.
//!
//! Only the capabilities the scaffold consumes: registering/cancelling
//! the host-driven main-loop callback and enabling the debug renderer
//! info extension on the current WebGL context.

use std::os::raw::{c_char, c_int, c_void};

/// C-signature of the host main-loop callback; the argument is the
/// opaque user-data pointer passed at registration.
pub type MainLoopCallback = extern "C" fn(*mut c_void);

extern "C" {
    pub fn emscripten_set_main_loop_arg(
        func: MainLoopCallback,
        arg: *mut c_void,
        fps: c_int,
        simulate_infinite_loop: c_int,
    );

    pub fn emscripten_cancel_main_loop();

    fn emscripten_webgl_get_current_context() -> c_int;

    fn emscripten_webgl_enable_extension(context: c_int, extension: *const c_char) -> c_int;
}

/// Expose unmasked vendor/renderer strings for context diagnostics.
pub fn enable_webgl_debug_renderer_info() {
    const EXTENSION: &[u8] = b"WEBGL_debug_renderer_info\0";
    unsafe {
        let context = emscripten_webgl_get_current_context();
        emscripten_webgl_enable_extension(context, EXTENSION.as_ptr().cast());
    }
}
