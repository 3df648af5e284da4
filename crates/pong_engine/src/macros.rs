//! Debug-build GL error-check macros.
//!
//! In debug builds every wrapped call is followed by a query of the GL
//! error flag; a set flag becomes a logged-and-raised
//! [`GlApiError`](crate::render::GlApiError) with full call-site context.
//! In release builds both macros compile to the bare call with no
//! checking overhead.

/// Perform a GL call and, in debug builds, check the error flag.
///
/// ```ignore
/// unsafe { gl!(gles::Viewport(0, 0, 640, 480)); }
/// ```
#[macro_export]
macro_rules! gl {
    ($call:expr) => {{
        let result = $call;
        #[cfg(debug_assertions)]
        $crate::render::check_error(file!(), line!(), stringify!($call));
        result
    }};
}

/// Check the GL error flag at an arbitrary point (debug builds only).
#[macro_export]
macro_rules! gl_check {
    () => {
        #[cfg(debug_assertions)]
        $crate::render::check_error(file!(), line!(), "gl_check!()");
    };
}
