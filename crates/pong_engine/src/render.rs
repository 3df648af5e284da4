//! OpenGL ES 3.0 context plumbing.
//!
//! Entry-point loading, context diagnostics, shader program compilation
//! and the debug error check backing the [`gl!`](crate::gl) macro. Draw
//! calls themselves belong to the application; this module only provides
//! the capability layer around them.

use std::ffi::{CStr, CString};
use std::os::raw::c_void;

use thiserror::Error;

use crate::gles;
use crate::gles::types::{GLenum, GLint, GLuint};

/// A GL call left the error flag set (debug builds only).
#[derive(Error, Debug)]
#[error("GL error {code} `{description}` @ {file}:{line} - `{call}`")]
pub struct GlApiError {
    /// Source file of the failing call.
    pub file: &'static str,
    /// Source line of the failing call.
    pub line: u32,
    /// The call text, as written.
    pub call: String,
    /// Numeric GL error code.
    pub code: GLenum,
    /// Human-readable description of the code.
    pub description: &'static str,
}

fn describe(code: GLenum) -> &'static str {
    match code {
        gles::INVALID_ENUM => "Invalid enum",
        gles::INVALID_VALUE => "Invalid value",
        gles::INVALID_OPERATION => "Invalid operation",
        gles::OUT_OF_MEMORY => "Out of memory",
        gles::INVALID_FRAMEBUFFER_OPERATION => "Invalid framebuffer operation",
        _ => "Unknown error",
    }
}

/// Query the GL error flag; on error, log a [`GlApiError`] with its full
/// call-site context and raise it by panicking (unwind). Release builds
/// never call this — the [`gl!`](crate::gl) macro compiles the check out.
pub fn check_error(file: &'static str, line: u32, call: &str) {
    let code = unsafe { gles::GetError() };
    if code == gles::NO_ERROR {
        return;
    }

    let error = GlApiError {
        file,
        line,
        call: call.to_owned(),
        code,
        description: describe(code),
    };

    log::error!("{error}");
    panic!("{error}");
}

/// Link the GL function table for the current context.
///
/// On native targets every GL ES 3.0 entry point is resolved through the
/// windowing library's proc-address resolver; failure to resolve the core
/// entry points aborts the process, since nothing can render without
/// them. On the web target the runtime guarantees the entry points exist;
/// there this additionally enables the debug-renderer-info extension for
/// diagnostics and never fails.
pub fn link<F>(mut loader: F)
where
    F: FnMut(&str) -> *const c_void,
{
    gles::load_with(|symbol| loader(symbol));

    #[cfg(not(target_os = "emscripten"))]
    if !gles::Viewport::is_loaded()
        || !gles::CreateShader::is_loaded()
        || !gles::GetError::is_loaded()
    {
        log::error!("Error initializing OpenGL ES 3.0");
        std::process::abort();
    }

    #[cfg(target_os = "emscripten")]
    crate::emscripten::enable_webgl_debug_renderer_info();
}

/// Log the context's version/vendor/renderer/GLSL strings.
pub fn print_context() {
    log::info!("[OpenGL] {}", get_string(gles::VERSION));
    log::info!("[Vendor] {}", get_string(gles::VENDOR));
    log::info!("[3D Renderer] {}", get_string(gles::RENDERER));
    log::info!("[GLSL] {}", get_string(gles::SHADING_LANGUAGE_VERSION));

    #[cfg(target_os = "emscripten")]
    {
        // UNMASKED_VENDOR_WEBGL / UNMASKED_RENDERER_WEBGL
        log::info!("[WEBGL Vendor] {}", get_string(0x9245));
        log::info!("[WEBGL Renderer] {}", get_string(0x9246));
    }
}

fn get_string(name: GLenum) -> String {
    let text = unsafe { gles::GetString(name) };
    if text.is_null() {
        return String::from("(null)");
    }
    unsafe { CStr::from_ptr(text.cast()) }
        .to_string_lossy()
        .into_owned()
}

/// Compile both shader stages and link them into a program.
///
/// Any stage or link step whose info log holds more than one character
/// has that log dumped to the diagnostic stream. This is best-effort
/// diagnostics, not a failure signal: compile/link status is never
/// checked and the program handle is returned regardless.
pub fn compile_program(vertex_source: &str, fragment_source: &str) -> GLuint {
    unsafe {
        let vertex_shader = compile_stage(gles::VERTEX_SHADER, vertex_source, "vertex");
        let fragment_shader = compile_stage(gles::FRAGMENT_SHADER, fragment_source, "fragment");

        let program = gles::CreateProgram();
        gles::AttachShader(program, vertex_shader);
        gles::AttachShader(program, fragment_shader);
        gles::LinkProgram(program);

        let mut log_length: GLint = 0;
        gles::GetProgramiv(program, gles::INFO_LOG_LENGTH, &mut log_length);
        if log_length > 1 {
            let mut buffer = vec![0u8; log_length as usize + 1];
            gles::GetProgramInfoLog(
                program,
                log_length,
                std::ptr::null_mut(),
                buffer.as_mut_ptr().cast(),
            );
            log::warn!("program: {}", lossy(&buffer));
        }

        // Flagged for deletion only; freed with the program.
        gles::DeleteShader(vertex_shader);
        gles::DeleteShader(fragment_shader);

        program
    }
}

unsafe fn compile_stage(kind: GLenum, source: &str, label: &str) -> GLuint {
    let shader = gles::CreateShader(kind);

    let source = CString::new(source).unwrap_or_else(|_| {
        log::warn!("{label} shader source contains interior NUL, truncating");
        CString::default()
    });
    gles::ShaderSource(shader, 1, &source.as_ptr(), std::ptr::null());
    gles::CompileShader(shader);

    let mut log_length: GLint = 0;
    gles::GetShaderiv(shader, gles::INFO_LOG_LENGTH, &mut log_length);
    if log_length > 1 {
        let mut buffer = vec![0u8; log_length as usize + 1];
        gles::GetShaderInfoLog(
            shader,
            log_length,
            std::ptr::null_mut(),
            buffer.as_mut_ptr().cast(),
        );
        log::warn!("{label}: {}", lossy(&buffer));
    }

    shader
}

fn lossy(buffer: &[u8]) -> std::borrow::Cow<'_, str> {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_descriptions_match_fixed_enumeration() {
        assert_eq!(describe(gles::INVALID_ENUM), "Invalid enum");
        assert_eq!(describe(gles::INVALID_VALUE), "Invalid value");
        assert_eq!(describe(gles::INVALID_OPERATION), "Invalid operation");
        assert_eq!(describe(gles::OUT_OF_MEMORY), "Out of memory");
        assert_eq!(
            describe(gles::INVALID_FRAMEBUFFER_OPERATION),
            "Invalid framebuffer operation"
        );
        assert_eq!(describe(0xFFFF), "Unknown error");
    }

    #[test]
    fn test_error_message_carries_call_site() {
        let error = GlApiError {
            file: "window.rs",
            line: 42,
            call: "gles::Viewport(0, 0, 640, 480)".to_owned(),
            code: gles::INVALID_VALUE,
            description: describe(gles::INVALID_VALUE),
        };
        assert_eq!(
            error.to_string(),
            format!(
                "GL error {} `Invalid value` @ window.rs:42 - `gles::Viewport(0, 0, 640, 480)`",
                gles::INVALID_VALUE
            )
        );
    }

    #[test]
    fn test_info_log_text_stops_at_nul() {
        assert_eq!(lossy(b"syntax error\0\0garbage"), "syntax error");
        assert_eq!(lossy(b"no terminator"), "no terminator");
    }
}
