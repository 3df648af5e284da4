//! Window lifecycle, state tracking and host-event translation.
//!
//! A [`Window`] owns the native window and its OpenGL ES 3.0 context as a
//! pair, pumps host events into an [`EventQueue`], and keeps a small state
//! record (`open`/`visible`/`focused`/`size`) that only its own event
//! handler and the explicit `show`/`hide`/`close` calls mutate.

use glfw::Context as _;
use thiserror::Error;

use crate::event::{Event, EventQueue, WindowEvent};
use crate::gl;
use crate::gles;
use crate::gles::types::GLsizei;
use crate::handle::ResourceCreationError;
use crate::render;

/// Window management errors.
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing system could not be initialized.
    #[error("windowing system initialization failed: {0}")]
    InitializationFailed(String),

    /// Native window or GL context creation returned no handle.
    #[error(transparent)]
    Creation(#[from] ResourceCreationError),
}

/// Observable window state. All flags start true at creation.
#[derive(Debug, Clone, PartialEq)]
struct State {
    is_open: bool,
    is_visible: bool,
    is_focused: bool,
    size: (u32, u32),
}

impl State {
    fn new(size: (u32, u32)) -> Self {
        Self {
            is_open: true,
            is_visible: true,
            is_focused: true,
            size,
        }
    }

    fn close(&mut self) {
        self.is_open = false;

        // A web canvas cannot meaningfully be hidden this way.
        #[cfg(not(target_os = "emscripten"))]
        {
            self.is_visible = false;
        }
    }

    /// Apply one event to the state, reporting the side effect the owner
    /// still has to perform. Window-system events are always consumed,
    /// even sub-types with no state change.
    fn apply(&mut self, event: &Event) -> Outcome {
        let Event::Window(window_event) = event else {
            return Outcome::NotWindowEvent;
        };

        match *window_event {
            WindowEvent::Resized(width, height) => {
                self.size = (width, height);
                Outcome::SetViewport(width, height)
            }
            WindowEvent::FocusGained => {
                self.is_focused = true;
                Outcome::Handled
            }
            WindowEvent::FocusLost => {
                self.is_focused = false;
                Outcome::Handled
            }
            WindowEvent::Shown => {
                self.is_visible = true;
                Outcome::Handled
            }
            WindowEvent::Hidden => {
                self.is_visible = false;
                Outcome::Handled
            }
            WindowEvent::CloseRequested => {
                self.close();
                Outcome::Closed
            }
        }
    }
}

/// What the window must do after a state transition.
#[derive(Debug, PartialEq)]
enum Outcome {
    NotWindowEvent,
    Handled,
    SetViewport(u32, u32),
    Closed,
}

/// A native window paired with its GL ES 3.0 / WebGL2 context.
pub struct Window {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    receiver: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    queue: EventQueue,
    state: State,
}

impl Window {
    /// Create the native window and its GL context, link the GL function
    /// table, and apply the baseline render state.
    ///
    /// If the host environment already resized the window externally
    /// before creation settled, the requested size is not forced.
    pub fn create(title: &str, size: (u32, u32)) -> Result<Self, WindowError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(e.to_string()))?;

        // WebGL 2.0 == OpenGL ES 3.0; the web runtime picks the version itself.
        #[cfg(not(target_os = "emscripten"))]
        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 0));

        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGlEs));
        glfw.window_hint(glfw::WindowHint::DoubleBuffer(true));
        glfw.window_hint(glfw::WindowHint::DepthBits(Some(32)));
        glfw.window_hint(glfw::WindowHint::Resizable(true));
        glfw.window_hint(glfw::WindowHint::Visible(true));

        let (mut window, receiver) = glfw
            .create_window(size.0, size.1, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| {
                ResourceCreationError::new("native window")
                    .with_detail("glfwCreateWindow returned no window")
            })?;

        window.set_size_polling(true);
        window.set_focus_polling(true);
        window.set_iconify_polling(true);
        window.set_close_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_key_polling(true);

        window.make_current();

        let mut created = Self {
            glfw,
            window,
            receiver,
            queue: EventQueue::new(),
            state: State::new(size),
        };

        created.set_initial_size(size);
        created.init_opengl();

        Ok(created)
    }

    fn set_initial_size(&mut self, size: (u32, u32)) {
        self.pump_events();
        let resized_externally = self
            .queue
            .any(|event| matches!(event, Event::Window(WindowEvent::Resized(..))));

        // don't resize if the window was already resized externally
        if !resized_externally {
            self.window.set_size(size.0 as i32, size.1 as i32);
            self.center();
        }
    }

    fn center(&mut self) {
        let (width, height) = (self.state.size.0 as i32, self.state.size.1 as i32);
        let position = self.glfw.with_primary_monitor(|_, monitor| {
            monitor
                .and_then(|m| m.get_video_mode())
                .map(|mode| ((mode.width as i32 - width) / 2, (mode.height as i32 - height) / 2))
        });
        if let Some((x, y)) = position {
            self.window.set_pos(x, y);
        }
    }

    fn init_opengl(&mut self) {
        let window = &mut self.window;
        render::link(|symbol| window.get_proc_address(symbol) as *const _);
        self.configure();
    }

    fn configure(&mut self) {
        let (width, height) = self.state.size;

        unsafe {
            gl!(gles::Viewport(0, 0, width as GLsizei, height as GLsizei));

            gl!(gles::Enable(gles::BLEND));
            gl!(gles::BlendFunc(gles::SRC_ALPHA, gles::ONE_MINUS_SRC_ALPHA));

            gl!(gles::Enable(gles::DEPTH_TEST));
            gl!(gles::DepthFunc(gles::LEQUAL));

            gl!(gles::Enable(gles::CULL_FACE));
            gl!(gles::CullFace(gles::BACK));
            gl!(gles::FrontFace(gles::CCW));
        }

        self.glfw.set_swap_interval(glfw::SwapInterval::None);
    }

    /// Poll the host and translate pending events into the internal queue.
    pub fn pump_events(&mut self) {
        self.glfw.poll_events();
        for (_, host_event) in glfw::flush_messages(&self.receiver) {
            if let Some(event) = translate(host_event) {
                if !self.queue.push(event) {
                    log::warn!("event queue full, dropping {event:?}");
                }
            }
        }
    }

    /// The pending-event queue.
    pub fn events(&self) -> &EventQueue {
        &self.queue
    }

    /// Mutable access to the pending-event queue.
    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }

    /// Update window state from one event.
    ///
    /// Returns false for any event that is not a window-system event;
    /// window-system events are consumed (true) even when the sub-type
    /// changes nothing. A resize re-applies the GL viewport.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match self.state.apply(event) {
            Outcome::NotWindowEvent => false,
            Outcome::Handled => true,
            Outcome::SetViewport(width, height) => {
                unsafe {
                    gl!(gles::Viewport(0, 0, width as GLsizei, height as GLsizei));
                }
                true
            }
            Outcome::Closed => {
                #[cfg(not(target_os = "emscripten"))]
                self.window.hide();
                true
            }
        }
    }

    /// Current client size.
    pub fn get_size(&self) -> (u32, u32) {
        self.state.size
    }

    /// Whether the window is open (close has not been requested).
    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Whether the window is visible.
    pub fn is_visible(&self) -> bool {
        self.state.is_visible
    }

    /// Whether the window has input focus.
    pub fn is_focused(&self) -> bool {
        self.state.is_focused
    }

    /// Show the native window. Harmless when already visible.
    pub fn show(&mut self) {
        self.window.show();
        self.state.is_visible = true;
    }

    /// Hide the native window. Harmless when already hidden.
    pub fn hide(&mut self) {
        self.window.hide();
        self.state.is_visible = false;
    }

    /// Mark the window closed; outside the web target this also hides it.
    pub fn close(&mut self) {
        self.state.close();

        #[cfg(not(target_os = "emscripten"))]
        self.window.hide();
    }

    /// Swap the front and back buffers.
    pub fn swap(&mut self) {
        self.window.swap_buffers();
    }
}

/// Translate a host event into the crate-level event union. Host events
/// the scaffold does not interpret are discarded.
fn translate(event: glfw::WindowEvent) -> Option<Event> {
    match event {
        glfw::WindowEvent::Size(width, height) => Some(Event::Window(WindowEvent::Resized(
            width.max(0) as u32,
            height.max(0) as u32,
        ))),
        glfw::WindowEvent::Focus(true) => Some(Event::Window(WindowEvent::FocusGained)),
        glfw::WindowEvent::Focus(false) => Some(Event::Window(WindowEvent::FocusLost)),
        glfw::WindowEvent::Iconify(true) => Some(Event::Window(WindowEvent::Hidden)),
        glfw::WindowEvent::Iconify(false) => Some(Event::Window(WindowEvent::Shown)),
        glfw::WindowEvent::Close => Some(Event::Window(WindowEvent::CloseRequested)),
        glfw::WindowEvent::CursorPos(x, y) => Some(Event::CursorMoved { x, y }),
        glfw::WindowEvent::Key(key, _, action, _) => Some(Event::Key(key, action)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_all_flags_set() {
        let state = State::new((640, 480));
        assert!(state.is_open);
        assert!(state.is_visible);
        assert!(state.is_focused);
        assert_eq!(state.size, (640, 480));
    }

    #[test]
    fn test_resize_updates_size_and_requests_viewport() {
        let mut state = State::new((640, 480));
        let outcome = state.apply(&Event::Window(WindowEvent::Resized(800, 600)));
        assert_eq!(outcome, Outcome::SetViewport(800, 600));
        assert_eq!(state.size, (800, 600));
    }

    #[test]
    fn test_focus_events_toggle_flag() {
        let mut state = State::new((640, 480));
        assert_eq!(
            state.apply(&Event::Window(WindowEvent::FocusLost)),
            Outcome::Handled
        );
        assert!(!state.is_focused);
        assert_eq!(
            state.apply(&Event::Window(WindowEvent::FocusGained)),
            Outcome::Handled
        );
        assert!(state.is_focused);
    }

    #[test]
    fn test_visibility_events_toggle_flag() {
        let mut state = State::new((640, 480));
        state.apply(&Event::Window(WindowEvent::Hidden));
        assert!(!state.is_visible);
        state.apply(&Event::Window(WindowEvent::Shown));
        assert!(state.is_visible);
    }

    #[test]
    fn test_close_clears_open_and_hides_on_native() {
        let mut state = State::new((640, 480));
        state.close();
        assert!(!state.is_open);

        #[cfg(not(target_os = "emscripten"))]
        assert!(!state.is_visible);
        #[cfg(target_os = "emscripten")]
        assert!(state.is_visible);
    }

    #[test]
    fn test_non_window_events_are_not_consumed() {
        let mut state = State::new((640, 480));
        let before = state.clone();
        assert_eq!(state.apply(&Event::Quit), Outcome::NotWindowEvent);
        assert_eq!(
            state.apply(&Event::CursorMoved { x: 1.0, y: 2.0 }),
            Outcome::NotWindowEvent
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_translate_host_events() {
        assert_eq!(
            translate(glfw::WindowEvent::Size(800, 600)),
            Some(Event::Window(WindowEvent::Resized(800, 600)))
        );
        assert_eq!(
            translate(glfw::WindowEvent::Close),
            Some(Event::Window(WindowEvent::CloseRequested))
        );
        assert_eq!(
            translate(glfw::WindowEvent::Focus(false)),
            Some(Event::Window(WindowEvent::FocusLost))
        );
        assert_eq!(
            translate(glfw::WindowEvent::CursorPos(3.0, 4.0)),
            Some(Event::CursorMoved { x: 3.0, y: 4.0 })
        );
        // Uninterpreted host events are dropped before they reach the queue.
        assert_eq!(translate(glfw::WindowEvent::Refresh), None);
    }
}
