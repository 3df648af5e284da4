//! # Pong Engine
//!
//! A small cross-platform (desktop + web/Emscripten) game-loop and
//! rendering scaffold: window and OpenGL ES 3.0 / WebGL2 context setup,
//! a fixed control loop with per-tick delta time, event polling, and the
//! GL plumbing needed to draw a handful of 2D/3D primitives.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pong_engine::prelude::*;
//!
//! struct MyGame {
//!     window: Window,
//! }
//!
//! impl Application for MyGame {
//!     fn init(&mut self) {
//!         render::print_context();
//!     }
//!
//!     fn update(&mut self, _dt: DeltaTime) -> bool {
//!         self.window.pump_events();
//!         while let Some(event) = self.window.events_mut().poll() {
//!             if matches!(event, Event::Quit) {
//!                 return false;
//!             }
//!             self.window.handle_event(&event);
//!         }
//!         self.window.swap();
//!         self.window.is_open()
//!     }
//! }
//!
//! fn main() -> Result<(), EngineError> {
//!     let status = game_loop::run(|| {
//!         let window = Window::create("My Game", (640, 480))?;
//!         Ok(MyGame { window })
//!     })?;
//!     std::process::exit(status)
//! }
//! ```

/// Generated OpenGL ES 3.0 bindings (WebGL2-compatible subset).
#[allow(
    missing_docs,
    non_upper_case_globals,
    non_snake_case,
    non_camel_case_types,
    unused_imports,
    clippy::all
)]
pub mod gles {
    include!(concat!(env!("OUT_DIR"), "/gles_bindings.rs"));
}

pub mod config;
pub mod event;
pub mod game_loop;
pub mod handle;
pub mod profiler;
pub mod render;
pub mod window;

mod macros;

#[cfg(target_os = "emscripten")]
pub(crate) mod emscripten;

pub use event::{Event, EventQueue, WindowEvent};
pub use game_loop::{Application, DeltaTime, EngineError};
pub use handle::{Handle, ResourceCreationError};
pub use window::{Window, WindowError};

/// Common imports for engine users.
pub mod prelude {
    pub use crate::{
        config::{AppConfig, WindowConfig},
        event::{Event, EventQueue, WindowEvent},
        game_loop::{self, Application, DeltaTime, EngineError},
        handle::{Handle, ResourceCreationError},
        profiler::UpdateProfiler,
        render,
        window::{Window, WindowError},
    };
}
