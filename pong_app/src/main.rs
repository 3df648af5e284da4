//! Demo application: opens a GLES 3.0 window and renders a rotating
//! wireframe cube, a flat triangle, and a software-rastered overlay.
//!
//! Exits with the status code reported by the engine loop; `Escape` or
//! closing the window ends the run.

mod raster;
mod scene;

use pong_engine::config::AppConfig;
use pong_engine::event::Event;
use pong_engine::game_loop::{self, Application, DeltaTime, EngineError};
use pong_engine::gl;
use pong_engine::gles;
use pong_engine::profiler::UpdateProfiler;
use pong_engine::render;
use pong_engine::window::Window;

use crate::raster::PixelSurface;
use crate::scene::Scene;

const CONFIG_PATH: &str = "pong.toml";

const CLEAR_COLOR: [f32; 3] = [0.0, 0x33 as f32 / 255.0, 0x66 as f32 / 255.0];

struct PongApp {
    window: Window,
    scene: Scene,
    surface: PixelSurface,
    profiler: UpdateProfiler,
    rotation: f32,
}

impl PongApp {
    fn create(config: &AppConfig) -> Result<Self, EngineError> {
        let window = Window::create(&config.window.title, config.window.size())?;
        let scene = Scene::create()?;
        let (width, height) = window.get_size();
        let surface = PixelSurface::new(width, height);

        Ok(Self {
            window,
            scene,
            surface,
            profiler: UpdateProfiler::new(),
            rotation: 0.0,
        })
    }

    /// Drain the window queue. Returns false once a quit event arrives.
    fn drain_events(&mut self) -> bool {
        self.window.pump_events();
        while let Some(event) = self.window.events_mut().poll() {
            match event {
                Event::Quit => return false,
                Event::Key(glfw::Key::Escape, glfw::Action::Press) => {
                    self.window.events_mut().push(Event::Quit);
                }
                Event::CursorMoved { x, y } => log::trace!("cursor at ({x:.0}, {y:.0})"),
                other => {
                    self.window.handle_event(&other);
                }
            }
        }
        true
    }

    fn render(&mut self) {
        let (width, height) = self.window.get_size();
        if (self.surface.width(), self.surface.height()) != (width, height) {
            self.surface = PixelSurface::new(width, height);
        }

        // Crossed diagonals on the CPU overlay.
        self.surface.clear([0, 0, 0, 0]);
        self.surface
            .draw_line(0, 0, width as i32 - 1, height as i32 - 1, [255, 0, 0, 255]);
        self.surface
            .draw_line(0, height as i32 - 1, width as i32 - 1, 0, [255, 215, 0, 255]);

        unsafe {
            gl!(gles::ClearColor(
                CLEAR_COLOR[0],
                CLEAR_COLOR[1],
                CLEAR_COLOR[2],
                1.0
            ));
            gl!(gles::Clear(
                gles::COLOR_BUFFER_BIT | gles::DEPTH_BUFFER_BIT
            ));
        }

        self.scene.draw_triangle();
        self.scene
            .draw_cube(self.rotation, width as f32 / height as f32);
        if let Err(error) = self.scene.draw_overlay(&self.surface) {
            log::warn!("overlay skipped: {error}");
        }

        self.window.swap();
    }
}

impl Application for PongApp {
    fn init(&mut self) {
        render::print_context();
        log::info!(
            "[2D Renderer] software ({}x{})",
            self.surface.width(),
            self.surface.height()
        );
    }

    fn update(&mut self, delta_time: DeltaTime) -> bool {
        self.profiler.update(delta_time);
        self.rotation += delta_time.as_secs_f32() * std::f32::consts::FRAC_PI_4;

        if !self.drain_events() {
            return false;
        }
        if !self.window.is_open() {
            return false;
        }

        self.render();
        true
    }
}

fn main() {
    env_logger::init();

    let config = AppConfig::load_or_default(CONFIG_PATH);
    match game_loop::run(|| PongApp::create(&config)) {
        Ok(status) => std::process::exit(status),
        Err(error) => {
            log::error!("engine failed: {error}");
            std::process::exit(1);
        }
    }
}
