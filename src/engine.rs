use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::WindowId;

use crate::assets::SpriteImage;
use crate::camera::Camera;
use crate::error::EngineError;
use crate::input::InputState;
use crate::renderer::Renderer;
use crate::renderer::batch::{SpriteBatch, TextureId};
use crate::window::{WindowConfig, apply_window_mode, window_attributes};

/// Longest frame the update loop will try to catch up on, in seconds.
const MAX_FRAME_TIME: f32 = 0.25;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Self = Self([1.0, 1.0, 0.0, 1.0]);

    /// Same colour with its alpha replaced.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self([self.0[0], self.0[1], self.0[2], a])
    }
}

// ── Screen trait ────────────────────────────────────────────────────────────

/// Anything that can turn decoded images into drawable textures.
/// The renderer implements it; tests use an in-memory fake.
pub trait TextureUploader {
    fn upload(&mut self, label: &str, image: &SpriteImage) -> TextureId;
}

/// One full-window game state driven by the frame loop.
///
/// Teardown is `Drop`: everything a screen loads is owned by it and released
/// when the engine drops it.
pub trait Screen {
    /// Called once the GPU is ready, before the first update.
    fn show(&mut self, _textures: &mut dyn TextureUploader) {}
    /// Advance game state by one fixed step of `dt` seconds.
    fn update(&mut self, input: &InputState, dt: f32);
    /// Queue this frame's quads in world space.
    fn draw(&mut self, batch: &mut SpriteBatch);
    /// The camera the queued quads are viewed through.
    fn camera(&self) -> &Camera;
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    /// Called right before the screen is dropped.
    fn hide(&mut self) {}
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    window: WindowConfig,
    target_ups: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            target_ups: 60,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn with_window(mut self, window: WindowConfig) -> Self { self.window = window; self }
    pub fn with_title(mut self, title: &str) -> Self { self.window.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width; self.window.height = height; self
    }
    pub fn with_ups(mut self, ups: u32) -> Self { self.target_ups = ups.max(1); self }

    /// Seconds per fixed update step.
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.target_ups.max(1) as f32
    }

    /// Open the window and drive `screen` until the window is closed.
    pub fn run(self, screen: impl Screen + 'static) -> Result<(), EngineError> {
        let event_loop = EventLoop::new()?;
        let fixed_dt = self.fixed_dt();
        let mut app = App {
            window_config: self.window,
            screen: Some(Box::new(screen)),
            renderer: None,
            input: InputState::new(),
            batch: SpriteBatch::new(),
            clock: FrameClock::new(fixed_dt),
            fatal: None,
        };
        event_loop.run_app(&mut app)?;
        match app.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── Fixed-step clock ────────────────────────────────────────────────────────

/// Accumulates real frame time and hands it out in fixed update steps.
#[derive(Debug)]
pub struct FrameClock {
    fixed_dt: f32,
    accumulator: f32,
    last_instant: Option<Instant>,
}

impl FrameClock {
    pub fn new(fixed_dt: f32) -> Self {
        Self { fixed_dt, accumulator: 0.0, last_instant: None }
    }

    pub fn fixed_dt(&self) -> f32 { self.fixed_dt }

    /// Measure the time since the previous call and return it.
    /// The first call counts as exactly one step.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = match self.last_instant {
            Some(prev) => now.duration_since(prev).as_secs_f32(),
            None => self.fixed_dt,
        };
        self.last_instant = Some(now);
        self.advance(elapsed)
    }

    /// Add `elapsed` seconds (clamped to `MAX_FRAME_TIME`) and return the
    /// clamped value.
    pub fn advance(&mut self, elapsed: f32) -> f32 {
        let elapsed = elapsed.clamp(0.0, MAX_FRAME_TIME);
        self.accumulator += elapsed;
        elapsed
    }

    /// Consume one fixed step if enough time has accumulated.
    pub fn step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            true
        } else {
            false
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    window_config: WindowConfig,
    screen: Option<Box<dyn Screen>>,
    renderer: Option<Renderer>,
    input: InputState,
    batch: SpriteBatch,
    clock: FrameClock,
    /// Startup failure that ended the loop early.
    fatal: Option<EngineError>,
}

impl App {
    /// Hide and drop the screen, then stop the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut screen) = self.screen.take() {
            screen.hide();
            info!("[Engine] Disposing screen");
        }
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let (Some(renderer), Some(screen)) = (self.renderer.as_mut(), self.screen.as_mut()) else {
            return;
        };

        self.clock.tick();
        while self.clock.step() {
            screen.update(&self.input, self.clock.fixed_dt());
        }

        self.batch.clear();
        screen.draw(&mut self.batch);
        renderer.update_camera(&screen.camera().build_view_proj());

        match renderer.render(&self.batch) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(e) => warn!("[Engine] Render error: {e}"),
        }

        self.input.clear_frame_state();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            if let Some(screen) = self.screen.as_mut() {
                screen.resume();
            }
            return;
        }

        let window = match event_loop.create_window(window_attributes(&self.window_config)) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("[Engine] Failed to create window: {e}");
                self.fatal = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        apply_window_mode(&window, &self.window_config);

        let mut renderer = match pollster::block_on(Renderer::new(window)) {
            Ok(r) => r,
            Err(e) => {
                error!("[Engine] Failed to initialise renderer: {e}");
                self.fatal = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        if let Some(screen) = self.screen.as_mut() {
            screen.show(&mut renderer);
            let size = renderer.window.inner_size();
            screen.resize(size.width, size.height);
        }
        info!("[Engine] Window ready");
        self.renderer = Some(renderer);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(screen) = self.screen.as_mut() {
            screen.pause();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                if let Some(screen) = self.screen.as_mut() {
                    screen.resize(size.width, size.height);
                }
            }

            WindowEvent::Focused(focused) => {
                if let Some(screen) = self.screen.as_mut() {
                    if focused {
                        screen.resume();
                    } else {
                        // Releases for keys held while unfocused never arrive.
                        self.input.release_all();
                        screen.pause();
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.input.press(code),
                ElementState::Released => self.input.release(code),
            },

            _ => {}
        }
    }
}
