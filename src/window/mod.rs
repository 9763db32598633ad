pub mod config;

pub use config::{WindowConfig, WindowMode};

use log::warn;
use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window, WindowAttributes};

/// Window attributes for the initial window: title and requested size.
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(&config.title)
        .with_inner_size(PhysicalSize::new(config.width.max(1), config.height.max(1)))
        .with_resizable(true)
}

/// Switch `window` into the presentation mode named by `config`.
///
/// `Fullscreen` picks the current monitor's video mode closest in pixel area
/// to `config.width × config.height`, and falls back to borderless when the
/// monitor reports no modes or cannot be queried.
pub fn apply_window_mode(window: &Window, config: &WindowConfig) {
    match config.mode {
        WindowMode::Windowed => window.set_fullscreen(None),

        WindowMode::Borderless => window.set_fullscreen(Some(Fullscreen::Borderless(None))),

        WindowMode::Fullscreen => {
            let Some(monitor) = window.current_monitor() else {
                warn!("[Window] No monitor handle; using borderless fullscreen");
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                return;
            };

            let target_area = config.width as u64 * config.height as u64;
            let best = monitor.video_modes().min_by_key(|vm| {
                let s = vm.size();
                (s.width as u64 * s.height as u64).abs_diff(target_area)
            });

            let fullscreen = match best {
                Some(vm) => Fullscreen::Exclusive(vm),
                None => Fullscreen::Borderless(Some(monitor)),
            };
            window.set_fullscreen(Some(fullscreen));
        }
    }
}
