/// LveWindow - winit window implementing the renderer's `Surface`
///
/// The event loop is pumped by hand (`poll_events` / `wait_events`) so the
/// application keeps control of its frame loop.

use std::time::Duration;
use lve_engine::lve::{Error, Result};
use lve_engine::lve::device::Extent2D;
use lve_engine::lve::render::Surface;
use lve_engine::{engine_debug, engine_error};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

/// Window-side state updated by event handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub extent: Extent2D,
    pub resized: bool,
    pub close_requested: bool,
}

impl WindowState {
    pub fn new(extent: Extent2D) -> Self {
        Self {
            extent,
            resized: false,
            close_requested: false,
        }
    }

    /// Apply one window event
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => {
                self.extent = Extent2D::new(size.width, size.height);
                self.resized = true;
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.handle_event(&event);
    }
}

/// Native window plus its event loop
pub struct LveWindow {
    // Declared first so the window is dropped before its event loop
    window: Window,
    event_loop: EventLoop<()>,
    state: WindowState,
    title: String,
}

impl LveWindow {
    /// Open a resizable window
    #[allow(deprecated)]
    pub fn new(width: u32, height: u32, title: &str) -> Result<Self> {
        let event_loop = EventLoop::new().map_err(|e| {
            engine_error!("lve::Window", "Failed to create event loop: {}", e);
            Error::InitializationFailed(format!("Failed to create event loop: {}", e))
        })?;

        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(true);

        let window = event_loop.create_window(attributes).map_err(|e| {
            engine_error!("lve::Window", "Failed to create window: {}", e);
            Error::InitializationFailed(format!("Failed to create window: {}", e))
        })?;

        let size = window.inner_size();
        engine_debug!("lve::Window", "Window '{}' opened at {}x{}", title, size.width, size.height);

        Ok(Self {
            window,
            event_loop,
            state: WindowState::new(Extent2D::new(size.width, size.height)),
            title: title.to_string(),
        })
    }

    /// Native window (for device creation)
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Process pending events without blocking
    pub fn poll_events(&mut self) {
        self.pump(Some(Duration::ZERO));
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        let status = self.event_loop.pump_app_events(timeout, &mut self.state);
        if let PumpStatus::Exit(_) = status {
            self.state.close_requested = true;
        }
    }
}

impl Surface for LveWindow {
    fn extent(&self) -> Extent2D {
        self.state.extent
    }

    fn was_resized(&self) -> bool {
        self.state.resized
    }

    fn reset_resized_flag(&mut self) {
        self.state.resized = false;
    }

    fn wait_events(&mut self) {
        self.pump(None);
    }

    fn should_close(&self) -> bool {
        self.state.close_requested
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
