use std::ffi::CStr;
use std::num::NonZeroU32;
use std::time::Duration;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, NotCurrentGlContext,
    PossiblyCurrentContext, PossiblyCurrentGlContext, Version,
};
use glutin::display::{Display, DisplayApiPreference, GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::GlWindow;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::device::{ContextConfig, GlowDriver};
use crate::error::{Error, Result};

use super::{ContextProvider, ResizeCallback, WindowConfig};

/// Identifies the provider's window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(WindowId);

enum ContextSlot {
    NotCurrent(NotCurrentContext),
    Current(PossiblyCurrentContext),
    // Only observable if making the context current failed.
    Lost,
}

// Field order is drop order: context, surface, then the window they render to.
struct WindowSlot {
    context: ContextSlot,
    surface: Surface<WindowSurface>,
    window: Window,
    vsync: bool,
}

impl WindowSlot {
    fn resize(&self, width: u32, height: u32) {
        let (ContextSlot::Current(context), Some(w), Some(h)) =
            (&self.context, NonZeroU32::new(width), NonZeroU32::new(height))
        else {
            return;
        };
        self.surface.resize(context, w, h);
    }
}

#[derive(Default)]
struct PumpState {
    slot: Option<WindowSlot>,
    close_requested: bool,
    resize_callback: Option<ResizeCallback>,
}

impl ApplicationHandler for PumpState {
    // The window is created eagerly by `create_window`; nothing to do here.
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(slot) = self.slot.as_ref() else { return };
        if slot.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                slot.resize(size.width, size.height);
                if let Some(callback) = self.resize_callback.as_mut() {
                    callback(size.width, size.height);
                }
            }
            _ => {}
        }
    }
}

/// Desktop [`ContextProvider`]: one `winit` window with a `glutin` OpenGL
/// core-profile context, pumped without blocking.
///
/// `winit` allows a single event loop per process, so at most one provider
/// can be constructed.
pub struct GlutinProvider {
    state: PumpState,
    created: bool,
    event_loop: EventLoop<()>,
}

impl GlutinProvider {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().map_err(|e| Error::WindowCreation(format!("event loop: {e}")))?;
        Ok(Self {
            state: PumpState::default(),
            created: false,
            event_loop,
        })
    }

    fn slot(&self, window: WindowHandle) -> Option<&WindowSlot> {
        self.state.slot.as_ref().filter(|s| s.window.id() == window.0)
    }

    fn slot_mut(&mut self, window: WindowHandle) -> Option<&mut WindowSlot> {
        self.state.slot.as_mut().filter(|s| s.window.id() == window.0)
    }
}

impl std::fmt::Debug for GlutinProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlutinProvider")
            .field("window", &self.state.slot.as_ref().map(|s| s.window.id()))
            .field("created", &self.created)
            .finish()
    }
}

// Prefer the config with the most samples, as the glutin examples do. EGL
// may offer none at all.
fn pick_config(configs: impl Iterator<Item = Config>) -> Result<Config> {
    configs
        .reduce(|best, next| if next.num_samples() > best.num_samples() { next } else { best })
        .ok_or_else(|| Error::WindowCreation("no OpenGL config matches the window".to_string()))
}

// The platform's native API first, EGL as the fallback. WGL needs the window
// up front to offer modern contexts.
#[cfg(windows)]
fn display_preference(window: Option<&Window>) -> DisplayApiPreference {
    let handle = window
        .and_then(|w| w.window_handle().ok())
        .map(|h| h.as_raw());
    DisplayApiPreference::WglThenEgl(handle)
}

#[cfg(target_os = "macos")]
fn display_preference(_window: Option<&Window>) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(target_os = "android")]
fn display_preference(_window: Option<&Window>) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

#[cfg(all(unix, not(target_vendor = "apple"), not(target_os = "android")))]
fn display_preference(_window: Option<&Window>) -> DisplayApiPreference {
    DisplayApiPreference::GlxThenEgl(Box::new(winit::platform::x11::register_xlib_error_hook))
}

impl ContextProvider for GlutinProvider {
    type Window = WindowHandle;
    type Gl = GlowDriver;

    fn create_window(&mut self, window: &WindowConfig, context: &ContextConfig) -> Result<WindowHandle> {
        if self.created {
            return Err(Error::WindowAlreadyCreated);
        }

        let attributes = Window::default_attributes()
            .with_title(window.title.clone())
            .with_inner_size(LogicalSize::new(window.width, window.height))
            .with_active(false);

        #[cfg(windows)]
        #[allow(deprecated)]
        let early = Some(
            self.event_loop
                .create_window(attributes.clone())
                .map_err(|e| Error::WindowCreation(e.to_string()))?,
        );
        #[cfg(not(windows))]
        let early: Option<Window> = None;

        let raw_display = self
            .event_loop
            .display_handle()
            .map_err(|e| Error::WindowCreation(e.to_string()))?
            .as_raw();
        // SAFETY: the display handle belongs to `self.event_loop`, which
        // outlives every window, surface and context created from it.
        let display = unsafe { Display::new(raw_display, display_preference(early.as_ref())) }
            .map_err(|e| Error::WindowCreation(format!("display: {e}")))?;

        let template = match early.as_ref().and_then(|w| w.window_handle().ok()) {
            Some(handle) => ConfigTemplateBuilder::new().compatible_with_native_window(handle.as_raw()),
            None => ConfigTemplateBuilder::new(),
        }
        .build();
        // SAFETY: the template's native window, if any, is `early`, still alive.
        let gl_config = pick_config(
            unsafe { display.find_configs(template) }
                .map_err(|e| Error::WindowCreation(format!("config: {e}")))?,
        )?;

        let built = match early {
            Some(window) => window,
            None => glutin_winit::finalize_window(&self.event_loop, attributes, &gl_config)
                .map_err(|e| Error::WindowCreation(e.to_string()))?,
        };

        let raw_handle = built
            .window_handle()
            .map_err(|e| Error::WindowCreation(e.to_string()))?
            .as_raw();

        let (major, minor) = context.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_handle));

        // SAFETY: `raw_handle` belongs to `built`, which outlives the context
        // inside `WindowSlot`.
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| Error::ContextInit(format!("OpenGL {major}.{minor} core: {e}")))?;

        let surface_attributes = built
            .build_surface_attributes(Default::default())
            .map_err(|e| Error::ContextInit(e.to_string()))?;
        // SAFETY: as above, the window outlives the surface.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| Error::ContextInit(e.to_string()))?;

        let id = built.id();
        log::info!(
            "created window {:?} \"{}\" ({}x{})",
            id,
            window.title,
            window.width,
            window.height
        );

        self.created = true;
        self.state.close_requested = false;
        self.state.slot = Some(WindowSlot {
            context: ContextSlot::NotCurrent(not_current),
            surface,
            window: built,
            vsync: context.vsync,
        });
        Ok(WindowHandle(id))
    }

    fn make_context_current(&mut self, window: WindowHandle) -> Result<()> {
        let slot = self
            .slot_mut(window)
            .ok_or_else(|| Error::ContextInit("unknown window".to_string()))?;

        match std::mem::replace(&mut slot.context, ContextSlot::Lost) {
            ContextSlot::NotCurrent(context) => {
                let current = context
                    .make_current(&slot.surface)
                    .map_err(|e| Error::ContextInit(e.to_string()))?;
                slot.context = ContextSlot::Current(current);
            }
            ContextSlot::Current(context) => {
                context
                    .make_current(&slot.surface)
                    .map_err(|e| Error::ContextInit(e.to_string()))?;
                slot.context = ContextSlot::Current(context);
            }
            ContextSlot::Lost => return Err(Error::ContextInit("context was lost".to_string())),
        }

        if slot.vsync {
            if let ContextSlot::Current(context) = &slot.context {
                let interval = SwapInterval::Wait(NonZeroU32::MIN);
                if let Err(e) = slot.surface.set_swap_interval(context, interval) {
                    log::warn!("failed to enable vsync: {e}");
                }
            }
        }
        Ok(())
    }

    fn load_gl(&mut self, window: WindowHandle) -> Result<GlowDriver> {
        let slot = self
            .slot(window)
            .ok_or_else(|| Error::ContextInit("unknown window".to_string()))?;
        let ContextSlot::Current(context) = &slot.context else {
            return Err(Error::ContextInit("context is not current".to_string()));
        };

        let display = context.display();
        // SAFETY: the context was made current on this thread above, and the
        // provider is `!Send` through its event loop, so it stays here.
        let driver = unsafe { GlowDriver::from_loader(|symbol: &CStr| display.get_proc_address(symbol).cast()) };
        Ok(driver)
    }

    fn framebuffer_size(&self, window: WindowHandle) -> (u32, u32) {
        self.slot(window)
            .map(|s| {
                let size = s.window.inner_size();
                (size.width, size.height)
            })
            .unwrap_or((0, 0))
    }

    fn should_close(&self, window: WindowHandle) -> bool {
        self.state.close_requested || self.slot(window).is_none()
    }

    fn swap_buffers(&mut self, window: WindowHandle) {
        let Some(slot) = self.slot(window) else { return };
        if let ContextSlot::Current(context) = &slot.context {
            if let Err(e) = slot.surface.swap_buffers(context) {
                log::error!("swap_buffers failed: {e}");
            }
        }
    }

    fn poll_events(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.state.close_requested = true;
        }
    }

    fn set_resize_callback(&mut self, _window: WindowHandle, callback: ResizeCallback) {
        self.state.resize_callback = Some(callback);
    }

    fn destroy_window(&mut self, window: WindowHandle) {
        if self.slot(window).is_some() {
            self.state.slot = None;
            self.state.resize_callback = None;
            log::info!("destroyed window {:?}", window.0);
        }
    }
}
