//! `egl-window`: a toplevel cleared to a solid color
//!
//! The drawable is created on the first configuration and resized on the following ones.

use wayland_client::{
    delegate_noop, protocol::wl_surface::WlSurface, Connection, Dispatch, QueueHandle,
};
use wayland_protocols::xdg::shell::client::{
    xdg_surface::{self, XdgSurface},
    xdg_toplevel::{self, XdgToplevel},
};

use super::Program;
use crate::{
    config::Config,
    event_loop::Lifecycle,
    reactor::{Palette, Reactor, Window},
    registry::{Capabilities, Capability, CapabilityHandler},
    render::RenderContext,
    session::Session,
    surface::{ShellWindow, Surface},
    Error, Result,
};

const TITLE: &str = "egl-window";

/// Client state of `egl-window`
#[derive(Debug)]
pub struct EglWindow {
    caps: Capabilities,
    reactor: Reactor<Window<ShellWindow>>,
}

impl EglWindow {
    /// Globals this program binds
    pub const CAPABILITIES: &'static [Capability] = &[Capability::Compositor, Capability::WmBase];

    pub fn new() -> Self {
        Self { caps: Capabilities::new(Self::CAPABILITIES), reactor: Reactor::new() }
    }
}

impl Program for EglWindow {
    /// Create the window, it is drawn once the compositor configures it
    fn open(&mut self, session: &mut Session<Self>, config: &Config) -> Result<()> {
        let context = RenderContext::new(session.connection())?;
        let surface = Surface::toplevel(&self.caps, &session.handle(), TITLE)?;
        let backend = ShellWindow::new(surface, context);
        self.reactor.attach(Window::new(backend, config.size, Palette::solid(config.window_color)));
        Ok(())
    }

    /// Destroy the window
    fn close(&mut self) {
        drop(self.reactor.detach());
    }
}

impl Drop for EglWindow {
    fn drop(&mut self) {
        self.close();
    }
}

impl Default for EglWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityHandler for EglWindow {
    fn capabilities(&mut self) -> &mut Capabilities {
        &mut self.caps
    }
}

impl Lifecycle for EglWindow {
    fn is_closed(&self) -> bool {
        self.reactor.is_closed()
    }

    fn take_failure(&mut self) -> Option<Error> {
        self.reactor.take_failure()
    }
}

impl Dispatch<XdgSurface, ()> for EglWindow {
    fn event(
        state: &mut Self,
        _: &XdgSurface,
        event: xdg_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let Some(event) = super::xdg_surface_event(event) {
            state.reactor.react(event);
        }
    }
}

impl Dispatch<XdgToplevel, ()> for EglWindow {
    fn event(
        state: &mut Self,
        _: &XdgToplevel,
        event: xdg_toplevel::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let Some(event) = super::toplevel_event(event) {
            state.reactor.react(event);
        }
    }
}

delegate_noop!(EglWindow: ignore WlSurface);

/// Run `egl-window` until its window is closed
pub fn run(config: &Config) -> Result<()> {
    let mut app = EglWindow::new();
    super::drive(&mut app, Connection::connect_to_env()?, config)
}
