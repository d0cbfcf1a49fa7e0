//! `layer-shell-subsurface`: a layer-shell panel with a sub-surface drawn inside it
//!
//! The sub-surface is desynchronized, it is drawn once after the panel got its first
//! configuration and never waits for a commit of the panel.

use std::rc::Rc;

use wayland_client::{
    delegate_noop,
    protocol::{wl_subsurface::WlSubsurface, wl_surface::WlSurface},
    Connection, Dispatch, QueueHandle,
};
use wayland_protocols_wlr::layer_shell::v1::client::{
    zwlr_layer_shell_v1::Layer,
    zwlr_layer_surface_v1::{self, ZwlrLayerSurfaceV1},
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

/// Client state of `layer-shell-subsurface`
#[derive(Debug)]
pub struct LayerPanel {
    caps: Capabilities,
    // dropped before the panel it is drawn in
    child: Option<Surface>,
    reactor: Reactor<Window<ShellWindow>>,
}

impl LayerPanel {
    /// Globals this program binds
    pub const CAPABILITIES: &'static [Capability] =
        &[Capability::Compositor, Capability::Subcompositor, Capability::LayerShell];

    pub fn new() -> Self {
        Self { caps: Capabilities::new(Self::CAPABILITIES), child: None, reactor: Reactor::new() }
    }

    /// Create the panel on the top layer, with its drawable
    pub fn open_panel(
        &mut self,
        session: &Session<Self>,
        context: &Rc<RenderContext>,
        config: &Config,
    ) -> Result<()> {
        let mut surface = Surface::layer(
            &self.caps,
            &session.handle(),
            Layer::Top,
            &config.layer.namespace,
            config.size,
        )?;
        surface.bind_drawable(context, config.size)?;
        let backend = ShellWindow::new(surface, context.clone());
        self.reactor.attach(Window::new(backend, config.size, Palette::solid(config.window_color)));
        Ok(())
    }

    /// Create the sub-surface of the panel, it is drawn by [`draw_child()`][Self::draw_child()]
    pub fn open_child(
        &mut self,
        session: &Session<Self>,
        context: &Rc<RenderContext>,
        config: &Config,
    ) -> Result<()> {
        let panel = self.panel()?;
        let mut child =
            Surface::subsurface(&self.caps, &session.handle(), panel, config.layer.child_offset)?;
        child.bind_drawable(context, config.layer.child_size(config.size))?;
        self.child = Some(child);
        Ok(())
    }

    pub fn draw_child(&self, config: &Config) -> Result<()> {
        self.child.as_ref().ok_or(Error::NoDrawable)?.draw(config.layer.child_color)
    }

    fn panel(&self) -> Result<&Surface> {
        let window = self.reactor.handler().ok_or(Error::NoDrawable)?;
        Ok(window.backend().surface())
    }
}

impl Program for LayerPanel {
    /// Create the panel and its sub-surface, then draw the sub-surface once the panel is
    /// configured
    fn open(&mut self, session: &mut Session<Self>, config: &Config) -> Result<()> {
        let context = RenderContext::new(session.connection())?;
        self.open_panel(session, &context, config)?;
        self.open_child(session, &context, config)?;

        // the panel is configured and drawn during the first round trip
        settle(session, self)?;
        self.draw_child(config)?;
        settle(session, self)
    }

    /// Destroy the sub-surface, then the panel
    fn close(&mut self) {
        self.child = None;
        drop(self.reactor.detach());
    }
}

impl Drop for LayerPanel {
    fn drop(&mut self) {
        self.close();
    }
}

impl Default for LayerPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityHandler for LayerPanel {
    fn capabilities(&mut self) -> &mut Capabilities {
        &mut self.caps
    }
}

impl Lifecycle for LayerPanel {
    fn is_closed(&self) -> bool {
        self.reactor.is_closed()
    }

    fn take_failure(&mut self) -> Option<Error> {
        self.reactor.take_failure()
    }
}

impl Dispatch<ZwlrLayerSurfaceV1, ()> for LayerPanel {
    fn event(
        state: &mut Self,
        _: &ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let Some(event) = super::layer_surface_event(event) {
            state.reactor.react(event);
        }
    }
}

delegate_noop!(LayerPanel: ignore WlSurface);
delegate_noop!(LayerPanel: WlSubsurface);

/// Run `layer-shell-subsurface` until the compositor closes the panel
pub fn run(config: &Config) -> Result<()> {
    let mut app = LayerPanel::new();
    super::drive(&mut app, Connection::connect_to_env()?, config)
}

// round trip, then report what the handlers failed at
fn settle(session: &mut Session<LayerPanel>, app: &mut LayerPanel) -> Result<()> {
    session.roundtrip(app)?;
    match app.take_failure() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
