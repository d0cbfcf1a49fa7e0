//! The three demonstration programs
//!
//! Each submodule exposes a `run()` function handing its client state to [`drive()`], which
//! takes it from connection to teardown. The protocol events they receive are reduced to
//! [`WindowEvent`]s by the functions of this module before reaching their
//! [`Reactor`](crate::reactor::Reactor).

use wayland_client::{protocol::wl_pointer, Connection, WEnum};
use wayland_protocols::{
    wp::text_input::zv3::client::zwp_text_input_v3,
    xdg::shell::client::{xdg_surface, xdg_toplevel},
};
use wayland_protocols_wlr::layer_shell::v1::client::zwlr_layer_surface_v1;

use crate::{
    config::Config,
    event_loop::{self, Lifecycle},
    reactor::WindowEvent,
    registry::CapabilityHandler,
    session::Session,
    Result,
};

pub mod egl_window;
pub mod layer_shell;
pub mod text_input;

pub use egl_window::EglWindow;
pub use layer_shell::LayerPanel;
pub use text_input::TextInputDemo;

/// A client state owning compositor objects
pub trait Program: CapabilityHandler + Lifecycle + Sized + 'static {
    /// Create the objects of the program, up to the point where it only reacts to events
    fn open(&mut self, session: &mut Session<Self>, config: &Config) -> Result<()>;

    /// Destroy every object created by [`open()`][Self::open()]
    ///
    /// Called once more when the state is dropped, so it must do nothing the second time.
    fn close(&mut self);
}

/// Bootstrap `app` on `conn`, open it and dispatch until it is closed
///
/// Once the bootstrap succeeded `app` is closed and the connection flushed on every exit, so
/// its objects are destroyed while the connection is still up. The first error wins.
pub fn drive<P: Program>(app: &mut P, conn: Connection, config: &Config) -> Result<()> {
    let mut session = Session::with_connection(conn, app)?;
    let outcome = app
        .open(&mut session, config)
        .and_then(|()| event_loop::run(&mut session, app))
        .map(|_| ());
    app.close();
    let flushed = session.flush();
    outcome.and(flushed)
}

pub(crate) fn xdg_surface_event(event: xdg_surface::Event) -> Option<WindowEvent> {
    match event {
        xdg_surface::Event::Configure { serial } => {
            Some(WindowEvent::Configure { serial, size: None })
        }
        _ => None,
    }
}

pub(crate) fn toplevel_event(event: xdg_toplevel::Event) -> Option<WindowEvent> {
    match event {
        xdg_toplevel::Event::Configure { width, height, .. } => {
            Some(WindowEvent::ToplevelConfigure { width, height })
        }
        xdg_toplevel::Event::Close => Some(WindowEvent::Close),
        _ => None,
    }
}

pub(crate) fn layer_surface_event(event: zwlr_layer_surface_v1::Event) -> Option<WindowEvent> {
    match event {
        zwlr_layer_surface_v1::Event::Configure { serial, width, height } => {
            let size = (clamp_size(width), clamp_size(height));
            Some(WindowEvent::Configure { serial, size: Some(size) })
        }
        zwlr_layer_surface_v1::Event::Closed => Some(WindowEvent::Close),
        _ => None,
    }
}

pub(crate) fn pointer_event(event: wl_pointer::Event) -> Option<WindowEvent> {
    match event {
        wl_pointer::Event::Enter { serial, .. } => Some(WindowEvent::PointerEnter { serial }),
        wl_pointer::Event::Leave { .. } => Some(WindowEvent::PointerLeave),
        wl_pointer::Event::Motion { surface_x, surface_y, .. } => {
            Some(WindowEvent::PointerMotion { x: surface_x, y: surface_y })
        }
        wl_pointer::Event::Button { state, .. } => Some(WindowEvent::PointerButton {
            pressed: matches!(state, WEnum::Value(wl_pointer::ButtonState::Pressed)),
        }),
        // axis and frame events
        _ => None,
    }
}

pub(crate) fn text_input_event(event: zwp_text_input_v3::Event) -> Option<WindowEvent> {
    match event {
        zwp_text_input_v3::Event::Enter { .. } => Some(WindowEvent::TextInputEnter),
        zwp_text_input_v3::Event::Leave { .. } => Some(WindowEvent::TextInputLeave),
        _ => None,
    }
}

// 0 lets the window keep its current size
fn clamp_size(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(0)
}
