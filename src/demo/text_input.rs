//! `text-input`: a toplevel whose pointer clicks enable and disable text input
//!
//! The window shows a custom cursor image and changes color while text input is enabled.

use std::rc::Rc;

use wayland_client::{
    delegate_noop,
    protocol::{wl_pointer::{self, WlPointer}, wl_surface::WlSurface},
    Connection, Dispatch, Proxy, QueueHandle,
};
use wayland_protocols::{
    wp::text_input::zv3::client::zwp_text_input_v3::{
        self, ChangeCause, ContentHint, ContentPurpose, ZwpTextInputV3,
    },
    xdg::shell::client::{
        xdg_surface::{self, XdgSurface},
        xdg_toplevel::{self, XdgToplevel},
    },
};

use super::Program;
use crate::{
    config::Config,
    event_loop::Lifecycle,
    reactor::{
        CursorBackend, Palette, Reactor, TextInputBackend, TextInputWindow, Window, WindowBackend,
    },
    registry::{Capabilities, Capability, CapabilityHandler},
    render::RenderContext,
    session::Session,
    surface::{ShellWindow, Surface},
    Error, Result,
};

const TITLE: &str = "text-input";

/// A `zwp_text_input_v3`, destroyed on drop
#[derive(Debug)]
pub struct TextInput(ZwpTextInputV3);

impl TextInput {
    /// The text input of the seat
    pub fn new<D>(caps: &Capabilities, qh: &QueueHandle<D>) -> Result<Self>
    where
        D: Dispatch<ZwpTextInputV3, ()> + 'static,
    {
        let seat = caps.seat()?;
        Ok(Self(caps.text_input_manager()?.get_text_input(seat, qh, ())))
    }
}

impl TextInputBackend for TextInput {
    fn enable(&mut self) {
        self.0.enable();
    }

    fn disable(&mut self) {
        self.0.disable();
    }

    fn set_surrounding_text(&mut self, text: &str, cursor: i32, anchor: i32) {
        self.0.set_surrounding_text(text.into(), cursor, anchor);
    }

    fn set_text_change_cause(&mut self, cause: ChangeCause) {
        self.0.set_text_change_cause(cause);
    }

    fn set_content_type(&mut self, hint: ContentHint, purpose: ContentPurpose) {
        self.0.set_content_type(hint, purpose);
    }

    fn set_cursor_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.0.set_cursor_rectangle(x, y, width, height);
    }

    fn commit(&mut self) {
        self.0.commit();
    }
}

impl Drop for TextInput {
    fn drop(&mut self) {
        self.0.destroy();
    }
}

/// The pointer of the seat and the cursor image it shows over the window
#[derive(Debug)]
pub struct CursorPointer {
    pointer: WlPointer,
    cursor: Surface,
    hotspot: (i32, i32),
}

impl CursorPointer {
    /// The pointer of the seat, showing `cursor` with its hotspot at `hotspot`
    pub fn new<D>(
        caps: &Capabilities,
        qh: &QueueHandle<D>,
        cursor: Surface,
        hotspot: (i32, i32),
    ) -> Result<Self>
    where
        D: Dispatch<WlPointer, ()> + 'static,
    {
        let pointer = caps.seat()?.get_pointer(qh, ());
        Ok(Self { pointer, cursor, hotspot })
    }

    /// Release the pointer, handing back the cursor image
    ///
    /// `wl_pointer.release` only exists since version 3, older pointers are left to the
    /// connection teardown.
    pub fn release(self) -> Surface {
        if self.pointer.version() >= 3 {
            self.pointer.release();
        }
        self.cursor
    }
}

impl CursorBackend for CursorPointer {
    fn set_cursor(&mut self, serial: u32) {
        let (x, y) = self.hotspot;
        self.pointer.set_cursor(serial, Some(self.cursor.wl_surface()), x, y);
    }
}

type Handler = TextInputWindow<ShellWindow, TextInput, CursorPointer>;

/// Destroy a text-input window
///
/// The pointer is released first, then the text input and the window go. The cursor image is
/// destroyed last since the released pointer may still show it.
pub fn tear_down<B: WindowBackend>(handler: TextInputWindow<B, TextInput, CursorPointer>) {
    let (pointer, text_input, window) = handler.into_parts();
    let cursor = pointer.release();
    drop(text_input);
    drop(window);
    drop(cursor);
}

/// Client state of `text-input`
#[derive(Debug)]
pub struct TextInputDemo {
    caps: Capabilities,
    reactor: Reactor<Handler>,
}

impl TextInputDemo {
    /// Globals this program binds
    pub const CAPABILITIES: &'static [Capability] = &[
        Capability::Compositor,
        Capability::WmBase,
        Capability::Seat,
        Capability::TextInputManager,
    ];

    pub fn new() -> Self {
        Self { caps: Capabilities::new(Self::CAPABILITIES), reactor: Reactor::new() }
    }
}

impl Program for TextInputDemo {
    /// Create the window, the cursor image, the pointer and the text input
    fn open(&mut self, session: &mut Session<Self>, config: &Config) -> Result<()> {
        let qh = session.handle();
        let settings = &config.text_input;
        let context = RenderContext::new(session.connection())?;

        let mut surface = Surface::toplevel(&self.caps, &qh, TITLE)?;
        surface.bind_drawable(&context, config.size)?;
        let palette = Palette { idle: settings.idle_color, active: settings.active_color };
        let backend = ShellWindow::new(surface, Rc::clone(&context));
        let window = Window::new(backend, config.size, palette);

        let mut cursor = Surface::plain(&self.caps, &qh)?;
        let side = settings.cursor_size;
        cursor.bind_drawable(&context, (side, side))?;
        cursor.draw(settings.cursor_color)?;

        let pointer = CursorPointer::new(&self.caps, &qh, cursor, settings.cursor_hotspot)?;
        let text_input = TextInput::new(&self.caps, &qh)?;

        self.reactor.attach(TextInputWindow::new(
            window,
            text_input,
            pointer,
            settings.cursor_rectangle,
        ));
        Ok(())
    }

    fn close(&mut self) {
        if let Some(handler) = self.reactor.detach() {
            tear_down(handler);
        }
    }
}

impl Drop for TextInputDemo {
    fn drop(&mut self) {
        self.close();
    }
}

impl Default for TextInputDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityHandler for TextInputDemo {
    fn capabilities(&mut self) -> &mut Capabilities {
        &mut self.caps
    }
}

impl Lifecycle for TextInputDemo {
    fn is_closed(&self) -> bool {
        self.reactor.is_closed()
    }

    fn take_failure(&mut self) -> Option<Error> {
        self.reactor.take_failure()
    }
}

impl Dispatch<XdgSurface, ()> for TextInputDemo {
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

impl Dispatch<XdgToplevel, ()> for TextInputDemo {
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

impl Dispatch<WlPointer, ()> for TextInputDemo {
    fn event(
        state: &mut Self,
        _: &WlPointer,
        event: wl_pointer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let Some(event) = super::pointer_event(event) {
            state.reactor.react(event);
        }
    }
}

impl Dispatch<ZwpTextInputV3, ()> for TextInputDemo {
    fn event(
        state: &mut Self,
        _: &ZwpTextInputV3,
        event: zwp_text_input_v3::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let Some(event) = super::text_input_event(event) {
            state.reactor.react(event);
        }
    }
}

delegate_noop!(TextInputDemo: ignore WlSurface);

/// Run `text-input` until its window is closed
pub fn run(config: &Config) -> Result<()> {
    let mut app = TextInputDemo::new();
    super::drive(&mut app, Connection::connect_to_env()?, config)
}
