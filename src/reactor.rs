//! Reactions of a window to compositor events
//!
//! The protocol glue of each program turns the events it receives into [`WindowEvent`]s and
//! hands them to a [`Reactor`], which calls the matching [`WindowHandler`] method. Handlers act
//! on the compositor only through the backend traits of this module, so the reactions can be
//! exercised without a compositor.
//!
//! A window goes `Created` → `Mapped` on its first configuration, stays `Mapped` across
//! resizes and ends `Closed` on a close request. The text-input window adds an orthogonal
//! `input_active` flag toggled by pointer presses.

use wayland_protocols::wp::text_input::zv3::client::zwp_text_input_v3::{
    ChangeCause, ContentHint, ContentPurpose,
};

use crate::{event_loop::Lifecycle, render::Color, Error, Result};

/// A compositor event, reduced to what the windows react to
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// The shell asks for a new configuration to be acknowledged
    ///
    /// Layer surfaces carry their size in this event, toplevels send it beforehand with
    /// [`WindowEvent::ToplevelConfigure`].
    Configure {
        /// Serial to acknowledge
        serial: u32,
        /// Size proposed along with the configuration
        size: Option<(i32, i32)>,
    },
    /// Pending toplevel size, `0` meaning "client decides"
    ToplevelConfigure {
        /// Proposed width
        width: i32,
        /// Proposed height
        height: i32,
    },
    /// The user or the compositor asked for the window to go away
    Close,
    /// The pointer entered the window
    PointerEnter {
        /// Serial to use with `set_cursor`
        serial: u32,
    },
    /// The pointer left the window
    PointerLeave,
    /// The pointer moved over the window
    PointerMotion {
        /// Surface-local abscissa
        x: f64,
        /// Surface-local ordinate
        y: f64,
    },
    /// A pointer button changed state
    PointerButton {
        /// `true` on press, `false` on release
        pressed: bool,
    },
    /// The text input focus entered the window
    TextInputEnter,
    /// The text input focus left the window
    TextInputLeave,
}

/// Life cycle of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Role assigned, waiting for the first configuration
    Created,
    /// Configured at least once and drawn
    Mapped,
    /// Close requested, terminal
    Closed,
}

/// Mutable state of a window, only changed by its handlers
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    pub width: i32,
    pub height: i32,
    pub phase: Phase,
    pub input_active: bool,
}

/// Presentation side of a window: its shell role and drawable
pub trait WindowBackend {
    /// Acknowledge a configuration through the shell role
    fn ack_configure(&mut self, serial: u32);
    /// Give the drawable a new size, creating it if needed
    fn resize(&mut self, width: i32, height: i32) -> Result<()>;
    /// Clear the drawable and present it
    fn redraw(&mut self, color: Color) -> Result<()>;
}

/// Requests of a `zwp_text_input_v3` object
pub trait TextInputBackend {
    fn enable(&mut self);
    fn disable(&mut self);
    fn set_surrounding_text(&mut self, text: &str, cursor: i32, anchor: i32);
    fn set_text_change_cause(&mut self, cause: ChangeCause);
    fn set_content_type(&mut self, hint: ContentHint, purpose: ContentPurpose);
    fn set_cursor_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn commit(&mut self);
}

/// Pointer able to show a custom cursor image
pub trait CursorBackend {
    /// Assign the cursor image, `serial` being the one of the enter event
    fn set_cursor(&mut self, serial: u32);
}

/// One method per event kind
///
/// Every method but [`configure()`][Self::configure()], [`close()`][Self::close()] and
/// [`is_closed()`][Self::is_closed()] defaults to doing nothing.
pub trait WindowHandler {
    fn configure(&mut self, serial: u32, size: Option<(i32, i32)>) -> Result<()>;

    fn toplevel_configure(&mut self, _width: i32, _height: i32) {}

    fn close(&mut self);

    fn pointer_enter(&mut self, _serial: u32) -> Result<()> {
        Ok(())
    }

    fn pointer_leave(&mut self) {}

    fn pointer_motion(&mut self, _x: f64, _y: f64) {}

    fn pointer_button(&mut self, _pressed: bool) -> Result<()> {
        Ok(())
    }

    fn text_input_enter(&mut self) -> Result<()> {
        Ok(())
    }

    fn text_input_leave(&mut self) {}

    fn is_closed(&self) -> bool;
}

/// Route an event to the handler method of its kind
pub fn dispatch<H: WindowHandler + ?Sized>(handler: &mut H, event: WindowEvent) -> Result<()> {
    match event {
        WindowEvent::Configure { serial, size } => handler.configure(serial, size)?,
        WindowEvent::ToplevelConfigure { width, height } => {
            handler.toplevel_configure(width, height)
        }
        WindowEvent::Close => handler.close(),
        WindowEvent::PointerEnter { serial } => handler.pointer_enter(serial)?,
        WindowEvent::PointerLeave => handler.pointer_leave(),
        WindowEvent::PointerMotion { x, y } => handler.pointer_motion(x, y),
        WindowEvent::PointerButton { pressed } => handler.pointer_button(pressed)?,
        WindowEvent::TextInputEnter => handler.text_input_enter()?,
        WindowEvent::TextInputLeave => handler.text_input_leave(),
    }
    Ok(())
}

/// Clear colors of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub idle: Color,
    pub active: Color,
}

impl Palette {
    /// The same color whatever the input state
    pub fn solid(color: Color) -> Self {
        Self { idle: color, active: color }
    }

    fn pick(&self, input_active: bool) -> Color {
        if input_active {
            self.active
        } else {
            self.idle
        }
    }
}

/// A window that acknowledges, resizes and redraws on every configuration
#[derive(Debug)]
pub struct Window<B> {
    backend: B,
    state: WindowState,
    palette: Palette,
}

impl<B: WindowBackend> Window<B> {
    pub fn new(backend: B, (width, height): (i32, i32), palette: Palette) -> Self {
        Self {
            backend,
            state: WindowState { width, height, phase: Phase::Created, input_active: false },
            palette,
        }
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Draw with the color matching the input state
    pub fn redraw(&mut self) -> Result<()> {
        self.backend.redraw(self.palette.pick(self.state.input_active))
    }

    /// Flip the input state, returns the new one
    pub fn toggle_input(&mut self) -> bool {
        self.state.input_active = !self.state.input_active;
        self.state.input_active
    }
}

impl<B: WindowBackend> WindowHandler for Window<B> {
    fn configure(&mut self, serial: u32, size: Option<(i32, i32)>) -> Result<()> {
        self.backend.ack_configure(serial);
        // a layer size is taken whole, or not at all
        if let Some((width, height)) = size.filter(|&(w, h)| w > 0 && h > 0) {
            self.state.width = width;
            self.state.height = height;
        }
        self.backend.resize(self.state.width, self.state.height)?;
        if self.state.phase == Phase::Created {
            log::debug!("Window mapped at {}x{}", self.state.width, self.state.height);
            self.state.phase = Phase::Mapped;
        }
        self.redraw()
    }

    fn toplevel_configure(&mut self, width: i32, height: i32) {
        if width > 0 {
            self.state.width = width;
        }
        if height > 0 {
            self.state.height = height;
        }
    }

    fn close(&mut self) {
        log::debug!("Window close requested");
        self.state.phase = Phase::Closed;
    }

    fn is_closed(&self) -> bool {
        self.state.phase == Phase::Closed
    }
}

/// A [`Window`] whose pointer presses toggle text input and which shows a custom cursor
#[derive(Debug)]
pub struct TextInputWindow<B, T, C> {
    window: Window<B>,
    text_input: T,
    cursor: C,
    cursor_rectangle: (i32, i32, i32, i32),
}

impl<B, T, C> TextInputWindow<B, T, C>
where
    B: WindowBackend,
    T: TextInputBackend,
    C: CursorBackend,
{
    pub fn new(
        window: Window<B>,
        text_input: T,
        cursor: C,
        cursor_rectangle: (i32, i32, i32, i32),
    ) -> Self {
        Self { window, text_input, cursor, cursor_rectangle }
    }

    pub fn window(&self) -> &Window<B> {
        &self.window
    }

    pub fn text_input(&self) -> &T {
        &self.text_input
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    /// Split into parts, in teardown order
    pub fn into_parts(self) -> (C, T, Window<B>) {
        (self.cursor, self.text_input, self.window)
    }

    fn announce(&mut self, cause: ChangeCause) {
        self.text_input.enable();
        self.text_input.set_surrounding_text("", 0, 0);
        self.text_input.set_text_change_cause(cause);
    }

    fn configure_text_input(&mut self) {
        let (x, y, width, height) = self.cursor_rectangle;
        self.announce(ChangeCause::InputMethod);
        self.text_input.set_content_type(ContentHint::empty(), ContentPurpose::Normal);
        self.text_input.set_cursor_rectangle(x, y, width, height);
        self.text_input.commit();
    }

    fn enable_text_input(&mut self) {
        self.announce(ChangeCause::Other);
        self.text_input.commit();
        self.configure_text_input();
    }

    fn disable_text_input(&mut self) {
        self.text_input.disable();
        self.text_input.commit();
    }
}

impl<B, T, C> WindowHandler for TextInputWindow<B, T, C>
where
    B: WindowBackend,
    T: TextInputBackend,
    C: CursorBackend,
{
    fn configure(&mut self, serial: u32, size: Option<(i32, i32)>) -> Result<()> {
        self.window.configure(serial, size)
    }

    fn toplevel_configure(&mut self, width: i32, height: i32) {
        self.window.toplevel_configure(width, height)
    }

    fn close(&mut self) {
        self.window.close()
    }

    fn pointer_enter(&mut self, serial: u32) -> Result<()> {
        self.cursor.set_cursor(serial);
        Ok(())
    }

    fn pointer_button(&mut self, pressed: bool) -> Result<()> {
        if !pressed {
            return Ok(());
        }
        let active = self.window.toggle_input();
        log::debug!("Text input {}", if active { "enabled" } else { "disabled" });
        self.window.redraw()?;
        if active {
            self.enable_text_input();
        } else {
            self.disable_text_input();
        }
        Ok(())
    }

    fn text_input_enter(&mut self) -> Result<()> {
        if self.window.state().input_active {
            self.configure_text_input();
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.window.is_closed()
    }
}

/// Owner of the handler of a program, remembers the first failure of a handler
#[derive(Debug)]
pub struct Reactor<H> {
    handler: Option<H>,
    failure: Option<Error>,
}

impl<H> Default for Reactor<H> {
    fn default() -> Self {
        Self { handler: None, failure: None }
    }
}

impl<H: WindowHandler> Reactor<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start routing events to `handler`
    pub fn attach(&mut self, handler: H) {
        self.handler = Some(handler);
    }

    /// Stop routing events and give the handler back
    pub fn detach(&mut self) -> Option<H> {
        self.handler.take()
    }

    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Route an event to the attached handler
    ///
    /// Events arriving while no handler is attached are dropped.
    pub fn react(&mut self, event: WindowEvent) {
        let Some(handler) = self.handler.as_mut() else {
            log::debug!("No window for {:?}, dropped", event);
            return;
        };
        if let Err(err) = dispatch(handler, event) {
            self.fail(err);
        }
    }

    /// Record a failure, the first one is kept
    pub fn fail(&mut self, err: Error) {
        if self.failure.is_none() {
            self.failure = Some(err);
        }
    }
}

impl<H: WindowHandler> Lifecycle for Reactor<H> {
    fn is_closed(&self) -> bool {
        self.handler.as_ref().map(|h| h.is_closed()).unwrap_or(false)
    }

    fn take_failure(&mut self) -> Option<Error> {
        self.failure.take()
    }
}
