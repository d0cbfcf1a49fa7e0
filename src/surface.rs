//! Surfaces, their shell roles and their drawables
//!
//! A [`Surface`] owns a `wl_surface`, the protocol objects giving it a role and, once bound, a
//! [`Drawable`]. Dropping it destroys them in the order the libraries require: the EGL surface,
//! then the `wl_egl_window`, then the role objects, then the `wl_surface`.

use std::rc::Rc;

use wayland_client::{
    protocol::{wl_subsurface::WlSubsurface, wl_surface::WlSurface},
    Dispatch, Proxy, QueueHandle,
};
use wayland_egl::WlEglSurface;
use wayland_protocols::xdg::shell::client::{xdg_surface::XdgSurface, xdg_toplevel::XdgToplevel};
use wayland_protocols_wlr::layer_shell::v1::client::{
    zwlr_layer_shell_v1::Layer, zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
};

use crate::{
    reactor::WindowBackend,
    registry::Capabilities,
    render::{Color, RenderContext},
    sys::egl::EGLSurface,
    Error, Result,
};

/// The shell role of a surface
#[derive(Debug)]
pub enum Role {
    /// No role yet, e.g. a cursor image
    None,
    /// A regular application window
    Toplevel { xdg_surface: XdgSurface, toplevel: XdgToplevel },
    /// A panel placed on a compositor layer
    Layer(ZwlrLayerSurfaceV1),
    /// A region drawn inside a parent surface
    Subsurface(WlSubsurface),
}

impl Role {
    /// Acknowledge a configuration, if this role has configurations at all
    pub fn ack_configure(&self, serial: u32) {
        match self {
            Role::Toplevel { xdg_surface, .. } => xdg_surface.ack_configure(serial),
            Role::Layer(layer_surface) => layer_surface.ack_configure(serial),
            Role::None | Role::Subsurface(_) => {}
        }
    }

    fn destroy(&self) {
        match self {
            Role::None => {}
            Role::Toplevel { xdg_surface, toplevel } => {
                toplevel.destroy();
                xdg_surface.destroy();
            }
            Role::Layer(layer_surface) => layer_surface.destroy(),
            Role::Subsurface(subsurface) => subsurface.destroy(),
        }
    }
}

/// A `wl_egl_window` and the EGL surface rendering into it
pub struct Drawable {
    egl_surface: EGLSurface,
    window: WlEglSurface,
    context: Rc<RenderContext>,
}

impl Drawable {
    fn new(surface: &WlSurface, context: &Rc<RenderContext>, (w, h): (i32, i32)) -> Result<Self> {
        let window = WlEglSurface::new(surface.id(), w, h)?;
        let egl_surface = context.create_window_surface(window.ptr())?;
        Ok(Self { egl_surface, window, context: context.clone() })
    }

    /// Resize the native window, keeping its top-left corner in place
    pub fn resize(&self, width: i32, height: i32) {
        self.window.resize(width, height, 0, 0);
    }

    /// Clear to `color` and present
    pub fn draw(&self, color: Color) -> Result<()> {
        self.context.clear(self.egl_surface, color)
    }
}

impl std::fmt::Debug for Drawable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawable")
            .field("egl_surface", &self.egl_surface)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl Drop for Drawable {
    fn drop(&mut self) {
        // the wl_egl_window field is dropped right after
        self.context.destroy_window_surface(self.egl_surface);
    }
}

/// A presentable surface with its role and drawable
#[derive(Debug)]
pub struct Surface {
    drawable: Option<Drawable>,
    role: Role,
    wl_surface: WlSurface,
    committed: bool,
}

impl Surface {
    /// A surface without role, committed once
    pub fn plain<D>(caps: &Capabilities, qh: &QueueHandle<D>) -> Result<Self>
    where
        D: Dispatch<WlSurface, ()> + 'static,
    {
        let wl_surface = caps.compositor()?.create_surface(qh, ());
        let mut surface = Self { drawable: None, role: Role::None, wl_surface, committed: false };
        surface.commit();
        Ok(surface)
    }

    /// A toplevel window, committed once so the compositor sends its first configuration
    pub fn toplevel<D>(caps: &Capabilities, qh: &QueueHandle<D>, title: &str) -> Result<Self>
    where
        D: Dispatch<WlSurface, ()> + Dispatch<XdgSurface, ()> + Dispatch<XdgToplevel, ()> + 'static,
    {
        let wm_base = caps.wm_base()?;
        let wl_surface = caps.compositor()?.create_surface(qh, ());
        let xdg_surface = wm_base.get_xdg_surface(&wl_surface, qh, ());
        let toplevel = xdg_surface.get_toplevel(qh, ());
        toplevel.set_title(title.into());
        let mut surface = Self {
            drawable: None,
            role: Role::Toplevel { xdg_surface, toplevel },
            wl_surface,
            committed: false,
        };
        surface.commit();
        Ok(surface)
    }

    /// A layer-shell panel of a fixed size, committed once
    pub fn layer<D>(
        caps: &Capabilities,
        qh: &QueueHandle<D>,
        layer: Layer,
        namespace: &str,
        (width, height): (i32, i32),
    ) -> Result<Self>
    where
        D: Dispatch<WlSurface, ()> + Dispatch<ZwlrLayerSurfaceV1, ()> + 'static,
    {
        let layer_shell = caps.layer_shell()?;
        let wl_surface = caps.compositor()?.create_surface(qh, ());
        let layer_surface =
            layer_shell.get_layer_surface(&wl_surface, None, layer, namespace.into(), qh, ());
        layer_surface.set_size(width.max(0) as u32, height.max(0) as u32);
        let mut surface =
            Self { drawable: None, role: Role::Layer(layer_surface), wl_surface, committed: false };
        surface.commit();
        Ok(surface)
    }

    /// A desynchronized sub-surface of `parent` at `position`, committed once
    ///
    /// In desynchronized mode the commits of the child are applied on their own, without
    /// waiting for a commit of the parent.
    pub fn subsurface<D>(
        caps: &Capabilities,
        qh: &QueueHandle<D>,
        parent: &Surface,
        (x, y): (i32, i32),
    ) -> Result<Self>
    where
        D: Dispatch<WlSurface, ()> + Dispatch<WlSubsurface, ()> + 'static,
    {
        let subcompositor = caps.subcompositor()?;
        let wl_surface = caps.compositor()?.create_surface(qh, ());
        let subsurface = subcompositor.get_subsurface(&wl_surface, parent.wl_surface(), qh, ());
        subsurface.set_desync();
        subsurface.set_position(x, y);
        let role = Role::Subsurface(subsurface);
        let mut surface = Self { drawable: None, role, wl_surface, committed: false };
        surface.commit();
        Ok(surface)
    }

    pub fn wl_surface(&self) -> &WlSurface {
        &self.wl_surface
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn drawable(&self) -> Option<&Drawable> {
        self.drawable.as_ref()
    }

    pub fn commit(&mut self) {
        self.wl_surface.commit();
        self.committed = true;
    }

    /// Create the drawable of this surface
    ///
    /// The surface must have been committed at least once. Binding again replaces the previous
    /// drawable.
    pub fn bind_drawable(&mut self, context: &Rc<RenderContext>, size: (i32, i32)) -> Result<()> {
        if !self.committed {
            return Err(Error::NotCommitted);
        }
        self.drawable = None;
        self.drawable = Some(Drawable::new(&self.wl_surface, context, size)?);
        Ok(())
    }

    /// Clear the drawable to `color` and present it
    pub fn draw(&self, color: Color) -> Result<()> {
        self.drawable.as_ref().ok_or(Error::NoDrawable)?.draw(color)
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        log::debug!("Destroying {}", self.wl_surface.id());
        self.drawable = None;
        self.role.destroy();
        self.wl_surface.destroy();
    }
}

/// A surface with a shell role, drawn with the shared context
///
/// Its drawable is created by the first [`resize()`][WindowBackend::resize()].
#[derive(Debug)]
pub struct ShellWindow {
    surface: Surface,
    context: Rc<RenderContext>,
}

impl ShellWindow {
    pub fn new(surface: Surface, context: Rc<RenderContext>) -> Self {
        Self { surface, context }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

impl WindowBackend for ShellWindow {
    fn ack_configure(&mut self, serial: u32) {
        self.surface.role().ack_configure(serial);
    }

    fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        if let Some(drawable) = self.surface.drawable() {
            drawable.resize(width, height);
            return Ok(());
        }
        self.surface.bind_drawable(&self.context, (width, height))
    }

    fn redraw(&mut self, color: Color) -> Result<()> {
        self.surface.draw(color)
    }
}
