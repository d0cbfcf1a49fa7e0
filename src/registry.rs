//! Binding of the globals the demo clients need
//!
//! Users of this module only implement [`CapabilityHandler`] on their state; the registry and
//! every global bound through it dispatch to [`Capabilities`], which keeps the `Dispatch`
//! implementations an internal detail.

use wayland_client::{
    protocol::{
        wl_compositor::{self, WlCompositor},
        wl_registry::{self, WlRegistry},
        wl_seat::{self, WlSeat},
        wl_subcompositor::{self, WlSubcompositor},
    },
    Connection, Dispatch, Proxy, QueueHandle,
};
use wayland_protocols::{
    wp::text_input::zv3::client::zwp_text_input_manager_v3::{self, ZwpTextInputManagerV3},
    xdg::shell::client::xdg_wm_base::{self, XdgWmBase},
};
use wayland_protocols_wlr::layer_shell::v1::client::zwlr_layer_shell_v1::{
    self, ZwlrLayerShellV1,
};

use crate::{Error, Result};

/// A global interface a client may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `wl_compositor`
    Compositor,
    /// `wl_subcompositor`
    Subcompositor,
    /// `xdg_wm_base`
    WmBase,
    /// `zwlr_layer_shell_v1`
    LayerShell,
    /// `wl_seat`
    Seat,
    /// `zwp_text_input_manager_v3`
    TextInputManager,
}

impl Capability {
    /// Every known capability
    pub const ALL: [Capability; 6] = [
        Capability::Compositor,
        Capability::Subcompositor,
        Capability::WmBase,
        Capability::LayerShell,
        Capability::Seat,
        Capability::TextInputManager,
    ];

    /// Protocol interface name, as advertised by the registry
    pub fn interface(self) -> &'static str {
        match self {
            Capability::Compositor => WlCompositor::interface().name,
            Capability::Subcompositor => WlSubcompositor::interface().name,
            Capability::WmBase => XdgWmBase::interface().name,
            Capability::LayerShell => ZwlrLayerShellV1::interface().name,
            Capability::Seat => WlSeat::interface().name,
            Capability::TextInputManager => ZwpTextInputManagerV3::interface().name,
        }
    }

    /// Highest version this crate binds
    pub fn max_version(self) -> u32 {
        match self {
            Capability::Seat => 4,
            _ => 1,
        }
    }

    /// Look up a capability from an advertised interface name
    pub fn from_interface(interface: &str) -> Option<Capability> {
        Self::ALL.iter().copied().find(|cap| cap.interface() == interface)
    }
}

/// The bound globals of a client
///
/// Filled once during the bootstrap round trip and only read afterwards.
#[derive(Debug, Default)]
pub struct Capabilities {
    wanted: Vec<Capability>,
    compositor: Option<WlCompositor>,
    subcompositor: Option<WlSubcompositor>,
    wm_base: Option<XdgWmBase>,
    layer_shell: Option<ZwlrLayerShellV1>,
    seat: Option<WlSeat>,
    text_input_manager: Option<ZwpTextInputManagerV3>,
}

/// Access to the [`Capabilities`] stored in a client state
pub trait CapabilityHandler: Sized + 'static {
    /// The capabilities of this state
    fn capabilities(&mut self) -> &mut Capabilities;
}

impl Capabilities {
    /// Track the given capabilities, every other global is ignored
    pub fn new(wanted: &[Capability]) -> Self {
        Self { wanted: wanted.to_vec(), ..Default::default() }
    }

    /// Whether this client asked for `cap`
    pub fn wants(&self, cap: Capability) -> bool {
        self.wanted.contains(&cap)
    }

    /// Whether `cap` has been bound
    pub fn is_bound(&self, cap: Capability) -> bool {
        match cap {
            Capability::Compositor => self.compositor.is_some(),
            Capability::Subcompositor => self.subcompositor.is_some(),
            Capability::WmBase => self.wm_base.is_some(),
            Capability::LayerShell => self.layer_shell.is_some(),
            Capability::Seat => self.seat.is_some(),
            Capability::TextInputManager => self.text_input_manager.is_some(),
        }
    }

    /// Check that every wanted capability has been bound
    pub fn require_all(&self) -> Result<()> {
        match self.wanted.iter().find(|cap| !self.is_bound(**cap)) {
            Some(cap) => Err(Error::MissingCapability(cap.interface())),
            None => Ok(()),
        }
    }

    pub fn compositor(&self) -> Result<&WlCompositor> {
        require(&self.compositor, Capability::Compositor)
    }

    pub fn subcompositor(&self) -> Result<&WlSubcompositor> {
        require(&self.subcompositor, Capability::Subcompositor)
    }

    pub fn wm_base(&self) -> Result<&XdgWmBase> {
        require(&self.wm_base, Capability::WmBase)
    }

    pub fn layer_shell(&self) -> Result<&ZwlrLayerShellV1> {
        require(&self.layer_shell, Capability::LayerShell)
    }

    pub fn seat(&self) -> Result<&WlSeat> {
        require(&self.seat, Capability::Seat)
    }

    pub fn text_input_manager(&self) -> Result<&ZwpTextInputManagerV3> {
        require(&self.text_input_manager, Capability::TextInputManager)
    }

    fn bind<D: CapabilityHandler>(
        &mut self,
        registry: &WlRegistry,
        name: u32,
        cap: Capability,
        version: u32,
        qh: &QueueHandle<D>,
    ) -> Result<()> {
        let version = version.min(cap.max_version());
        match cap {
            Capability::Compositor => self.compositor = Some(bind(registry, name, version, qh)?),
            Capability::Subcompositor => {
                self.subcompositor = Some(bind(registry, name, version, qh)?)
            }
            Capability::WmBase => self.wm_base = Some(bind(registry, name, version, qh)?),
            Capability::LayerShell => self.layer_shell = Some(bind(registry, name, version, qh)?),
            Capability::Seat => self.seat = Some(bind(registry, name, version, qh)?),
            Capability::TextInputManager => {
                self.text_input_manager = Some(bind(registry, name, version, qh)?)
            }
        }
        log::debug!("Bound {} (v{}) from global {}", cap.interface(), version, name);
        Ok(())
    }
}

fn require<T>(slot: &Option<T>, cap: Capability) -> Result<&T> {
    slot.as_ref().ok_or(Error::MissingCapability(cap.interface()))
}

/// Bind a global so that its events are handled by [`Capabilities`]
fn bind<I, D>(registry: &WlRegistry, name: u32, version: u32, qh: &QueueHandle<D>) -> Result<I>
where
    I: Proxy + 'static,
    D: 'static,
    Capabilities: Dispatch<I, (), D>,
{
    let data = qh.make_data::<I, _, Capabilities>(());
    let request = wl_registry::Request::Bind { name, id: (I::interface(), version) };
    Ok(registry.send_constructor(request, data)?)
}

impl<D: CapabilityHandler> Dispatch<WlRegistry, (), D> for Capabilities {
    fn event(
        state: &mut D,
        registry: &WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<D>,
    ) {
        match event {
            wl_registry::Event::Global { name, interface, version } => {
                let Some(cap) = Capability::from_interface(&interface) else {
                    return;
                };
                let capabilities = state.capabilities();
                if !capabilities.wants(cap) || capabilities.is_bound(cap) {
                    return;
                }
                if let Err(err) = capabilities.bind(registry, name, cap, version, qh) {
                    log::warn!("Could not bind {interface}: {err}");
                }
            }
            // globals are never rebound, removal is accepted and ignored
            wl_registry::Event::GlobalRemove { .. } => {}
            _ => {}
        }
    }
}

impl<D> Dispatch<XdgWmBase, (), D> for Capabilities {
    fn event(
        _: &mut D,
        wm_base: &XdgWmBase,
        event: xdg_wm_base::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<D>,
    ) {
        if let xdg_wm_base::Event::Ping { serial } = event {
            wm_base.pong(serial);
        }
    }
}

macro_rules! ignore_events {
    ($($iface:ty => $module:ident),* $(,)?) => {
        $(
            impl<D> Dispatch<$iface, (), D> for Capabilities {
                fn event(
                    _: &mut D,
                    _: &$iface,
                    _: $module::Event,
                    _: &(),
                    _: &Connection,
                    _: &QueueHandle<D>,
                ) {
                }
            }
        )*
    };
}

ignore_events!(
    WlCompositor => wl_compositor,
    WlSubcompositor => wl_subcompositor,
    WlSeat => wl_seat,
    ZwlrLayerShellV1 => zwlr_layer_shell_v1,
    ZwpTextInputManagerV3 => zwp_text_input_manager_v3,
);
