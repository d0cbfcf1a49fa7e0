// An in-process compositor the client code under test talks to over a socket pair.
// It only records the requests it receives, answering nothing but what the protocol requires.

#![allow(dead_code)]

pub extern crate wayland_client as wayc;
pub extern crate wayland_server as ways;

use std::collections::HashMap;
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use wayland_protocols::wp::text_input::zv3::server::{zwp_text_input_manager_v3, zwp_text_input_v3};
use wayland_protocols::xdg::shell::server::{xdg_surface, xdg_toplevel, xdg_wm_base};
use wayland_protocols_wlr::layer_shell::v1::server::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};
use ways::protocol::{
    wl_compositor, wl_output, wl_pointer, wl_seat, wl_subcompositor, wl_subsurface, wl_surface,
};
use ways::{Resource, WEnum};

/// A global advertised by the [`TestServer`], with its version
#[derive(Debug, Clone, Copy)]
pub enum FakeGlobal {
    Compositor(u32),
    Subcompositor(u32),
    WmBase(u32),
    Seat(u32),
    Output(u32),
    LayerShell(u32),
    TextInputManager(u32),
}

/// The compositor, dispatching in its own thread until dropped
pub struct TestServer {
    log: Arc<Mutex<Vec<String>>>,
    kill_switch: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a compositor advertising `globals` and connect a client to it
    pub fn start(globals: &[FakeGlobal]) -> (TestServer, wayc::Connection) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut state = Compositor { log: log.clone(), modes: HashMap::new() };

        let mut display = ways::Display::<Compositor>::new().unwrap();
        for global in globals {
            let handle = display.handle();
            match *global {
                FakeGlobal::Compositor(v) => {
                    handle.create_global::<Compositor, wl_compositor::WlCompositor, _>(v, ());
                }
                FakeGlobal::Subcompositor(v) => {
                    handle
                        .create_global::<Compositor, wl_subcompositor::WlSubcompositor, _>(v, ());
                }
                FakeGlobal::WmBase(v) => {
                    handle.create_global::<Compositor, xdg_wm_base::XdgWmBase, _>(v, ());
                }
                FakeGlobal::Seat(v) => {
                    handle.create_global::<Compositor, wl_seat::WlSeat, _>(v, ());
                }
                FakeGlobal::Output(v) => {
                    handle.create_global::<Compositor, wl_output::WlOutput, _>(v, ());
                }
                FakeGlobal::LayerShell(v) => {
                    handle.create_global::<Compositor, zwlr_layer_shell_v1::ZwlrLayerShellV1, _>(
                        v,
                        (),
                    );
                }
                FakeGlobal::TextInputManager(v) => {
                    handle.create_global::<
                        Compositor,
                        zwp_text_input_manager_v3::ZwpTextInputManagerV3,
                        _,
                    >(v, ());
                }
            }
        }

        let (server_socket, client_socket) = UnixStream::pair().unwrap();
        display.handle().insert_client(server_socket, Arc::new(DumbClientData)).unwrap();
        let conn =
            wayc::Connection::from_socket(client_socket).expect("Failed to connect to server.");

        let kill_switch = Arc::new(AtomicBool::new(false));
        let server_kill_switch = kill_switch.clone();
        // the client bootstrap does blocking round trips, the server must answer on its own
        let thread = std::thread::spawn(move || loop {
            display.dispatch_clients(&mut state).unwrap();
            display.flush_clients().unwrap();
            if server_kill_switch.load(Ordering::Acquire) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        });

        (TestServer { log, kill_switch, thread: Some(thread) }, conn)
    }

    /// Every request recorded so far
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Position of the first entry equal to `entry`
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.log().iter().position(|e| e == entry)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.kill_switch.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            thread.join().unwrap();
        }
    }
}

/// `<interface>@<protocol id>`, the same on both sides of the connection
pub fn object_name(interface: &str, protocol_id: u32) -> String {
    format!("{interface}@{protocol_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubsurfaceMode {
    Sync,
    Desync,
}

struct Compositor {
    log: Arc<Mutex<Vec<String>>>,
    // sub-surface mode of each surface having the role
    modes: HashMap<u32, SubsurfaceMode>,
}

impl Compositor {
    fn record<R: Resource>(&mut self, resource: &R, what: &str) {
        let name = object_name(R::interface().name, resource.id().protocol_id());
        self.log.lock().unwrap().push(format!("{name}.{what}"));
    }
}

struct DumbClientData;

impl ways::backend::ClientData for DumbClientData {
    fn initialized(&self, _: ways::backend::ClientId) {}
    fn disconnected(&self, _: ways::backend::ClientId, _: ways::backend::DisconnectReason) {}
}

// enum arguments are logged as their wire value
fn raw<T: Into<u32>>(value: WEnum<T>) -> u32 {
    match value {
        WEnum::Value(value) => value.into(),
        WEnum::Unknown(value) => value,
    }
}

fn record_bind<R: Resource>(state: &mut Compositor, resource: &R) {
    let entry = format!("bind {} v{}", R::interface().name, resource.version());
    state.log.lock().unwrap().push(entry);
}

macro_rules! recorded_globals {
    ($($iface:ty),* $(,)?) => {
        $(
            impl ways::GlobalDispatch<$iface, ()> for Compositor {
                fn bind(
                    state: &mut Self,
                    _: &ways::DisplayHandle,
                    _: &ways::Client,
                    resource: ways::New<$iface>,
                    _: &(),
                    data_init: &mut ways::DataInit<'_, Self>,
                ) {
                    let resource = data_init.init(resource, ());
                    record_bind(state, &resource);
                }
            }
        )*
    };
}

recorded_globals!(
    wl_compositor::WlCompositor,
    wl_subcompositor::WlSubcompositor,
    wl_seat::WlSeat,
    wl_output::WlOutput,
    zwlr_layer_shell_v1::ZwlrLayerShellV1,
    zwp_text_input_manager_v3::ZwpTextInputManagerV3,
);

impl ways::GlobalDispatch<xdg_wm_base::XdgWmBase, ()> for Compositor {
    fn bind(
        state: &mut Self,
        _: &ways::DisplayHandle,
        _: &ways::Client,
        resource: ways::New<xdg_wm_base::XdgWmBase>,
        _: &(),
        data_init: &mut ways::DataInit<'_, Self>,
    ) {
        let wm_base = data_init.init(resource, ());
        record_bind(state, &wm_base);
        wm_base.ping(42);
    }
}

impl ways::Dispatch<wl_compositor::WlCompositor, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &wl_compositor::WlCompositor,
        request: wl_compositor::Request,
        _: &(),
        _: &ways::DisplayHandle,
        data_init: &mut ways::DataInit<'_, Self>,
    ) {
        if let wl_compositor::Request::CreateSurface { id } = request {
            let surface = data_init.init(id, ());
            let what = format!("create_surface {}", surface.id().protocol_id());
            state.record(resource, &what);
        }
    }
}

impl ways::Dispatch<wl_surface::WlSurface, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &wl_surface::WlSurface,
        request: wl_surface::Request,
        _: &(),
        _: &ways::DisplayHandle,
        _: &mut ways::DataInit<'_, Self>,
    ) {
        match request {
            wl_surface::Request::Commit => {
                // commits of a synchronized sub-surface wait for a commit of the parent
                let what = match state.modes.get(&resource.id().protocol_id()) {
                    None => "commit",
                    Some(SubsurfaceMode::Sync) => "commit cached",
                    Some(SubsurfaceMode::Desync) => "commit applied",
                };
                state.record(resource, what);
            }
            wl_surface::Request::Destroy => state.record(resource, "destroy"),
            _ => {}
        }
    }
}

impl ways::Dispatch<wl_subcompositor::WlSubcompositor, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &wl_subcompositor::WlSubcompositor,
        request: wl_subcompositor::Request,
        _: &(),
        _: &ways::DisplayHandle,
        data_init: &mut ways::DataInit<'_, Self>,
    ) {
        if let wl_subcompositor::Request::GetSubsurface { id, surface, parent } = request {
            let surface_id = surface.id().protocol_id();
            data_init.init(id, surface_id);
            state.modes.insert(surface_id, SubsurfaceMode::Sync);
            let what = format!("get_subsurface {} {}", surface_id, parent.id().protocol_id());
            state.record(resource, &what);
        }
    }
}

impl ways::Dispatch<wl_subsurface::WlSubsurface, u32> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &wl_subsurface::WlSubsurface,
        request: wl_subsurface::Request,
        surface_id: &u32,
        _: &ways::DisplayHandle,
        _: &mut ways::DataInit<'_, Self>,
    ) {
        match request {
            wl_subsurface::Request::SetDesync => {
                state.modes.insert(*surface_id, SubsurfaceMode::Desync);
                state.record(resource, "set_desync");
            }
            wl_subsurface::Request::SetSync => {
                state.modes.insert(*surface_id, SubsurfaceMode::Sync);
                state.record(resource, "set_sync");
            }
            wl_subsurface::Request::SetPosition { x, y } => {
                state.record(resource, &format!("set_position {x},{y}"));
            }
            wl_subsurface::Request::Destroy => {
                state.modes.remove(surface_id);
                state.record(resource, "destroy");
            }
            _ => {}
        }
    }
}

impl ways::Dispatch<xdg_wm_base::XdgWmBase, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &xdg_wm_base::XdgWmBase,
        request: xdg_wm_base::Request,
        _: &(),
        _: &ways::DisplayHandle,
        data_init: &mut ways::DataInit<'_, Self>,
    ) {
        match request {
            xdg_wm_base::Request::GetXdgSurface { id, .. } => {
                data_init.init(id, ());
                state.record(resource, "get_xdg_surface");
            }
            xdg_wm_base::Request::Pong { serial } => {
                state.record(resource, &format!("pong {serial}"));
            }
            _ => {}
        }
    }
}

impl ways::Dispatch<xdg_surface::XdgSurface, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &xdg_surface::XdgSurface,
        request: xdg_surface::Request,
        _: &(),
        _: &ways::DisplayHandle,
        data_init: &mut ways::DataInit<'_, Self>,
    ) {
        match request {
            xdg_surface::Request::GetToplevel { id } => {
                data_init.init(id, ());
                state.record(resource, "get_toplevel");
            }
            xdg_surface::Request::AckConfigure { serial } => {
                state.record(resource, &format!("ack_configure {serial}"));
            }
            xdg_surface::Request::Destroy => state.record(resource, "destroy"),
            _ => {}
        }
    }
}

impl ways::Dispatch<xdg_toplevel::XdgToplevel, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &xdg_toplevel::XdgToplevel,
        request: xdg_toplevel::Request,
        _: &(),
        _: &ways::DisplayHandle,
        _: &mut ways::DataInit<'_, Self>,
    ) {
        match request {
            xdg_toplevel::Request::SetTitle { title } => {
                state.record(resource, &format!("set_title {title}"));
            }
            xdg_toplevel::Request::Destroy => state.record(resource, "destroy"),
            _ => {}
        }
    }
}

impl ways::Dispatch<wl_seat::WlSeat, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &wl_seat::WlSeat,
        request: wl_seat::Request,
        _: &(),
        _: &ways::DisplayHandle,
        data_init: &mut ways::DataInit<'_, Self>,
    ) {
        match request {
            wl_seat::Request::GetPointer { id } => {
                let pointer = data_init.init(id, ());
                state.record(resource, &format!("get_pointer {}", pointer.id().protocol_id()));
            }
            wl_seat::Request::Release => state.record(resource, "release"),
            _ => {}
        }
    }
}

impl ways::Dispatch<wl_pointer::WlPointer, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &wl_pointer::WlPointer,
        request: wl_pointer::Request,
        _: &(),
        _: &ways::DisplayHandle,
        _: &mut ways::DataInit<'_, Self>,
    ) {
        match request {
            wl_pointer::Request::SetCursor { serial, surface, hotspot_x, hotspot_y } => {
                let surface = surface.map(|s| s.id().protocol_id()).unwrap_or(0);
                let what = format!("set_cursor {serial} {surface} {hotspot_x},{hotspot_y}");
                state.record(resource, &what);
            }
            wl_pointer::Request::Release => state.record(resource, "release"),
            _ => {}
        }
    }
}

impl ways::Dispatch<wl_output::WlOutput, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &wl_output::WlOutput,
        request: wl_output::Request,
        _: &(),
        _: &ways::DisplayHandle,
        _: &mut ways::DataInit<'_, Self>,
    ) {
        if let wl_output::Request::Release = request {
            state.record(resource, "release");
        }
    }
}

impl ways::Dispatch<zwlr_layer_shell_v1::ZwlrLayerShellV1, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &zwlr_layer_shell_v1::ZwlrLayerShellV1,
        request: zwlr_layer_shell_v1::Request,
        _: &(),
        _: &ways::DisplayHandle,
        data_init: &mut ways::DataInit<'_, Self>,
    ) {
        if let zwlr_layer_shell_v1::Request::GetLayerSurface {
            id, surface, layer, namespace, ..
        } = request
        {
            data_init.init(id, ());
            let surface = surface.id().protocol_id();
            let what = format!("get_layer_surface {surface} {} {namespace}", raw(layer));
            state.record(resource, &what);
        }
    }
}

impl ways::Dispatch<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
        request: zwlr_layer_surface_v1::Request,
        _: &(),
        _: &ways::DisplayHandle,
        _: &mut ways::DataInit<'_, Self>,
    ) {
        match request {
            zwlr_layer_surface_v1::Request::SetSize { width, height } => {
                state.record(resource, &format!("set_size {width},{height}"));
            }
            zwlr_layer_surface_v1::Request::AckConfigure { serial } => {
                state.record(resource, &format!("ack_configure {serial}"));
            }
            zwlr_layer_surface_v1::Request::Destroy => state.record(resource, "destroy"),
            _ => {}
        }
    }
}

impl ways::Dispatch<zwp_text_input_manager_v3::ZwpTextInputManagerV3, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &zwp_text_input_manager_v3::ZwpTextInputManagerV3,
        request: zwp_text_input_manager_v3::Request,
        _: &(),
        _: &ways::DisplayHandle,
        data_init: &mut ways::DataInit<'_, Self>,
    ) {
        if let zwp_text_input_manager_v3::Request::GetTextInput { id, .. } = request {
            let text_input = data_init.init(id, ());
            let what = format!("get_text_input {}", text_input.id().protocol_id());
            state.record(resource, &what);
        }
    }
}

impl ways::Dispatch<zwp_text_input_v3::ZwpTextInputV3, ()> for Compositor {
    fn request(
        state: &mut Self,
        _: &ways::Client,
        resource: &zwp_text_input_v3::ZwpTextInputV3,
        request: zwp_text_input_v3::Request,
        _: &(),
        _: &ways::DisplayHandle,
        _: &mut ways::DataInit<'_, Self>,
    ) {
        let what = match request {
            zwp_text_input_v3::Request::Enable => "enable".to_owned(),
            zwp_text_input_v3::Request::Disable => "disable".to_owned(),
            zwp_text_input_v3::Request::SetSurroundingText { text, cursor, anchor } => {
                format!("set_surrounding_text {text:?} {cursor} {anchor}")
            }
            zwp_text_input_v3::Request::SetTextChangeCause { cause } => {
                format!("set_text_change_cause {}", raw(cause))
            }
            zwp_text_input_v3::Request::SetContentType { hint, purpose } => {
                format!("set_content_type {} {}", raw(hint), raw(purpose))
            }
            zwp_text_input_v3::Request::SetCursorRectangle { x, y, width, height } => {
                format!("set_cursor_rectangle {x},{y},{width},{height}")
            }
            zwp_text_input_v3::Request::Commit => "commit".to_owned(),
            zwp_text_input_v3::Request::Destroy => "destroy".to_owned(),
            _ => return,
        };
        state.record(resource, &what);
    }
}
