use thiserror::Error;
use wayland_client::{
    backend::{InvalidId, WaylandError},
    ConnectError, DispatchError,
};

/// Errors that can stop one of the demo clients
///
/// None of them is recovered from: the client tears down what it built so far and exits.
#[derive(Debug, Error)]
pub enum Error {
    /// The compositor could not be reached
    #[error("could not connect to the wayland compositor")]
    Connect(#[from] ConnectError),
    /// A global this client needs was not advertised during bootstrap
    #[error("the compositor does not advertise `{0}`")]
    MissingCapability(&'static str),
    /// A system library could not be loaded at runtime
    #[error("library `{0}` could not be loaded")]
    LibraryUnavailable(&'static str),
    /// An EGL entry point reported a failure
    #[error("{call} failed with EGL error {code:#x}")]
    Egl {
        /// Name of the failing entry point
        call: &'static str,
        /// Value returned by `eglGetError()`
        code: i32,
    },
    /// No frame buffer configuration has 8 bits per color channel
    #[error("no EGL config with at least 8 bits per color channel")]
    NoMatchingConfig,
    /// The `wl_egl_window` could not be created
    #[error("could not create the native window")]
    Drawable(#[from] wayland_egl::Error),
    /// A drawable was requested for a surface that was never committed
    #[error("surface must be committed before a drawable is bound to it")]
    NotCommitted,
    /// Drawing was requested on a surface without a drawable
    #[error("surface has no drawable")]
    NoDrawable,
    /// Reading or dispatching events failed
    #[error("event dispatching failed")]
    Dispatch(#[from] DispatchError),
    /// The connection to the compositor was lost
    #[error("wayland connection error")]
    Wayland(#[from] WaylandError),
    /// A request was sent to an object that is already dead
    #[error("request sent to a dead object")]
    InvalidId(#[from] InvalidId),
}

/// Result type of this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
