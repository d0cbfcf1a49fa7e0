//! Small wayland clients rendering with EGL
//!
//! This crate holds the building blocks shared by three demonstration programs:
//!
//! - `egl-window`: a toplevel window cleared to a solid color, redrawn on every configuration.
//! - `layer-shell-subsurface`: a `zwlr_layer_shell_v1` panel with a desynchronized sub-surface
//!   drawn inside it.
//! - `text-input`: a toplevel window whose pointer clicks enable and disable
//!   `zwp_text_input_v3`, showing a custom cursor image.
//!
//! Each program follows the same path: a [`Session`](session::Session) connects and binds the
//! needed globals into its [`Capabilities`](registry::Capabilities), a shared
//! [`RenderContext`](render::RenderContext) is created, [`Surface`](surface::Surface)s get their
//! shell role and drawable, and [`event_loop::run()`] dispatches compositor events to a
//! [`Reactor`](reactor::Reactor) until a close request. [`demo::drive()`] ties these steps
//! together and destroys the surfaces before the connection goes away.
//!
//! `libEGL` and `libGL` are loaded at runtime, [`render::RenderContext::new()`] fails with
//! [`Error::LibraryUnavailable`] if they are missing.

pub mod config;
pub mod demo;
mod error;
pub mod event_loop;
pub mod reactor;
pub mod registry;
pub mod render;
pub mod session;
pub mod surface;
pub mod sys;

pub use error::{Error, Result};
