//! Runtime-loaded bindings to the system graphics libraries.
//!
//! Both libraries are opened with `dlopen` on first use, so the crate builds and its protocol
//! level tests run on machines without any GPU stack. Each module exposes an `*_option()`
//! function returning `None` if the library or one of its symbols is missing.

#![allow(non_camel_case_types, non_snake_case)]

pub mod egl;
pub mod gl;
