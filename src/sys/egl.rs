//! Bindings to `libEGL.so`
//!
//! Only the handful of entry points needed to clear and present a window are bound.

use dlib::{dlopen_external_library, DlError};
use once_cell::sync::Lazy;
use std::os::raw::{c_void, c_int, c_uint};

pub type EGLDisplay = *mut c_void;
pub type EGLConfig = *mut c_void;
pub type EGLContext = *mut c_void;
pub type EGLSurface = *mut c_void;
pub type EGLNativeDisplayType = *mut c_void;
pub type EGLNativeWindowType = *mut c_void;
pub type EGLint = c_int;
pub type EGLBoolean = c_uint;
pub type EGLenum = c_uint;

pub const EGL_FALSE: EGLBoolean = 0;
pub const EGL_BLUE_SIZE: EGLint = 0x3022;
pub const EGL_GREEN_SIZE: EGLint = 0x3023;
pub const EGL_RED_SIZE: EGLint = 0x3024;
pub const EGL_NONE: EGLint = 0x3038;
pub const EGL_OPENGL_API: EGLenum = 0x30A2;

pub const EGL_NO_CONTEXT: EGLContext = std::ptr::null_mut();
pub const EGL_NO_SURFACE: EGLSurface = std::ptr::null_mut();

dlopen_external_library!(Egl,
    functions:
        fn eglGetError() -> EGLint,
        fn eglGetDisplay(EGLNativeDisplayType) -> EGLDisplay,
        fn eglInitialize(EGLDisplay, *mut EGLint, *mut EGLint) -> EGLBoolean,
        fn eglTerminate(EGLDisplay) -> EGLBoolean,
        fn eglBindAPI(EGLenum) -> EGLBoolean,
        fn eglChooseConfig(EGLDisplay, *const EGLint, *mut EGLConfig, EGLint, *mut EGLint) -> EGLBoolean,
        fn eglCreateContext(EGLDisplay, EGLConfig, EGLContext, *const EGLint) -> EGLContext,
        fn eglDestroyContext(EGLDisplay, EGLContext) -> EGLBoolean,
        fn eglCreateWindowSurface(EGLDisplay, EGLConfig, EGLNativeWindowType, *const EGLint) -> EGLSurface,
        fn eglDestroySurface(EGLDisplay, EGLSurface) -> EGLBoolean,
        fn eglMakeCurrent(EGLDisplay, EGLSurface, EGLSurface, EGLContext) -> EGLBoolean,
        fn eglSwapBuffers(EGLDisplay, EGLSurface) -> EGLBoolean,
);

pub fn egl_option() -> Option<&'static Egl> {
    static EGL_OPTION: Lazy<Option<Egl>> = Lazy::new(|| {
        let versions = ["libEGL.so.1", "libEGL.so"];

        for ver in &versions {
            match unsafe { Egl::open(ver) } {
                Ok(h) => return Some(h),
                Err(DlError::CantOpen(_)) => continue,
                Err(DlError::MissingSymbol(s)) => {
                    log::error!("Found library {ver} cannot be used: symbol {s} is missing.");
                    return None;
                }
            }
        }
        None
    });

    EGL_OPTION.as_ref()
}
