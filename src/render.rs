//! The shared EGL rendering context
//!
//! A single [`RenderContext`] is created once the globals are known and is reused by every
//! drawable of the process: before each draw it is made current on the target drawable. All of
//! this happens on the dispatching thread, so no synchronization is involved, only the ordering
//! "make current, then draw".

use std::{os::raw::c_void, ptr, rc::Rc};

use wayland_client::Connection;

use crate::{
    sys::{
        egl::{self, Egl, EGLConfig, EGLContext, EGLDisplay, EGLSurface, EGLint},
        gl::{self, Gl},
    },
    Error, Result,
};

/// An opaque RGB color, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
}

impl Color {
    /// Build a color from its three components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Minimum channel depths of the frame buffer configuration
const CONFIG_ATTRIBUTES: [EGLint; 7] =
    [egl::EGL_RED_SIZE, 8, egl::EGL_GREEN_SIZE, 8, egl::EGL_BLUE_SIZE, 8, egl::EGL_NONE];

/// EGL display, frame buffer configuration and OpenGL context of the process
///
/// Dropping it releases the context and terminates the EGL display. Drawables keep it alive
/// through an [`Rc`], so it always outlives them.
pub struct RenderContext {
    egl: &'static Egl,
    gl: &'static Gl,
    display: EGLDisplay,
    config: EGLConfig,
    context: EGLContext,
}

impl RenderContext {
    /// Initialize EGL on top of the wayland connection
    ///
    /// Selects a configuration with at least 8 bits of red, green and blue and creates one
    /// desktop OpenGL context without sharing.
    pub fn new(conn: &Connection) -> Result<Rc<Self>> {
        let egl = egl::egl_option().ok_or(Error::LibraryUnavailable("libEGL"))?;
        let gl = gl::gl_option().ok_or(Error::LibraryUnavailable("libGL"))?;
        let display_ptr = conn.backend().display_ptr() as *mut c_void;

        let display = unsafe { (egl.eglGetDisplay)(display_ptr) };
        if display.is_null() {
            return Err(egl_error(egl, "eglGetDisplay"));
        }
        let initialized = unsafe { (egl.eglInitialize)(display, ptr::null_mut(), ptr::null_mut()) };
        if initialized == egl::EGL_FALSE {
            return Err(egl_error(egl, "eglInitialize"));
        }

        // From here on the display must be terminated on every error path.
        let mut this = Self {
            egl,
            gl,
            display,
            config: ptr::null_mut(),
            context: egl::EGL_NO_CONTEXT,
        };

        if unsafe { (egl.eglBindAPI)(egl::EGL_OPENGL_API) } == egl::EGL_FALSE {
            return Err(egl_error(egl, "eglBindAPI"));
        }

        let mut num_config: EGLint = 0;
        let chosen = unsafe {
            (egl.eglChooseConfig)(
                display,
                CONFIG_ATTRIBUTES.as_ptr(),
                &mut this.config,
                1,
                &mut num_config,
            )
        };
        if chosen == egl::EGL_FALSE {
            return Err(egl_error(egl, "eglChooseConfig"));
        }
        if num_config < 1 {
            return Err(Error::NoMatchingConfig);
        }

        this.context = unsafe {
            (egl.eglCreateContext)(display, this.config, egl::EGL_NO_CONTEXT, ptr::null())
        };
        if this.context.is_null() {
            return Err(egl_error(egl, "eglCreateContext"));
        }

        log::debug!("EGL context ready on display {:p}", display);
        Ok(Rc::new(this))
    }

    /// Create the EGL surface of a native window
    pub(crate) fn create_window_surface(&self, native: *const c_void) -> Result<EGLSurface> {
        let surface = unsafe {
            (self.egl.eglCreateWindowSurface)(
                self.display,
                self.config,
                native as *mut c_void,
                ptr::null(),
            )
        };
        if surface.is_null() {
            Err(egl_error(self.egl, "eglCreateWindowSurface"))
        } else {
            Ok(surface)
        }
    }

    pub(crate) fn destroy_window_surface(&self, surface: EGLSurface) {
        unsafe {
            (self.egl.eglMakeCurrent)(
                self.display,
                egl::EGL_NO_SURFACE,
                egl::EGL_NO_SURFACE,
                egl::EGL_NO_CONTEXT,
            );
            (self.egl.eglDestroySurface)(self.display, surface);
        }
    }

    /// Clear an EGL surface to a color and present it
    ///
    /// The context is made current on `surface` first.
    pub(crate) fn clear(&self, surface: EGLSurface, color: Color) -> Result<()> {
        unsafe {
            if (self.egl.eglMakeCurrent)(self.display, surface, surface, self.context)
                == egl::EGL_FALSE
            {
                return Err(egl_error(self.egl, "eglMakeCurrent"));
            }
            (self.gl.glClearColor)(color.r, color.g, color.b, 1.0);
            (self.gl.glClear)(gl::GL_COLOR_BUFFER_BIT);
            if (self.egl.eglSwapBuffers)(self.display, surface) == egl::EGL_FALSE {
                return Err(egl_error(self.egl, "eglSwapBuffers"));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("display", &self.display)
            .field("config", &self.config)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        log::debug!("Terminating EGL display {:p}", self.display);
        unsafe {
            (self.egl.eglMakeCurrent)(
                self.display,
                egl::EGL_NO_SURFACE,
                egl::EGL_NO_SURFACE,
                egl::EGL_NO_CONTEXT,
            );
            if !self.context.is_null() {
                (self.egl.eglDestroyContext)(self.display, self.context);
            }
            (self.egl.eglTerminate)(self.display);
        }
    }
}

fn egl_error(egl: &Egl, call: &'static str) -> Error {
    let code = unsafe { (egl.eglGetError)() };
    Error::Egl { call, code }
}
