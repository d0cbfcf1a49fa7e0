//! Bindings to `libGL.so`

use dlib::{dlopen_external_library, DlError};
use once_cell::sync::Lazy;
use std::os::raw::c_uint;

pub type GLfloat = f32;
pub type GLbitfield = c_uint;

pub const GL_COLOR_BUFFER_BIT: GLbitfield = 0x0000_4000;

dlopen_external_library!(Gl,
    functions:
        fn glClearColor(GLfloat, GLfloat, GLfloat, GLfloat) -> (),
        fn glClear(GLbitfield) -> (),
);

pub fn gl_option() -> Option<&'static Gl> {
    static GL_OPTION: Lazy<Option<Gl>> = Lazy::new(|| {
        let versions = ["libGL.so.1", "libGL.so"];

        for ver in &versions {
            match unsafe { Gl::open(ver) } {
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

    GL_OPTION.as_ref()
}
