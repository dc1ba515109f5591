//! OpenGL backend over `glow`.

use super::GlDriver;
use crate::core::{DriverError, DriverResult};
use glow::HasContext;

/// Forwards every call to a live `glow::Context`.
///
/// The caller owns context creation and must keep it current on the
/// thread that drives the bindings.
pub struct GlowDriver {
    gl: glow::Context,
}

impl GlowDriver {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// # Safety
    ///
    /// `loader` must return valid GL entry points for the current context.
    pub unsafe fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const std::os::raw::c_void,
    {
        Self::new(glow::Context::from_loader_function(loader))
    }
}

impl GlDriver for GlowDriver {
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.clear_color(red, green, blue, alpha) }
    }

    fn clear(&mut self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn gen_vertex_arrays(&mut self, ids: &mut [u32]) -> DriverResult<()> {
        let mut created = Vec::with_capacity(ids.len());
        for _ in 0..ids.len() {
            match unsafe { self.gl.create_vertex_array() } {
                Ok(vao) => created.push(vao),
                Err(e) => {
                    // All or nothing: hand back what was reserved so far.
                    for vao in created {
                        unsafe { self.gl.delete_vertex_array(vao) }
                    }
                    return Err(DriverError::Allocation(e));
                }
            }
        }
        for (slot, vao) in ids.iter_mut().zip(created) {
            *slot = vao.0.get();
        }
        Ok(())
    }
}
