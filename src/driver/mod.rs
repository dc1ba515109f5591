//! Graphics driver contract.
//!
//! Binding code only ever talks to [`GlDriver`] through a [`GlContext`]
//! handle. Which backends exist is decided here, once, at build time:
//!
//! - [`HeadlessDriver`] is always available and keeps the driver state in
//!   memory, recording every call.
//! - [`GlowDriver`] forwards to a real OpenGL context (feature `glow`,
//!   native targets only).

use crate::core::DriverResult;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

mod headless;
pub use headless::{DriverCall, FramebufferState, HeadlessDriver};

#[cfg(all(feature = "glow", not(target_arch = "wasm32")))]
mod glow_backend;
#[cfg(all(feature = "glow", not(target_arch = "wasm32")))]
pub use glow_backend::GlowDriver;

pub const DEPTH_BUFFER_BIT: u32 = 0x0000_0100;
pub const STENCIL_BUFFER_BIT: u32 = 0x0000_0400;
pub const COLOR_BUFFER_BIT: u32 = 0x0000_4000;

/// The fixed call contract of the underlying graphics driver.
pub trait GlDriver {
    /// Set the color used by subsequent [`GlDriver::clear`] calls.
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);

    /// Clear the buffers selected by `mask`. Unknown bits are the driver's business.
    fn clear(&mut self, mask: u32);

    /// Fill `ids` with freshly reserved vertex-array names.
    fn gen_vertex_arrays(&mut self, ids: &mut [u32]) -> DriverResult<()>;
}

/// Shared handle to the process-wide driver state.
///
/// Single-threaded by construction (`Rc<RefCell<..>>`); every binding
/// function receives one of these instead of reaching for a global.
#[derive(Clone)]
pub struct GlContext {
    driver: Rc<RefCell<dyn GlDriver>>,
}

impl GlContext {
    pub fn new<D: GlDriver + 'static>(driver: D) -> Self {
        Self {
            driver: Rc::new(RefCell::new(driver)),
        }
    }

    /// Wrap a driver the caller keeps its own typed handle to.
    pub fn from_shared<D: GlDriver + 'static>(driver: Rc<RefCell<D>>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> RefMut<'_, dyn GlDriver + 'static> {
        self.driver.borrow_mut()
    }
}

impl std::fmt::Debug for GlContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlContext")
            .field("strong_count", &Rc::strong_count(&self.driver))
            .finish()
    }
}
