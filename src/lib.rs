//! # scriptgl
//!
//! Thin glue between scripting runtimes and a graphics driver.
//!
//! ## Features
//!
//! - **`gl` Lua module**: `clearColor`, `clear` and `genVertexArrays`
//!   bound to a [`driver::GlDriver`] through a typed marshaling layer
//! - **Driver backends**: an in-memory headless driver, plus a real
//!   OpenGL backend over `glow` behind the `glow` feature
//! - **QuickJS harness**: create a heap, evaluate one source string,
//!   destroy the heap
//! - **Host entry point**: banner, startup evaluation and an optional
//!   fixed-rate main loop (`main_loop` feature)
//!
//! ### Example
//!
//! ```no_run
//! use scriptgl::bindings;
//! use scriptgl::config::GlConfig;
//! use scriptgl::driver::{GlContext, HeadlessDriver};
//!
//! let lua = mlua::Lua::new();
//! bindings::install(&lua, GlContext::new(HeadlessDriver::new()), &GlConfig::default())?;
//! lua.load(r#"local gl = require "gl"; gl.clear(gl.COLOR_BUFFER_BIT)"#).exec()?;
//! # Ok::<(), mlua::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`bindings`]: the `gl` Lua module and argument marshaling
//! - [`driver`]: graphics driver contract and backends
//! - [`scripting`]: QuickJS evaluation harness
//! - [`host`]: process entry point and main loop
//! - [`config`]: configuration loading
//! - [`core`]: errors and logging

/// Errors and logging
pub mod core;
/// Configuration system
pub mod config;
/// Graphics driver contract and backends
pub mod driver;
/// Language bindings for scripting
pub mod bindings;
/// Embedded JavaScript harness
pub mod scripting;
/// Host process entry point
pub mod host;

pub use crate::core::{Error, Result};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}
