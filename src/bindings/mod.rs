//! Language Binding Layer
//!
//! Exposes the graphics driver to Lua scripts as the `gl` module.
//!
//! Architecture:
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Lua script:  gl.clear(gl.COLOR_BUFFER_BIT)    │
//! └──────────────────────┬────────────────────────┘
//!                        v
//! ┌───────────────────────────────────────────────┐
//! │  gl module (REGISTRY name -> BindingFn)        │
//! └──────────────────────┬────────────────────────┘
//!                        v
//! ┌───────────────────────────────────────────────┐
//! │  marshal: CallFrame -> typed argument struct   │
//! └──────────────────────┬────────────────────────┘
//!                        v
//! ┌───────────────────────────────────────────────┐
//! │  GlContext -> dyn GlDriver                     │
//! └───────────────────────────────────────────────┘
//! ```

pub mod gl;
pub mod marshal;

pub use gl::{binding_error, install, open, BindingFn, CONSTANTS, REGISTRY};
pub use marshal::{CallFrame, ClearArgs, ClearColorArgs, FromCallFrame, GenVertexArraysArgs};
