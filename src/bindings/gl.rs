//! The `gl` Lua module.
//!
//! Three binding functions, a static registration table and a loader that
//! turns the table into a Lua library. Install the loader once per Lua
//! state with [`install`]; `require "gl"` then goes through Lua's own
//! `package.loaded` cache.

use super::marshal::{CallFrame, ClearArgs, ClearColorArgs, FromCallFrame, GenVertexArraysArgs};
use crate::config::GlConfig;
use crate::core::BindingError;
use crate::driver::{GlContext, COLOR_BUFFER_BIT, DEPTH_BUFFER_BIT, STENCIL_BUFFER_BIT};
use mlua::{Lua, MultiValue, Table, Value};
use std::rc::Rc;

/// State shared by every function of one opened module.
pub struct ModuleState {
    gl: GlContext,
    max_vertex_arrays: usize,
}

/// Native entry point of one binding function.
pub type BindingFn =
    for<'lua> fn(&'lua Lua, &ModuleState, MultiValue<'lua>) -> mlua::Result<MultiValue<'lua>>;

/// Registration table: script-visible name to binding function.
pub const REGISTRY: &[(&str, BindingFn)] = &[
    ("clearColor", clear_color),
    ("clear", clear),
    ("genVertexArrays", gen_vertex_arrays),
];

/// Buffer-bit constants published alongside the functions.
pub const CONSTANTS: &[(&str, u32)] = &[
    ("COLOR_BUFFER_BIT", COLOR_BUFFER_BIT),
    ("DEPTH_BUFFER_BIT", DEPTH_BUFFER_BIT),
    ("STENCIL_BUFFER_BIT", STENCIL_BUFFER_BIT),
];

fn clear_color<'lua>(
    _lua: &'lua Lua,
    state: &ModuleState,
    args: MultiValue<'lua>,
) -> mlua::Result<MultiValue<'lua>> {
    let args = args.into_vec();
    let ClearColorArgs {
        red,
        green,
        blue,
        alpha,
    } = ClearColorArgs::from_frame(&CallFrame::new("clearColor", &args))?;

    tracing::trace!(target: "gl", red, green, blue, alpha, "clearColor");
    state.gl.driver().clear_color(red, green, blue, alpha);
    Ok(MultiValue::new())
}

fn clear<'lua>(
    _lua: &'lua Lua,
    state: &ModuleState,
    args: MultiValue<'lua>,
) -> mlua::Result<MultiValue<'lua>> {
    let args = args.into_vec();
    let ClearArgs { mask } = ClearArgs::from_frame(&CallFrame::new("clear", &args))?;

    tracing::trace!(target: "gl", mask, "clear");
    state.gl.driver().clear(mask);
    Ok(MultiValue::new())
}

fn gen_vertex_arrays<'lua>(
    lua: &'lua Lua,
    state: &ModuleState,
    args: MultiValue<'lua>,
) -> mlua::Result<MultiValue<'lua>> {
    let args = args.into_vec();
    let GenVertexArraysArgs { count } =
        GenVertexArraysArgs::from_frame(&CallFrame::new("genVertexArrays", &args))?;

    if count > state.max_vertex_arrays {
        return Err(BindingError::CountTooLarge {
            function: "genVertexArrays",
            count: count as i64,
            max: state.max_vertex_arrays,
        }
        .into());
    }

    // Dropped on every return path below, including driver errors.
    let mut ids = vec![0u32; count];
    if count > 0 {
        state.gl.driver().gen_vertex_arrays(&mut ids)?;
    }

    tracing::trace!(target: "gl", count, "genVertexArrays");
    let names = lua.create_sequence_from(ids.iter().copied())?;
    Ok(MultiValue::from_vec(vec![Value::Table(names)]))
}

/// Module loader: build the library table from [`REGISTRY`].
pub fn open<'lua>(lua: &'lua Lua, gl: GlContext, config: &GlConfig) -> mlua::Result<Table<'lua>> {
    let state = Rc::new(ModuleState {
        gl,
        max_vertex_arrays: config.max_vertex_arrays,
    });

    let module = lua.create_table()?;
    for &(name, binding) in REGISTRY {
        let state = Rc::clone(&state);
        let function =
            lua.create_function(move |lua, args: MultiValue| binding(lua, &state, args))?;
        module.set(name, function)?;
    }
    for &(name, value) in CONSTANTS {
        module.set(name, value)?;
    }

    tracing::debug!(
        target: "lua",
        module = %config.module_name,
        functions = REGISTRY.len(),
        "Opened gl module"
    );
    Ok(module)
}

/// Register the module loader in `package.preload`.
pub fn install(lua: &Lua, gl: GlContext, config: &GlConfig) -> mlua::Result<()> {
    let name = config.module_name.clone();
    let config = config.clone();
    let loader = lua.create_function(move |lua, _: MultiValue| open(lua, gl.clone(), &config))?;

    let package: Table = lua.globals().get("package")?;
    let preload: Table = package.get("preload")?;
    preload.set(name.as_str(), loader)?;

    tracing::debug!(target: "lua", module = %name, "Installed module loader");
    Ok(())
}

/// Find the [`BindingError`] behind a Lua error raised by a binding function.
pub fn binding_error(err: &mlua::Error) -> Option<&BindingError> {
    external_cause(err)
}

fn external_cause<E: std::error::Error + 'static>(err: &mlua::Error) -> Option<&E> {
    match err {
        mlua::Error::CallbackError { cause, .. } => external_cause(cause),
        mlua::Error::ExternalError(inner) => inner.downcast_ref::<E>(),
        _ => None,
    }
}
