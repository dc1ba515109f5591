//! Host process entry point.

mod main_loop;

pub use main_loop::MainLoop;

use crate::bindings;
use crate::config::BindingsConfig;
use crate::core::{initialize_logging, Result};
use crate::driver::{GlContext, HeadlessDriver};
use crate::scripting::execute_js;
use mlua::Lua;
use std::ops::ControlFlow;

/// Diagnostic lines printed on startup.
pub const BANNER: [&str; 2] = ["scriptgl host starting", "evaluating startup script"];

/// Evaluated once at startup; its value is never printed.
pub const STARTUP_SCRIPT: &str = "1 + 2 * (3 - 4) / 5";

/// Per-frame Lua chunk run by the main loop.
pub const FRAME_SCRIPT: &str = r#"
local gl = require "gl"
gl.clearColor(0.1, 0.1, 0.1, 1.0)
gl.clear(gl.COLOR_BUFFER_BIT | gl.DEPTH_BUFFER_BIT)
"#;

/// Load configuration, print the banner and evaluate the startup script.
///
/// A config file that exists but does not parse fails the call before
/// anything is printed. With the `main_loop` feature the call then blocks
/// in the frame loop.
pub fn run() -> Result<()> {
    // Logging takes its level from the config, so it starts second.
    let (mut config, source) = BindingsConfig::load_or_default()?;
    config.apply_env_overrides();
    config.validate()?;
    initialize_logging(&config.logging);
    match &source {
        Some(path) => tracing::info!(target: "host", path = %path.display(), "Loaded config"),
        None => tracing::debug!(target: "host", "Using default configuration"),
    }
    tracing::info!(target: "host", ?config, "Host starting");

    for line in BANNER {
        println!("{}", line);
    }
    execute_js(STARTUP_SCRIPT);

    #[cfg(feature = "main_loop")]
    run_frame_loop(&config, None)?;

    tracing::info!(target: "host", "Host shutting down");
    Ok(())
}

/// Drive [`FRAME_SCRIPT`] against a headless driver at the configured rate.
///
/// Stops after `max_frames` frames, or on the first Lua error; runs
/// forever when `max_frames` is `None`. Returns the frames completed.
pub fn run_frame_loop(config: &BindingsConfig, max_frames: Option<u64>) -> Result<u64> {
    let lua = Lua::new();
    bindings::install(&lua, GlContext::new(HeadlessDriver::new().without_call_log()), &config.gl)?;
    let chunk = lua.load(FRAME_SCRIPT).set_name("frame").into_function()?;

    let mut main_loop = MainLoop::new(config.host.frame_rate);
    tracing::info!(
        target: "host",
        frame_time = ?main_loop.frame_time(),
        "Entering main loop"
    );

    let outcome = main_loop.run(|frame| {
        if let Err(e) = chunk.call::<_, ()>(()) {
            tracing::error!(target: "host", frame, error = %e, "Frame script failed");
            return ControlFlow::Break(Err(e));
        }
        match max_frames {
            Some(max) if frame + 1 >= max => ControlFlow::Break(Ok(())),
            _ => ControlFlow::Continue(()),
        }
    });

    outcome?;
    Ok(main_loop.frames())
}
