use mlua::{Lua, Table};
use proptest::prelude::*;
use scriptgl::bindings::{self, binding_error};
use scriptgl::config::GlConfig;
use scriptgl::core::BindingError;
use scriptgl::driver::{DriverCall, GlContext, HeadlessDriver, COLOR_BUFFER_BIT};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

fn lua_with_gl() -> (Lua, Rc<RefCell<HeadlessDriver>>) {
    let lua = Lua::new();
    let driver = Rc::new(RefCell::new(HeadlessDriver::new()));
    bindings::install(&lua, GlContext::from_shared(driver.clone()), &GlConfig::default())
        .expect("install gl module");
    (lua, driver)
}

#[test]
fn test_scenario_clear_then_generate() -> anyhow::Result<()> {
    let (lua, driver) = lua_with_gl();

    let ids: Table = lua
        .load(
            r#"
            local gl = require "gl"
            gl.clear(16384)
            return gl.genVertexArrays(3)
            "#,
        )
        .eval()?;

    assert_eq!(ids.raw_len(), 3);
    let values: Vec<u32> = (1..=3).map(|i| ids.raw_get(i)).collect::<Result<_, _>>()?;
    assert!(values.iter().all(|&id| id != 0));
    assert_eq!(values.iter().collect::<HashSet<_>>().len(), 3);

    let driver = driver.borrow();
    assert_eq!(driver.calls()[0], DriverCall::Clear { mask: COLOR_BUFFER_BIT });
    assert_eq!(driver.reserved_vertex_arrays(), 3);
    Ok(())
}

#[test]
fn test_require_is_cached() -> anyhow::Result<()> {
    let (lua, driver) = lua_with_gl();

    let same: bool = lua
        .load(
            r#"
            local a = require "gl"
            local b = require "gl"
            a.clear(a.DEPTH_BUFFER_BIT)
            b.clear(b.DEPTH_BUFFER_BIT)
            return a == b and a.clear == b.clear
            "#,
        )
        .eval()?;

    assert!(same);
    assert_eq!(driver.borrow().framebuffer().depth_clears, 2);
    Ok(())
}

#[test]
fn test_missing_arguments_have_no_side_effect() {
    let (lua, driver) = lua_with_gl();

    for source in [
        r#"require("gl").clearColor(1, 1, 1)"#,
        r#"require("gl").clear()"#,
        r#"require("gl").genVertexArrays()"#,
    ] {
        let err = lua.load(source).exec().unwrap_err();
        assert!(
            matches!(binding_error(&err), Some(BindingError::ArgumentCount { .. })),
            "unexpected error for {}: {}",
            source,
            err
        );
    }
    assert!(driver.borrow().calls().is_empty());
}

#[test]
fn test_type_errors_surface_in_lua() -> anyhow::Result<()> {
    let (lua, driver) = lua_with_gl();

    let (ok, message): (bool, String) = lua
        .load(
            r#"
            local ok, err = pcall(require("gl").clear, "lots")
            return ok, tostring(err)
            "#,
        )
        .eval()?;

    assert!(!ok);
    assert!(message.contains("bad argument #1"), "{}", message);
    assert!(driver.borrow().calls().is_empty());
    Ok(())
}

#[test]
fn test_negative_count_rejected() {
    let (lua, driver) = lua_with_gl();
    let err = lua
        .load(r#"require("gl").genVertexArrays(-1)"#)
        .exec()
        .unwrap_err();

    assert!(matches!(
        binding_error(&err),
        Some(BindingError::NegativeCount { count: -1, .. })
    ));
    assert_eq!(driver.borrow().reserved_vertex_arrays(), 0);
}

#[test]
fn test_numeric_strings_accepted() -> anyhow::Result<()> {
    let (lua, driver) = lua_with_gl();
    lua.load(r#"local gl = require "gl"; gl.clearColor("1", "0.5", 0, "1e0"); gl.clear("0x4000")"#)
        .exec()?;

    let driver = driver.borrow();
    assert_eq!(driver.framebuffer().color, [1.0, 0.5, 0.0, 1.0]);
    Ok(())
}

#[test]
fn test_open_without_require() -> anyhow::Result<()> {
    let lua = Lua::new();
    let module = bindings::open(&lua, GlContext::new(HeadlessDriver::new()), &GlConfig::default())?;

    for (name, _) in bindings::REGISTRY {
        assert!(module.contains_key(*name)?, "missing {}", name);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_clear_color_forwards_unchanged(
        r in any::<f32>().prop_filter("finite", |v| v.is_finite()),
        g in any::<f32>().prop_filter("finite", |v| v.is_finite()),
        b in any::<f32>().prop_filter("finite", |v| v.is_finite()),
        a in any::<f32>().prop_filter("finite", |v| v.is_finite()),
    ) {
        let (lua, driver) = lua_with_gl();
        let clear_color: mlua::Function = lua
            .load(r#"return require("gl").clearColor"#)
            .eval()
            .unwrap();
        clear_color
            .call::<_, ()>((r as f64, g as f64, b as f64, a as f64))
            .unwrap();

        let calls = driver.borrow_mut().take_calls();
        prop_assert_eq!(
            calls,
            vec![DriverCall::ClearColor { red: r, green: g, blue: b, alpha: a }]
        );
    }

    #[test]
    fn prop_gen_returns_count_distinct_ids(counts in prop::collection::vec(0usize..64, 1..8)) {
        let (lua, driver) = lua_with_gl();
        let generate: mlua::Function = lua
            .load(r#"return require("gl").genVertexArrays"#)
            .eval()
            .unwrap();

        let mut seen = HashSet::new();
        for count in &counts {
            let ids: Table = generate.call(*count as i64).unwrap();
            prop_assert_eq!(ids.raw_len(), *count);
            for i in 1..=*count {
                let id: u32 = ids.raw_get(i).unwrap();
                prop_assert!(id != 0);
                prop_assert!(seen.insert(id), "duplicate id {}", id);
            }
            prop_assert!(ids.raw_get::<_, mlua::Value>(*count + 1).unwrap().is_nil());
        }

        let total: usize = counts.iter().sum();
        prop_assert_eq!(driver.borrow().reserved_vertex_arrays(), total);
    }
}
