//! 统一错误处理模块
//!
//! 提供整个 crate 的错误类型定义
//!
//! ## 错误类型分层
//!
//! - **绑定层错误** (`BindingError`): 脚本调用参数的数量/类型校验失败
//! - **驱动层错误** (`DriverError`): 图形驱动后端拒绝了一次分配
//! - **脚本层错误** (`ScriptError`): QuickJS 堆创建或求值失败
//! - **配置错误** (`ConfigError`): 定义在 `config` 模块
//!
//! `Error` 可以同时承载以上所有错误。

use crate::config::ConfigError;
use thiserror::Error;

/// crate 顶层错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 绑定函数参数错误
///
/// `position` 从 1 开始计数，与 Lua 的 `bad argument #n` 保持一致。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("{function}: expected {expected} arguments, got {got}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{function}: bad argument #{position} ({expected} expected, got {got})")]
    ArgumentType {
        function: &'static str,
        position: usize,
        expected: &'static str,
        got: String,
    },

    #[error("{function}: bad argument #{position} (number has no integer representation)")]
    NotAnInteger {
        function: &'static str,
        position: usize,
    },

    #[error("{function}: bad argument #{position} (value {value} out of range)")]
    OutOfRange {
        function: &'static str,
        position: usize,
        value: i64,
    },

    #[error("{function}: identifier count must be non-negative, got {count}")]
    NegativeCount { function: &'static str, count: i64 },

    #[error("{function}: identifier count {count} exceeds the limit of {max}")]
    CountTooLarge {
        function: &'static str,
        count: i64,
        max: usize,
    },
}

/// 图形驱动错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    #[error("Failed to allocate vertex array: {0}")]
    Allocation(String),
}

/// 脚本系统错误
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to create JS heap: {0}")]
    HeapCreation(String),

    #[error("Uncaught exception: {0}")]
    Exception(String),

    #[error("Script evaluation error: {0}")]
    Evaluation(String),
}

impl From<BindingError> for mlua::Error {
    fn from(err: BindingError) -> Self {
        mlua::Error::external(err)
    }
}

impl From<DriverError> for mlua::Error {
    fn from(err: DriverError) -> Self {
        mlua::Error::external(err)
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, Error>;
pub type BindingResult<T> = std::result::Result<T, BindingError>;
pub type DriverResult<T> = std::result::Result<T, DriverError>;
pub type ScriptResult<T> = std::result::Result<T, ScriptError>;
