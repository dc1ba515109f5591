//! 核心模块
//!
//! - `error` - 错误类型定义
//! - `logging` - tracing 日志初始化

pub mod error;
pub mod logging;

// 重新导出错误类型
pub use error::{
    BindingError, BindingResult, DriverError, DriverResult, Error, Result, ScriptError,
    ScriptResult,
};
pub use logging::initialize_logging;
