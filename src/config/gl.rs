use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// `max_vertex_arrays` 的上限，对应 64 MiB 的临时名字缓冲区
pub const VERTEX_ARRAY_CEILING: usize = 1 << 24;

/// `gl` 脚本模块配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlConfig {
    /// 脚本模块名，`require` 时使用
    pub module_name: String,

    /// 单次 `genVertexArrays` 调用允许申请的最大数量
    pub max_vertex_arrays: usize,
}

impl Default for GlConfig {
    fn default() -> Self {
        Self {
            module_name: "gl".to_string(),
            max_vertex_arrays: 1 << 20,
        }
    }
}

impl GlConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.module_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "gl.module_name must not be empty".to_string(),
            ));
        }
        if self.max_vertex_arrays == 0 || self.max_vertex_arrays > VERTEX_ARRAY_CEILING {
            return Err(ConfigError::ValidationError(format!(
                "gl.max_vertex_arrays must be in 1..={}, got {}",
                VERTEX_ARRAY_CEILING, self.max_vertex_arrays
            )));
        }
        Ok(())
    }
}
