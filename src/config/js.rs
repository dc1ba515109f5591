use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// QuickJS 堆配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsConfig {
    /// 堆内存上限（字节），`None` 表示不限制
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<usize>,

    /// 最大栈大小（字节），`None` 使用 QuickJS 默认值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stack_size: Option<usize>,
}

impl JsConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.memory_limit == Some(0) {
            return Err(ConfigError::ValidationError(
                "js.memory_limit must be greater than zero".to_string(),
            ));
        }
        if self.max_stack_size == Some(0) {
            return Err(ConfigError::ValidationError(
                "js.max_stack_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
