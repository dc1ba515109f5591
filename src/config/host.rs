use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 宿主进程配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// 主循环帧率（仅 `main_loop` feature 下生效）
    pub frame_rate: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { frame_rate: 60 }
    }
}

impl HostConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.frame_rate == 0 || self.frame_rate > 1000 {
            return Err(ConfigError::ValidationError(format!(
                "host.frame_rate must be in 1..=1000, got {}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}
