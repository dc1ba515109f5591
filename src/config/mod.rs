//! 统一配置系统
//!
//! 提供TOML/JSON配置文件、环境变量和运行时校验
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod gl;
pub mod host;
pub mod js;

pub use gl::GlConfig;
pub use host::HostConfig;
pub use js::JsConfig;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingsConfig {
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// `gl` 模块配置
    #[serde(default)]
    pub gl: GlConfig,

    /// QuickJS 堆配置
    #[serde(default)]
    pub js: JsConfig,

    /// 宿主进程配置
    #[serde(default)]
    pub host: HostConfig,
}

impl BindingsConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    ///
    /// 无法解析的值会被忽略，保留原配置。
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("SCRIPTGL_LOG_LEVEL") {
            if let Some(level) = LogLevel::parse(&val) {
                self.logging.level = level;
            }
        }
        if let Ok(val) = env::var("SCRIPTGL_GL_MAX_VERTEX_ARRAYS") {
            if let Ok(max) = val.parse() {
                self.gl.max_vertex_arrays = max;
            }
        }
        if let Ok(val) = env::var("SCRIPTGL_JS_MEMORY_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.js.memory_limit = Some(limit);
            }
        }
        if let Ok(val) = env::var("SCRIPTGL_HOST_FRAME_RATE") {
            if let Ok(rate) = val.parse() {
                self.host.frame_rate = rate;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.gl.validate()?;
        self.js.validate()?;
        self.host.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./scriptgl.toml
    /// 2. ./scriptgl.json
    /// 3. ~/.config/scriptgl/config.toml
    /// 4. 使用默认配置
    ///
    /// 返回配置及其来源路径。文件不存在时继续查找下一个；
    /// 文件存在但无法读取或解析时返回错误。
    pub fn load_or_default() -> ConfigResult<(Self, Option<PathBuf>)> {
        let home = env::var_os("HOME").map(PathBuf::from);
        match Self::discover(Path::new("."), home.as_deref())? {
            Some((config, path)) => Ok((config, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// 在 `dir` 与 `home` 下按固定顺序查找第一个存在的配置文件
    pub fn discover(dir: &Path, home: Option<&Path>) -> ConfigResult<Option<(Self, PathBuf)>> {
        let mut candidates = vec![dir.join("scriptgl.toml"), dir.join("scriptgl.json")];
        if let Some(home) = home {
            candidates.push(home.join(".config").join("scriptgl").join("config.toml"));
        }

        for path in candidates {
            let loaded = if path.extension().is_some_and(|ext| ext == "json") {
                Self::from_json_file(&path)
            } else {
                Self::from_toml_file(&path)
            };
            match loaded {
                Ok(config) => return Ok(Some((config, path))),
                Err(ConfigError::FileError(e)) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(ConfigError::ParseError(msg)) => {
                    return Err(ConfigError::ParseError(format!("{}: {}", path.display(), msg)))
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            log_to_console: true,
        }
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// `EnvFilter` 指令字符串
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BindingsConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = BindingsConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: BindingsConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.gl.max_vertex_arrays, parsed.gl.max_vertex_arrays);
        assert_eq!(config.host.frame_rate, parsed.host.frame_rate);
    }

    #[test]
    fn test_json_serialization() {
        let config = BindingsConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed: BindingsConfig = serde_json::from_str(&json_str).unwrap();
        assert_eq!(config.logging.level, parsed.logging.level);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = BindingsConfig::from_toml_str("[gl]\nmax_vertex_arrays = 8\n").unwrap();
        assert_eq!(config.gl.max_vertex_arrays, 8);
        assert_eq!(config.host.frame_rate, HostConfig::default().frame_rate);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scriptgl.toml");

        let mut config = BindingsConfig::default();
        config.js.memory_limit = Some(1 << 20);
        config.save_toml(&path).unwrap();

        let loaded = BindingsConfig::from_toml_file(&path).unwrap();
        assert_eq!(loaded.js.memory_limit, Some(1 << 20));
    }

    #[test]
    fn test_discover_without_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BindingsConfig::discover(dir.path(), None).unwrap().is_none());
    }

    #[test]
    fn test_discover_prefers_local_toml_over_home() {
        let dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let home_config = home.path().join(".config").join("scriptgl");
        fs::create_dir_all(&home_config).unwrap();
        fs::write(home_config.join("config.toml"), "[host]\nframe_rate = 30\n").unwrap();

        let (config, path) = BindingsConfig::discover(dir.path(), Some(home.path()))
            .unwrap()
            .unwrap();
        assert_eq!(config.host.frame_rate, 30);
        assert_eq!(path, home_config.join("config.toml"));

        fs::write(dir.path().join("scriptgl.toml"), "[host]\nframe_rate = 120\n").unwrap();
        let (config, path) = BindingsConfig::discover(dir.path(), Some(home.path()))
            .unwrap()
            .unwrap();
        assert_eq!(config.host.frame_rate, 120);
        assert_eq!(path, dir.path().join("scriptgl.toml"));
    }

    #[test]
    fn test_discover_reports_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scriptgl.toml"), "[gl\n").unwrap();
        // A valid fallback must not hide the broken file.
        fs::write(dir.path().join("scriptgl.json"), "{}").unwrap();

        match BindingsConfig::discover(dir.path(), None) {
            Err(ConfigError::ParseError(msg)) => assert!(msg.contains("scriptgl.toml"), "{}", msg),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scriptgl.json"), "{ \"gl\": ").unwrap();
        assert!(matches!(
            BindingsConfig::discover(dir.path(), None),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BindingsConfig::default();
        config.host.frame_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_oversized_vertex_array_override_rejected() {
        let mut config = BindingsConfig::from_toml_str(&format!(
            "[gl]\nmax_vertex_arrays = {}\n",
            i64::MAX
        ))
        .unwrap();
        assert!(config.validate().is_err());

        config.gl.max_vertex_arrays = GlConfig::default().max_vertex_arrays;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("verbose"), None);
    }
}
