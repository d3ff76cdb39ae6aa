//! 配置管理
//!
//! 按 默认值 → 配置文件 → 环境变量（`HOSPITAL__DATABASE__URL` 形式）的顺序叠加

use std::path::Path;

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use hospital_database::DatabaseSettings;
use serde::{Deserialize, Serialize};

/// 管理工具完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 优先
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AdminConfig {
    /// 加载配置；未指定文件时尝试读取当前目录下可选的 `hospital.toml`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("hospital").required(false),
        };

        Self::build(file).context("加载配置失败")
    }

    fn build<S>(file: S) -> std::result::Result<Self, ::config::ConfigError>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(Config::try_from(&AdminConfig::default())?)
            .add_source(file)
            .add_source(Environment::with_prefix("HOSPITAL").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 从 TOML 文本加载，便于测试
    pub fn from_toml(text: &str) -> Result<Self> {
        Self::build(File::from_str(text, FileFormat::Toml)).context("解析配置失败")
    }
}
