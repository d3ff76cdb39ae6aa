//! 数据库连接管理

use std::time::Duration;

use hospital_core::{HospitalError, Result};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// 连接字符串
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时（秒）
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/hospital".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 5,
        }
    }
}

impl DatabaseSettings {
    /// 连接前检查配置取值
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(HospitalError::Config("database.url 不能为空".to_string()));
        }
        if self.max_connections == 0 {
            return Err(HospitalError::Config(
                "database.max_connections 必须大于 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(HospitalError::Config(format!(
                "database.min_connections ({}) 大于 max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }
}

/// 数据库连接池
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        settings.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .connect(&settings.url)
            .await
            .map_err(|e| HospitalError::Database(e.to_string()))?;

        info!(
            max_connections = settings.max_connections,
            "Database pool established"
        );
        Ok(Self { pool })
    }

    /// 复用已有连接池
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
