//! # 医院数据库模块
//!
//! 负责把核心数据模型落到 PostgreSQL：根据实体结构定义生成表结构，提供连接池和 CRUD 操作。
//! 唯一性等约束由数据库执行，冲突以 [`hospital_core::HospitalError::Conflict`] 返回。

pub mod connection;
pub mod ddl;
pub mod models;
pub mod queries;

// 重新导出主要类型
pub use connection::{DatabasePool, DatabaseSettings};
pub use models::*;
pub use queries::DatabaseQueries;
