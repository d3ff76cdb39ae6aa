//! 弱引用查找
//!
//! 实体之间只保存对方的数值标识。需要确认引用是否有效时，由调用方提供查找能力，
//! 通常由存储层实现。

use async_trait::async_trait;

use crate::error::Result;
use crate::ids::{PatientId, UserId};
use crate::models::{Patient, User};

/// 按标识查找被引用的实体
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    async fn user(&self, id: UserId) -> Result<Option<User>>;

    async fn patient(&self, id: PatientId) -> Result<Option<Patient>>;
}
