//! 数值标识
//!
//! 所有实体主键均为服务端分配的自增整数。跨实体关系只保存对方的标识（弱引用），
//! 不持有对象本身；需要对象时通过 [`crate::ReferenceResolver`] 查找。

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            #[cfg_attr(feature = "database", derive(sqlx::Type), sqlx(transparent))]
            pub struct $name(pub i32);

            impl $name {
                pub fn get(self) -> i32 {
                    self.0
                }
            }

            impl From<i32> for $name {
                fn from(id: i32) -> Self {
                    Self(id)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )+
    };
}

define_id! {
    /// 员工主键
    UserId,
    /// 患者主键（区别于业务编号 `patientId` 文本）
    PatientId,
    AppointmentId,
    InventoryItemId,
    DepartmentId,
    NotificationId,
}
