//! 通知
//!
//! 创建后内容不可修改，唯一允许的变更是标记已读。时间戳与已读标记不接受客户端输入。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Insertable};
use crate::coded::{text_enum, Coded};
use crate::ids::{NotificationId, UserId};
use crate::schema::{EntitySchema, NOTIFICATIONS};

text_enum! {
    /// 通知类型
    pub enum NotificationType {
        Alert => "alert",
        Info => "info",
        Warning => "warning",
        Success => "success",
    }
}

/// 通知记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: Coded<NotificationType>,
    /// 创建时由服务端设置
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    /// None 表示全员广播
    pub user_id: Option<UserId>,
}

/// 新通知插入模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: Coded<NotificationType>,
    pub user_id: Option<UserId>,
}

impl NewNotification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        notification_type: NotificationType,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            notification_type: notification_type.into(),
            user_id: None,
        }
    }

    pub fn for_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

impl Notification {
    pub fn is_broadcast(&self) -> bool {
        self.user_id.is_none()
    }

    /// 是否对该用户可见：定向给该用户或全员广播
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.user_id.map_or(true, |target| target == user_id)
    }
}

impl Entity for Notification {
    type Id = NotificationId;
    type New = NewNotification;

    const SCHEMA: &'static EntitySchema = &NOTIFICATIONS;

    fn id(&self) -> NotificationId {
        self.id
    }

    fn to_insertable(&self) -> NewNotification {
        NewNotification {
            title: self.title.clone(),
            message: self.message.clone(),
            notification_type: self.notification_type.clone(),
            user_id: self.user_id,
        }
    }
}

impl Insertable for NewNotification {
    type Record = Notification;

    fn into_record(self, id: NotificationId, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            title: self.title,
            message: self.message,
            notification_type: self.notification_type,
            timestamp: created_at,
            is_read: false,
            user_id: self.user_id,
        }
    }
}
