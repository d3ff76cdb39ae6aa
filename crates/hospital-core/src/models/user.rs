//! 员工

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Insertable};
use crate::coded::{text_enum, Coded};
use crate::ids::UserId;
use crate::schema::{EntitySchema, USERS};

text_enum! {
    /// 员工角色
    pub enum StaffRole {
        Admin => "admin",
        Doctor => "doctor",
        Nurse => "nurse",
        Receptionist => "receptionist",
    }
}

text_enum! {
    /// 员工状态，只做软变更，不物理删除
    pub enum StaffStatus {
        Active => "active",
        OnLeave => "on leave",
        Inactive => "inactive",
    }
}

/// 员工记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// 全局唯一，由存储层保证
    pub username: String,
    /// 原样存储，哈希由调用方负责
    pub password: String,
    pub name: String,
    pub role: Coded<StaffRole>,
    pub department: Option<String>,
    pub specialty: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub status: Coded<StaffStatus>,
}

/// 新员工插入模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Coded<StaffRole>,
    pub department: Option<String>,
    pub specialty: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub status: Coded<StaffStatus>,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        role: StaffRole,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            name: name.into(),
            role: role.into(),
            department: None,
            specialty: None,
            contact: None,
            email: None,
            status: StaffStatus::Active.into(),
        }
    }
}

impl User {
    pub fn is_doctor(&self) -> bool {
        self.role.is(StaffRole::Doctor)
    }
}

impl Entity for User {
    type Id = UserId;
    type New = NewUser;

    const SCHEMA: &'static EntitySchema = &USERS;

    fn id(&self) -> UserId {
        self.id
    }

    fn to_insertable(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            department: self.department.clone(),
            specialty: self.specialty.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
            status: self.status.clone(),
        }
    }
}

impl Insertable for NewUser {
    type Record = User;

    fn into_record(self, id: UserId, _created_at: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
            name: self.name,
            role: self.role,
            department: self.department,
            specialty: self.specialty,
            contact: self.contact,
            email: self.email,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "username": "nurse.joy",
            "password": "pikachu",
            "name": "Joy",
            "role": "nurse",
        })
    }

    #[test]
    fn test_status_defaults_to_active() {
        let user = NewUser::validate(&minimal()).unwrap();
        assert_eq!(user.status, Coded::Known(StaffStatus::Active));
        assert_eq!(user, NewUser::new("nurse.joy", "pikachu", "Joy", StaffRole::Nurse));
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["username", "password", "name", "role"] {
            let mut input = minimal();
            input.as_object_mut().unwrap().remove(field);
            let err = NewUser::validate(&input).unwrap_err();
            assert!(err.has_issue(field), "{field} should be required");
        }
    }

    #[test]
    fn test_on_leave_status_text() {
        let mut input = minimal();
        input["status"] = json!("on leave");
        let user = NewUser::validate(&input).unwrap();
        assert!(user.status.is(StaffStatus::OnLeave));
    }

    #[test]
    fn test_duplicate_usernames_pass_validation() {
        // 唯一性由存储层检查
        let first = NewUser::validate(&minimal()).unwrap();
        let second = NewUser::validate(&minimal()).unwrap();
        assert_eq!(first.username, second.username);
    }
}
