//! 核心数据模型定义
//!
//! 每个实体提供两种结构：完整记录（从存储读回的全部字段）与可插入结构
//! （创建请求可提供的字段，不含主键等服务端字段）。

mod appointment;
mod department;
mod inventory;
mod notification;
mod patient;
mod user;

pub use appointment::{Appointment, AppointmentStatus, NewAppointment};
pub use department::{Department, DepartmentStatus, NewDepartment};
pub use inventory::{InventoryCategory, InventoryItem, NewInventoryItem};
pub use notification::{NewNotification, Notification, NotificationType};
pub use patient::{NewPatient, Patient, PatientStatus};
pub use user::{NewUser, StaffRole, StaffStatus, User};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{FieldIssue, Problem, ValidationError};
use crate::schema::{self, EntitySchema};
use crate::validation;

/// 完整记录
pub trait Entity: Clone + Serialize + DeserializeOwned {
    type Id: Copy + fmt::Display;
    type New: Insertable<Record = Self>;

    const SCHEMA: &'static EntitySchema;

    fn id(&self) -> Self::Id;

    /// 投影回可插入结构，丢弃服务端字段
    fn to_insertable(&self) -> Self::New;
}

/// 可插入结构
pub trait Insertable: Clone + Serialize + DeserializeOwned {
    type Record: Entity<New = Self>;

    /// 对未类型化输入做结构校验
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        validation::validate(<Self::Record as Entity>::SCHEMA, input)
    }

    /// 存储层创建记录时调用：补上服务端分配的主键与创建时间
    fn into_record(
        self,
        id: <Self::Record as Entity>::Id,
        created_at: DateTime<Utc>,
    ) -> Self::Record;
}

/// 实体种类，供按名称分派的调用方使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Patient,
    Appointment,
    Inventory,
    Department,
    Notification,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::User,
        EntityKind::Patient,
        EntityKind::Appointment,
        EntityKind::Inventory,
        EntityKind::Department,
        EntityKind::Notification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Patient => "patient",
            EntityKind::Appointment => "appointment",
            EntityKind::Inventory => "inventory",
            EntityKind::Department => "department",
            EntityKind::Notification => "notification",
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        match self {
            EntityKind::User => &schema::USERS,
            EntityKind::Patient => &schema::PATIENTS,
            EntityKind::Appointment => &schema::APPOINTMENTS,
            EntityKind::Inventory => &schema::INVENTORY,
            EntityKind::Department => &schema::DEPARTMENTS,
            EntityKind::Notification => &schema::NOTIFICATIONS,
        }
    }

    /// 校验并返回规范化后的可插入结构 JSON
    pub fn validate_json(&self, input: &Value) -> Result<Value, ValidationError> {
        match self {
            EntityKind::User => validated_json::<NewUser>(input),
            EntityKind::Patient => validated_json::<NewPatient>(input),
            EntityKind::Appointment => validated_json::<NewAppointment>(input),
            EntityKind::Inventory => validated_json::<NewInventoryItem>(input),
            EntityKind::Department => validated_json::<NewDepartment>(input),
            EntityKind::Notification => validated_json::<NewNotification>(input),
        }
    }
}

fn validated_json<T: Insertable>(input: &Value) -> Result<Value, ValidationError> {
    let record = T::validate(input)?;
    serde_json::to_value(record).map_err(|e| {
        ValidationError::new(
            <T::Record as Entity>::SCHEMA.entity,
            vec![FieldIssue::new("", Problem::Malformed(e.to_string()))],
        )
    })
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name || kind.schema().table == name)
            .ok_or_else(|| format!("unknown entity '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{PatientId, UserId};
    use serde_json::json;
    use std::collections::BTreeSet;

    /// 记录类型序列化出的字段集合必须与结构定义一致
    fn assert_record_matches_schema<E: Entity>(record: &E) {
        let value = serde_json::to_value(record).unwrap();
        let keys: BTreeSet<_> = value.as_object().unwrap().keys().cloned().collect();
        let fields: BTreeSet<_> = E::SCHEMA.fields.iter().map(|f| f.name.to_string()).collect();
        assert_eq!(keys, fields, "{} record drifted from schema", E::SCHEMA.entity);

        let value = serde_json::to_value(record.to_insertable()).unwrap();
        let keys: BTreeSet<_> = value.as_object().unwrap().keys().cloned().collect();
        let fields: BTreeSet<_> = E::SCHEMA
            .insertable_fields()
            .map(|f| f.name.to_string())
            .collect();
        assert_eq!(keys, fields, "{} insertable drifted from schema", E::SCHEMA.entity);
    }

    fn sample_user() -> User {
        NewUser::new("dr.house", "vicodin", "Gregory House", StaffRole::Doctor)
            .into_record(1.into(), Utc::now())
    }

    /// 每个必填字段单独删除后都应校验失败，完整输入经 记录 → 可插入结构 往返不丢信息
    fn assert_insert_contract<N: Insertable + PartialEq + fmt::Debug>(
        new: N,
        id: <N::Record as Entity>::Id,
    ) {
        let schema = <N::Record as Entity>::SCHEMA;
        let input = serde_json::to_value(&new).unwrap();

        let validated = N::validate(&input).unwrap();
        assert_eq!(validated, new);

        let record = validated.clone().into_record(id, Utc::now());
        assert_eq!(record.to_insertable(), validated);

        let from_record = N::validate(&serde_json::to_value(&record).unwrap()).unwrap();
        assert_eq!(from_record, validated);

        for field in schema.required_fields() {
            let mut partial = input.clone();
            partial.as_object_mut().unwrap().remove(field.name);
            let err = N::validate(&partial).unwrap_err();
            assert!(err.has_issue(field.name), "{}.{}", schema.entity, field.name);
        }
    }

    #[test]
    fn test_records_match_schemas() {
        let now = Utc::now();
        let dob = "1980-05-17".parse().unwrap();
        let date = "2024-06-01".parse().unwrap();
        let time = "10:15:00".parse().unwrap();

        assert_record_matches_schema(&sample_user());
        assert_record_matches_schema(
            &NewPatient::new("P-1", "Ada", "Lovelace", dob, "female").into_record(2.into(), now),
        );
        assert_record_matches_schema(
            &NewAppointment::new(2.into(), 1.into(), date, time, "Cardiology")
                .into_record(3.into(), now),
        );
        assert_record_matches_schema(
            &NewInventoryItem::new("Gauze", InventoryCategory::Supplies).into_record(4.into(), now),
        );
        assert_record_matches_schema(
            &NewDepartment::new("Cardiology", 40).into_record(5.into(), now),
        );
        assert_record_matches_schema(
            &NewNotification::new("Heads up", "Drill at noon", NotificationType::Info)
                .into_record(6.into(), now),
        );
    }

    #[test]
    fn test_insert_contracts() {
        let mut user = NewUser::new("admin", "hunter2", "Root", StaffRole::Admin);
        user.email = Some("root@hospital.test".into());
        assert_insert_contract(user, 1.into());

        let mut patient = NewPatient::new(
            "P-2001",
            "Grace",
            "Hopper",
            "1906-12-09".parse().unwrap(),
            "female",
        );
        patient.blood_type = Some("O+".into());
        patient.assigned_doctor_id = Some(UserId(1));
        assert_insert_contract(patient, 2.into());

        let mut appointment = NewAppointment::new(
            PatientId(2),
            UserId(1),
            "2024-06-01".parse().unwrap(),
            "10:15:00".parse().unwrap(),
            "Neurology",
        );
        appointment.reason_for_visit = Some("Headache".into());
        assert_insert_contract(appointment, 3.into());

        let mut item = NewInventoryItem::new("Ibuprofen", InventoryCategory::Medication);
        item.quantity = 200;
        item.expiry_date = Some("2026-01-31".parse().unwrap());
        assert_insert_contract(item, 4.into());

        assert_insert_contract(NewDepartment::new("Oncology", 25), 5.into());

        assert_insert_contract(
            NewNotification::new("Reminder", "Badge renewal", NotificationType::Info)
                .for_user(UserId(1)),
            6.into(),
        );
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("patient".parse::<EntityKind>(), Ok(EntityKind::Patient));
        assert_eq!("Users".parse::<EntityKind>(), Ok(EntityKind::User));
        assert_eq!("inventory".parse::<EntityKind>(), Ok(EntityKind::Inventory));
        assert!("ward".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_validate_json_dispatch() {
        let value = EntityKind::Department
            .validate_json(&json!({ "name": "ER", "capacity": 12, "id": 4 }))
            .unwrap();

        assert_eq!(
            value,
            json!({
                "name": "ER",
                "capacity": 12,
                "currentLoad": 0,
                "numDoctors": 0,
                "numNurses": 0,
                "status": "normal",
            })
        );

        let err = EntityKind::Department
            .validate_json(&json!({ "name": "ER" }))
            .unwrap_err();
        assert!(err.has_issue("capacity"));
    }

    #[test]
    fn test_full_record_as_insert_input_drops_id() {
        let user = sample_user();
        let input = serde_json::to_value(&user).unwrap();
        assert_eq!(input["id"], json!(1));

        let validated = NewUser::validate(&input).unwrap();
        assert_eq!(validated, user.to_insertable());
    }
}
