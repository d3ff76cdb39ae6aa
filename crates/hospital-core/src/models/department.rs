//! 科室

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Insertable};
use crate::coded::{text_enum, Coded};
use crate::ids::DepartmentId;
use crate::schema::{EntitySchema, DEPARTMENTS};

text_enum! {
    /// 科室负荷分级，由外部逻辑根据 currentLoad 与 capacity 重新计算
    pub enum DepartmentStatus {
        Normal => "normal",
        HighLoad => "high load",
        Moderate => "moderate",
        Critical => "critical",
    }
}

/// 科室记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub capacity: i32,
    pub current_load: i32,
    pub num_doctors: i32,
    pub num_nurses: i32,
    pub status: Coded<DepartmentStatus>,
}

/// 新科室插入模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    pub name: String,
    pub capacity: i32,
    pub current_load: i32,
    pub num_doctors: i32,
    pub num_nurses: i32,
    pub status: Coded<DepartmentStatus>,
}

impl NewDepartment {
    pub fn new(name: impl Into<String>, capacity: i32) -> Self {
        Self {
            name: name.into(),
            capacity,
            current_load: 0,
            num_doctors: 0,
            num_nurses: 0,
            status: DepartmentStatus::Normal.into(),
        }
    }
}

impl Entity for Department {
    type Id = DepartmentId;
    type New = NewDepartment;

    const SCHEMA: &'static EntitySchema = &DEPARTMENTS;

    fn id(&self) -> DepartmentId {
        self.id
    }

    fn to_insertable(&self) -> NewDepartment {
        NewDepartment {
            name: self.name.clone(),
            capacity: self.capacity,
            current_load: self.current_load,
            num_doctors: self.num_doctors,
            num_nurses: self.num_nurses,
            status: self.status.clone(),
        }
    }
}

impl Insertable for NewDepartment {
    type Record = Department;

    fn into_record(self, id: DepartmentId, _created_at: DateTime<Utc>) -> Department {
        Department {
            id,
            name: self.name,
            capacity: self.capacity,
            current_load: self.current_load,
            num_doctors: self.num_doctors,
            num_nurses: self.num_nurses,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counters_default_to_zero() {
        let department = NewDepartment::validate(&json!({ "name": "Pediatrics", "capacity": 30 }))
            .unwrap();
        assert_eq!(department, NewDepartment::new("Pediatrics", 30));
    }

    #[test]
    fn test_high_load_status_text() {
        let department = NewDepartment::validate(&json!({
            "name": "Emergency",
            "capacity": 20,
            "currentLoad": 19,
            "status": "high load",
        }))
        .unwrap();
        assert!(department.status.is(DepartmentStatus::HighLoad));
        assert_eq!(department.current_load, 19);
    }

    #[test]
    fn test_capacity_is_required() {
        let err = NewDepartment::validate(&json!({ "name": "Radiology" })).unwrap_err();
        assert!(err.has_issue("capacity"));
    }
}
