//! 患者

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Insertable};
use crate::coded::{text_enum, Coded};
use crate::ids::{PatientId, UserId};
use crate::schema::{EntitySchema, PATIENTS};

text_enum! {
    /// 患者状态
    pub enum PatientStatus {
        Active => "active",
        Discharged => "discharged",
        Critical => "critical",
        Stable => "stable",
    }
}

/// 患者记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    /// 业务编号，全局唯一且分配后不再修改
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub status: Coded<PatientStatus>,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    pub room_number: Option<String>,
    /// 主治医生（弱引用）
    pub assigned_doctor_id: Option<UserId>,
}

/// 新患者插入模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub status: Coded<PatientStatus>,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    pub room_number: Option<String>,
    pub assigned_doctor_id: Option<UserId>,
}

impl NewPatient {
    pub fn new(
        patient_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            gender: gender.into(),
            contact: None,
            email: None,
            address: None,
            blood_type: None,
            allergies: None,
            emergency_contact_name: None,
            emergency_contact_number: None,
            status: PatientStatus::Active.into(),
            admission_date: None,
            discharge_date: None,
            room_number: None,
            assigned_doctor_id: None,
        }
    }
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for Patient {
    type Id = PatientId;
    type New = NewPatient;

    const SCHEMA: &'static EntitySchema = &PATIENTS;

    fn id(&self) -> PatientId {
        self.id
    }

    fn to_insertable(&self) -> NewPatient {
        NewPatient {
            patient_id: self.patient_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            blood_type: self.blood_type.clone(),
            allergies: self.allergies.clone(),
            emergency_contact_name: self.emergency_contact_name.clone(),
            emergency_contact_number: self.emergency_contact_number.clone(),
            status: self.status.clone(),
            admission_date: self.admission_date,
            discharge_date: self.discharge_date,
            room_number: self.room_number.clone(),
            assigned_doctor_id: self.assigned_doctor_id,
        }
    }
}

impl Insertable for NewPatient {
    type Record = Patient;

    fn into_record(self, id: PatientId, _created_at: DateTime<Utc>) -> Patient {
        Patient {
            id,
            patient_id: self.patient_id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            contact: self.contact,
            email: self.email,
            address: self.address,
            blood_type: self.blood_type,
            allergies: self.allergies,
            emergency_contact_name: self.emergency_contact_name,
            emergency_contact_number: self.emergency_contact_number,
            status: self.status,
            admission_date: self.admission_date,
            discharge_date: self.discharge_date,
            room_number: self.room_number,
            assigned_doctor_id: self.assigned_doctor_id,
        }
    }
}
