//! 预约
//!
//! 只记录预约数据，不计算排班可用性，也不检测同一医生的时间冲突。

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Insertable};
use crate::coded::{text_enum, Coded};
use crate::ids::{AppointmentId, PatientId, UserId};
use crate::schema::{EntitySchema, APPOINTMENTS};

text_enum! {
    /// 预约状态
    pub enum AppointmentStatus {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
        Waiting => "waiting",
        InProgress => "in progress",
    }
}

impl AppointmentStatus {
    /// 已完成和已取消为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

/// 预约记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: UserId,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    /// 分钟
    pub duration: i32,
    pub status: Coded<AppointmentStatus>,
    pub department: String,
    pub notes: Option<String>,
    pub reason_for_visit: Option<String>,
}

/// 新预约插入模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_id: PatientId,
    pub doctor_id: UserId,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration: i32,
    pub status: Coded<AppointmentStatus>,
    pub department: String,
    pub notes: Option<String>,
    pub reason_for_visit: Option<String>,
}

impl NewAppointment {
    pub const DEFAULT_DURATION: i32 = 30;

    pub fn new(
        patient_id: PatientId,
        doctor_id: UserId,
        appointment_date: NaiveDate,
        appointment_time: NaiveTime,
        department: impl Into<String>,
    ) -> Self {
        Self {
            patient_id,
            doctor_id,
            appointment_date,
            appointment_time,
            duration: Self::DEFAULT_DURATION,
            status: AppointmentStatus::Scheduled.into(),
            department: department.into(),
            notes: None,
            reason_for_visit: None,
        }
    }
}

impl Entity for Appointment {
    type Id = AppointmentId;
    type New = NewAppointment;

    const SCHEMA: &'static EntitySchema = &APPOINTMENTS;

    fn id(&self) -> AppointmentId {
        self.id
    }

    fn to_insertable(&self) -> NewAppointment {
        NewAppointment {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            appointment_date: self.appointment_date,
            appointment_time: self.appointment_time,
            duration: self.duration,
            status: self.status.clone(),
            department: self.department.clone(),
            notes: self.notes.clone(),
            reason_for_visit: self.reason_for_visit.clone(),
        }
    }
}

impl Insertable for NewAppointment {
    type Record = Appointment;

    fn into_record(self, id: AppointmentId, _created_at: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            appointment_date: self.appointment_date,
            appointment_time: self.appointment_time,
            duration: self.duration,
            status: self.status,
            department: self.department,
            notes: self.notes,
            reason_for_visit: self.reason_for_visit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn booking() -> serde_json::Value {
        json!({
            "patientId": 3,
            "doctorId": 8,
            "appointmentDate": "2024-09-14",
            "appointmentTime": "08:45:00",
            "department": "Orthopedics",
        })
    }

    #[test]
    fn test_duration_and_status_defaults() {
        let appointment = NewAppointment::validate(&booking()).unwrap();
        assert_eq!(appointment.duration, 30);
        assert!(appointment.status.is(AppointmentStatus::Scheduled));
        assert_eq!(appointment.patient_id, PatientId(3));
        assert_eq!(appointment.doctor_id, UserId(8));
    }

    #[test]
    fn test_references_are_required_and_not_nullable() {
        for field in ["patientId", "doctorId"] {
            let mut input = booking();
            input[field] = serde_json::Value::Null;
            assert!(NewAppointment::validate(&input).unwrap_err().has_issue(field));
        }
    }

    #[test]
    fn test_in_progress_status_text() {
        let mut input = booking();
        input["status"] = json!("in progress");
        input["duration"] = json!(45);
        let appointment = NewAppointment::validate(&input).unwrap();
        assert!(appointment.status.is(AppointmentStatus::InProgress));
        assert_eq!(appointment.duration, 45);
    }

    #[test]
    fn test_overlapping_bookings_are_not_rejected() {
        let first = NewAppointment::validate(&booking()).unwrap();
        let second = NewAppointment::validate(&booking()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_terminal_states() {
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(!AppointmentStatus::Waiting.is_terminal());
    }
}
