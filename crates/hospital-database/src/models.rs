//! 数据库模型

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use hospital_core::models::*;
use hospital_core::{
    AppointmentId, Coded, DepartmentId, InventoryItemId, NotificationId, PatientId, UserId,
};
use sqlx::FromRow;

// 数据库表模型 - 使用FromRow trait用于SQL查询，枚举列以文本读出

/// 数据库员工表
#[derive(Debug, FromRow)]
pub struct DbUser {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: String,
    pub department: Option<String>,
    pub specialty: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub status: String,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: UserId(row.id),
            username: row.username,
            password: row.password,
            name: row.name,
            role: Coded::from_text(row.role),
            department: row.department,
            specialty: row.specialty,
            contact: row.contact,
            email: row.email,
            status: Coded::from_text(row.status),
        }
    }
}

/// 数据库患者表
#[derive(Debug, FromRow)]
pub struct DbPatient {
    pub id: i32,
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
    pub status: String,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    pub room_number: Option<String>,
    pub assigned_doctor_id: Option<i32>,
}

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Patient {
            id: PatientId(row.id),
            patient_id: row.patient_id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            contact: row.contact,
            email: row.email,
            address: row.address,
            blood_type: row.blood_type,
            allergies: row.allergies,
            emergency_contact_name: row.emergency_contact_name,
            emergency_contact_number: row.emergency_contact_number,
            status: Coded::from_text(row.status),
            admission_date: row.admission_date,
            discharge_date: row.discharge_date,
            room_number: row.room_number,
            assigned_doctor_id: row.assigned_doctor_id.map(UserId),
        }
    }
}

/// 数据库预约表
#[derive(Debug, FromRow)]
pub struct DbAppointment {
    pub id: i32,
    pub patient_id: i32,
    pub doctor_id: i32,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration: i32,
    pub status: String,
    pub department: String,
    pub notes: Option<String>,
    pub reason_for_visit: Option<String>,
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Appointment {
            id: AppointmentId(row.id),
            patient_id: PatientId(row.patient_id),
            doctor_id: UserId(row.doctor_id),
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            duration: row.duration,
            status: Coded::from_text(row.status),
            department: row.department,
            notes: row.notes,
            reason_for_visit: row.reason_for_visit,
        }
    }
}

/// 数据库库存表
#[derive(Debug, FromRow)]
pub struct DbInventoryItem {
    pub id: i32,
    pub item_name: String,
    pub category: String,
    pub quantity: i32,
    pub unit: Option<String>,
    pub reorder_level: Option<i32>,
    pub cost: Option<i32>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

impl From<DbInventoryItem> for InventoryItem {
    fn from(row: DbInventoryItem) -> Self {
        InventoryItem {
            id: InventoryItemId(row.id),
            item_name: row.item_name,
            category: Coded::from_text(row.category),
            quantity: row.quantity,
            unit: row.unit,
            reorder_level: row.reorder_level,
            cost: row.cost,
            supplier: row.supplier,
            location: row.location,
            expiry_date: row.expiry_date,
        }
    }
}

/// 数据库科室表
#[derive(Debug, FromRow)]
pub struct DbDepartment {
    pub id: i32,
    pub name: String,
    pub capacity: i32,
    pub current_load: i32,
    pub num_doctors: i32,
    pub num_nurses: i32,
    pub status: String,
}

impl From<DbDepartment> for Department {
    fn from(row: DbDepartment) -> Self {
        Department {
            id: DepartmentId(row.id),
            name: row.name,
            capacity: row.capacity,
            current_load: row.current_load,
            num_doctors: row.num_doctors,
            num_nurses: row.num_nurses,
            status: Coded::from_text(row.status),
        }
    }
}

/// 数据库通知表
#[derive(Debug, FromRow)]
pub struct DbNotification {
    pub id: i32,
    pub title: String,
    pub message: String,
    #[sqlx(rename = "type")]
    pub notification_type: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub user_id: Option<i32>,
}

impl From<DbNotification> for Notification {
    fn from(row: DbNotification) -> Self {
        Notification {
            id: NotificationId(row.id),
            title: row.title,
            message: row.message,
            notification_type: Coded::from_text(row.notification_type),
            timestamp: row.timestamp,
            is_read: row.is_read,
            user_id: row.user_id.map(UserId),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_text_is_preserved() {
        let user = User::from(DbUser {
            id: 1,
            username: "legacy".into(),
            password: "x".into(),
            name: "Legacy Account".into(),
            role: "doctor".into(),
            department: None,
            specialty: None,
            contact: None,
            email: None,
            status: "retired".into(),
        });

        assert!(user.is_doctor());
        assert_eq!(user.status, Coded::Unknown("retired".to_string()));
        assert!(user.status.known().is_err());
    }

    #[test]
    fn test_notification_row_conversion() {
        let notification = Notification::from(DbNotification {
            id: 3,
            title: "Stock low".into(),
            message: "Gauze below reorder level".into(),
            notification_type: "warning".into(),
            timestamp: Utc::now(),
            is_read: false,
            user_id: None,
        });

        assert!(notification.is_broadcast());
        assert!(notification.notification_type.is(NotificationType::Warning));
    }
}
