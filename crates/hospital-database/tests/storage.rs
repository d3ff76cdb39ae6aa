//! 需要真实 PostgreSQL：`DATABASE_URL=postgres://... cargo test -- --ignored`

use chrono::{NaiveDate, Utc};
use hospital_core::{
    AppointmentStatus, DepartmentStatus, HospitalError, InventoryCategory, Insertable,
    NewAppointment, NewDepartment, NewInventoryItem, NewNotification, NewPatient, NewUser,
    NotificationType, Patient, PatientStatus, ReferenceResolver, StaffRole, StaffStatus, User,
    UserId,
};
use hospital_database::{DatabasePool, DatabaseQueries, DatabaseSettings};
use serde_json::json;
use tokio::sync::Mutex;

// 并发执行 CREATE TABLE IF NOT EXISTS 会在系统目录上冲突，建表只做一次
static SCHEMA_READY: Mutex<bool> = Mutex::const_new(false);

async fn connect() -> DatabasePool {
    let settings = DatabaseSettings {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
        ..DatabaseSettings::default()
    };
    let pool = DatabasePool::connect(&settings).await.unwrap();

    let mut ready = SCHEMA_READY.lock().await;
    if !*ready {
        DatabaseQueries::new(&pool).create_tables().await.unwrap();
        *ready = true;
    }
    pool
}

fn unique_suffix() -> String {
    Utc::now().timestamp_nanos_opt().unwrap_or_default().to_string()
}

async fn create_doctor(queries: &DatabaseQueries<'_>) -> User {
    queries
        .create_user(&NewUser::new(
            format!("doc-{}", unique_suffix()),
            "pw",
            "Dr. Who",
            StaffRole::Doctor,
        ))
        .await
        .unwrap()
}

async fn create_patient(queries: &DatabaseQueries<'_>, last_name: &str) -> Patient {
    let dob = "1985-07-04".parse().unwrap();
    queries
        .create_patient(&NewPatient::new(
            format!("P-{}", unique_suffix()),
            "Sam",
            last_name,
            dob,
            "male",
        ))
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_username_rejected_by_storage() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let username = format!("reception-{}", unique_suffix());
    let input = json!({
        "username": username,
        "password": "pw",
        "name": "Front Desk",
        "role": "receptionist",
    });

    // 两次都能通过结构校验
    let first = NewUser::validate(&input).unwrap();
    let second = NewUser::validate(&input).unwrap();

    let created = queries.create_user(&first).await.unwrap();
    assert!(created.status.is(StaffStatus::Active));

    match queries.create_user(&second).await {
        Err(HospitalError::Conflict(_)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_users_by_role_and_status_update() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let doctor = create_doctor(&queries).await;
    let nurse = queries
        .create_user(&NewUser::new(
            format!("nurse-{}", unique_suffix()),
            "pw",
            "Nurse Joy",
            StaffRole::Nurse,
        ))
        .await
        .unwrap();

    let doctors = queries.list_users_by_role(StaffRole::Doctor).await.unwrap();
    assert!(doctors.iter().any(|u| u.id == doctor.id));
    assert!(doctors.iter().all(|u| u.is_doctor()));
    assert!(!doctors.iter().any(|u| u.id == nurse.id));

    let on_leave = queries
        .update_user_status(nurse.id, StaffStatus::OnLeave)
        .await
        .unwrap();
    assert_eq!(on_leave.status.as_text(), "on leave");

    let found = queries.get_user_by_username(&nurse.username).await.unwrap().unwrap();
    assert_eq!(found, on_leave);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_patient_intake_and_discharge() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let patient_id = format!("P-{}", unique_suffix());
    let dob = "1990-01-01".parse().unwrap();
    let created = queries
        .create_patient(&NewPatient::new(&patient_id, "Mary", "Major", dob, "female"))
        .await
        .unwrap();
    assert!(created.status.is(PatientStatus::Active));

    let found = queries.get_patient_by_patient_id(&patient_id).await.unwrap().unwrap();
    assert_eq!(found, created);

    let today = Utc::now().date_naive();
    let discharged = queries
        .update_patient_status(created.id, PatientStatus::Discharged, Some(Some(today)))
        .await
        .unwrap();
    assert_eq!(discharged.discharge_date, Some(today));
    assert_eq!(discharged.patient_id, patient_id);

    // 只改状态时保留出院日期
    let stable = queries
        .update_patient_status(created.id, PatientStatus::Stable, None)
        .await
        .unwrap();
    assert_eq!(stable.discharge_date, Some(today));

    // 再次入院清空出院日期
    let readmitted = queries
        .update_patient_status(created.id, PatientStatus::Active, Some(None))
        .await
        .unwrap();
    assert!(readmitted.status.is(PatientStatus::Active));
    assert_eq!(readmitted.discharge_date, None);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_patient_name_search_treats_wildcards_literally() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let last_name = format!("Searchable{}", unique_suffix());
    let patient = create_patient(&queries, &last_name).await;

    let hits = queries
        .search_patients_by_name(&last_name.to_lowercase(), 10)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, patient.id);

    let underscore = queries.search_patients_by_name("_", 1000).await.unwrap();
    assert!(!underscore.iter().any(|p| p.id == patient.id));

    let percent = queries.search_patients_by_name("%", 1000).await.unwrap();
    assert!(!percent.iter().any(|p| p.id == patient.id));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_assign_patient_and_resolve_references() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let doctor = create_doctor(&queries).await;
    let patient = create_patient(&queries, "Assigned").await;

    let assigned = queries
        .assign_patient(patient.id, Some("B-204"), Some(doctor.id))
        .await
        .unwrap();
    assert_eq!(assigned.room_number.as_deref(), Some("B-204"));
    assert_eq!(assigned.assigned_doctor_id, Some(doctor.id));

    let resolver: &dyn ReferenceResolver = &queries;
    let resolved_doctor = resolver.user(doctor.id).await.unwrap().unwrap();
    assert_eq!(resolved_doctor, doctor);
    let resolved_patient = resolver.patient(patient.id).await.unwrap().unwrap();
    assert_eq!(resolved_patient, assigned);

    assert!(resolver.user(UserId(i32::MAX)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_appointment_defaults_survive_insert() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let doctor = create_doctor(&queries).await;
    let patient = create_patient(&queries, "Booked").await;

    let input = json!({
        "patientId": patient.id,
        "doctorId": doctor.id,
        "appointmentDate": "2031-03-14",
        "appointmentTime": "09:30",
        "department": "Cardiology",
    });
    let new = NewAppointment::validate(&input).unwrap();

    let created = queries.create_appointment(&new).await.unwrap();
    assert_eq!(created.duration, 30);
    assert!(created.status.is(AppointmentStatus::Scheduled));
    assert_eq!(created.appointment_time, "09:30:00".parse().unwrap());

    let fetched = queries.get_appointment(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let date: NaiveDate = "2031-03-14".parse().unwrap();
    let by_doctor = queries.get_appointments_by_doctor(doctor.id, date).await.unwrap();
    assert_eq!(by_doctor.len(), 1);
    assert_eq!(by_doctor[0].id, created.id);

    let other_day = queries
        .get_appointments_by_doctor(doctor.id, date.succ_opt().unwrap())
        .await
        .unwrap();
    assert!(other_day.is_empty());

    let by_patient = queries.get_appointments_by_patient(patient.id).await.unwrap();
    assert_eq!(by_patient, vec![created.clone()]);

    let in_progress = queries
        .update_appointment_status(created.id, AppointmentStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(in_progress.status.as_text(), "in progress");
    assert_eq!(in_progress.duration, created.duration);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_inventory_quantity_adjusts_in_place() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let name = format!("Saline-{}", unique_suffix());
    let item = queries
        .create_inventory_item(&NewInventoryItem::validate(&json!({
            "itemName": name,
            "category": "medication",
        }))
        .unwrap())
        .await
        .unwrap();
    assert_eq!(item.quantity, 0);

    let restocked = queries.adjust_inventory_quantity(item.id, 50).await.unwrap();
    assert_eq!(restocked.quantity, 50);

    // 并发调整都落在同一行上，不丢更新
    let (a, b) = tokio::join!(
        queries.adjust_inventory_quantity(item.id, -7),
        queries.adjust_inventory_quantity(item.id, -3),
    );
    a.unwrap();
    b.unwrap();

    let current = queries.get_inventory_item(item.id).await.unwrap().unwrap();
    assert_eq!(current.quantity, 40);

    let medication = queries
        .list_inventory_by_category(InventoryCategory::Medication)
        .await
        .unwrap();
    assert!(medication.iter().any(|i| i.id == item.id));
    let equipment = queries
        .list_inventory_by_category(InventoryCategory::Equipment)
        .await
        .unwrap();
    assert!(!equipment.iter().any(|i| i.id == item.id));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_department_name_is_unique_and_load_updates() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let name = format!("Radiology-{}", unique_suffix());
    let created = queries
        .create_department(&NewDepartment::new(&name, 20))
        .await
        .unwrap();
    assert_eq!(created.current_load, 0);
    assert!(created.status.is(DepartmentStatus::Normal));

    match queries.create_department(&NewDepartment::new(&name, 5)).await {
        Err(HospitalError::Conflict(_)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }

    let busy = queries
        .update_department_load(created.id, 18, DepartmentStatus::HighLoad)
        .await
        .unwrap();
    assert_eq!(busy.current_load, 18);
    assert_eq!(busy.status.as_text(), "high load");

    let found = queries.get_department_by_name(&name).await.unwrap().unwrap();
    assert_eq!(found, busy);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_notification_created_unread_with_server_timestamp() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let doctor = create_doctor(&queries).await;

    let before = Utc::now() - chrono::Duration::seconds(5);
    let notification = queries
        .create_notification(
            &NewNotification::new("Lab", "CBC ready", NotificationType::Info).for_user(doctor.id),
        )
        .await
        .unwrap();

    assert!(!notification.is_read);
    assert!(notification.timestamp >= before);
    assert!(queries.count_unread_notifications(doctor.id).await.unwrap() >= 1);

    let read = queries.mark_notification_read(notification.id).await.unwrap();
    assert!(read.is_read);
    assert_eq!(read.timestamp, notification.timestamp);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_notifications_for_user_include_broadcasts() {
    let pool = connect().await;
    let queries = DatabaseQueries::new(&pool);

    let doctor = create_doctor(&queries).await;
    let colleague = create_doctor(&queries).await;

    let direct = queries
        .create_notification(
            &NewNotification::new("Page", "Room 3", NotificationType::Warning).for_user(doctor.id),
        )
        .await
        .unwrap();
    let broadcast = queries
        .create_notification(&NewNotification::new("Drill", "Fire drill at noon", NotificationType::Info))
        .await
        .unwrap();
    let private = queries
        .create_notification(
            &NewNotification::new("Page", "Room 9", NotificationType::Warning).for_user(colleague.id),
        )
        .await
        .unwrap();

    let visible = queries.get_notifications_for_user(doctor.id).await.unwrap();
    assert!(visible.iter().any(|n| n.id == direct.id));
    assert!(visible.iter().any(|n| n.id == broadcast.id));
    assert!(!visible.iter().any(|n| n.id == private.id));
    assert!(visible.iter().all(|n| n.is_visible_to(doctor.id)));
    assert!(visible.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}
