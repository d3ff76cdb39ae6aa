//! 数据库查询操作

use async_trait::async_trait;
use chrono::NaiveDate;
use hospital_core::{
    Appointment, AppointmentId, AppointmentStatus, Department, DepartmentId, DepartmentStatus,
    HospitalError, InventoryCategory, InventoryItem, InventoryItemId, NewAppointment,
    NewDepartment, NewInventoryItem, NewNotification, NewPatient, NewUser, Notification,
    NotificationId, Patient, PatientId, PatientStatus, ReferenceResolver, Result, StaffRole,
    StaffStatus, TextEnum, User, UserId,
};
use tracing::{debug, info};

use crate::connection::DatabasePool;
use crate::ddl;
use crate::models::*;

/// 唯一约束冲突单独映射，其余归为数据库错误
fn db_error(e: sqlx::Error) -> HospitalError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return HospitalError::Conflict(db.message().to_string());
        }
    }
    HospitalError::Database(e.to_string())
}

/// 把用户输入转成 ILIKE 子串模式，转义其中的通配符
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn not_found(entity: &str, id: impl std::fmt::Display) -> HospitalError {
    HospitalError::NotFound(format!("{} {}", entity, id))
}

/// 数据库查询操作接口
pub struct DatabaseQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> DatabaseQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 创建数据库表
    pub async fn create_tables(&self) -> Result<()> {
        let pool = self.pool.pool();

        for sql in ddl::create_all_sql() {
            sqlx::query(&sql).execute(pool).await.map_err(db_error)?;
        }

        self.create_indexes().await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// 创建数据库索引
    async fn create_indexes(&self) -> Result<()> {
        let pool = self.pool.pool();

        for index_sql in ddl::INDEXES {
            sqlx::query(index_sql)
                .execute(pool)
                .await
                .map_err(db_error)?;
        }

        info!("Database indexes created successfully");
        Ok(())
    }

    // ========== 员工相关操作 ==========

    /// 创建员工，用户名重复时返回 Conflict
    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbUser>(r#"
            INSERT INTO users (username, password, name, role, department, specialty, contact, email, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
        "#)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.name)
        .bind(user.role.as_text())
        .bind(&user.department)
        .bind(&user.specialty)
        .bind(&user.contact)
        .bind(&user.email)
        .bind(user.status.as_text())
        .fetch_one(pool)
        .await
        .map_err(db_error)?;

        info!(user_id = row.id, username = %row.username, "User created");
        Ok(User::from(row))
    }

    /// 根据ID查找员工
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbUser>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_error)?;

        Ok(result.map(User::from))
    }

    /// 根据用户名查找员工
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbUser>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await
            .map_err(db_error)?;

        Ok(result.map(User::from))
    }

    /// 按角色列出员工
    pub async fn list_users_by_role(&self, role: StaffRole) -> Result<Vec<User>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbUser>(
            "SELECT * FROM users WHERE role = $1 ORDER BY name",
        )
        .bind(role.as_str())
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    /// 更新员工状态（软删除即设为 inactive）
    pub async fn update_user_status(&self, id: UserId, status: StaffStatus) -> Result<User> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbUser>(
            "UPDATE users SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("user", id))?;

        Ok(User::from(row))
    }

    // ========== 患者相关操作 ==========

    /// 创建新患者，业务编号重复时返回 Conflict
    pub async fn create_patient(&self, patient: &NewPatient) -> Result<Patient> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbPatient>(r#"
            INSERT INTO patients (
                patient_id, first_name, last_name, date_of_birth, gender, contact, email, address,
                blood_type, allergies, emergency_contact_name, emergency_contact_number, status,
                admission_date, discharge_date, room_number, assigned_doctor_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
        "#)
        .bind(&patient.patient_id)
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(&patient.gender)
        .bind(&patient.contact)
        .bind(&patient.email)
        .bind(&patient.address)
        .bind(&patient.blood_type)
        .bind(&patient.allergies)
        .bind(&patient.emergency_contact_name)
        .bind(&patient.emergency_contact_number)
        .bind(patient.status.as_text())
        .bind(patient.admission_date)
        .bind(patient.discharge_date)
        .bind(&patient.room_number)
        .bind(patient.assigned_doctor_id)
        .fetch_one(pool)
        .await
        .map_err(db_error)?;

        info!(id = row.id, patient_id = %row.patient_id, "Patient created");
        Ok(Patient::from(row))
    }

    /// 根据ID查找患者
    pub async fn get_patient(&self, id: PatientId) -> Result<Option<Patient>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbPatient>("SELECT * FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_error)?;

        Ok(result.map(Patient::from))
    }

    /// 根据业务编号查找患者
    pub async fn get_patient_by_patient_id(&self, patient_id: &str) -> Result<Option<Patient>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbPatient>(
            "SELECT * FROM patients WHERE patient_id = $1",
        )
        .bind(patient_id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?;

        Ok(result.map(Patient::from))
    }

    /// 根据姓名搜索患者
    pub async fn search_patients_by_name(&self, name: &str, limit: i64) -> Result<Vec<Patient>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbPatient>(r#"
            SELECT * FROM patients
            WHERE first_name ILIKE $1 ESCAPE '\' OR last_name ILIKE $1 ESCAPE '\'
            ORDER BY last_name, first_name
            LIMIT $2
        "#)
        .bind(contains_pattern(name))
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

        Ok(results.into_iter().map(Patient::from).collect())
    }

    /// 更新患者状态
    ///
    /// `discharge_date`: `None` 保留原出院日期，`Some(Some(d))` 写入，
    /// `Some(None)` 清空（再次入院）。
    pub async fn update_patient_status(
        &self,
        id: PatientId,
        status: PatientStatus,
        discharge_date: Option<Option<NaiveDate>>,
    ) -> Result<Patient> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbPatient>(r#"
            UPDATE patients
            SET status = $1,
                discharge_date = CASE WHEN $2 THEN $3 ELSE discharge_date END
            WHERE id = $4
            RETURNING *
        "#)
        .bind(status.as_str())
        .bind(discharge_date.is_some())
        .bind(discharge_date.flatten())
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("patient", id))?;

        debug!(id = row.id, status = %row.status, "Patient status updated");
        Ok(Patient::from(row))
    }

    /// 调整病房与主治医生
    pub async fn assign_patient(
        &self,
        id: PatientId,
        room_number: Option<&str>,
        doctor_id: Option<UserId>,
    ) -> Result<Patient> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbPatient>(r#"
            UPDATE patients
            SET room_number = $1, assigned_doctor_id = $2
            WHERE id = $3
            RETURNING *
        "#)
        .bind(room_number)
        .bind(doctor_id)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("patient", id))?;

        Ok(Patient::from(row))
    }

    // ========== 预约相关操作 ==========

    /// 创建新预约（不做时间冲突检测）
    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbAppointment>(r#"
            INSERT INTO appointments (
                patient_id, doctor_id, appointment_date, appointment_time, duration, status,
                department, notes, reason_for_visit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
        "#)
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(appointment.appointment_date)
        .bind(appointment.appointment_time)
        .bind(appointment.duration)
        .bind(appointment.status.as_text())
        .bind(&appointment.department)
        .bind(&appointment.notes)
        .bind(&appointment.reason_for_visit)
        .fetch_one(pool)
        .await
        .map_err(db_error)?;

        info!(id = row.id, doctor_id = row.doctor_id, "Appointment created");
        Ok(Appointment::from(row))
    }

    /// 根据ID查找预约
    pub async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbAppointment>(
            "SELECT * FROM appointments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?;

        Ok(result.map(Appointment::from))
    }

    /// 某医生某日的全部预约
    pub async fn get_appointments_by_doctor(
        &self,
        doctor_id: UserId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbAppointment>(r#"
            SELECT * FROM appointments
            WHERE doctor_id = $1 AND appointment_date = $2
            ORDER BY appointment_time
        "#)
        .bind(doctor_id)
        .bind(date)
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

        Ok(results.into_iter().map(Appointment::from).collect())
    }

    /// 某患者的全部预约
    pub async fn get_appointments_by_patient(&self, patient_id: PatientId) -> Result<Vec<Appointment>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbAppointment>(r#"
            SELECT * FROM appointments
            WHERE patient_id = $1
            ORDER BY appointment_date DESC, appointment_time DESC
        "#)
        .bind(patient_id)
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

        Ok(results.into_iter().map(Appointment::from).collect())
    }

    /// 写入预约状态，状态转换是否合法由调用方判断
    pub async fn update_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Appointment> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbAppointment>(
            "UPDATE appointments SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("appointment", id))?;

        Ok(Appointment::from(row))
    }

    // ========== 库存相关操作 ==========

    /// 入库
    pub async fn create_inventory_item(&self, item: &NewInventoryItem) -> Result<InventoryItem> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbInventoryItem>(r#"
            INSERT INTO inventory (
                item_name, category, quantity, unit, reorder_level, cost, supplier, location, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
        "#)
        .bind(&item.item_name)
        .bind(item.category.as_text())
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.reorder_level)
        .bind(item.cost)
        .bind(&item.supplier)
        .bind(&item.location)
        .bind(item.expiry_date)
        .fetch_one(pool)
        .await
        .map_err(db_error)?;

        info!(id = row.id, item = %row.item_name, "Inventory item created");
        Ok(InventoryItem::from(row))
    }

    /// 根据ID查找库存
    pub async fn get_inventory_item(&self, id: InventoryItemId) -> Result<Option<InventoryItem>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbInventoryItem>("SELECT * FROM inventory WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_error)?;

        Ok(result.map(InventoryItem::from))
    }

    /// 按类别列出库存
    pub async fn list_inventory_by_category(
        &self,
        category: InventoryCategory,
    ) -> Result<Vec<InventoryItem>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbInventoryItem>(
            "SELECT * FROM inventory WHERE category = $1 ORDER BY item_name",
        )
        .bind(category.as_str())
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

        Ok(results.into_iter().map(InventoryItem::from).collect())
    }

    /// 按增量调整数量（消耗为负、补货为正），单条语句在数据库内原子执行
    pub async fn adjust_inventory_quantity(
        &self,
        id: InventoryItemId,
        delta: i32,
    ) -> Result<InventoryItem> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbInventoryItem>(
            "UPDATE inventory SET quantity = quantity + $1 WHERE id = $2 RETURNING *",
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("inventory item", id))?;

        debug!(id = row.id, delta, quantity = row.quantity, "Inventory quantity adjusted");
        Ok(InventoryItem::from(row))
    }

    // ========== 科室相关操作 ==========

    /// 创建科室，名称重复时返回 Conflict
    pub async fn create_department(&self, department: &NewDepartment) -> Result<Department> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbDepartment>(r#"
            INSERT INTO departments (name, capacity, current_load, num_doctors, num_nurses, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
        "#)
        .bind(&department.name)
        .bind(department.capacity)
        .bind(department.current_load)
        .bind(department.num_doctors)
        .bind(department.num_nurses)
        .bind(department.status.as_text())
        .fetch_one(pool)
        .await
        .map_err(db_error)?;

        info!(id = row.id, name = %row.name, "Department created");
        Ok(Department::from(row))
    }

    /// 根据名称查找科室
    pub async fn get_department_by_name(&self, name: &str) -> Result<Option<Department>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbDepartment>("SELECT * FROM departments WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
            .map_err(db_error)?;

        Ok(result.map(Department::from))
    }

    /// 写入当前负荷及重新计算后的状态
    pub async fn update_department_load(
        &self,
        id: DepartmentId,
        current_load: i32,
        status: DepartmentStatus,
    ) -> Result<Department> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbDepartment>(
            "UPDATE departments SET current_load = $1, status = $2 WHERE id = $3 RETURNING *",
        )
        .bind(current_load)
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("department", id))?;

        Ok(Department::from(row))
    }

    // ========== 通知相关操作 ==========

    /// 创建通知，时间戳与已读标记由数据库默认值决定
    pub async fn create_notification(&self, notification: &NewNotification) -> Result<Notification> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbNotification>(r#"
            INSERT INTO notifications (title, message, "type", user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        "#)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.notification_type.as_text())
        .bind(notification.user_id)
        .fetch_one(pool)
        .await
        .map_err(db_error)?;

        debug!(id = row.id, user_id = ?row.user_id, "Notification created");
        Ok(Notification::from(row))
    }

    /// 标记已读，这是通知唯一允许的修改
    pub async fn mark_notification_read(&self, id: NotificationId) -> Result<Notification> {
        let pool = self.pool.pool();

        let row = sqlx::query_as::<_, DbNotification>(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("notification", id))?;

        Ok(Notification::from(row))
    }

    /// 某用户可见的通知（含全员广播），按时间倒序
    pub async fn get_notifications_for_user(&self, user_id: UserId) -> Result<Vec<Notification>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbNotification>(r#"
            SELECT * FROM notifications
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY "timestamp" DESC
        "#)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

        Ok(results.into_iter().map(Notification::from).collect())
    }

    /// 某用户未读通知数
    pub async fn count_unread_notifications(&self, user_id: UserId) -> Result<i64> {
        let pool = self.pool.pool();

        sqlx::query_scalar::<_, i64>(r#"
            SELECT COUNT(*) FROM notifications
            WHERE (user_id = $1 OR user_id IS NULL) AND NOT is_read
        "#)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(db_error)
    }
}

#[async_trait]
impl<'a> ReferenceResolver for DatabaseQueries<'a> {
    async fn user(&self, id: UserId) -> Result<Option<User>> {
        self.get_user(id).await
    }

    async fn patient(&self, id: PatientId) -> Result<Option<Patient>> {
        self.get_patient(id).await
    }
}
