//! 实体结构定义
//!
//! 每个实体一份静态 [`EntitySchema`]，声明字段、语义类型、可空性、默认值以及
//! 是否由服务端生成。存储层据此生成表结构，校验层据此派生可插入结构，
//! 两者共用同一份定义。

use std::fmt;

/// 字段语义类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 自增主键
    Serial,
    Text,
    Integer,
    Boolean,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM[:SS[.fff]]`
    Time,
    /// 带时区时间戳
    Timestamp,
    /// 以文本存储的枚举
    EnumText,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Serial => "serial",
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Timestamp => "timestamp",
            FieldType::EnumText => "enum text",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 列默认值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    Text(&'static str),
    Integer(i32),
    Boolean(bool),
    /// 创建时刻
    Now,
}

/// 单个字段定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// JSON 字段名 (camelCase)
    pub name: &'static str,
    /// 数据库列名 (snake_case)
    pub column: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub default: Option<ColumnDefault>,
    /// 服务端生成，客户端不可提供
    pub server_generated: bool,
}

impl FieldDef {
    /// 可空字段，无默认值
    pub const fn new(name: &'static str, column: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            column,
            ty,
            nullable: true,
            unique: false,
            primary_key: false,
            default: None,
            server_generated: false,
        }
    }

    /// `id SERIAL PRIMARY KEY`
    pub const fn primary_key() -> Self {
        Self {
            nullable: false,
            primary_key: true,
            server_generated: true,
            ..Self::new("id", "id", FieldType::Serial)
        }
    }

    pub const fn not_null(self) -> Self {
        Self {
            nullable: false,
            ..self
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    /// 带默认值的字段一律非空
    pub const fn default(self, value: ColumnDefault) -> Self {
        Self {
            nullable: false,
            default: Some(value),
            ..self
        }
    }

    pub const fn server_generated(self) -> Self {
        Self {
            server_generated: true,
            ..self
        }
    }

    /// 插入时必须提供：非空、无默认值、非服务端生成
    pub fn is_required(&self) -> bool {
        !self.nullable && self.default.is_none() && !self.server_generated
    }
}

/// 实体结构定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// 实体名称
    pub entity: &'static str,
    /// 表名
    pub table: &'static str,
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 可插入结构包含的字段
    pub fn insertable_fields(&self) -> impl Iterator<Item = &FieldDef> + '_ {
        self.fields.iter().filter(|f| !f.server_generated)
    }

    /// 服务端生成的字段
    pub fn server_fields(&self) -> impl Iterator<Item = &FieldDef> + '_ {
        self.fields.iter().filter(|f| f.server_generated)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDef> + '_ {
        self.fields.iter().filter(|f| f.is_required())
    }
}

use ColumnDefault as D;
use FieldType::*;

pub const USERS: EntitySchema = EntitySchema {
    entity: "User",
    table: "users",
    fields: &[
        FieldDef::primary_key(),
        FieldDef::new("username", "username", Text).not_null().unique(),
        FieldDef::new("password", "password", Text).not_null(),
        FieldDef::new("name", "name", Text).not_null(),
        FieldDef::new("role", "role", EnumText).not_null(),
        FieldDef::new("department", "department", Text),
        FieldDef::new("specialty", "specialty", Text),
        FieldDef::new("contact", "contact", Text),
        FieldDef::new("email", "email", Text),
        FieldDef::new("status", "status", EnumText).default(D::Text("active")),
    ],
};

pub const PATIENTS: EntitySchema = EntitySchema {
    entity: "Patient",
    table: "patients",
    fields: &[
        FieldDef::primary_key(),
        FieldDef::new("patientId", "patient_id", Text).not_null().unique(),
        FieldDef::new("firstName", "first_name", Text).not_null(),
        FieldDef::new("lastName", "last_name", Text).not_null(),
        FieldDef::new("dateOfBirth", "date_of_birth", Date).not_null(),
        FieldDef::new("gender", "gender", Text).not_null(),
        FieldDef::new("contact", "contact", Text),
        FieldDef::new("email", "email", Text),
        FieldDef::new("address", "address", Text),
        FieldDef::new("bloodType", "blood_type", Text),
        FieldDef::new("allergies", "allergies", Text),
        FieldDef::new("emergencyContactName", "emergency_contact_name", Text),
        FieldDef::new("emergencyContactNumber", "emergency_contact_number", Text),
        FieldDef::new("status", "status", EnumText).default(D::Text("active")),
        FieldDef::new("admissionDate", "admission_date", Date),
        FieldDef::new("dischargeDate", "discharge_date", Date),
        FieldDef::new("roomNumber", "room_number", Text),
        FieldDef::new("assignedDoctorId", "assigned_doctor_id", Integer),
    ],
};

pub const APPOINTMENTS: EntitySchema = EntitySchema {
    entity: "Appointment",
    table: "appointments",
    fields: &[
        FieldDef::primary_key(),
        FieldDef::new("patientId", "patient_id", Integer).not_null(),
        FieldDef::new("doctorId", "doctor_id", Integer).not_null(),
        FieldDef::new("appointmentDate", "appointment_date", Date).not_null(),
        FieldDef::new("appointmentTime", "appointment_time", Time).not_null(),
        FieldDef::new("duration", "duration", Integer).default(D::Integer(30)),
        FieldDef::new("status", "status", EnumText).default(D::Text("scheduled")),
        FieldDef::new("department", "department", Text).not_null(),
        FieldDef::new("notes", "notes", Text),
        FieldDef::new("reasonForVisit", "reason_for_visit", Text),
    ],
};

pub const INVENTORY: EntitySchema = EntitySchema {
    entity: "Inventory",
    table: "inventory",
    fields: &[
        FieldDef::primary_key(),
        FieldDef::new("itemName", "item_name", Text).not_null(),
        FieldDef::new("category", "category", EnumText).not_null(),
        FieldDef::new("quantity", "quantity", Integer).default(D::Integer(0)),
        FieldDef::new("unit", "unit", Text),
        FieldDef::new("reorderLevel", "reorder_level", Integer),
        // 单位：分
        FieldDef::new("cost", "cost", Integer),
        FieldDef::new("supplier", "supplier", Text),
        FieldDef::new("location", "location", Text),
        FieldDef::new("expiryDate", "expiry_date", Date),
    ],
};

pub const DEPARTMENTS: EntitySchema = EntitySchema {
    entity: "Department",
    table: "departments",
    fields: &[
        FieldDef::primary_key(),
        FieldDef::new("name", "name", Text).not_null().unique(),
        FieldDef::new("capacity", "capacity", Integer).not_null(),
        FieldDef::new("currentLoad", "current_load", Integer).default(D::Integer(0)),
        FieldDef::new("numDoctors", "num_doctors", Integer).default(D::Integer(0)),
        FieldDef::new("numNurses", "num_nurses", Integer).default(D::Integer(0)),
        FieldDef::new("status", "status", EnumText).default(D::Text("normal")),
    ],
};

pub const NOTIFICATIONS: EntitySchema = EntitySchema {
    entity: "Notification",
    table: "notifications",
    fields: &[
        FieldDef::primary_key(),
        FieldDef::new("title", "title", Text).not_null(),
        FieldDef::new("message", "message", Text).not_null(),
        FieldDef::new("type", "type", EnumText).not_null(),
        FieldDef::new("timestamp", "timestamp", Timestamp)
            .default(D::Now)
            .server_generated(),
        FieldDef::new("isRead", "is_read", Boolean)
            .default(D::Boolean(false))
            .server_generated(),
        // null 表示全员广播
        FieldDef::new("userId", "user_id", Integer),
    ],
};

/// 全部实体，按建表顺序
pub const ALL: [&EntitySchema; 6] = [
    &USERS,
    &PATIENTS,
    &APPOINTMENTS,
    &INVENTORY,
    &DEPARTMENTS,
    &NOTIFICATIONS,
];
