//! 由实体结构定义生成表结构

use hospital_core::schema::{self, ColumnDefault, EntitySchema, FieldDef, FieldType};

/// 查询与外键弱引用列上的索引
pub const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
    "CREATE INDEX IF NOT EXISTS idx_patients_last_name ON patients(last_name)",
    "CREATE INDEX IF NOT EXISTS idx_patients_assigned_doctor_id ON patients(assigned_doctor_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_doctor_date ON appointments(doctor_id, appointment_date)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_inventory_category ON inventory(category)",
    "CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications(user_id)",
];

/// 生成 `CREATE TABLE IF NOT EXISTS` 语句
pub fn create_table_sql(schema: &EntitySchema) -> String {
    let columns: Vec<String> = schema
        .fields
        .iter()
        .map(|field| format!("    {}", column_sql(field)))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        schema.table,
        columns.join(",\n")
    )
}

/// 全部建表语句，按 [`schema::ALL`] 顺序
pub fn create_all_sql() -> Vec<String> {
    schema::ALL.iter().map(|s| create_table_sql(s)).collect()
}

fn column_sql(field: &FieldDef) -> String {
    let mut sql = format!("\"{}\" {}", field.column, sql_type(field.ty));

    if field.primary_key {
        sql.push_str(" PRIMARY KEY");
        return sql;
    }
    if !field.nullable {
        sql.push_str(" NOT NULL");
    }
    if field.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(default) = field.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&default_sql(default));
    }
    sql
}

fn sql_type(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Serial => "SERIAL",
        FieldType::Text | FieldType::EnumText => "TEXT",
        FieldType::Integer => "INTEGER",
        FieldType::Boolean => "BOOLEAN",
        FieldType::Date => "DATE",
        FieldType::Time => "TIME",
        FieldType::Timestamp => "TIMESTAMPTZ",
    }
}

fn default_sql(default: ColumnDefault) -> String {
    match default {
        ColumnDefault::Text(text) => format!("'{}'", text.replace('\'', "''")),
        ColumnDefault::Integer(n) => n.to_string(),
        ColumnDefault::Boolean(b) => b.to_string().to_uppercase(),
        ColumnDefault::Now => "NOW()".to_string(),
    }
}
