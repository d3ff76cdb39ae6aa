//! 可插入结构的派生校验
//!
//! 可插入字段 = 结构定义中所有非服务端生成的字段。校验只检查字段是否存在和基本类型，
//! 省略或为 null 的带默认值字段按表默认值补齐，主键等服务端字段以及未知字段直接丢弃。

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FieldIssue, Problem, ValidationError};
use crate::schema::{ColumnDefault, EntitySchema, FieldDef, FieldType};

/// 结构校验并返回规范化后的 JSON 对象（仅含可插入字段，默认值已补齐）
pub fn normalize(
    schema: &EntitySchema,
    input: &Value,
) -> Result<Map<String, Value>, ValidationError> {
    let object = input.as_object().ok_or_else(|| {
        ValidationError::new(
            schema.entity,
            vec![FieldIssue::new("", Problem::NotAnObject)],
        )
    })?;

    for key in object.keys() {
        if !schema.insertable_fields().any(|f| f.name == key.as_str()) {
            debug!(entity = schema.entity, field = %key, "dropping field not accepted on insert");
        }
    }

    let mut issues = Vec::new();
    let mut normalized = Map::new();

    for field in schema.insertable_fields() {
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if let Some(default) = field.default {
                    normalized.insert(field.name.to_string(), default_value(default));
                } else if field.nullable {
                    normalized.insert(field.name.to_string(), Value::Null);
                } else if object.contains_key(field.name) {
                    issues.push(FieldIssue::new(field.name, Problem::Null));
                } else {
                    issues.push(FieldIssue::new(field.name, Problem::Missing));
                }
            }
            Some(value) => match conform(field, value) {
                Some(value) => {
                    normalized.insert(field.name.to_string(), value);
                }
                None => issues.push(FieldIssue::new(
                    field.name,
                    Problem::WrongType {
                        expected: field.ty,
                        found: json_kind(value),
                    },
                )),
            },
        }
    }

    if issues.is_empty() {
        Ok(normalized)
    } else {
        Err(ValidationError::new(schema.entity, issues))
    }
}

/// 结构校验后解码为可插入类型
pub fn validate<T: DeserializeOwned>(
    schema: &EntitySchema,
    input: &Value,
) -> Result<T, ValidationError> {
    let normalized = normalize(schema, input)?;
    serde_json::from_value(Value::Object(normalized)).map_err(|e| {
        ValidationError::new(
            schema.entity,
            vec![FieldIssue::new("", Problem::Malformed(e.to_string()))],
        )
    })
}

/// 检查基本类型，返回规范化后的值
fn conform(field: &FieldDef, value: &Value) -> Option<Value> {
    match field.ty {
        FieldType::Text | FieldType::EnumText => value.is_string().then(|| value.clone()),
        FieldType::Integer | FieldType::Serial => value
            .as_i64()
            .filter(|n| i32::try_from(*n).is_ok())
            .map(|_| value.clone()),
        FieldType::Boolean => value.is_boolean().then(|| value.clone()),
        FieldType::Date => value
            .as_str()
            .filter(|s| s.parse::<NaiveDate>().is_ok())
            .map(|_| value.clone()),
        FieldType::Time => {
            let text = value.as_str()?;
            if text.parse::<NaiveTime>().is_ok() {
                return Some(value.clone());
            }
            // 只把 `HH:MM` 补齐秒，其余写法原样保留
            let time = NaiveTime::parse_from_str(text, "%H:%M").ok()?;
            Some(Value::String(time.format("%H:%M:%S").to_string()))
        }
        FieldType::Timestamp => value
            .as_str()
            .filter(|s| s.parse::<DateTime<Utc>>().is_ok())
            .map(|_| value.clone()),
    }
}

fn default_value(default: ColumnDefault) -> Value {
    match default {
        ColumnDefault::Text(text) => Value::String(text.to_string()),
        ColumnDefault::Integer(n) => Value::from(n),
        ColumnDefault::Boolean(b) => Value::Bool(b),
        ColumnDefault::Now => Value::String(Utc::now().to_rfc3339()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
