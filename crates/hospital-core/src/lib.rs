//! # Hospital Core
//!
//! 医院运营后台的数据模型层：实体结构、可插入结构的派生校验、弱引用标识与统一错误定义。
//!
//! 本层只做结构校验（字段是否存在、基本类型是否匹配），唯一性、引用完整性、
//! 枚举取值等业务规则由存储层或业务逻辑负责。

pub mod coded;
pub mod error;
pub mod ids;
pub mod models;
pub mod reference;
pub mod schema;
pub mod validation;

pub use coded::{Coded, TextEnum};
pub use error::{FieldIssue, HospitalError, Problem, Result, ValidationError};
pub use ids::*;
pub use models::*;
pub use reference::ReferenceResolver;
pub use schema::{ColumnDefault, EntitySchema, FieldDef, FieldType};
