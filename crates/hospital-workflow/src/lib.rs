//! # 医院工作流模块
//!
//! 数据模型层有意不执行的业务规则放在这里：
//! - 预约状态机：预约从登记到完成或取消的状态转换
//! - 引用检查：通过查找能力确认弱引用指向存在且角色正确的实体

pub mod references;
pub mod state_machine;

// 重新导出主要类型
pub use references::ReferenceChecker;
pub use state_machine::{AppointmentEvent, AppointmentStateMachine};
