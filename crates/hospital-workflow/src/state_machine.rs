//! 预约状态机
//!
//! 管理预约的生命周期状态转换，已完成与已取消为终态

use hospital_core::{AppointmentStatus, Coded, HospitalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// 预约状态转换事件
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentEvent {
    /// 患者到院候诊
    CheckIn,
    /// 开始就诊
    Start,
    Complete,
    Cancel,
}

/// 预约状态机
#[derive(Debug)]
pub struct AppointmentStateMachine {
    transitions: HashMap<(AppointmentStatus, AppointmentEvent), AppointmentStatus>,
}

impl AppointmentStateMachine {
    /// 创建新的状态机实例
    pub fn new() -> Self {
        use AppointmentEvent::*;
        use AppointmentStatus::*;

        let mut transitions = HashMap::new();

        transitions.insert((Scheduled, CheckIn), Waiting);
        transitions.insert((Scheduled, Start), InProgress);
        transitions.insert((Waiting, Start), InProgress);

        for from in [Scheduled, Waiting, InProgress] {
            transitions.insert((from, Complete), Completed);
            transitions.insert((from, Cancel), Cancelled);
        }

        Self { transitions }
    }

    /// 检查状态转换是否有效
    pub fn can_transition(&self, from: AppointmentStatus, event: AppointmentEvent) -> bool {
        self.transitions.contains_key(&(from, event))
    }

    /// 执行状态转换
    pub fn transition(
        &self,
        from: AppointmentStatus,
        event: AppointmentEvent,
    ) -> Result<AppointmentStatus> {
        match self.transitions.get(&(from, event)) {
            Some(to) => Ok(*to),
            None => {
                warn!(from = %from, ?event, "Rejected appointment transition");
                Err(HospitalError::InvalidStateTransition {
                    from: from.to_string(),
                    event: format!("{:?}", event),
                })
            }
        }
    }

    /// 对存储中读出的状态文本执行转换，未知文本直接报错
    pub fn transition_coded(
        &self,
        from: &Coded<AppointmentStatus>,
        event: AppointmentEvent,
    ) -> Result<AppointmentStatus> {
        self.transition(from.known()?, event)
    }

    /// 获取状态的所有可能事件
    pub fn possible_events(&self, current: AppointmentStatus) -> Vec<AppointmentEvent> {
        let mut events: Vec<_> = self
            .transitions
            .keys()
            .filter(|(state, _)| *state == current)
            .map(|(_, event)| *event)
            .collect();
        events.sort_by_key(|event| *event as u8);
        events
    }

    pub fn is_terminal(&self, state: AppointmentStatus) -> bool {
        self.possible_events(state).is_empty()
    }
}

impl Default for AppointmentStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
