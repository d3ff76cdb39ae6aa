//! 弱引用检查
//!
//! 预约、患者、通知中保存的数值标识在写入前可经此确认：被引用的实体存在，
//! 且医生引用指向角色为 doctor 的员工。

use hospital_core::{
    HospitalError, NewAppointment, NewNotification, NewPatient, PatientId, ReferenceResolver,
    Result, User, UserId,
};
use tracing::debug;

pub struct ReferenceChecker<'a, R: ReferenceResolver + ?Sized> {
    resolver: &'a R,
}

impl<'a, R: ReferenceResolver + ?Sized> ReferenceChecker<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self { resolver }
    }

    /// 预约的患者与医生必须存在
    pub async fn check_appointment(&self, appointment: &NewAppointment) -> Result<()> {
        self.require_patient(appointment.patient_id).await?;
        self.require_doctor(appointment.doctor_id).await?;
        debug!(
            patient_id = %appointment.patient_id,
            doctor_id = %appointment.doctor_id,
            "Appointment references resolved"
        );
        Ok(())
    }

    /// 主治医生（如有）必须是医生
    pub async fn check_patient(&self, patient: &NewPatient) -> Result<()> {
        if let Some(doctor_id) = patient.assigned_doctor_id {
            self.require_doctor(doctor_id).await?;
        }
        Ok(())
    }

    /// 定向通知的接收人必须存在，广播通知无需检查
    pub async fn check_notification(&self, notification: &NewNotification) -> Result<()> {
        if let Some(user_id) = notification.user_id {
            self.require_user(user_id).await?;
        }
        Ok(())
    }

    async fn require_patient(&self, id: PatientId) -> Result<()> {
        match self.resolver.patient(id).await? {
            Some(_) => Ok(()),
            None => Err(HospitalError::Reference(format!("patient {} does not exist", id))),
        }
    }

    async fn require_user(&self, id: UserId) -> Result<User> {
        self.resolver
            .user(id)
            .await?
            .ok_or_else(|| HospitalError::Reference(format!("user {} does not exist", id)))
    }

    async fn require_doctor(&self, id: UserId) -> Result<User> {
        let user = self.require_user(id).await?;
        if user.is_doctor() {
            Ok(user)
        } else {
            Err(HospitalError::Reference(format!(
                "user {} has role '{}', expected 'doctor'",
                id, user.role
            )))
        }
    }
}
