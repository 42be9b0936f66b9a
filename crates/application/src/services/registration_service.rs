use std::sync::Arc;

use domain::{
    DomainError, LectureId, LectureRegistration, RegistrationId, RepositoryError, Timestamp,
    User, UserId,
};
use tracing::info;

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{LectureRegistrationRepository, LectureRepository},
};

/// 报名成功后返回给调用方的结果。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LectureRegistrationResult {
    pub registration_id: RegistrationId,
    pub lecture_id: LectureId,
    pub registered_at: Timestamp,
}

impl From<LectureRegistration> for LectureRegistrationResult {
    fn from(registration: LectureRegistration) -> Self {
        Self {
            registration_id: registration.id,
            lecture_id: registration.lecture_id,
            registered_at: registration.registered_at,
        }
    }
}

pub struct LectureRegistrationServiceDependencies {
    pub lecture_repository: Arc<dyn LectureRepository>,
    pub registration_repository: Arc<dyn LectureRegistrationRepository>,
    pub clock: Arc<dyn Clock>,
}

/// 报名服务，单次线性的「校验后写入」流程，没有状态机。
pub struct LectureRegistrationService {
    deps: LectureRegistrationServiceDependencies,
}

impl LectureRegistrationService {
    pub fn new(deps: LectureRegistrationServiceDependencies) -> Self {
        Self { deps }
    }

    /// 为用户报名指定讲座。
    ///
    /// 校验顺序：讲座存在 → 报名窗口 → 剩余名额 → 重复报名预检。
    /// 预检只是提前失败；唯一约束和条件更新才是并发下的最终防线。
    pub async fn register_lecture(
        &self,
        user: &User,
        lecture_id: LectureId,
    ) -> Result<LectureRegistrationResult, ApplicationError> {
        let lecture = self
            .deps
            .lecture_repository
            .find_by_id(lecture_id)
            .await?
            .ok_or(DomainError::LectureNotFound)?;

        let now = self.deps.clock.now();
        if !lecture.registration_open(now) {
            return Err(DomainError::RegistrationClosed.into());
        }

        if lecture.is_full() {
            return Err(DomainError::LectureFull.into());
        }

        if self
            .deps
            .registration_repository
            .exists_by_user_and_lecture(user.id, lecture_id)
            .await?
        {
            return Err(DomainError::AlreadyRegistered.into());
        }

        let registration = self
            .deps
            .registration_repository
            .save(user.id, lecture_id, now)
            .await
            .map_err(|err| match err {
                RepositoryError::Duplicate => DomainError::AlreadyRegistered.into(),
                RepositoryError::CapacityExhausted => DomainError::LectureFull.into(),
                other => ApplicationError::Repository(other),
            })?;

        info!(
            user_id = %user.id,
            lecture_id = %lecture_id,
            registration_id = %registration.id,
            "讲座报名成功"
        );

        Ok(LectureRegistrationResult::from(registration))
    }

    /// 查询用户的全部报名记录。
    pub async fn list_registrations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<LectureRegistration>, ApplicationError> {
        let registrations = self
            .deps
            .registration_repository
            .list_by_user(user_id)
            .await?;

        Ok(registrations)
    }
}
