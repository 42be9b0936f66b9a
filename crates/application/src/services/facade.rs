use std::sync::Arc;

use domain::{LectureId, UserId};
use uuid::Uuid;

use crate::{
    error::ApplicationError,
    services::{LectureRegistrationResult, LectureRegistrationService, UserService},
};

/// 报名门面：外部调用方的唯一入口。
///
/// 加载用户后委托给报名服务，本身不包含业务逻辑。
pub struct LectureRegistrationFacade {
    user_service: Arc<UserService>,
    registration_service: Arc<LectureRegistrationService>,
}

impl LectureRegistrationFacade {
    pub fn new(
        user_service: Arc<UserService>,
        registration_service: Arc<LectureRegistrationService>,
    ) -> Self {
        Self {
            user_service,
            registration_service,
        }
    }

    pub async fn register_lecture(
        &self,
        user_id: Uuid,
        lecture_id: Uuid,
    ) -> Result<LectureRegistrationResult, ApplicationError> {
        let user = self.user_service.get_user(UserId::from(user_id)).await?;
        self.registration_service
            .register_lecture(&user, LectureId::from(lecture_id))
            .await
    }
}
