use crate::value_objects::{LectureId, RegistrationId, Timestamp, UserId};

/// 报名记录。每个 (user_id, lecture_id) 组合至多一条，由存储层唯一约束保证。
/// 创建后不再更新，正常流程中也不会删除。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LectureRegistration {
    pub id: RegistrationId,
    pub user_id: UserId,
    pub lecture_id: LectureId,
    pub registered_at: Timestamp,
}

impl LectureRegistration {
    pub fn new(
        id: RegistrationId,
        user_id: UserId,
        lecture_id: LectureId,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            lecture_id,
            registered_at,
        }
    }
}
