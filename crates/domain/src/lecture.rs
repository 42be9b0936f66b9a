use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{LectureId, Timestamp};

/// 讲座实体。
///
/// 容量与报名时间窗口的约束在构造时校验，数据库中由 CHECK 约束兜底。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Lecture {
    pub id: LectureId,
    pub title: String,
    pub speaker_name: String,
    pub max_capacity: i32,
    pub current_capacity: i32,
    pub lecture_at: Timestamp,
    pub registration_starts_at: Timestamp,
    pub registration_ends_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lecture {
    /// 创建新讲座，初始报名人数为 0。
    pub fn schedule(
        id: LectureId,
        title: impl Into<String>,
        speaker_name: impl Into<String>,
        max_capacity: i32,
        lecture_at: Timestamp,
        registration_starts_at: Timestamp,
        registration_ends_at: Timestamp,
        now: Timestamp,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::invalid_argument("title", "cannot be empty"));
        }

        let speaker_name = speaker_name.into();
        if speaker_name.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "speaker_name",
                "cannot be empty",
            ));
        }

        if max_capacity <= 0 {
            return Err(DomainError::invalid_argument(
                "max_capacity",
                "must be positive",
            ));
        }

        if registration_starts_at > registration_ends_at {
            return Err(DomainError::invalid_argument(
                "registration_starts_at",
                "must not be after registration_ends_at",
            ));
        }

        Ok(Self {
            id,
            title,
            speaker_name,
            max_capacity,
            current_capacity: 0,
            lecture_at,
            registration_starts_at,
            registration_ends_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// 报名窗口为半开区间 [registration_starts_at, registration_ends_at)。
    pub fn registration_open(&self, now: Timestamp) -> bool {
        now >= self.registration_starts_at && now < self.registration_ends_at
    }

    pub fn is_full(&self) -> bool {
        self.current_capacity >= self.max_capacity
    }

    pub fn remaining_seats(&self) -> i32 {
        self.max_capacity - self.current_capacity
    }
}
