//! 仓储接口定义。
//!
//! 应用层只依赖这些抽象，由基础设施层提供 PostgreSQL 实现。

use async_trait::async_trait;
use domain::{
    Lecture, LectureId, LectureRegistration, RepositoryError, Timestamp, User, UserId,
};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LectureRepository: Send + Sync {
    async fn create(&self, lecture: Lecture) -> Result<Lecture, RepositoryError>;
    async fn find_by_id(&self, id: LectureId) -> Result<Option<Lecture>, RepositoryError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LectureRegistrationRepository: Send + Sync {
    /// 查询 (user_id, lecture_id) 组合是否已有报名记录。无副作用。
    async fn exists_by_user_and_lecture(
        &self,
        user_id: UserId,
        lecture_id: LectureId,
    ) -> Result<bool, RepositoryError>;

    /// 插入报名记录，并在同一事务内按条件递增讲座的报名人数。
    ///
    /// 唯一约束冲突返回 `RepositoryError::Duplicate`；
    /// 名额已满（条件更新未命中任何行）返回 `RepositoryError::CapacityExhausted`，
    /// 两种情况下事务都会回滚，不会留下半成品记录。
    async fn save(
        &self,
        user_id: UserId,
        lecture_id: LectureId,
        registered_at: Timestamp,
    ) -> Result<LectureRegistration, RepositoryError>;

    /// 返回指定用户的全部报名记录，顺序为存储默认顺序。
    async fn list_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<LectureRegistration>, RepositoryError>;
}
