use std::sync::Arc;

use async_trait::async_trait;

use application::repository::{
    LectureRegistrationRepository, LectureRepository, UserRepository,
};
use domain::{
    Lecture, LectureId, LectureRegistration, RegistrationId, RepositoryError, Timestamp, User,
    UserId, Username,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// PostgreSQL 唯一约束冲突的 SQLSTATE。
const UNIQUE_VIOLATION: &str = "23505";

/// 统一的 sqlx 错误映射：唯一约束冲突在这里被翻译为 `Duplicate`，
/// 不向上层泄漏原始的数据库错误。
fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(ref db_err)
            if db_err.code().is_some_and(|code| code == UNIQUE_VIOLATION) =>
        {
            RepositoryError::Duplicate
        }
        other => RepositoryError::storage(other.to_string()),
    }
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<UserRecord> for User {
    type Error = RepositoryError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        let username =
            Username::parse(value.username).map_err(|err| invalid_data(err.to_string()))?;

        Ok(User {
            id: UserId::from(value.id),
            username,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct LectureRecord {
    id: Uuid,
    title: String,
    speaker_name: String,
    max_capacity: i32,
    current_capacity: i32,
    lecture_at: OffsetDateTime,
    registration_starts_at: OffsetDateTime,
    registration_ends_at: OffsetDateTime,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<LectureRecord> for Lecture {
    // 字段已由数据库 CHECK 约束保证合法，直接恢复实体。
    fn from(value: LectureRecord) -> Self {
        Lecture {
            id: LectureId::from(value.id),
            title: value.title,
            speaker_name: value.speaker_name,
            max_capacity: value.max_capacity,
            current_capacity: value.current_capacity,
            lecture_at: value.lecture_at,
            registration_starts_at: value.registration_starts_at,
            registration_ends_at: value.registration_ends_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RegistrationRecord {
    id: Uuid,
    user_id: Uuid,
    lecture_id: Uuid,
    registered_at: OffsetDateTime,
}

impl From<RegistrationRecord> for LectureRegistration {
    fn from(value: RegistrationRecord) -> Self {
        LectureRegistration {
            id: RegistrationId::from(value.id),
            user_id: UserId::from(value.user_id),
            lecture_id: LectureId::from(value.lecture_id),
            registered_at: value.registered_at,
        }
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, username, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, created_at, updated_at
            "#,
        )
        .bind(Uuid::from(user.id))
        .bind(user.username.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        User::try_from(record)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"SELECT id, username, created_at, updated_at FROM users WHERE id = $1"#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }
}

#[derive(Clone)]
pub struct PgLectureRepository {
    pool: PgPool,
}

impl PgLectureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LectureRepository for PgLectureRepository {
    async fn create(&self, lecture: Lecture) -> Result<Lecture, RepositoryError> {
        let record = sqlx::query_as::<_, LectureRecord>(
            r#"
            INSERT INTO lectures (id, title, speaker_name, max_capacity, current_capacity,
                                  lecture_at, registration_starts_at, registration_ends_at,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, title, speaker_name, max_capacity, current_capacity,
                      lecture_at, registration_starts_at, registration_ends_at,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::from(lecture.id))
        .bind(&lecture.title)
        .bind(&lecture.speaker_name)
        .bind(lecture.max_capacity)
        .bind(lecture.current_capacity)
        .bind(lecture.lecture_at)
        .bind(lecture.registration_starts_at)
        .bind(lecture.registration_ends_at)
        .bind(lecture.created_at)
        .bind(lecture.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Lecture::from(record))
    }

    async fn find_by_id(&self, id: LectureId) -> Result<Option<Lecture>, RepositoryError> {
        let record = sqlx::query_as::<_, LectureRecord>(
            r#"
            SELECT id, title, speaker_name, max_capacity, current_capacity,
                   lecture_at, registration_starts_at, registration_ends_at,
                   created_at, updated_at
            FROM lectures WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(Lecture::from))
    }
}

#[derive(Clone)]
pub struct PgLectureRegistrationRepository {
    pool: PgPool,
}

impl PgLectureRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LectureRegistrationRepository for PgLectureRegistrationRepository {
    async fn exists_by_user_and_lecture(
        &self,
        user_id: UserId,
        lecture_id: LectureId,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM lecture_registrations
                WHERE user_id = $1 AND lecture_id = $2
            )
            "#,
        )
        .bind(Uuid::from(user_id))
        .bind(Uuid::from(lecture_id))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(exists)
    }

    async fn save(
        &self,
        user_id: UserId,
        lecture_id: LectureId,
        registered_at: Timestamp,
    ) -> Result<LectureRegistration, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        // 条件更新：名额满时不命中任何行。更新先于插入执行，
        // 使并发的同讲座报名在讲座行上串行化。
        let updated = sqlx::query(
            r#"
            UPDATE lectures
            SET current_capacity = current_capacity + 1, updated_at = $2
            WHERE id = $1 AND current_capacity < max_capacity
            "#,
        )
        .bind(Uuid::from(lecture_id))
        .bind(registered_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_err)?;
            return Err(RepositoryError::CapacityExhausted);
        }

        // 唯一约束冲突时这里返回 Duplicate，事务随 tx 析构回滚，
        // 上面的容量递增不会落库。
        let record = sqlx::query_as::<_, RegistrationRecord>(
            r#"
            INSERT INTO lecture_registrations (id, user_id, lecture_id, registered_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, lecture_id, registered_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Uuid::from(user_id))
        .bind(Uuid::from(lecture_id))
        .bind(registered_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;

        Ok(LectureRegistration::from(record))
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<LectureRegistration>, RepositoryError> {
        let records = sqlx::query_as::<_, RegistrationRecord>(
            r#"
            SELECT id, user_id, lecture_id, registered_at
            FROM lecture_registrations
            WHERE user_id = $1
            "#,
        )
        .bind(Uuid::from(user_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(LectureRegistration::from).collect())
    }
}

#[derive(Clone)]
pub struct PgStorage {
    pub pool: PgPool,
    pub user_repository: Arc<PgUserRepository>,
    pub lecture_repository: Arc<PgLectureRepository>,
    pub registration_repository: Arc<PgLectureRegistrationRepository>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            user_repository: Arc::new(PgUserRepository::new(pool.clone())),
            lecture_repository: Arc::new(PgLectureRepository::new(pool.clone())),
            registration_repository: Arc::new(PgLectureRegistrationRepository::new(pool.clone())),
            pool,
        }
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = map_sqlx_err(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn other_errors_map_to_storage() {
        let err = map_sqlx_err(sqlx::Error::PoolClosed);
        assert!(matches!(err, RepositoryError::Storage(_)));
    }
}
