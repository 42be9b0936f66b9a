//! 报名服务单元测试。
//!
//! 覆盖校验顺序中的每条失败路径，以及存储层错误到领域错误的翻译。

use std::sync::Arc;

use domain::{
    DomainError, Lecture, LectureId, LectureRegistration, RegistrationId, RepositoryError,
    Timestamp, User, UserId, Username,
};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{MockLectureRegistrationRepository, MockLectureRepository},
    services::{LectureRegistrationService, LectureRegistrationServiceDependencies},
};

/// 固定时间的时钟，便于窗口校验测试。
struct FixedClock(Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

fn test_now() -> Timestamp {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

fn test_user() -> User {
    User::new(
        UserId::from(Uuid::new_v4()),
        Username::parse("user1").unwrap(),
        test_now(),
    )
}

/// 窗口为 [now - 1d, now + 1d)、容量 30 的讲座。
fn open_lecture(id: LectureId, now: Timestamp) -> Lecture {
    Lecture::schedule(
        id,
        "lecture1",
        "speaker1",
        30,
        now + Duration::days(2),
        now - Duration::days(1),
        now + Duration::days(1),
        now,
    )
    .unwrap()
}

fn service(
    lectures: MockLectureRepository,
    registrations: MockLectureRegistrationRepository,
    now: Timestamp,
) -> LectureRegistrationService {
    LectureRegistrationService::new(LectureRegistrationServiceDependencies {
        lecture_repository: Arc::new(lectures),
        registration_repository: Arc::new(registrations),
        clock: Arc::new(FixedClock(now)),
    })
}

#[tokio::test]
async fn register_lecture_succeeds_within_window() {
    let now = test_now();
    let lecture_id = LectureId::from(Uuid::new_v4());
    let user = test_user();

    let mut lectures = MockLectureRepository::new();
    let lecture = open_lecture(lecture_id, now);
    lectures
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lecture.clone())));

    let mut registrations = MockLectureRegistrationRepository::new();
    registrations
        .expect_exists_by_user_and_lecture()
        .returning(|_, _| Ok(false));
    let registration_id = RegistrationId::from(Uuid::new_v4());
    registrations
        .expect_save()
        .returning(move |user_id, lecture_id, registered_at| {
            Ok(LectureRegistration::new(
                registration_id,
                user_id,
                lecture_id,
                registered_at,
            ))
        });

    let result = service(lectures, registrations, now)
        .register_lecture(&user, lecture_id)
        .await
        .unwrap();

    assert_eq!(result.registration_id, registration_id);
    assert_eq!(result.lecture_id, lecture_id);
    assert_eq!(result.registered_at, now);
}

#[tokio::test]
async fn register_lecture_fails_for_unknown_lecture() {
    let now = test_now();
    let user = test_user();

    let mut lectures = MockLectureRepository::new();
    lectures.expect_find_by_id().returning(|_| Ok(None));

    let registrations = MockLectureRegistrationRepository::new();

    let err = service(lectures, registrations, now)
        .register_lecture(&user, LectureId::from(Uuid::new_v4()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::LectureNotFound)
    ));
}

#[tokio::test]
async fn register_lecture_fails_before_window_opens() {
    let now = test_now();
    let lecture_id = LectureId::from(Uuid::new_v4());
    let user = test_user();

    let mut lecture = open_lecture(lecture_id, now);
    lecture.registration_starts_at = now + Duration::hours(1);

    let mut lectures = MockLectureRepository::new();
    lectures
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lecture.clone())));

    let registrations = MockLectureRegistrationRepository::new();

    let err = service(lectures, registrations, now)
        .register_lecture(&user, lecture_id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::RegistrationClosed)
    ));
}

#[tokio::test]
async fn register_lecture_fails_once_window_has_ended() {
    let now = test_now();
    let lecture_id = LectureId::from(Uuid::new_v4());
    let user = test_user();

    // 半开区间：正好到达终点时窗口已关闭
    let mut lecture = open_lecture(lecture_id, now);
    lecture.registration_ends_at = now;

    let mut lectures = MockLectureRepository::new();
    lectures
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lecture.clone())));

    let registrations = MockLectureRegistrationRepository::new();

    let err = service(lectures, registrations, now)
        .register_lecture(&user, lecture_id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::RegistrationClosed)
    ));
}

#[tokio::test]
async fn register_lecture_fails_when_lecture_is_full() {
    let now = test_now();
    let lecture_id = LectureId::from(Uuid::new_v4());
    let user = test_user();

    let mut lecture = open_lecture(lecture_id, now);
    lecture.current_capacity = lecture.max_capacity;

    let mut lectures = MockLectureRepository::new();
    lectures
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lecture.clone())));

    let registrations = MockLectureRegistrationRepository::new();

    let err = service(lectures, registrations, now)
        .register_lecture(&user, lecture_id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::LectureFull)
    ));
}

#[tokio::test]
async fn register_lecture_fails_when_already_registered() {
    let now = test_now();
    let lecture_id = LectureId::from(Uuid::new_v4());
    let user = test_user();

    let mut lectures = MockLectureRepository::new();
    let lecture = open_lecture(lecture_id, now);
    lectures
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lecture.clone())));

    let mut registrations = MockLectureRegistrationRepository::new();
    registrations
        .expect_exists_by_user_and_lecture()
        .returning(|_, _| Ok(true));

    let err = service(lectures, registrations, now)
        .register_lecture(&user, lecture_id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::AlreadyRegistered)
    ));
}

#[tokio::test]
async fn register_lecture_translates_duplicate_insert_into_already_registered() {
    let now = test_now();
    let lecture_id = LectureId::from(Uuid::new_v4());
    let user = test_user();

    let mut lectures = MockLectureRepository::new();
    let lecture = open_lecture(lecture_id, now);
    lectures
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lecture.clone())));

    // 预检没有发现记录，但并发的另一次请求抢先插入，
    // 唯一约束在提交时拒绝本次插入。
    let mut registrations = MockLectureRegistrationRepository::new();
    registrations
        .expect_exists_by_user_and_lecture()
        .returning(|_, _| Ok(false));
    registrations
        .expect_save()
        .returning(|_, _, _| Err(RepositoryError::Duplicate));

    let err = service(lectures, registrations, now)
        .register_lecture(&user, lecture_id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::AlreadyRegistered)
    ));
}

#[tokio::test]
async fn register_lecture_translates_exhausted_capacity_into_lecture_full() {
    let now = test_now();
    let lecture_id = LectureId::from(Uuid::new_v4());
    let user = test_user();

    let mut lectures = MockLectureRepository::new();
    let lecture = open_lecture(lecture_id, now);
    lectures
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lecture.clone())));

    let mut registrations = MockLectureRegistrationRepository::new();
    registrations
        .expect_exists_by_user_and_lecture()
        .returning(|_, _| Ok(false));
    registrations
        .expect_save()
        .returning(|_, _, _| Err(RepositoryError::CapacityExhausted));

    let err = service(lectures, registrations, now)
        .register_lecture(&user, lecture_id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::LectureFull)
    ));
}

#[tokio::test]
async fn list_registrations_returns_rows_for_user() {
    let now = test_now();
    let user_id = UserId::from(Uuid::new_v4());

    let lectures = MockLectureRepository::new();
    let mut registrations = MockLectureRegistrationRepository::new();
    registrations.expect_list_by_user().returning(move |user_id| {
        Ok(vec![
            LectureRegistration::new(
                RegistrationId::from(Uuid::new_v4()),
                user_id,
                LectureId::from(Uuid::new_v4()),
                test_now(),
            ),
            LectureRegistration::new(
                RegistrationId::from(Uuid::new_v4()),
                user_id,
                LectureId::from(Uuid::new_v4()),
                test_now(),
            ),
        ])
    });

    let listed = service(lectures, registrations, now)
        .list_registrations(user_id)
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|registration| registration.user_id == user_id));
}
