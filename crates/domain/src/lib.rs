//! 讲座报名系统核心领域模型
//!
//! 包含用户、讲座、报名记录等核心实体，以及相关的业务规则。

pub mod errors;
pub mod lecture;
pub mod registration;
pub mod user;
pub mod value_objects;

pub use errors::{DomainError, DomainResult, RepositoryError, RepositoryResult};
pub use lecture::Lecture;
pub use registration::LectureRegistration;
pub use user::User;
pub use value_objects::{LectureId, RegistrationId, Timestamp, UserId, Username};
