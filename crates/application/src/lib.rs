//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理报名校验、
//! 以及对存储层与时钟等外部适配器的抽象。

pub mod clock;
pub mod error;
pub mod repository;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use error::ApplicationError;
pub use repository::{LectureRegistrationRepository, LectureRepository, UserRepository};
pub use services::{
    LectureRegistrationFacade, LectureRegistrationResult, LectureRegistrationService,
    LectureRegistrationServiceDependencies, UserService,
};
