mod facade;
mod registration_service;
mod user_service;

#[cfg(test)]
mod registration_service_tests;

pub use facade::LectureRegistrationFacade;
pub use registration_service::{
    LectureRegistrationResult, LectureRegistrationService,
    LectureRegistrationServiceDependencies,
};
pub use user_service::UserService;
