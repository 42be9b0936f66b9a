//! 基础设施层实现。
//!
//! 提供 PostgreSQL 仓储实现、数据库迁移与连接装配，实现应用层定义的接口。

pub mod builder;
pub mod migrations;
pub mod repository;

pub use builder::{Infrastructure, InfrastructureError};
pub use migrations::MIGRATOR;
pub use repository::{
    create_pg_pool, PgLectureRegistrationRepository, PgLectureRepository, PgStorage,
    PgUserRepository,
};
