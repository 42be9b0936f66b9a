//! 内嵌数据库迁移。

/// 编译期内嵌 `migrations/` 目录下的 SQL 迁移脚本。
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
