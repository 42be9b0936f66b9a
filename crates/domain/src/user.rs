use crate::value_objects::{Timestamp, UserId, Username};

/// 用户实体。用户由外部系统创建，本功能只做按 ID 查询。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn new(id: UserId, username: Username, now: Timestamp) -> Self {
        Self {
            id,
            username,
            created_at: now,
            updated_at: now,
        }
    }
}
