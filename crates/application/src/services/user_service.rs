use std::sync::Arc;

use domain::{DomainError, User, UserId};

use crate::{error::ApplicationError, repository::UserRepository};

/// 用户查询服务。按 ID 加载用户，不存在时返回 `UserNotFound`。
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<User, ApplicationError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound.into())
    }
}
