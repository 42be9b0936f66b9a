//! 领域模型错误定义
//!
//! 定义报名流程中所有可能的失败类型，错误直接返回给调用方，不做内部重试。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 用户不存在
    #[error("user not found")]
    UserNotFound,

    /// 讲座不存在
    #[error("lecture not found")]
    LectureNotFound,

    /// 当前时间不在报名窗口内
    #[error("registration window is closed")]
    RegistrationClosed,

    /// 讲座名额已满
    #[error("lecture is full")]
    LectureFull,

    /// 用户已报名该讲座
    #[error("user is already registered for this lecture")]
    AlreadyRegistered,

    /// 参数验证失败
    #[error("invalid {field}: {message}")]
    InvalidArgument { field: String, message: String },
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 存储层错误类型
///
/// 唯一约束冲突在仓储边界被翻译为 `Duplicate`，不向上层泄漏原始的存储错误。
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 记录不存在
    #[error("record not found")]
    NotFound,

    /// (user_id, lecture_id) 组合已存在
    #[error("duplicate registration")]
    Duplicate,

    /// 条件更新未命中任何行，讲座名额已满
    #[error("lecture capacity exhausted")]
    CapacityExhausted,

    /// 其他存储错误
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

/// 存储层结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;
