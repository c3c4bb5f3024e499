/**
 * Responsibility
 * - テナント解決 / 認可が上位に伝える意味の定義
 * - どれもリクエストに対して終端。リトライも握りつぶしもしない
 */
use thiserror::Error;

use crate::tenancy::grant::{Action, Resource};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// ストレージ由来の失敗。Forbidden には変換しない
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error")]
    Backend(#[source] BoxError),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn backend(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(e))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum TenancyError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("organization not found")]
    TenantNotFound,
    #[error("not a member of the requested organization")]
    TenantForbidden,
    #[error("no default organization is configured")]
    NoDefaultOrganization,
    #[error("forbidden: {action} on {resource}")]
    Forbidden { resource: Resource, action: Action },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TenancyError {
    /// API のエラー本文に載せる安定したコード
    pub fn code(&self) -> &'static str {
        match self {
            TenancyError::Unauthenticated => "UNAUTHORIZED",
            TenancyError::TenantNotFound => "TENANT_NOT_FOUND",
            TenancyError::TenantForbidden => "TENANT_FORBIDDEN",
            TenancyError::NoDefaultOrganization => "NO_DEFAULT_ORGANIZATION",
            TenancyError::Forbidden { .. } => "FORBIDDEN",
            TenancyError::Store(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}
