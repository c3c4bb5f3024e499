/*
 * Responsibility
 * - テナント機構が外部ストレージに求める契約 (trait)
 * - 実装は repos (PostgreSQL)。テストでは mockall / in-memory に差し替える
 */
use async_trait::async_trait;
use uuid::Uuid;

use crate::tenancy::error::StoreResult;
use crate::tenancy::types::{Organization, OrganizationId, Principal};

/// Organization lookups used by the tenant resolver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Soft-deleted organizations are treated as missing.
    async fn find_active(&self, id: &OrganizationId) -> StoreResult<Option<Organization>>;

    /// The organization flagged as default on the user's memberships.
    async fn find_default_for(&self, user_id: Uuid) -> StoreResult<Option<Organization>>;
}

/// Loads role assignments and direct grants for an authenticated user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// `None` when the user does not exist (the token outlived the account).
    async fn load_principal(&self, user_id: Uuid) -> StoreResult<Option<Principal>>;
}
