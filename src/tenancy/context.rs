/*
 * Responsibility
 * - リクエスト単位のテナントコンテキスト (principal + 解決済み organization + 平坦化済み grant)
 * - 1 リクエストで 1 度だけ作り、handler → service → repo へ明示的に渡す
 *   (グローバルな「現在のテナント」は持たない)
 */
use std::sync::Arc;

use uuid::Uuid;

use crate::tenancy::grant::EffectiveGrant;
use crate::tenancy::types::{Organization, OrganizationId, Principal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationContext {
    principal: Arc<Principal>,
    organization: Organization,
    grants: Vec<EffectiveGrant>,
}

impl OrganizationContext {
    pub(crate) fn new(
        principal: Arc<Principal>,
        organization: Organization,
        grants: Vec<EffectiveGrant>,
    ) -> Self {
        Self {
            principal,
            organization,
            grants,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn user_id(&self) -> Uuid {
        self.principal.id
    }

    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    /// create 時に stamp する organization。クライアント入力からは取らない
    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization.id
    }

    pub fn grants(&self) -> &[EffectiveGrant] {
        &self.grants
    }
}
