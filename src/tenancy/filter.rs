/*
 * Responsibility
 * - Enforcer が返す「このリクエストで触ってよい範囲」(ScopeFilter)
 * - 呼び出し側は全ての read / write にこれを適用する。SQL への変換は repos 側
 */
use serde::Serialize;

use crate::tenancy::types::OrganizationId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopeFilter {
    /// global grant。述語なし
    Unrestricted,
    /// `column = organization_id` の等値条件
    Organization {
        column: &'static str,
        organization_id: OrganizationId,
    },
}

impl ScopeFilter {
    pub fn organization(column: &'static str, organization_id: OrganizationId) -> Self {
        Self::Organization {
            column,
            organization_id,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    pub fn organization_id(&self) -> Option<&OrganizationId> {
        match self {
            Self::Unrestricted => None,
            Self::Organization {
                organization_id, ..
            } => Some(organization_id),
        }
    }

    /// 行の organization がこの filter を満たすか (完全一致のみ。ワイルドカードなし)
    pub fn permits(&self, row_organization: &OrganizationId) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Organization {
                organization_id, ..
            } => organization_id == row_organization,
        }
    }
}
