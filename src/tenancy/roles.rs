/*
 * Responsibility
 * - ロール → grant の宣言的なテーブル (RoleCatalog)
 * - Principal の割り当てを、あるコンテキスト (organization) 向けに 1 度だけ平坦化する
 *
 * Notes
 * - includes は 1 段だけ展開する。includes の includes は見ないので循環しない
 */
use std::collections::{BTreeMap, HashSet};

use crate::tenancy::grant::{Action, EffectiveGrant, GrantSource, PermissionGrant, Resource};
use crate::tenancy::types::{OrganizationId, Principal, RoleName};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RoleDefinition {
    grants: Vec<PermissionGrant>,
    includes: Vec<RoleName>,
}

#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    roles: BTreeMap<RoleName, RoleDefinition>,
}

impl RoleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(
        mut self,
        name: &str,
        includes: &[&str],
        grants: impl IntoIterator<Item = PermissionGrant>,
    ) -> Self {
        self.roles.insert(
            RoleName::new(name),
            RoleDefinition {
                grants: grants.into_iter().collect(),
                includes: includes.iter().map(|r| RoleName::new(*r)).collect(),
            },
        );
        self
    }

    /// Built-in roles.
    ///
    /// - member: own-organization read access
    /// - owner: member + own-organization write/delete
    /// - admin: platform-wide access (global scope)
    pub fn builtin() -> Self {
        use Action::*;
        use Resource::*;

        Self::new()
            .define(
                "member",
                &[],
                [
                    PermissionGrant::own(Shop, Read),
                    PermissionGrant::own(Shop, List),
                    PermissionGrant::own(Organization, Read),
                ],
            )
            .define(
                "owner",
                &["member"],
                [
                    PermissionGrant::own(Shop, Write),
                    PermissionGrant::own(Shop, Delete),
                    PermissionGrant::own(Organization, Write),
                ],
            )
            .define(
                "admin",
                &[],
                [
                    PermissionGrant::global(Shop, Read),
                    PermissionGrant::global(Shop, List),
                    PermissionGrant::global(Shop, Write),
                    PermissionGrant::global(Shop, Delete),
                    PermissionGrant::global(Organization, Read),
                    PermissionGrant::global(Organization, List),
                ],
            )
    }

    /// ロール 1 つ分の grant (自身 + includes 1 段)
    pub fn expand_role(&self, name: &RoleName) -> Vec<PermissionGrant> {
        let Some(def) = self.roles.get(name) else {
            tracing::warn!(role = %name, "unknown role in assignment; no grants applied");
            return Vec::new();
        };

        let mut grants = def.grants.clone();
        for included in &def.includes {
            match self.roles.get(included) {
                Some(inner) => grants.extend(inner.grants.iter().copied()),
                None => tracing::warn!(role = %name, included = %included, "unknown included role"),
            }
        }
        grants
    }

    /// Principal の grant を `organization` 向けに平坦化する
    ///
    /// direct grant → 適用可能なロール割り当て の順。重複 (grant, source) は 1 つにまとめる。
    pub fn effective_grants(
        &self,
        principal: &Principal,
        organization: &OrganizationId,
    ) -> Vec<EffectiveGrant> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for grant in &principal.direct_grants {
            if seen.insert((*grant, None)) {
                out.push(EffectiveGrant {
                    grant: *grant,
                    source: GrantSource::Direct,
                });
            }
        }

        for assignment in principal
            .assignments
            .iter()
            .filter(|a| a.applies_to(organization))
        {
            for grant in self.expand_role(&assignment.role) {
                if seen.insert((grant, Some(assignment.role.clone()))) {
                    out.push(EffectiveGrant {
                        grant,
                        source: GrantSource::Role(assignment.role.clone()),
                    });
                }
            }
        }

        out
    }
}
