/*
 * Responsibility
 * - (context, resource, action) → ScopeFilter | Forbidden
 * - 純粋関数。ストレージには触らない (filter の適用は呼び出し側)
 *
 * 判定
 * - global grant があれば Unrestricted (global 優先)
 * - own-organization grant のみなら organization 一致の filter
 * - どちらもなければ Forbidden (個別インスタンスの有無は漏らさない)
 */
use crate::tenancy::context::OrganizationContext;
use crate::tenancy::error::TenancyError;
use crate::tenancy::filter::ScopeFilter;
use crate::tenancy::grant::{Action, GrantScope, Resource};
use crate::tenancy::resources::{self, ResourceSpec};

#[derive(Debug, Clone)]
pub struct AccessEnforcer {
    specs: Vec<ResourceSpec>,
}

impl Default for AccessEnforcer {
    fn default() -> Self {
        Self::new(resources::all().to_vec())
    }
}

impl AccessEnforcer {
    pub fn new(specs: Vec<ResourceSpec>) -> Self {
        Self { specs }
    }

    pub fn authorize(
        &self,
        ctx: &OrganizationContext,
        resource: Resource,
        action: Action,
    ) -> Result<ScopeFilter, TenancyError> {
        let denied = || TenancyError::Forbidden { resource, action };

        let Some(spec) = self.specs.iter().find(|s| s.resource == resource) else {
            tracing::warn!(%resource, "resource is not registered; denying");
            return Err(denied());
        };

        let mut own_organization = false;
        for effective in ctx
            .grants()
            .iter()
            .filter(|g| g.grant.matches(resource, action))
        {
            match effective.grant.scope {
                GrantScope::Global => {
                    tracing::debug!(%resource, %action, source = ?effective.source, "authorized (global)");
                    return Ok(ScopeFilter::Unrestricted);
                }
                GrantScope::OwnOrganization => own_organization = true,
            }
        }

        if own_organization && spec.required_scope == GrantScope::OwnOrganization {
            tracing::debug!(%resource, %action, organization_id = %ctx.organization_id(), "authorized (own organization)");
            return Ok(ScopeFilter::organization(
                spec.tenant_column,
                ctx.organization_id().clone(),
            ));
        }

        tracing::info!(
            user_id = %ctx.user_id(),
            %resource,
            %action,
            "permission denied"
        );
        Err(denied())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::tenancy::grant::PermissionGrant;
    use crate::tenancy::roles::RoleCatalog;
    use crate::tenancy::types::{Organization, Principal, RoleAssignment};

    fn context(principal: Principal, organization: &str) -> OrganizationContext {
        let organization = Organization {
            id: organization.into(),
            name: organization.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let grants = RoleCatalog::builtin().effective_grants(&principal, &organization.id);
        OrganizationContext::new(Arc::new(principal), organization, grants)
    }

    #[test]
    fn own_organization_grant_yields_exact_match_filter() {
        let alice = Principal::new(Uuid::new_v4())
            .with_assignment(RoleAssignment::in_organization("owner", "org-1"));
        let ctx = context(alice, "org-1");

        let filter = AccessEnforcer::default()
            .authorize(&ctx, Resource::Shop, Action::Write)
            .unwrap();

        assert_eq!(
            filter,
            ScopeFilter::organization("organization_id", "org-1".into())
        );
    }

    #[test]
    fn global_grant_is_unrestricted_in_any_organization() {
        let enforcer = AccessEnforcer::default();
        for org in ["org-1", "org-2", "elsewhere"] {
            let admin = Principal::new(Uuid::new_v4())
                .with_assignment(RoleAssignment::platform("admin"));
            let ctx = context(admin, org);

            let filter = enforcer.authorize(&ctx, Resource::Shop, Action::Read).unwrap();
            assert!(filter.is_unrestricted(), "{org}");
        }
    }

    #[test]
    fn global_wins_over_own_organization() {
        let principal = Principal::new(Uuid::new_v4())
            .with_assignment(RoleAssignment::in_organization("member", "org-1"))
            .with_grant(PermissionGrant::global(Resource::Shop, Action::Read));
        let ctx = context(principal, "org-1");

        let filter = AccessEnforcer::default()
            .authorize(&ctx, Resource::Shop, Action::Read)
            .unwrap();

        assert_eq!(filter, ScopeFilter::Unrestricted);
    }

    #[test]
    fn missing_grant_is_forbidden_with_diagnostics() {
        let member = Principal::new(Uuid::new_v4())
            .with_assignment(RoleAssignment::in_organization("member", "org-1"));
        let ctx = context(member, "org-1");

        let err = AccessEnforcer::default()
            .authorize(&ctx, Resource::Shop, Action::Delete)
            .unwrap_err();

        assert!(matches!(
            err,
            TenancyError::Forbidden {
                resource: Resource::Shop,
                action: Action::Delete
            }
        ));
        assert_eq!(err.to_string(), "forbidden: delete on shop");
    }

    #[test]
    fn organization_filter_uses_registered_column() {
        let member = Principal::new(Uuid::new_v4())
            .with_assignment(RoleAssignment::in_organization("member", "org-1"));
        let ctx = context(member, "org-1");

        let filter = AccessEnforcer::default()
            .authorize(&ctx, Resource::Organization, Action::Read)
            .unwrap();

        assert_eq!(filter, ScopeFilter::organization("id", "org-1".into()));
    }

    #[test]
    fn global_only_resource_rejects_own_organization_grants() {
        let enforcer = AccessEnforcer::new(vec![ResourceSpec {
            resource: Resource::Organization,
            table: "organizations",
            tenant_column: "id",
            required_scope: GrantScope::Global,
        }]);
        let owner = Principal::new(Uuid::new_v4())
            .with_assignment(RoleAssignment::in_organization("owner", "org-1"));
        let ctx = context(owner, "org-1");

        assert!(
            enforcer
                .authorize(&ctx, Resource::Organization, Action::Write)
                .is_err()
        );
    }

    #[test]
    fn unregistered_resource_is_denied() {
        let enforcer = AccessEnforcer::new(Vec::new());
        let admin =
            Principal::new(Uuid::new_v4()).with_assignment(RoleAssignment::platform("admin"));
        let ctx = context(admin, "org-1");

        assert!(enforcer.authorize(&ctx, Resource::Shop, Action::Read).is_err());
    }
}
