/*
 * Responsibility
 * - principal + (任意の) organization ヘッダ → OrganizationContext
 * - ヘッダが空なら default organization にフォールバック。null テナントでは進まない
 * - 副作用なし (lookup + メンバーシップ確認のみ)
 */
use std::sync::Arc;

use tracing::instrument;

use crate::tenancy::context::OrganizationContext;
use crate::tenancy::error::TenancyError;
use crate::tenancy::roles::RoleCatalog;
use crate::tenancy::store::OrganizationStore;
use crate::tenancy::types::{OrganizationId, Principal};

#[derive(Clone)]
pub struct TenantResolver {
    organizations: Arc<dyn OrganizationStore>,
    catalog: Arc<RoleCatalog>,
}

impl std::fmt::Debug for TenantResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantResolver").finish_non_exhaustive()
    }
}

impl TenantResolver {
    pub fn new(organizations: Arc<dyn OrganizationStore>, catalog: Arc<RoleCatalog>) -> Self {
        Self {
            organizations,
            catalog,
        }
    }

    /// Resolve the active organization for a request.
    ///
    /// - selector present (non-blank): must exist and the principal must be a member
    /// - selector absent or blank: the principal's default organization
    ///
    /// Storage failures are returned as `TenancyError::Store`, never as a tenant error.
    #[instrument(skip_all, fields(user_id = %principal.id, requested = requested.unwrap_or("")))]
    pub async fn resolve(
        &self,
        principal: Arc<Principal>,
        requested: Option<&str>,
    ) -> Result<OrganizationContext, TenancyError> {
        let requested = requested.map(str::trim).filter(|s| !s.is_empty());

        let organization = match requested {
            Some(raw) => {
                let id = OrganizationId::new(raw);
                self.organizations
                    .find_active(&id)
                    .await?
                    .ok_or(TenancyError::TenantNotFound)?
            }
            None => self
                .organizations
                .find_default_for(principal.id)
                .await?
                .ok_or(TenancyError::NoDefaultOrganization)?,
        };

        if !principal.is_member_of(&organization.id) {
            tracing::info!(
                organization_id = %organization.id,
                "principal is not a member of the organization"
            );
            return Err(TenancyError::TenantForbidden);
        }

        let grants = self.catalog.effective_grants(&principal, &organization.id);

        Ok(OrganizationContext::new(principal, organization, grants))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::tenancy::error::StoreError;
    use crate::tenancy::store::MockOrganizationStore;
    use crate::tenancy::types::{Organization, RoleAssignment};

    fn org(id: &str) -> Organization {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Organization {
            id: id.into(),
            name: format!("{id} inc"),
            created_at: at,
            updated_at: at,
        }
    }

    fn alice() -> Arc<Principal> {
        Arc::new(
            Principal::new(Uuid::from_u128(1))
                .with_assignment(RoleAssignment::in_organization("owner", "org-1")),
        )
    }

    fn resolver(store: MockOrganizationStore) -> TenantResolver {
        TenantResolver::new(Arc::new(store), Arc::new(RoleCatalog::builtin()))
    }

    #[tokio::test]
    async fn falls_back_to_default_organization_without_selector() {
        let mut store = MockOrganizationStore::new();
        store
            .expect_find_default_for()
            .returning(|_| Ok(Some(org("org-1"))));

        let ctx = resolver(store).resolve(alice(), None).await.unwrap();

        assert_eq!(ctx.organization_id().as_str(), "org-1");
        assert!(!ctx.grants().is_empty());
    }

    #[tokio::test]
    async fn blank_selector_is_treated_as_absent() {
        let mut store = MockOrganizationStore::new();
        store
            .expect_find_default_for()
            .times(2)
            .returning(|_| Ok(Some(org("org-1"))));
        let resolver = resolver(store);

        for header in ["", "   "] {
            let ctx = resolver.resolve(alice(), Some(header)).await.unwrap();
            assert_eq!(ctx.organization_id().as_str(), "org-1");
        }
    }

    #[tokio::test]
    async fn no_default_and_no_selector_fails() {
        let mut store = MockOrganizationStore::new();
        store.expect_find_default_for().returning(|_| Ok(None));

        let err = resolver(store).resolve(alice(), None).await.unwrap_err();

        assert!(matches!(err, TenancyError::NoDefaultOrganization));
    }

    #[tokio::test]
    async fn existing_organization_without_membership_is_forbidden() {
        let mut store = MockOrganizationStore::new();
        store
            .expect_find_active()
            .withf(|id| id.as_str() == "org-2")
            .returning(|_| Ok(Some(org("org-2"))));

        let err = resolver(store)
            .resolve(alice(), Some("org-2"))
            .await
            .unwrap_err();

        assert!(matches!(err, TenancyError::TenantForbidden));
    }

    #[tokio::test]
    async fn unknown_selector_is_not_found() {
        let mut store = MockOrganizationStore::new();
        store.expect_find_active().returning(|_| Ok(None));

        let err = resolver(store)
            .resolve(alice(), Some("org-404"))
            .await
            .unwrap_err();

        assert!(matches!(err, TenancyError::TenantNotFound));
    }

    #[tokio::test]
    async fn platform_role_does_not_grant_membership() {
        let mut store = MockOrganizationStore::new();
        store
            .expect_find_active()
            .returning(|_| Ok(Some(org("org-2"))));
        let admin = Arc::new(
            Principal::new(Uuid::from_u128(2)).with_assignment(RoleAssignment::platform("admin")),
        );

        let err = resolver(store)
            .resolve(admin, Some("org-2"))
            .await
            .unwrap_err();

        assert!(matches!(err, TenancyError::TenantForbidden));
    }

    #[tokio::test]
    async fn storage_errors_propagate_unchanged() {
        let mut store = MockOrganizationStore::new();
        store
            .expect_find_active()
            .returning(|_| Err(StoreError::Corrupt("organizations.id".into())));

        let err = resolver(store)
            .resolve(alice(), Some("org-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, TenancyError::Store(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let mut store = MockOrganizationStore::new();
        store
            .expect_find_active()
            .returning(|_| Ok(Some(org("org-1"))));
        let resolver = resolver(store);
        let principal = alice();

        let first = resolver
            .resolve(principal.clone(), Some("org-1"))
            .await
            .unwrap();
        let second = resolver.resolve(principal, Some("org-1")).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn stale_default_organization_is_checked_for_membership() {
        // default 行は残っているが、割り当ては org-1 にしかない
        let mut store = MockOrganizationStore::new();
        store
            .expect_find_default_for()
            .returning(|_| Ok(Some(org("org-2"))));
        store.expect_find_active().never();

        let err = resolver(store).resolve(alice(), None).await.unwrap_err();

        assert!(matches!(err, TenancyError::TenantForbidden));
    }
}
