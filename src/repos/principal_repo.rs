/*
 * Responsibility
 * - user_id → Principal (ロール割り当て + direct grant) の組み立て
 * - Identity Resolver (access middleware) がリクエストごとに 1 回呼ぶ
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::tenancy::{
    OrganizationId, PermissionGrant, Principal, PrincipalStore, RoleAssignment, RoleName,
    StoreResult,
};

#[derive(Debug, FromRow)]
struct AssignmentRow {
    role: String,
    organization_id: Option<String>,
}

#[derive(Debug, FromRow)]
struct GrantRow {
    resource: String,
    action: String,
    scope: String,
}

#[derive(Clone, Debug)]
pub struct PgPrincipalRepo {
    pool: PgPool,
}

impl PgPrincipalRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn user_exists(&self, user_id: Uuid) -> Result<bool, RepoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn assignments(&self, user_id: Uuid) -> Result<Vec<RoleAssignment>, RepoError> {
        // organization_id が NULL の行はプラットフォームロール
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT m.role, m.organization_id
            FROM organization_members m
            JOIN organizations o ON o.id = m.organization_id
            WHERE m.user_id = $1 AND o.deleted_at IS NULL
            UNION ALL
            SELECT p.role, NULL
            FROM platform_roles p
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| RoleAssignment {
                role: RoleName::new(r.role),
                organization: r.organization_id.map(OrganizationId::new),
            })
            .collect())
    }

    async fn direct_grants(&self, user_id: Uuid) -> Result<Vec<PermissionGrant>, RepoError> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT resource, action, scope
            FROM user_permissions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        // 読めない行は付与しない (fail closed)
        Ok(rows
            .into_iter()
            .filter_map(
                |r| match PermissionGrant::parse(&r.resource, &r.action, &r.scope) {
                    Ok(grant) => Some(grant),
                    Err(err) => {
                        tracing::warn!(%user_id, error = %err, "skipping unreadable permission row");
                        None
                    }
                },
            )
            .collect())
    }
}

#[async_trait]
impl PrincipalStore for PgPrincipalRepo {
    #[instrument(skip(self))]
    async fn load_principal(&self, user_id: Uuid) -> StoreResult<Option<Principal>> {
        if !self.user_exists(user_id).await? {
            return Ok(None);
        }

        let assignments = self.assignments(user_id).await?;
        let direct_grants = self.direct_grants(user_id).await?;

        Ok(Some(Principal {
            id: user_id,
            assignments,
            direct_grants,
        }))
    }
}
