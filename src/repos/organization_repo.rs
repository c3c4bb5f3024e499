/*
 * Responsibility
 * - organizations / organization_members 向け SQLx 操作
 * - Tenant Resolver が使う lookup (OrganizationStore) の PostgreSQL 実装
 * - deleted_at が入っている organization は存在しない扱い
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::tenancy::resources::{self, ResourceSpec};
use crate::tenancy::{Organization, OrganizationId, OrganizationStore, Resource, StoreResult};

const ORGANIZATIONS: &ResourceSpec = resources::spec_for(Resource::Organization);

#[derive(Debug, Clone, FromRow)]
pub struct OrganizationRow {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: OrganizationId::new(row.id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgOrganizationRepo {
    pool: PgPool,
}

impl PgOrganizationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationStore for PgOrganizationRepo {
    #[instrument(skip(self), fields(organization_id = %id))]
    async fn find_active(&self, id: &OrganizationId) -> StoreResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(&format!(
            r#"
            SELECT id, name, created_at, updated_at
            FROM {}
            WHERE {} = $1 AND deleted_at IS NULL
            "#,
            ORGANIZATIONS.table, ORGANIZATIONS.tenant_column
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from)?;

        debug!(found = row.is_some(), "organization lookup");
        Ok(row.map(Organization::from))
    }

    #[instrument(skip(self))]
    async fn find_default_for(&self, user_id: Uuid) -> StoreResult<Option<Organization>> {
        // 1 ユーザーにつき is_default は最大 1 行 (partial unique index)
        let row = sqlx::query_as::<_, OrganizationRow>(&format!(
            r#"
            SELECT o.id, o.name, o.created_at, o.updated_at
            FROM organization_members m
            JOIN {} o ON o.{} = m.organization_id
            WHERE m.user_id = $1
                AND m.is_default
                AND o.deleted_at IS NULL
            "#,
            ORGANIZATIONS.table, ORGANIZATIONS.tenant_column
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from)?;

        Ok(row.map(Organization::from))
    }
}
