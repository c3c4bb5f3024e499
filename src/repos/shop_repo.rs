/*
 * Responsibility
 * - shops CRUD (テナント所有リソース)
 * - read / update / delete は必ず ScopeFilter を SQL に束ねてから実行する
 * - create の organization_id は呼び出し側がコンテキストから stamp したもの (NewShop)
 * - 削除は soft delete (deleted_at)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::repos::error::RepoResult;
use crate::repos::scope::push_scope;
use crate::tenancy::resources::{self, ResourceSpec};
use crate::tenancy::{OrganizationContext, OrganizationId, Resource, ScopeFilter};

const SHOPS: &ResourceSpec = resources::spec_for(Resource::Shop);
const SHOP_COLUMNS: &str = "id, organization_id, name, currency, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ShopRow {
    pub id: i64,
    #[sqlx(try_from = "String")]
    pub organization_id: OrganizationId,
    pub name: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新規作成。organization_id は `for_context` 経由でしか入らない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShop {
    organization_id: OrganizationId,
    pub name: String,
    pub currency: String,
}

impl NewShop {
    pub fn for_context(ctx: &OrganizationContext, name: String, currency: String) -> Self {
        Self {
            organization_id: ctx.organization_id().clone(),
            name,
            currency,
        }
    }

    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }
}

/// 部分更新。None は変更しない。organization_id は更新対象にしない
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopChanges {
    pub name: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait ShopStore: Send + Sync {
    async fn list(&self, scope: &ScopeFilter, page: Page) -> RepoResult<Vec<ShopRow>>;
    async fn get(&self, scope: &ScopeFilter, id: i64) -> RepoResult<Option<ShopRow>>;
    async fn create(&self, shop: NewShop) -> RepoResult<ShopRow>;
    async fn update(
        &self,
        scope: &ScopeFilter,
        id: i64,
        changes: ShopChanges,
    ) -> RepoResult<Option<ShopRow>>;
    async fn delete(&self, scope: &ScopeFilter, id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgShopRepo {
    pool: PgPool,
}

impl PgShopRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShopStore for PgShopRepo {
    #[instrument(skip(self))]
    async fn list(&self, scope: &ScopeFilter, page: Page) -> RepoResult<Vec<ShopRow>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SHOP_COLUMNS} FROM {} WHERE deleted_at IS NULL",
            SHOPS.table
        ));
        push_scope(&mut qb, scope);
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        let rows = qb.build_query_as::<ShopRow>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn get(&self, scope: &ScopeFilter, id: i64) -> RepoResult<Option<ShopRow>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SHOP_COLUMNS} FROM {} WHERE deleted_at IS NULL AND id = ",
            SHOPS.table
        ));
        qb.push_bind(id);
        push_scope(&mut qb, scope);

        let row = qb
            .build_query_as::<ShopRow>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self), fields(organization_id = %shop.organization_id))]
    async fn create(&self, shop: NewShop) -> RepoResult<ShopRow> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r#"
            INSERT INTO {} ({}, name, currency)
            VALUES ($1, $2, $3)
            RETURNING {SHOP_COLUMNS}
            "#,
            SHOPS.table, SHOPS.tenant_column
        ))
        .bind(shop.organization_id.as_str())
        .bind(&shop.name)
        .bind(&shop.currency)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        scope: &ScopeFilter,
        id: i64,
        changes: ShopChanges,
    ) -> RepoResult<Option<ShopRow>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} SET name = COALESCE(",
            SHOPS.table
        ));
        qb.push_bind(changes.name)
            .push(", name), currency = COALESCE(")
            .push_bind(changes.currency)
            .push(", currency), updated_at = now() WHERE deleted_at IS NULL AND id = ")
            .push_bind(id);
        push_scope(&mut qb, scope);
        qb.push(format!(" RETURNING {SHOP_COLUMNS}"));

        let row = qb
            .build_query_as::<ShopRow>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn delete(&self, scope: &ScopeFilter, id: i64) -> RepoResult<bool> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} SET deleted_at = now() WHERE deleted_at IS NULL AND id = ",
            SHOPS.table
        ));
        qb.push_bind(id);
        push_scope(&mut qb, scope);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
