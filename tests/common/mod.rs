//! In-memory stand-ins for the storage layer and the token verifier, plus a
//! seeded fixture: two organizations, four users, one shop per organization.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use payments_api::{
    app::build_router,
    config::Config,
    repos::{
        ShopStore,
        error::RepoResult,
        shop_repo::{NewShop, Page, ShopChanges, ShopRow},
    },
    services::{
        auth::{AccessJwtError, TokenVerifier, VerifiedAccessToken},
        id_codec::IdCodec,
    },
    state::AppState,
    tenancy::{
        AccessEnforcer, Organization, OrganizationId, OrganizationStore, Principal,
        PrincipalStore, RoleAssignment, RoleCatalog, ScopeFilter, StoreError, StoreResult,
        TenantResolver,
    },
};

pub const ORG_1: &str = "org-1";
pub const ORG_2: &str = "org-2";

/// owner of org-1 (default org-1)
pub const ALICE: Uuid = Uuid::from_u128(0xa11ce);
/// member of org-2 (default org-2)
pub const BOB: Uuid = Uuid::from_u128(0xb0b);
/// member of org-1 + platform admin
pub const CAROL: Uuid = Uuid::from_u128(0xca201);
/// user with no membership at all
pub const DAVE: Uuid = Uuid::from_u128(0xda7e);
/// principal lookup fails with a storage error
pub const BROKEN: Uuid = Uuid::from_u128(0xdead);

pub const ORG_1_SHOP: i64 = 1;
pub const ORG_2_SHOP: i64 = 2;

/// Accepts `Bearer <uuid>`; anything else is an invalid token.
pub struct StubVerifier;

impl TokenVerifier for StubVerifier {
    fn verify_access_token(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        let user_id = Uuid::parse_str(token).map_err(|_| AccessJwtError::InvalidSubUuid)?;
        Ok(VerifiedAccessToken {
            user_id,
            jti: None,
        })
    }
}

#[derive(Default)]
pub struct MemoryOrganizations {
    organizations: HashMap<OrganizationId, Organization>,
    defaults: HashMap<Uuid, OrganizationId>,
}

impl MemoryOrganizations {
    fn add(&mut self, id: &str, name: &str) {
        let now = Utc::now();
        self.organizations.insert(
            OrganizationId::from(id),
            Organization {
                id: OrganizationId::from(id),
                name: name.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
    }
}

#[async_trait]
impl OrganizationStore for MemoryOrganizations {
    async fn find_active(&self, id: &OrganizationId) -> StoreResult<Option<Organization>> {
        Ok(self.organizations.get(id).cloned())
    }

    async fn find_default_for(&self, user_id: Uuid) -> StoreResult<Option<Organization>> {
        Ok(self
            .defaults
            .get(&user_id)
            .and_then(|id| self.organizations.get(id))
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryPrincipals {
    principals: HashMap<Uuid, Principal>,
}

#[async_trait]
impl PrincipalStore for MemoryPrincipals {
    async fn load_principal(&self, user_id: Uuid) -> StoreResult<Option<Principal>> {
        if user_id == BROKEN {
            return Err(StoreError::Corrupt("principal store unavailable".into()));
        }
        Ok(self.principals.get(&user_id).cloned())
    }
}

#[derive(Debug, Clone)]
struct StoredShop {
    row: ShopRow,
    deleted: bool,
}

/// Applies the ScopeFilter the same way the SQL predicate does, and records
/// every call so tests can assert that nothing was touched.
#[derive(Default)]
pub struct MemoryShops {
    shops: Mutex<Vec<StoredShop>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryShops {
    fn seed(&self, id: i64, organization: &str, name: &str) {
        let now = Utc::now();
        self.shops.lock().unwrap().push(StoredShop {
            row: ShopRow {
                id,
                organization_id: OrganizationId::from(organization),
                name: name.to_string(),
                currency: "JPY".to_string(),
                created_at: now,
                updated_at: now,
            },
            deleted: false,
        });
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Raw view, ignoring scope and soft delete.
    pub fn snapshot(&self) -> Vec<(ShopRow, bool)> {
        self.shops
            .lock()
            .unwrap()
            .iter()
            .map(|s| (s.row.clone(), s.deleted))
            .collect()
    }
}

#[async_trait]
impl ShopStore for MemoryShops {
    async fn list(&self, scope: &ScopeFilter, page: Page) -> RepoResult<Vec<ShopRow>> {
        self.record("list");
        let shops = self.shops.lock().unwrap();
        let mut rows: Vec<ShopRow> = shops
            .iter()
            .filter(|s| !s.deleted && scope.permits(&s.row.organization_id))
            .map(|s| s.row.clone())
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn get(&self, scope: &ScopeFilter, id: i64) -> RepoResult<Option<ShopRow>> {
        self.record("get");
        let shops = self.shops.lock().unwrap();
        Ok(shops
            .iter()
            .find(|s| s.row.id == id && !s.deleted && scope.permits(&s.row.organization_id))
            .map(|s| s.row.clone()))
    }

    async fn create(&self, shop: NewShop) -> RepoResult<ShopRow> {
        self.record("create");
        let mut shops = self.shops.lock().unwrap();
        let now = Utc::now();
        let row = ShopRow {
            id: shops.iter().map(|s| s.row.id).max().unwrap_or(0) + 1,
            organization_id: shop.organization_id().clone(),
            name: shop.name,
            currency: shop.currency,
            created_at: now,
            updated_at: now,
        };
        shops.push(StoredShop {
            row: row.clone(),
            deleted: false,
        });
        Ok(row)
    }

    async fn update(
        &self,
        scope: &ScopeFilter,
        id: i64,
        changes: ShopChanges,
    ) -> RepoResult<Option<ShopRow>> {
        self.record("update");
        let mut shops = self.shops.lock().unwrap();
        let Some(shop) = shops
            .iter_mut()
            .find(|s| s.row.id == id && !s.deleted && scope.permits(&s.row.organization_id))
        else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            shop.row.name = name;
        }
        if let Some(currency) = changes.currency {
            shop.row.currency = currency;
        }
        shop.row.updated_at = Utc::now();

        Ok(Some(shop.row.clone()))
    }

    async fn delete(&self, scope: &ScopeFilter, id: i64) -> RepoResult<bool> {
        self.record("delete");
        let mut shops = self.shops.lock().unwrap();
        match shops
            .iter_mut()
            .find(|s| s.row.id == id && !s.deleted && scope.permits(&s.row.organization_id))
        {
            Some(shop) => {
                shop.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub shops: Arc<MemoryShops>,
    pub id_codec: IdCodec,
}

pub fn config() -> Config {
    let env: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgres://localhost/payments_test"),
        ("AUTH_ISSUER", "https://auth.example.test"),
        ("AUTH_AUDIENCE", "payments-api"),
        ("ACCESS_JWT_PUBLIC_KEY_PEM", "unused"),
    ]);
    Config::from_source(|key| env.get(key).map(|v| v.to_string())).unwrap()
}

pub fn test_app() -> TestApp {
    let mut organizations = MemoryOrganizations::default();
    organizations.add(ORG_1, "Acme");
    organizations.add(ORG_2, "Globex");
    organizations.defaults.insert(ALICE, ORG_1.into());
    organizations.defaults.insert(BOB, ORG_2.into());
    organizations.defaults.insert(CAROL, ORG_1.into());

    let mut principals = MemoryPrincipals::default();
    for principal in [
        Principal::new(ALICE).with_assignment(RoleAssignment::in_organization("owner", ORG_1)),
        Principal::new(BOB).with_assignment(RoleAssignment::in_organization("member", ORG_2)),
        Principal::new(CAROL)
            .with_assignment(RoleAssignment::in_organization("member", ORG_1))
            .with_assignment(RoleAssignment::platform("admin")),
        Principal::new(DAVE),
    ] {
        principals.principals.insert(principal.id, principal);
    }

    let shops = Arc::new(MemoryShops::default());
    shops.seed(ORG_1_SHOP, ORG_1, "Acme Tokyo");
    shops.seed(ORG_2_SHOP, ORG_2, "Globex Osaka");

    let config = config();
    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet).unwrap();

    let state = AppState {
        auth: Arc::new(StubVerifier),
        principals: Arc::new(principals),
        tenants: TenantResolver::new(
            Arc::new(organizations),
            Arc::new(RoleCatalog::builtin()),
        ),
        enforcer: AccessEnforcer::default(),
        shops: shops.clone(),
        id_codec: id_codec.clone(),
        tenant_header: config.tenant_header.clone(),
    };

    TestApp {
        router: build_router(state, &config),
        shops,
        id_codec,
    }
}

impl TestApp {
    pub fn shop_path(&self, id: i64) -> String {
        format!("/api/v1/shops/{}", self.id_codec.encode(id).unwrap())
    }

    pub async fn send(&self, req: Request<Body>) -> (Response<Body>, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let (parts, body) = res.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (Response::from_parts(parts, Body::empty()), json)
    }
}

pub fn request(method: &str, uri: &str, user: Option<Uuid>, organization: Option<&str>) -> Request<Body> {
    build(method, uri, user, organization, Body::empty())
}

pub fn json_request(
    method: &str,
    uri: &str,
    user: Option<Uuid>,
    organization: Option<&str>,
    body: Value,
) -> Request<Body> {
    build(method, uri, user, organization, Body::from(body.to_string()))
}

fn build(
    method: &str,
    uri: &str,
    user: Option<Uuid>,
    organization: Option<&str>,
    body: Body,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {user}"));
    }
    if let Some(organization) = organization {
        builder = builder.header("organization", organization);
    }
    builder.body(body).unwrap()
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
