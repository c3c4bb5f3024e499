/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: TokenVerifier, principals: PrincipalStore, tenants: TenantResolver など
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 読み取り専用。「現在のテナント」はここに置かない (リクエストごとの OrganizationContext)
 */
use std::sync::Arc;

use axum::http::HeaderName;

use crate::repos::ShopStore;
use crate::services::{auth::TokenVerifier, id_codec::IdCodec};
use crate::tenancy::{AccessEnforcer, PrincipalStore, TenantResolver};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn TokenVerifier>,
    pub principals: Arc<dyn PrincipalStore>,
    pub tenants: TenantResolver,
    pub enforcer: AccessEnforcer,
    pub shops: Arc<dyn ShopStore>,
    pub id_codec: IdCodec,
    pub tenant_header: HeaderName,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tenants", &self.tenants)
            .field("enforcer", &self.enforcer)
            .field("id_codec", &self.id_codec)
            .field("tenant_header", &self.tenant_header)
            .finish_non_exhaustive()
    }
}
