/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler / extractor はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証と principal の読み込みは middleware/services/repos 側の責務
 * - テナント (organization) はここには含めない。TenantCtx で別途解決する
 */
use std::sync::Arc;

use uuid::Uuid;

use crate::tenancy::Principal;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `principal` はリクエスト中不変 (Arc で共有)
/// - `jti` は監査/相関用
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub principal: Arc<Principal>,
    pub jti: Option<String>,
}

impl AuthCtx {
    pub fn new(principal: Principal, jti: Option<String>) -> Self {
        Self {
            principal: Arc::new(principal),
            jti,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.principal.id
    }
}
