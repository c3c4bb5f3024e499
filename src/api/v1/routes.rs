/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開。それ以外は access middleware (Identity Resolver) の内側
 * - テナント解決と認可は handler 側 (TenantCtx + enforcer) で行う
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    health::health,
    me::{current_organization, me},
    shops::{create_shop, delete_shop, get_shop, list_shops, update_shop},
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = Router::new()
        .route("/me", get(me))
        .route("/organization", get(current_organization))
        .route("/shops", get(list_shops).post(create_shop))
        .route(
            "/shops/{shop_id}",
            get(get_shop).put(update_shop).delete(delete_shop),
        );
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
