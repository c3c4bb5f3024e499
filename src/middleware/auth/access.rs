//! Identity Resolver: bearer access token (JWT) → Principal → AuthCtx を extensions に入れる
//!
//! - トークン検証は `TokenVerifier` (services::auth)。ここは結果しか見ない
//! - ロール割り当てと direct grant は毎リクエスト principal store から読む (トークンには載せない)
//! - 失敗はすべて TenancyError::Unauthenticated (401)。ただし store 障害は 500 (認証失敗として扱わない)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;
use crate::tenancy::TenancyError;

/// 保護したい Router に access middleware を掛ける。
///
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn では State を受け取れないので from_fn_with_state で渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(TenancyError::Unauthenticated)?;

    let verified = match state.auth.verify_access_token(token) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(error = ?err, "access token verification failed");
            return Err(TenancyError::Unauthenticated.into());
        }
    };

    let principal = state
        .principals
        .load_principal(verified.user_id)
        .await
        .map_err(TenancyError::from)?;

    let Some(principal) = principal else {
        // 署名は正しいが users に居ない (削除済みなど)
        tracing::warn!(user_id = %verified.user_id, "token subject has no principal");
        return Err(TenancyError::Unauthenticated.into());
    };

    let auth_ctx = AuthCtx::new(principal, verified.jti);
    tracing::debug!(user_id = %auth_ctx.user_id(), "request authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
