/*
 * Responsibility
 * - GET /me: 認証済み主体と、このリクエストで解決されたテナント・grant を返す
 * - GET /organization: 現在の organization (organization.read が必要)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::me::{MeResponse, OrganizationResponse},
        extractors::TenantCtx,
    },
    error::AppError,
    state::AppState,
    tenancy::{Action, Resource},
};

pub async fn me(TenantCtx(ctx): TenantCtx) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: ctx.user_id(),
        organization: OrganizationResponse::from(ctx.organization()),
        grants: ctx.grants().to_vec(),
    })
}

pub async fn current_organization(
    State(state): State<AppState>,
    TenantCtx(ctx): TenantCtx,
) -> Result<Json<OrganizationResponse>, AppError> {
    // コンテキストの organization は必ず filter を満たすので、ここでは許可だけ確認する
    state
        .enforcer
        .authorize(&ctx, Resource::Organization, Action::Read)?;

    Ok(Json(OrganizationResponse::from(ctx.organization())))
}
