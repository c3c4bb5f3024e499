/*
 * Responsibility
 * - /shops 系 CRUD handler
 * - 流れ: TenantCtx (テナント確定) → enforcer.authorize (ScopeFilter) → repo (filter を SQL に束ねる)
 * - 認可はデータアクセスの前。拒否されたら repo は一切呼ばれない
 * - create の organization はコンテキストから stamp する (body の値は使わない)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::shops::{CreateShopRequest, ListShopsQuery, ShopResponse, UpdateShopRequest},
        extractors::{AppJson, AppQuery, TenantCtx, public_id::PublicShopId},
    },
    error::AppError,
    repos::shop_repo::{NewShop, ShopChanges, ShopRow},
    state::AppState,
    tenancy::{Action, Resource},
};

fn row_to_response(state: &AppState, row: ShopRow) -> Result<ShopResponse, AppError> {
    Ok(ShopResponse {
        id: state.id_codec.encode(row.id)?,
        organization_id: row.organization_id.to_string(),
        name: row.name,
        currency: row.currency,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("VALIDATION_ERROR", message)
}

pub async fn list_shops(
    State(state): State<AppState>,
    TenantCtx(ctx): TenantCtx,
    AppQuery(query): AppQuery<ListShopsQuery>,
) -> Result<Json<Vec<ShopResponse>>, AppError> {
    let scope = state.enforcer.authorize(&ctx, Resource::Shop, Action::List)?;
    let page = query.page().map_err(invalid)?;

    let rows = state.shops.list(&scope, page).await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row)?);
    }

    Ok(Json(res))
}

pub async fn create_shop(
    State(state): State<AppState>,
    TenantCtx(ctx): TenantCtx,
    AppJson(req): AppJson<CreateShopRequest>,
) -> Result<(StatusCode, Json<ShopResponse>), AppError> {
    // create は filter 不要だが、許可の確認は必ず行う
    state
        .enforcer
        .authorize(&ctx, Resource::Shop, Action::Write)?;
    req.validate().map_err(invalid)?;

    let shop = NewShop::for_context(
        &ctx,
        req.name.trim().to_string(),
        req.currency.to_ascii_uppercase(),
    );
    let row = state.shops.create(shop).await?;

    tracing::info!(
        user_id = %ctx.user_id(),
        organization_id = %row.organization_id,
        shop_id = row.id,
        "shop created"
    );

    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

pub async fn get_shop(
    State(state): State<AppState>,
    TenantCtx(ctx): TenantCtx,
    shop_id: PublicShopId,
) -> Result<Json<ShopResponse>, AppError> {
    let scope = state.enforcer.authorize(&ctx, Resource::Shop, Action::Read)?;

    let row = state
        .shops
        .get(&scope, shop_id.id)
        .await?
        .ok_or(AppError::not_found("shop"))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn update_shop(
    State(state): State<AppState>,
    TenantCtx(ctx): TenantCtx,
    shop_id: PublicShopId,
    AppJson(req): AppJson<UpdateShopRequest>,
) -> Result<Json<ShopResponse>, AppError> {
    let scope = state.enforcer.authorize(&ctx, Resource::Shop, Action::Write)?;
    req.validate().map_err(invalid)?;

    let changes = ShopChanges {
        name: req.name.map(|n| n.trim().to_string()),
        currency: req.currency.map(|c| c.to_ascii_uppercase()),
    };

    let row = state
        .shops
        .update(&scope, shop_id.id, changes)
        .await?
        .ok_or(AppError::not_found("shop"))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn delete_shop(
    State(state): State<AppState>,
    TenantCtx(ctx): TenantCtx,
    shop_id: PublicShopId,
) -> Result<StatusCode, AppError> {
    let scope = state.enforcer.authorize(&ctx, Resource::Shop, Action::Delete)?;

    if state.shops.delete(&scope, shop_id.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("shop"))
    }
}
